//! Packed bit array (BITS) operations
//!
//! Bits are grouped in little-endian 32-bit words; bit `i` lives in the word at
//! byte offset `(i / 32) * 4`, at position `i % 32`. A payload whose length is
//! not a multiple of 4 ends in a partial word, which is read zero-extended and
//! written back truncated to the bytes actually present.
//!
//! The word offset is deliberately `(i / 32) * 4` bytes, not the legacy
//! `i / 32` byte offset, which addressed overlapping words.

use crate::error::{CipError, Result};

/// Bits per addressing word
pub const BITS_PER_WORD: usize = 32;

/// Bytes per addressing word
pub const WORD_BYTES: usize = 4;

/// Byte offset of the word holding bit `bit_index`
#[inline]
pub fn word_offset(bit_index: usize) -> usize {
    (bit_index / BITS_PER_WORD) * WORD_BYTES
}

/// Number of addressable bits in a payload
#[inline]
pub fn bit_capacity(payload: &[u8]) -> usize {
    payload.len() * 8
}

/// Read the word containing `bit_index`, zero-extending a trailing partial word
pub fn read_word(payload: &[u8], bit_index: usize) -> Result<u32> {
    let offset = word_offset(bit_index);
    if offset >= payload.len() {
        return Err(CipError::truncated(offset + 1, payload.len()));
    }
    let end = (offset + WORD_BYTES).min(payload.len());
    let mut raw = [0u8; WORD_BYTES];
    raw[..end - offset].copy_from_slice(&payload[offset..end]);
    Ok(u32::from_le_bytes(raw))
}

/// Write the word containing `bit_index`, dropping bytes past the payload end
pub fn write_word(payload: &mut [u8], bit_index: usize, word: u32) -> Result<()> {
    let offset = word_offset(bit_index);
    if offset >= payload.len() {
        return Err(CipError::truncated(offset + 1, payload.len()));
    }
    let end = (offset + WORD_BYTES).min(payload.len());
    payload[offset..end].copy_from_slice(&word.to_le_bytes()[..end - offset]);
    Ok(())
}

/// Numeric read of bit `bit_index`
///
/// Returns the containing word shifted right by `bit_index % 32` and
/// truncated to a signed byte, so higher neighbouring bits leak into the
/// result. Use [`get_bit`] for a plain boolean.
pub fn get_bit_byte(payload: &[u8], bit_index: usize) -> Result<i8> {
    let word = read_word(payload, bit_index)?;
    Ok((word >> (bit_index % BITS_PER_WORD)) as i8)
}

/// Boolean read of bit `bit_index`
pub fn get_bit(payload: &[u8], bit_index: usize) -> Result<bool> {
    let word = read_word(payload, bit_index)?;
    Ok((word >> (bit_index % BITS_PER_WORD)) & 1 == 1)
}

/// Set or clear bit `bit_index` with a word read-modify-write
pub fn set_bit_in_word(payload: &mut [u8], bit_index: usize, on: bool) -> Result<()> {
    let mask = 1u32 << (bit_index % BITS_PER_WORD);
    let word = read_word(payload, bit_index)?;
    let word = if on { word | mask } else { word & !mask };
    write_word(payload, bit_index, word)
}

/// Iterate all bits byte by byte, least-significant bit first
///
/// Yields bit `8 * i + b` as bit `b` of byte `i`, which agrees with the word
/// addressing above because words are little-endian.
pub fn iter_bits(payload: &[u8]) -> impl Iterator<Item = bool> + '_ {
    payload
        .iter()
        .flat_map(|&byte| (0..8).map(move |b| (byte >> b) & 1 == 1))
}
