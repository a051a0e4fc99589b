//! String payload layouts
//!
//! Two independent encodings travel on the wire:
//!
//! ```text
//! Omron (NJ/NX)      [len: u16-LE][utf8 bytes]                    no padding
//! Structure string   [len: u32-LE][utf8 bytes][0x00 if len odd]   per string
//! ```
//!
//! The structure length field always holds the unpadded byte count. When a
//! structure string is read back from a controller each array slot is sized to
//! the declared string capacity, so only the first `len` bytes of a slot are
//! significant.

use bytes::BufMut;

use super::scalar::{read_u16, read_u32, slice_at, slice_at_mut, write_u16, write_u32};
use crate::error::{CipError, Result};
use crate::types::CipType;

/// Width of the Omron length prefix
pub const OMRON_LEN_PREFIX: usize = 2;

/// Width of the structure string length prefix
pub const STRUCT_LEN_PREFIX: usize = 4;

/// Header of an as-read structure string: sub-code (2) + length (4)
pub const STRUCT_STRING_HEADER: usize = 2 + STRUCT_LEN_PREFIX;

/// Length rounded up to an even byte count
#[inline]
pub fn padded_len(len: usize) -> usize {
    len + (len & 1)
}

fn utf8_lossy(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

// ============================================================================
// Omron strings
// ============================================================================

/// Encode a single Omron string payload
pub fn encode_omron_string(text: &str) -> Result<Vec<u8>> {
    let raw = text.as_bytes();
    let len = u16::try_from(raw.len()).map_err(|_| CipError::StringTooLong {
        len: raw.len(),
        max: u16::MAX as usize,
    })?;
    let mut out = Vec::with_capacity(OMRON_LEN_PREFIX + raw.len());
    out.put_u16_le(len);
    out.put_slice(raw);
    Ok(out)
}

/// Decode an Omron string payload
pub fn decode_omron_string(payload: &[u8]) -> Result<String> {
    let len = read_u16(payload, 0)? as usize;
    Ok(utf8_lossy(slice_at(payload, OMRON_LEN_PREFIX, len)?))
}

// ============================================================================
// Structure strings
// ============================================================================

/// Append one structure string (length, bytes, even padding) to `out`
pub fn put_struct_string<B: BufMut>(out: &mut B, text: &str) -> Result<()> {
    let raw = text.as_bytes();
    let len = u32::try_from(raw.len()).map_err(|_| CipError::StringTooLong {
        len: raw.len(),
        max: u32::MAX as usize,
    })?;
    out.put_u32_le(len);
    out.put_slice(raw);
    if raw.len() % 2 != 0 {
        out.put_u8(0);
    }
    Ok(())
}

/// Encode a sequence of structure strings back to back
pub fn encode_struct_strings<S: AsRef<str>>(values: &[S]) -> Result<Vec<u8>> {
    let total = values
        .iter()
        .map(|v| STRUCT_LEN_PREFIX + padded_len(v.as_ref().len()))
        .sum();
    let mut out = Vec::with_capacity(total);
    for value in values {
        put_struct_string(&mut out, value.as_ref())?;
    }
    Ok(out)
}

/// Decode one structure string whose length prefix sits at `offset`
pub fn decode_struct_string(buf: &[u8], offset: usize) -> Result<String> {
    let len = read_u32(buf, offset)? as usize;
    Ok(utf8_lossy(slice_at(buf, offset + STRUCT_LEN_PREFIX, len)?))
}

/// Decode `count` equally sized structure string slots
///
/// `body` is the payload without any sub-code. Each slot is
/// `body.len() / count` bytes; the division must be exact.
pub fn decode_struct_string_slots(body: &[u8], count: usize) -> Result<Vec<String>> {
    if count == 0 || body.is_empty() || body.len() % count != 0 {
        return Err(CipError::SizeMismatch {
            expected: count,
            payload: body.len(),
        });
    }
    let stride = body.len() / count;
    body.chunks_exact(stride)
        .map(|slot| decode_struct_string(slot, 0))
        .collect()
}

/// Decode back-to-back padded structure strings (the constructed layout)
pub fn decode_struct_string_sequence(body: &[u8], count: usize) -> Result<Vec<String>> {
    let mut offset = 0;
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let len = read_u32(body, offset)? as usize;
        out.push(utf8_lossy(slice_at(body, offset + STRUCT_LEN_PREFIX, len)?));
        offset += STRUCT_LEN_PREFIX + padded_len(len);
    }
    Ok(out)
}

/// Write `text` into an as-read structure string payload, in place
///
/// Layout written: STRUCT_STRING sub-code at 0, clamped length at 2, text at 6,
/// then a zero terminator. The text is clamped to `payload.len() - 7` bytes.
/// Returns the number of text bytes written.
pub fn write_struct_string(payload: &mut [u8], text: &str) -> Result<usize> {
    let needed = STRUCT_STRING_HEADER + 1;
    if payload.len() < needed {
        return Err(CipError::truncated(needed, payload.len()));
    }
    let raw = text.as_bytes();
    let len = raw.len().min(payload.len() - needed);

    write_u16(payload, 0, CipType::StructString.code())?;
    write_u32(payload, 2, len as u32)?;
    slice_at_mut(payload, STRUCT_STRING_HEADER, len)?.copy_from_slice(&raw[..len]);
    slice_at_mut(payload, STRUCT_STRING_HEADER + len, 1)?[0] = 0;
    Ok(len)
}
