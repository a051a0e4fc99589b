//! Scalar element codec
//!
//! Little-endian primitives at absolute payload offsets, and the per-type
//! element decode/encode built on them:
//!
//! | Type          | Read as                      | Written as          |
//! |---------------|------------------------------|---------------------|
//! | BOOL, SINT    | i8                           | vendor BOOL / i8    |
//! | USINT         | u8 zero-extended             | low byte            |
//! | INT / UINT    | i16 / u16 zero-extended      | low 2 bytes         |
//! | DINT / UDINT  | i32 / u32 zero-extended      | low 4 bytes         |
//! | LINT / ULINT  | i64 (ULINT stays signed)     | 8 bytes             |
//! | REAL / LREAL  | IEEE-754 single / double     | single / double     |
//! | BITS          | see [`super::bit_ops`]       | word read-modify-write |

use byteorder::{ByteOrder, LittleEndian};

use super::bit_ops;
use crate::error::{CipError, Result};
use crate::number::CipNumber;
use crate::types::CipType;

/// Borrow `len` bytes at `offset`
#[inline]
pub fn slice_at(buf: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    let end = offset
        .checked_add(len)
        .ok_or_else(|| CipError::truncated(usize::MAX, buf.len()))?;
    buf.get(offset..end)
        .ok_or_else(|| CipError::truncated(end, buf.len()))
}

/// Mutably borrow `len` bytes at `offset`
#[inline]
pub fn slice_at_mut(buf: &mut [u8], offset: usize, len: usize) -> Result<&mut [u8]> {
    let available = buf.len();
    let end = offset
        .checked_add(len)
        .ok_or_else(|| CipError::truncated(usize::MAX, available))?;
    buf.get_mut(offset..end)
        .ok_or_else(|| CipError::truncated(end, available))
}

pub fn read_i8(buf: &[u8], offset: usize) -> Result<i8> {
    Ok(slice_at(buf, offset, 1)?[0] as i8)
}

pub fn read_u8(buf: &[u8], offset: usize) -> Result<u8> {
    Ok(slice_at(buf, offset, 1)?[0])
}

pub fn read_i16(buf: &[u8], offset: usize) -> Result<i16> {
    Ok(LittleEndian::read_i16(slice_at(buf, offset, 2)?))
}

pub fn read_u16(buf: &[u8], offset: usize) -> Result<u16> {
    Ok(LittleEndian::read_u16(slice_at(buf, offset, 2)?))
}

pub fn read_i32(buf: &[u8], offset: usize) -> Result<i32> {
    Ok(LittleEndian::read_i32(slice_at(buf, offset, 4)?))
}

pub fn read_u32(buf: &[u8], offset: usize) -> Result<u32> {
    Ok(LittleEndian::read_u32(slice_at(buf, offset, 4)?))
}

pub fn read_i64(buf: &[u8], offset: usize) -> Result<i64> {
    Ok(LittleEndian::read_i64(slice_at(buf, offset, 8)?))
}

pub fn read_f32(buf: &[u8], offset: usize) -> Result<f32> {
    Ok(LittleEndian::read_f32(slice_at(buf, offset, 4)?))
}

pub fn read_f64(buf: &[u8], offset: usize) -> Result<f64> {
    Ok(LittleEndian::read_f64(slice_at(buf, offset, 8)?))
}

pub fn write_u8(buf: &mut [u8], offset: usize, value: u8) -> Result<()> {
    slice_at_mut(buf, offset, 1)?[0] = value;
    Ok(())
}

pub fn write_u16(buf: &mut [u8], offset: usize, value: u16) -> Result<()> {
    LittleEndian::write_u16(slice_at_mut(buf, offset, 2)?, value);
    Ok(())
}

pub fn write_u32(buf: &mut [u8], offset: usize, value: u32) -> Result<()> {
    LittleEndian::write_u32(slice_at_mut(buf, offset, 4)?, value);
    Ok(())
}

pub fn write_u64(buf: &mut [u8], offset: usize, value: u64) -> Result<()> {
    LittleEndian::write_u64(slice_at_mut(buf, offset, 8)?, value);
    Ok(())
}

pub fn write_f32(buf: &mut [u8], offset: usize, value: f32) -> Result<()> {
    LittleEndian::write_f32(slice_at_mut(buf, offset, 4)?, value);
    Ok(())
}

pub fn write_f64(buf: &mut [u8], offset: usize, value: f64) -> Result<()> {
    LittleEndian::write_f64(slice_at_mut(buf, offset, 8)?, value);
    Ok(())
}

/// Decode element `index` of a numeric payload
///
/// `width` is the already vendor-resolved element width of `kind`; it is only
/// consulted for byte-addressed kinds (BITS is bit-addressed).
pub fn decode_scalar(kind: CipType, payload: &[u8], index: usize, width: usize) -> Result<CipNumber> {
    let offset = index * width;
    let number = match kind {
        CipType::Bool | CipType::Sint => CipNumber::Sint(read_i8(payload, offset)?),
        CipType::Usint => CipNumber::Int(read_u8(payload, offset)? as i16),
        CipType::Int => CipNumber::Int(read_i16(payload, offset)?),
        CipType::Uint => CipNumber::Dint(read_u16(payload, offset)? as i32),
        CipType::Dint => CipNumber::Dint(read_i32(payload, offset)?),
        CipType::Udint => CipNumber::Lint(read_u32(payload, offset)? as i64),
        // ULINT is read signed, values above i64::MAX come back negative
        CipType::Lint | CipType::Ulint => CipNumber::Lint(read_i64(payload, offset)?),
        CipType::Real => CipNumber::Real(read_f32(payload, offset)?),
        CipType::Lreal => CipNumber::Lreal(read_f64(payload, offset)?),
        CipType::Bits => CipNumber::Sint(bit_ops::get_bit_byte(payload, index)?),
        other => return Err(CipError::NotNumeric(other)),
    };
    Ok(number)
}

/// Encode `value` into element `index` of a numeric payload, in place
///
/// Integers truncate to the element width; floating values truncate toward
/// zero first. BOOL writes depend on `width`: 2-byte `1`/`0` (Omron) or
/// 1-byte `0xFF`/`0x00` (everyone else).
pub fn encode_scalar(
    kind: CipType,
    payload: &mut [u8],
    index: usize,
    width: usize,
    value: CipNumber,
) -> Result<()> {
    let offset = index * width;
    match kind {
        CipType::Bool => {
            let on = value.is_nonzero();
            if width == 2 {
                write_u16(payload, offset, on as u16)
            } else {
                write_u8(payload, offset, if on { 0xFF } else { 0x00 })
            }
        },
        CipType::Sint | CipType::Usint => write_u8(payload, offset, value.as_i64() as u8),
        CipType::Int | CipType::Uint => write_u16(payload, offset, value.as_i64() as u16),
        CipType::Dint | CipType::Udint => write_u32(payload, offset, value.as_i64() as u32),
        CipType::Lint | CipType::Ulint => write_u64(payload, offset, value.as_i64() as u64),
        CipType::Real => write_f32(payload, offset, value.as_f32()),
        CipType::Lreal => write_f64(payload, offset, value.as_f64()),
        CipType::Bits => bit_ops::set_bit_in_word(payload, index, value.is_nonzero()),
        other => Err(CipError::NotSettable(other)),
    }
}
