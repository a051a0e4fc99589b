//! Wire framing of CIP values
//!
//! ```text
//! non-structure  [type: u16][count: u16][payload]
//! structure      [0x02A0: u16][sub-code: u16][count: u16][reserved: u32 = 0][payload]
//! ```
//!
//! All fields are little-endian. A structure payload read from a device keeps
//! its own leading sub-code, so the sub-code appears twice in the encoding;
//! controllers expect exactly that on write-back.

use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::bytes::scalar;
use crate::device::DeviceContext;
use crate::error::{CipError, Result};
use crate::types::CipType;
use crate::value::{CipValue, UNKNOWN_ELEMENT_COUNT};

/// Type code + element count
pub const HEADER_SIZE: usize = 4;

/// Additional structure header: sub-code (2) + element count (2) + reserved (4),
/// less the count already included in [`HEADER_SIZE`]
pub const STRUCT_EXTRA_HEADER_SIZE: usize = 6;

impl CipValue {
    /// Number of bytes [`CipValue::encode`] writes
    pub fn encoded_size(&self) -> usize {
        let size = HEADER_SIZE + self.payload.len();
        if self.kind.is_structure() {
            size + STRUCT_EXTRA_HEADER_SIZE
        } else {
            size
        }
    }

    /// Element count as written in the wire header
    fn wire_element_count(&self) -> u16 {
        self.element_count.unwrap_or(UNKNOWN_ELEMENT_COUNT)
    }

    /// Write the wire form into `out`
    ///
    /// Fails with `BufferTooSmall` before writing anything if `out` cannot
    /// hold [`CipValue::encoded_size`] bytes.
    pub fn encode<B: BufMut>(&self, out: &mut B) -> Result<()> {
        let needed = self.encoded_size();
        if out.remaining_mut() < needed {
            return Err(CipError::BufferTooSmall {
                needed,
                available: out.remaining_mut(),
            });
        }

        if self.kind.is_structure() {
            let sub = self.structure_subkind.unwrap_or(self.kind);
            out.put_u16_le(CipType::Struct.code());
            out.put_u16_le(sub.code());
            out.put_u16_le(self.wire_element_count());
            out.put_u32_le(0);
        } else {
            out.put_u16_le(self.kind.code());
            out.put_u16_le(self.wire_element_count());
        }
        out.put_slice(&self.payload);

        trace!("Encoded {}: {} bytes", self.kind, needed);
        Ok(())
    }

    /// Wire form as an owned buffer
    pub fn to_bytes(&self) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(self.encoded_size());
        self.encode(&mut buf)?;
        trace!("Wire form of {}: {}", self.kind, hex::encode(&buf));
        Ok(buf.freeze())
    }

    /// Parse a complete wire frame (header and payload), the inverse of [`CipValue::encode`]
    ///
    /// The element count is taken from the frame header. A `STRUCT_STRING`
    /// frame with a known count is a locally built string array; every other
    /// structure frame is in the as-read layout and must repeat the header's
    /// sub-code at the start of its payload.
    pub fn from_wire(frame: &[u8], ctx: &DeviceContext) -> Result<Self> {
        let kind = CipType::for_code(scalar::read_u16(frame, 0)?)?;
        if kind != CipType::Struct {
            let count = scalar::read_u16(frame, 2)?;
            let payload = frame.get(HEADER_SIZE..).unwrap_or_default();
            let mut value = CipValue::from_wire_bytes(kind, payload, ctx)?;
            value.element_count = Some(count);
            return Ok(value);
        }

        let code = scalar::read_u16(frame, 2)?;
        let sub = CipType::for_code(code).map_err(|_| CipError::UnknownStructureCode(code))?;
        if !sub.is_structure_subkind() {
            return Err(CipError::UnhandledStructureKind(sub));
        }
        let count = match scalar::read_u16(frame, 4)? {
            UNKNOWN_ELEMENT_COUNT => None,
            n => Some(n),
        };
        let body_start = HEADER_SIZE + STRUCT_EXTRA_HEADER_SIZE;
        // reserved field must be present even when the payload is empty
        scalar::read_u32(frame, 6)?;
        let payload = frame.get(body_start..).unwrap_or_default();

        // a locally built string array is the only structure with a known count
        // and no embedded sub-code; its payload bytes are never inspected
        if sub == CipType::StructString && count.is_some() {
            return Ok(CipValue {
                kind: CipType::Struct,
                element_count: count,
                payload: payload.to_vec(),
                structure_subkind: Some(sub),
                embedded_subcode: false,
                bool_width: ctx.bool_element_width(),
            });
        }

        let mut value = CipValue::from_wire_bytes(CipType::Struct, payload, ctx)?;
        if value.structure_subkind != Some(sub) {
            return Err(CipError::UnhandledStructureKind(sub));
        }
        value.element_count = count;
        Ok(value)
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_non_structure_layout() {
        let value =
            CipValue::from_wire_bytes(CipType::Int, &[0xF9, 0xF8, 0x49, 0x40], &DeviceContext::default())
                .unwrap();
        assert_eq!(value.encoded_size(), 8);
        assert_eq!(
            value.to_bytes().unwrap().as_ref(),
            &[0xC3, 0x00, 0x02, 0x00, 0xF9, 0xF8, 0x49, 0x40]
        );
    }

    #[test]
    fn test_structure_layout_duplicates_subcode() {
        let data = [0xCE, 0x0F, 0x02, 0, 0, 0, b'H', b'i'];
        let value = CipValue::from_wire_bytes(CipType::Struct, &data, &DeviceContext::default())
            .unwrap();
        assert_eq!(value.encoded_size(), 10 + data.len());
        let wire = value.to_bytes().unwrap();
        assert_eq!(
            &wire[..10],
            &[0xA0, 0x02, 0xCE, 0x0F, 0xFF, 0xFF, 0, 0, 0, 0]
        );
        assert_eq!(&wire[10..], &data);
    }

    #[test]
    fn test_constructed_strings_layout() {
        let value = CipValue::from_strings(CipType::StructString, &["Hello"]).unwrap();
        let wire = value.to_bytes().unwrap();
        assert_eq!(
            wire.as_ref(),
            &[
                0xA0, 0x02, 0xCE, 0x0F, 0x01, 0x00, 0, 0, 0, 0, // header
                0x05, 0, 0, 0, b'H', b'e', b'l', b'l', b'o', 0x00,
            ]
        );
    }

    #[test]
    fn test_encode_into_small_buffer() {
        let value = CipValue::new_empty(CipType::Dint, 2, &DeviceContext::default()).unwrap();
        let mut storage = [0u8; 8];
        let mut out: &mut [u8] = &mut storage;
        assert_eq!(
            value.encode(&mut out),
            Err(CipError::BufferTooSmall {
                needed: 12,
                available: 8
            })
        );
        assert_eq!(storage, [0u8; 8]);
    }

    #[test]
    fn test_from_wire_inverts_encode() {
        let ctx = DeviceContext::default();
        let mut value = CipValue::new_empty(CipType::Lreal, 2, &ctx).unwrap();
        value.set(1, -2.5).unwrap();
        assert_eq!(CipValue::from_wire(&value.to_bytes().unwrap(), &ctx).unwrap(), value);

        let strings = CipValue::from_strings(CipType::StructString, &["a", "bc"]).unwrap();
        assert_eq!(
            CipValue::from_wire(&strings.to_bytes().unwrap(), &ctx).unwrap(),
            strings
        );

        let data = [0xCE, 0x0F, 0x02, 0, 0, 0, b'H', b'i'];
        let read = CipValue::from_wire_bytes(CipType::Struct, &data, &ctx).unwrap();
        assert_eq!(CipValue::from_wire(&read.to_bytes().unwrap(), &ctx).unwrap(), read);
    }

    #[test]
    fn test_from_wire_string_length_matching_subcode() {
        // 4046 == 0x0FCE, so the payload starts with the STRUCT_STRING code
        let ctx = DeviceContext::default();
        let text = "x".repeat(0x0FCE);
        let value = CipValue::from_strings(CipType::StructString, &[text.as_str()]).unwrap();
        assert_eq!(&value.payload()[..4], &[0xCE, 0x0F, 0, 0]);

        let decoded = CipValue::from_wire(&value.to_bytes().unwrap(), &ctx).unwrap();
        assert!(!decoded.has_embedded_subcode());
        assert_eq!(decoded.get_string().unwrap(), text);
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_from_wire_rejects_subcode_mismatch() {
        let ctx = DeviceContext::default();
        // header says COUNTER, payload carries STRUCT_STRING
        let frame = [
            0xA0, 0x02, 0x82, 0x0F, 0xFF, 0xFF, 0, 0, 0, 0, 0xCE, 0x0F, 0, 0, 0, 0,
        ];
        assert_eq!(
            CipValue::from_wire(&frame, &ctx),
            Err(CipError::UnhandledStructureKind(CipType::StructCounter))
        );
    }

    #[test]
    fn test_from_wire_rejects_bad_frames() {
        let ctx = DeviceContext::default();
        assert_eq!(
            CipValue::from_wire(&[0x34, 0x12, 0, 0], &ctx),
            Err(CipError::UnknownTypeCode(0x1234))
        );
        assert!(matches!(
            CipValue::from_wire(&[0xC3], &ctx),
            Err(CipError::Truncated { .. })
        ));
        assert_eq!(
            CipValue::from_wire(&[0xA0, 0x02, 0xC4, 0x00, 1, 0, 0, 0, 0, 0], &ctx),
            Err(CipError::UnhandledStructureKind(CipType::Dint))
        );
    }
}
