//! CIP tag value
//!
//! [`CipValue`] pairs a [`CipType`] with the raw little-endian payload that
//! follows the 4-byte wire header. Three ways to create one:
//!
//! - [`CipValue::new_empty`]: zero-filled numeric array, to be filled with
//!   [`CipValue::set`] and written to a controller
//! - [`CipValue::from_strings`]: Omron string or structure string array
//! - [`CipValue::from_wire_bytes`]: the read path; element count and structure
//!   sub-kind are derived from the bytes
//!
//! Mutators write into the existing payload and never resize it or change the
//! kind.
//!
//! # Structure payloads
//!
//! A `STRUCT` payload read from a controller still starts with the 2-byte
//! structure sub-code:
//!
//! ```text
//! CE 0F | 05 00 00 00 | 48 65 6C 6C 6F
//! sub   | length      | text
//! ```
//!
//! A structure string array built locally holds only the length-prefixed,
//! even-padded strings. The value remembers which of the two it holds.

use tracing::debug;

use crate::bytes::{bit_ops, scalar, strings};
use crate::device::DeviceContext;
use crate::error::{CipError, Result};
use crate::number::CipNumber;
use crate::types::{element_width, CipType};

/// Record size of a counter or timer structure
pub const COUNTER_TIMER_RECORD_SIZE: usize = 12;

/// Wire element count used when the count is unknown
pub const UNKNOWN_ELEMENT_COUNT: u16 = 0xFFFF;

/// Typed CIP value with an exclusively owned payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipValue {
    pub(crate) kind: CipType,
    /// `None` when the count cannot be derived (structure string read back)
    pub(crate) element_count: Option<u16>,
    pub(crate) payload: Vec<u8>,
    pub(crate) structure_subkind: Option<CipType>,
    /// Payload starts with the structure sub-code (as read from a device)
    pub(crate) embedded_subcode: bool,
    /// Resolved BOOL element width at construction time
    pub(crate) bool_width: usize,
}

fn count_to_u16(count: usize) -> Result<u16> {
    u16::try_from(count).map_err(|_| CipError::ElementCountOverflow(count))
}

impl CipValue {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Zero-filled array of `element_count` numeric elements
    ///
    /// BOOL arrays are sized with the vendor width from `ctx`. BITS arrays
    /// allocate one 32-bit word per requested element.
    pub fn new_empty(kind: CipType, element_count: u16, ctx: &DeviceContext) -> Result<Self> {
        if !kind.is_numeric() {
            return Err(CipError::UnsupportedConstruction(kind));
        }
        let width = element_width(kind, ctx);
        Ok(Self {
            kind,
            element_count: Some(element_count),
            payload: vec![0; element_count as usize * width],
            structure_subkind: None,
            embedded_subcode: false,
            bool_width: ctx.bool_element_width(),
        })
    }

    /// String value from one or more strings
    ///
    /// - `STRUCT_STRING`: Rockwell string array, produces a `STRUCT` value
    /// - `OMRON_STRING`: exactly one string
    pub fn from_strings<S: AsRef<str>>(kind: CipType, values: &[S]) -> Result<Self> {
        match kind {
            CipType::StructString => Ok(Self {
                kind: CipType::Struct,
                element_count: Some(count_to_u16(values.len())?),
                payload: strings::encode_struct_strings(values)?,
                structure_subkind: Some(CipType::StructString),
                embedded_subcode: false,
                bool_width: CipType::Bool.nominal_width(),
            }),
            CipType::OmronString => {
                let [value] = values else {
                    return Err(CipError::ArrayNotSupported(values.len()));
                };
                Ok(Self {
                    kind,
                    element_count: Some(1),
                    payload: strings::encode_omron_string(value.as_ref())?,
                    structure_subkind: None,
                    embedded_subcode: false,
                    bool_width: CipType::Bool.nominal_width(),
                })
            },
            other => Err(CipError::UnsupportedConstruction(other)),
        }
    }

    /// Value from a device read: `bytes` is the payload after the wire header
    pub fn from_wire_bytes(kind: CipType, bytes: &[u8], ctx: &DeviceContext) -> Result<Self> {
        let (element_count, structure_subkind) = derive_element_count(kind, bytes, ctx)?;
        debug!(
            "Decoded {} from {} bytes: elements={:?}, structure={:?}",
            kind,
            bytes.len(),
            element_count,
            structure_subkind.map(|t| t.name())
        );
        Ok(Self {
            kind,
            element_count,
            payload: bytes.to_vec(),
            structure_subkind,
            embedded_subcode: kind == CipType::Struct,
            bool_width: ctx.bool_element_width(),
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn kind(&self) -> CipType {
        self.kind
    }

    /// Number of logical elements, `None` if it cannot be known from the bytes
    pub fn element_count(&self) -> Option<u16> {
        self.element_count
    }

    /// Embedded record kind of a `STRUCT` value
    pub fn structure_subkind(&self) -> Option<CipType> {
        self.structure_subkind
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// Check if the payload still carries the structure sub-code at offset 0
    pub fn has_embedded_subcode(&self) -> bool {
        self.embedded_subcode
    }

    pub fn is_numeric(&self) -> bool {
        self.kind.is_numeric()
    }

    pub fn is_structure(&self) -> bool {
        self.kind.is_structure()
    }

    /// Byte width of one element of this value (0 for variable-width kinds)
    pub fn element_width(&self) -> usize {
        match self.kind {
            CipType::Bool => self.bool_width,
            other => other.nominal_width(),
        }
    }

    /// Number of addressable numeric elements (bits for BITS)
    fn numeric_len(&self) -> usize {
        match self.kind {
            CipType::Bits => bit_ops::bit_capacity(&self.payload),
            _ => self.element_count.map_or(0, usize::from),
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        let len = self.numeric_len();
        if index >= len {
            return Err(CipError::out_of_range(index, len));
        }
        Ok(())
    }

    // ========================================================================
    // Scalar access
    // ========================================================================

    /// Read element `index`
    pub fn get_number(&self, index: usize) -> Result<CipNumber> {
        if !self.is_numeric() {
            return Err(CipError::NotNumeric(self.kind));
        }
        self.check_index(index)?;
        scalar::decode_scalar(self.kind, &self.payload, index, self.element_width())
    }

    /// Read every element
    pub fn numbers(&self) -> Result<Vec<CipNumber>> {
        if !self.is_numeric() {
            return Err(CipError::NotNumeric(self.kind));
        }
        (0..self.numeric_len())
            .map(|i| self.get_number(i))
            .collect()
    }

    /// Plain boolean view of bit `index` of a BITS value
    pub fn get_bit(&self, index: usize) -> Result<bool> {
        if self.kind != CipType::Bits {
            return Err(CipError::NotNumeric(self.kind));
        }
        self.check_index(index)?;
        bit_ops::get_bit(&self.payload, index)
    }

    /// Write element `index`, truncating `value` to the element's native width
    pub fn set(&mut self, index: usize, value: impl Into<CipNumber>) -> Result<()> {
        if !self.is_numeric() {
            return Err(CipError::NotSettable(self.kind));
        }
        self.check_index(index)?;
        let width = self.element_width();
        scalar::encode_scalar(self.kind, &mut self.payload, index, width, value.into())
    }

    // ========================================================================
    // String access
    // ========================================================================

    fn is_struct_string(&self) -> bool {
        self.kind == CipType::Struct && self.structure_subkind == Some(CipType::StructString)
    }

    /// Error for string access on something that is not a string
    fn not_a_string(&self) -> CipError {
        match self.structure_subkind {
            Some(sub) if self.kind == CipType::Struct => CipError::NotAString(sub),
            _ => CipError::NotAString(self.kind),
        }
    }

    /// Offset of the first structure string length prefix
    fn struct_string_offset(&self) -> usize {
        if self.embedded_subcode {
            2
        } else {
            0
        }
    }

    pub fn get_omron_string(&self) -> Result<String> {
        if self.kind != CipType::OmronString {
            return Err(CipError::NotAString(self.kind));
        }
        strings::decode_omron_string(&self.payload)
    }

    /// The (first) string of an Omron or structure string value
    pub fn get_string(&self) -> Result<String> {
        if self.kind == CipType::OmronString {
            return self.get_omron_string();
        }
        if !self.is_struct_string() {
            return Err(self.not_a_string());
        }
        strings::decode_struct_string(&self.payload, self.struct_string_offset())
    }

    /// Length field of the first structure string, with its decoded text
    pub(crate) fn struct_string_with_len(&self) -> Result<(String, usize)> {
        let offset = self.struct_string_offset();
        let len = scalar::read_u32(&self.payload, offset)? as usize;
        Ok((self.get_string()?, len))
    }

    /// Read a structure string array of `expected_count` strings
    ///
    /// Arrays read from a controller do not carry their length; each string
    /// occupies `(payload.len() - 2) / expected_count` bytes and the division
    /// must be exact.
    pub fn get_strings(&self, expected_count: usize) -> Result<Vec<String>> {
        if !self.is_struct_string() {
            return Err(self.not_a_string());
        }
        if self.embedded_subcode {
            let body = self.payload.get(2..).unwrap_or_default();
            strings::decode_struct_string_slots(body, expected_count)
        } else {
            let known = self.element_count.map(usize::from);
            if expected_count == 0 || known.is_some_and(|n| n != expected_count) {
                return Err(CipError::SizeMismatch {
                    expected: expected_count,
                    payload: self.payload.len(),
                });
            }
            strings::decode_struct_string_sequence(&self.payload, expected_count)
        }
    }

    /// Overwrite the payload of a `STRUCT` value with a single structure string
    ///
    /// The text is clamped to fit the existing payload (6 header bytes and one
    /// terminator reserved). The payload afterwards has the as-read layout.
    pub fn set_string(&mut self, text: &str) -> Result<()> {
        if self.kind != CipType::Struct {
            return Err(CipError::NotAString(self.kind));
        }
        let written = strings::write_struct_string(&mut self.payload, text)?;
        if written < text.len() {
            debug!(
                "Structure string clamped to {} of {} bytes",
                written,
                text.len()
            );
        }
        self.structure_subkind = Some(CipType::StructString);
        self.embedded_subcode = true;
        Ok(())
    }
}

/// Derive `(element_count, structure_subkind)` from a payload read from a device
fn derive_element_count(
    kind: CipType,
    payload: &[u8],
    ctx: &DeviceContext,
) -> Result<(Option<u16>, Option<CipType>)> {
    match kind {
        CipType::Bits => Ok((Some(count_to_u16(payload.len() * 8)?), None)),
        numeric if numeric.is_numeric() => {
            let width = element_width(numeric, ctx);
            Ok((Some(count_to_u16(payload.len() / width)?), None))
        },
        CipType::OmronString => Ok((Some(1), None)),
        CipType::Struct => {
            let code = scalar::read_u16(payload, 0)?;
            let sub = CipType::for_code(code).map_err(|_| CipError::UnknownStructureCode(code))?;
            let count = match sub {
                CipType::StructString => None,
                CipType::StructCounter | CipType::StructTimer => Some(count_to_u16(
                    (payload.len() - 2) / COUNTER_TIMER_RECORD_SIZE,
                )?),
                CipType::StructAlarm => Some(scalar::read_u16(payload, 2)?),
                other => return Err(CipError::UnhandledStructureKind(other)),
            };
            Ok((count, Some(sub)))
        },
        other => Err(CipError::UnhandledType(other)),
    }
}
