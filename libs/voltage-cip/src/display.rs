//! Diagnostic rendering of CIP values
//!
//! Output is matched literally by consumers, so the format is fixed:
//!
//! ```text
//! CIP_INT (0x00C3): [-1799, 16457]
//! CIP_BOOL (0x00C1): [TRUE, FALSE]
//! CIP_OMRON_STRING (0x00D0): "OmronString"
//! CIP_STRUCT (0x02A0): STRUCT_STRING (0x0FCE) 'Hello', len 5
//! ```
//!
//! Locally built string arrays have no legacy rendering. They are listed as
//! `STRUCT_STRING (0x0FCE) 'a', len 1, 'bc', len 2`, which is an extension
//! and not part of the fixed format above.

use std::fmt;

use crate::bytes::{bit_ops, strings};
use crate::error::Result;
use crate::number::CipNumber;
use crate::types::CipType;
use crate::value::CipValue;

/// `[a, b, c]`
fn list<T: fmt::Display>(items: impl IntoIterator<Item = T>) -> String {
    let items: Vec<String> = items.into_iter().map(|i| i.to_string()).collect();
    format!("[{}]", items.join(", "))
}

fn bool_label(n: &CipNumber) -> &'static str {
    if n.is_nonzero() {
        "TRUE"
    } else {
        "FALSE"
    }
}

impl CipValue {
    fn render_struct_strings(&self) -> Result<String> {
        if self.embedded_subcode {
            let (text, len) = self.struct_string_with_len()?;
            return Ok(format!("{} '{}', len {}", CipType::StructString, text, len));
        }
        let count = self.element_count.map_or(0, usize::from);
        let texts: Vec<String> = strings::decode_struct_string_sequence(&self.payload, count)?
            .into_iter()
            .map(|text| format!("'{}', len {}", text, text.len()))
            .collect();
        Ok(format!("{} {}", CipType::StructString, texts.join(", ")))
    }

    fn render_body(&self) -> Result<String> {
        let body = match self.kind {
            CipType::Bool => list(self.numbers()?.iter().map(bool_label)),
            CipType::Bits => list(bit_ops::iter_bits(&self.payload).map(u8::from)),
            numeric if numeric.is_numeric() => list(self.numbers()?),
            CipType::OmronString => format!("\"{}\"", self.get_omron_string()?),
            CipType::Struct => match self.structure_subkind {
                Some(CipType::StructString) => self.render_struct_strings()?,
                _ => format!("Structure element of type {}", self.kind),
            },
            other => format!("Unknown Type {}", other),
        };
        Ok(body)
    }
}

impl fmt::Display for CipValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CIP_{}: ", self.kind)?;
        match self.render_body() {
            Ok(body) => f.write_str(&body),
            Err(e) => write!(f, "<{}>", e),
        }
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use crate::device::DeviceContext;

    fn decode(kind: CipType, data: &[u8]) -> CipValue {
        CipValue::from_wire_bytes(kind, data, &DeviceContext::default()).unwrap()
    }

    #[test]
    fn test_numeric_lists() {
        let data = [0xF9, 0xF8, 0x49, 0x40];
        assert_eq!(decode(CipType::Int, &data).to_string(), "CIP_INT (0x00C3): [-1799, 16457]");
        assert_eq!(decode(CipType::Uint, &data).to_string(), "CIP_UINT (0x00C7): [63737, 16457]");
        assert_eq!(decode(CipType::Usint, &[0xF9]).to_string(), "CIP_USINT (0x00C6): [249]");
        assert_eq!(
            decode(CipType::Real, &[0xF9, 0x0F, 0x49, 0x40]).to_string(),
            "CIP_REAL (0x00CA): [3.1416]"
        );
    }

    #[test]
    fn test_bool_and_bits() {
        assert_eq!(decode(CipType::Bool, &[0x01, 0x00]).to_string(), "CIP_BOOL (0x00C1): [TRUE, FALSE]");
        let bits = decode(CipType::Bits, &[0x05]).to_string();
        assert_eq!(bits, "CIP_BITS (0x00D3): [1, 0, 1, 0, 0, 0, 0, 0]");
    }

    #[test]
    fn test_structures() {
        let value = decode(CipType::Struct, &[0x82, 0x0F, 0, 0]);
        assert_eq!(
            value.to_string(),
            "CIP_STRUCT (0x02A0): Structure element of type STRUCT (0x02A0)"
        );

        let value = CipValue::from_strings(CipType::StructString, &["ab", "c"]).unwrap();
        assert_eq!(
            value.to_string(),
            "CIP_STRUCT (0x02A0): STRUCT_STRING (0x0FCE) 'ab', len 2, 'c', len 1"
        );
    }

    #[test]
    fn test_malformed_payload_renders_error() {
        let value = decode(CipType::Struct, &[0xCE, 0x0F, 0x09, 0, 0, 0, b'x']);
        assert_eq!(
            value.to_string(),
            "CIP_STRUCT (0x02A0): <Truncated data: need 15 bytes, have 7>"
        );
    }
}
