//! CIP type registry
//!
//! The closed catalog of CIP primitive and structure type codes understood by
//! the codec. Declaration order is significant and mirrors the wire catalog:
//!
//! ```text
//! BOOL .. BITS      numeric kinds      (is_numeric)
//! OMRON_STRING      non-structure string
//! STRUCT ..         structure kinds    (is_structure), STRUCT first
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use crate::device::DeviceContext;
use crate::error::{CipError, Result};

/// CIP data type
///
/// Each variant carries a 16-bit wire code and a nominal element width in
/// bytes (0 for variable-width string and structure kinds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CipType {
    Bool,
    Sint,
    Int,
    Dint,
    /// Omron
    Lint,
    /// Omron
    Usint,
    /// Omron
    Uint,
    /// Omron
    Udint,
    /// Omron
    Ulint,
    Real,
    /// Omron
    Lreal,
    /// Packed bit array (DWORD words), last numeric kind
    Bits,
    /// Length-prefixed UTF-8 string, Omron NJ/NX only
    OmronString,
    /// Generic structure wrapper; the concrete record kind is embedded in the payload
    Struct,
    /// Rockwell STRING structure (DINT length + characters)
    StructString,
    StructCounter,
    StructTimer,
    StructAlarm,
}

impl CipType {
    /// Every variant in declaration order
    pub const ALL: [CipType; 18] = [
        CipType::Bool,
        CipType::Sint,
        CipType::Int,
        CipType::Dint,
        CipType::Lint,
        CipType::Usint,
        CipType::Uint,
        CipType::Udint,
        CipType::Ulint,
        CipType::Real,
        CipType::Lreal,
        CipType::Bits,
        CipType::OmronString,
        CipType::Struct,
        CipType::StructString,
        CipType::StructCounter,
        CipType::StructTimer,
        CipType::StructAlarm,
    ];

    /// Fixed-width kinds that can be allocated from an element count
    pub const NUMERIC: [CipType; 12] = [
        CipType::Bool,
        CipType::Sint,
        CipType::Int,
        CipType::Dint,
        CipType::Lint,
        CipType::Usint,
        CipType::Uint,
        CipType::Udint,
        CipType::Ulint,
        CipType::Real,
        CipType::Lreal,
        CipType::Bits,
    ];

    /// Wire code
    pub fn code(&self) -> u16 {
        match self {
            Self::Bool => 0x00C1,
            Self::Sint => 0x00C2,
            Self::Int => 0x00C3,
            Self::Dint => 0x00C4,
            Self::Lint => 0x00C5,
            Self::Usint => 0x00C6,
            Self::Uint => 0x00C7,
            Self::Udint => 0x00C8,
            Self::Ulint => 0x00C9,
            Self::Real => 0x00CA,
            Self::Lreal => 0x00CB,
            Self::Bits => 0x00D3,
            Self::OmronString => 0x00D0,
            Self::Struct => 0x02A0,
            Self::StructString => 0x0FCE,
            Self::StructCounter => 0x0F82,
            Self::StructTimer => 0x0F83,
            Self::StructAlarm => 0x0F8B,
        }
    }

    /// Nominal element width in bytes, 0 for variable-width kinds
    ///
    /// BOOL reports the Rockwell width here; use [`element_width`] when a
    /// device context is available.
    pub fn nominal_width(&self) -> usize {
        match self {
            Self::Bool | Self::Sint | Self::Usint => 1,
            Self::Int | Self::Uint => 2,
            Self::Dint | Self::Udint | Self::Real | Self::Bits => 4,
            Self::Lint | Self::Ulint | Self::Lreal => 8,
            Self::OmronString
            | Self::Struct
            | Self::StructString
            | Self::StructCounter
            | Self::StructTimer
            | Self::StructAlarm => 0,
        }
    }

    /// Catalog name as used in diagnostics (`STRUCT_STRING`)
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "BOOL",
            Self::Sint => "SINT",
            Self::Int => "INT",
            Self::Dint => "DINT",
            Self::Lint => "LINT",
            Self::Usint => "USINT",
            Self::Uint => "UINT",
            Self::Udint => "UDINT",
            Self::Ulint => "ULINT",
            Self::Real => "REAL",
            Self::Lreal => "LREAL",
            Self::Bits => "BITS",
            Self::OmronString => "OMRON_STRING",
            Self::Struct => "STRUCT",
            Self::StructString => "STRUCT_STRING",
            Self::StructCounter => "STRUCT_COUNTER",
            Self::StructTimer => "STRUCT_TIMER",
            Self::StructAlarm => "STRUCT_ALARM",
        }
    }

    /// Check if this is a numeric kind (`BOOL` through `BITS`)
    pub fn is_numeric(&self) -> bool {
        *self <= Self::Bits
    }

    /// Check if this is a structure kind (`STRUCT` and its payload kinds)
    pub fn is_structure(&self) -> bool {
        *self >= Self::Struct
    }

    /// Check if this is one of the concrete record kinds embedded in a `STRUCT`
    pub fn is_structure_subkind(&self) -> bool {
        *self > Self::Struct
    }

    /// Look up a type by wire code
    pub fn for_code(code: u16) -> Result<Self> {
        code_table()
            .get(&code)
            .copied()
            .ok_or(CipError::UnknownTypeCode(code))
    }

    /// Parse from the catalog name (case-insensitive, `CIP_` prefix optional)
    pub fn parse(s: &str) -> Option<Self> {
        let upper = s.trim().to_uppercase();
        let name = upper.strip_prefix("CIP_").unwrap_or(&upper);
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }
}

/// Code → type table, built once on first lookup
fn code_table() -> &'static HashMap<u16, CipType> {
    static TABLE: OnceLock<HashMap<u16, CipType>> = OnceLock::new();
    TABLE.get_or_init(|| CipType::ALL.iter().map(|t| (t.code(), *t)).collect())
}

/// Look up a type by wire code
pub fn type_for_code(code: u16) -> Result<CipType> {
    CipType::for_code(code)
}

/// Element width of `kind` on the given device
///
/// Substitutes the vendor-specific BOOL width (1 byte on Rockwell/AB, 2 bytes on
/// Omron); every other kind reports its nominal width.
pub fn element_width(kind: CipType, ctx: &DeviceContext) -> usize {
    match kind {
        CipType::Bool => ctx.bool_element_width(),
        other => other.nominal_width(),
    }
}

impl TryFrom<u16> for CipType {
    type Error = CipError;

    fn try_from(code: u16) -> Result<Self> {
        Self::for_code(code)
    }
}

impl fmt::Display for CipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:04X})", self.name(), self.code())
    }
}
