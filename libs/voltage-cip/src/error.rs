//! CIP Codec Error Types
//!
//! Every failure of the codec is reported synchronously through [`CipError`].
//! Recovery policy (for example treating a failed read as "tag absent") belongs
//! to the caller.

use thiserror::Error;

use crate::types::CipType;

/// Result type for voltage-cip operations
pub type Result<T> = std::result::Result<T, CipError>;

/// CIP codec errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CipError {
    /// Wire type code with no registry entry
    #[error("Unknown CIP type code 0x{0:04X}")]
    UnknownTypeCode(u16),

    /// Type not valid for the chosen constructor
    #[error("Type {0} not handled by this constructor")]
    UnsupportedConstruction(CipType),

    /// Omron controllers only accept a single string per value
    #[error("Omron string arrays are not supported (got {0} strings)")]
    ArrayNotSupported(usize),

    /// Embedded structure sub-code with no registry entry
    #[error("Unknown structure code 0x{0:04X}")]
    UnknownStructureCode(u16),

    /// Embedded structure sub-code that names a non-structure type
    #[error("Structure elements of type {0} not handled")]
    UnhandledStructureKind(CipType),

    /// Type that cannot be decoded from wire bytes
    #[error("Type {0} not handled")]
    UnhandledType(CipType),

    /// String array stride does not divide the payload evenly
    #[error("The data does not contain an array of {expected} strings ({payload} payload bytes)")]
    SizeMismatch { expected: usize, payload: usize },

    /// Numeric read on a non-numeric value
    #[error("Cannot retrieve number from {0}")]
    NotNumeric(CipType),

    /// Numeric write on a non-numeric value
    #[error("Cannot set type {0} to a number")]
    NotSettable(CipType),

    /// String access on a value that holds no string
    #[error("Type {0} does not contain a string")]
    NotAString(CipType),

    /// Element index outside `[0, len)`
    #[error("Index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Length or offset field points past the payload
    #[error("Truncated data: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    /// Element count does not fit the 16-bit wire field
    #[error("Element count {0} exceeds the 16-bit wire field")]
    ElementCountOverflow(usize),

    /// String longer than its length prefix can describe
    #[error("String of {len} bytes exceeds maximum {max}")]
    StringTooLong { len: usize, max: usize },

    /// Encode target cannot hold the encoding
    #[error("Buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CipError {
    pub fn truncated(needed: usize, available: usize) -> Self {
        CipError::Truncated { needed, available }
    }

    pub fn out_of_range(index: usize, len: usize) -> Self {
        CipError::IndexOutOfRange { index, len }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        CipError::Config(msg.into())
    }

    /// Check if this error means the operation does not apply to the value's type
    ///
    /// These are "expected" failures (asking a REAL for a string); callers usually
    /// branch on them instead of reporting them.
    pub fn is_unsupported_kind(&self) -> bool {
        matches!(
            self,
            CipError::UnsupportedConstruction(_)
                | CipError::UnhandledType(_)
                | CipError::UnhandledStructureKind(_)
                | CipError::NotNumeric(_)
                | CipError::NotSettable(_)
                | CipError::NotAString(_)
        )
    }

    /// Check if this error was caused by malformed wire data
    pub fn is_malformed_data(&self) -> bool {
        matches!(
            self,
            CipError::UnknownTypeCode(_)
                | CipError::UnknownStructureCode(_)
                | CipError::SizeMismatch { .. }
                | CipError::Truncated { .. }
        )
    }
}
