//! Binary data processing utilities
//!
//! Offset-based little-endian access to CIP payloads, packed bit arrays and the
//! two string layouts. Every CIP multi-byte field is little-endian.
//!
//! # Design Principles
//!
//! - **Bounds-checked**: every read/write reports `Truncated` instead of panicking
//! - **In place**: writes never resize the payload
//! - **Type-agnostic primitives**: type dispatch lives in [`scalar`]

pub mod bit_ops;
pub mod scalar;
pub mod strings;

pub use bit_ops::*;
pub use scalar::*;
pub use strings::*;
