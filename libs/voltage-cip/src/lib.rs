//! Voltage CIP Tag Data Codec
//!
//! Binary codec for Common Industrial Protocol (CIP) tag values as exchanged
//! with EtherNet/IP controllers (Allen-Bradley/Rockwell and Omron NJ/NX).
//!
//! # Architecture
//!
//! This library provides:
//! - **Type Registry**: `CipType`, wire codes and element widths
//! - **Device Context**: vendor/Identity metadata that selects vendor encodings
//! - **Values**: `CipValue` construction, decode, scalar and string access
//! - **Wire Encoder**: type/count header plus payload, structure headers included
//! - **Diagnostics**: canonical `Display` rendering (`CIP_INT (0x00C3): [1, 2, 3]`)
//!
//! Transport, sessions on the wire and tag addressing live elsewhere; this
//! crate only turns `(type, bytes, device)` into values and back.
//!
//! # Example
//!
//! ```
//! use voltage_cip::{CipType, CipValue, DeviceContext};
//!
//! let ctx = DeviceContext::compatibility();
//! let mut value = CipValue::new_empty(CipType::Int, 3, &ctx)?;
//! value.set(0, 1)?;
//! value.set(1, 2)?;
//! value.set(2, 3)?;
//! assert_eq!(value.to_string(), "CIP_INT (0x00C3): [1, 2, 3]");
//! assert_eq!(value.encoded_size(), 10);
//! # Ok::<(), voltage_cip::CipError>(())
//! ```

pub mod bytes;
pub mod config;
pub mod device;
mod display;
pub mod error;
pub mod number;
pub mod session;
pub mod shared;
pub mod types;
pub mod value;
pub mod wire;

// Re-export core types
pub use config::CodecConfig;
pub use device::{DeviceContext, DeviceStatus, Revision, Vendor, VENDOR_AB, VENDOR_OMRON};
pub use error::{CipError, Result};
pub use number::CipNumber;
pub use session::DeviceSession;
pub use shared::SharedCipValue;
pub use types::{element_width, type_for_code, CipType};
pub use value::{CipValue, UNKNOWN_ELEMENT_COUNT};
