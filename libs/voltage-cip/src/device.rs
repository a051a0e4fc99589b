//! Device context
//!
//! Vendor and identity metadata of the controller a value is exchanged with.
//! The codec never looks this up on its own: callers pass a [`DeviceContext`]
//! into every vendor-dependent operation (today only the BOOL element width
//! differs between vendors).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Vendor ID for AB/Rockwell
///
/// Empirically from ControlLogix: vendor=0x1, device_type=0xC, name='1756-ENBT/A'.
pub const VENDOR_AB: u16 = 0x01;

/// Vendor ID for Omron
pub const VENDOR_OMRON: u16 = 0x2F;

/// Controller vendor, as far as the codec distinguishes them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vendor {
    /// Allen-Bradley / Rockwell Automation
    Rockwell,
    /// Omron NJ/NX
    Omron,
    /// Any other vendor id; encoded like Rockwell
    Other(u16),
}

impl Vendor {
    pub fn from_id(vendor_id: u16) -> Self {
        match vendor_id {
            VENDOR_AB => Self::Rockwell,
            VENDOR_OMRON => Self::Omron,
            other => Self::Other(other),
        }
    }

    pub fn id(&self) -> u16 {
        match self {
            Self::Rockwell => VENDOR_AB,
            Self::Omron => VENDOR_OMRON,
            Self::Other(id) => *id,
        }
    }
}

/// Major/minor revision pair of the Identity Object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Revision {
    pub major: u8,
    pub minor: u8,
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Identity metadata of a connected controller
///
/// Missing fields deserialize from the compatibility device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceContext {
    pub vendor_id: u16,
    pub device_type: u16,
    pub product_code: u16,
    pub revision: Revision,
    pub serial_number: u32,
    /// Raw Identity status word, see [`DeviceStatus`]
    pub status: u16,
    pub product_name: String,
}

impl DeviceContext {
    /// The historical default: a placeholder Rockwell/AB device
    ///
    /// Callers that have not read the controller identity pass this value
    /// explicitly; it keeps the Rockwell encoding choices.
    pub fn compatibility() -> Self {
        Self {
            vendor_id: VENDOR_AB,
            device_type: 0,
            product_code: 0xFF,
            revision: Revision {
                major: 0xFF,
                minor: 0,
            },
            serial_number: 0,
            status: 0,
            product_name: "ABCompatibilityDevice".to_string(),
        }
    }

    /// Placeholder Rockwell/AB device (same as [`DeviceContext::compatibility`])
    pub fn rockwell() -> Self {
        Self::compatibility()
    }

    /// Placeholder Omron NJ/NX device
    pub fn omron() -> Self {
        Self {
            vendor_id: VENDOR_OMRON,
            product_name: "NJ/NXCompatibilityDevice".to_string(),
            ..Self::compatibility()
        }
    }

    /// Build a context for an arbitrary vendor id, other fields from the compatibility device
    pub fn with_vendor_id(vendor_id: u16) -> Self {
        Self {
            vendor_id,
            ..Self::compatibility()
        }
    }

    pub fn vendor(&self) -> Vendor {
        Vendor::from_id(self.vendor_id)
    }

    pub fn is_omron(&self) -> bool {
        self.vendor() == Vendor::Omron
    }

    /// BOOL element width in bytes: 2 on Omron, 1 everywhere else
    pub fn bool_element_width(&self) -> usize {
        if self.is_omron() {
            2
        } else {
            1
        }
    }

    pub fn decoded_status(&self) -> DeviceStatus {
        DeviceStatus::from_bits(self.status)
    }
}

impl Default for DeviceContext {
    /// Defaults to the compatibility device
    fn default() -> Self {
        Self::compatibility()
    }
}

impl fmt::Display for DeviceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Identity [vendorId={:x}, deviceType={}, productCode={}, revision={}, productName={}, serialNumber={:#010x}, status={:#06x}]",
            self.vendor_id,
            self.device_type,
            self.product_code,
            self.revision,
            self.product_name,
            self.serial_number,
            self.status
        )
    }
}

/// Decoded Identity Object status word (CIP Vol. 1, 5-2)
///
/// ```text
/// .... .... .... ...0 = Owned
/// .... .... .... .0.. = Configured
/// .... .... 0110 .... = Extended Device Status
/// .... ...0 .... .... = Minor Recoverable Fault
/// .... ..0. .... .... = Minor Unrecoverable Fault
/// .... .0.. .... .... = Major Recoverable Fault
/// .... 0... .... .... = Major Unrecoverable Fault
/// 0000 .... .... .... = Extended Device Status 2
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceStatus {
    pub owned: bool,
    pub configured: bool,
    pub extended_status: u8,
    pub minor_recoverable_fault: bool,
    pub minor_unrecoverable_fault: bool,
    pub major_recoverable_fault: bool,
    pub major_unrecoverable_fault: bool,
    pub extended_status_2: u8,
}

impl DeviceStatus {
    pub fn from_bits(status: u16) -> Self {
        let bit = |n: u16| status & (1 << n) != 0;
        Self {
            owned: bit(0),
            configured: bit(2),
            extended_status: ((status >> 4) & 0x0F) as u8,
            minor_recoverable_fault: bit(8),
            minor_unrecoverable_fault: bit(9),
            major_recoverable_fault: bit(10),
            major_unrecoverable_fault: bit(11),
            extended_status_2: ((status >> 12) & 0x0F) as u8,
        }
    }

    pub fn has_fault(&self) -> bool {
        self.minor_recoverable_fault
            || self.minor_unrecoverable_fault
            || self.major_recoverable_fault
            || self.major_unrecoverable_fault
    }
}
