//! Per-connection device context
//!
//! A [`DeviceSession`] belongs to one controller connection. It holds the
//! [`DeviceContext`] learned from that controller (or the configured default)
//! and passes it explicitly into every codec call. Building a context never
//! changes how another session encodes.

use tracing::info;

use crate::config::CodecConfig;
use crate::device::DeviceContext;
use crate::error::Result;
use crate::shared::SharedCipValue;
use crate::types::CipType;
use crate::value::CipValue;

/// Owner of the current device context for one connection
#[derive(Debug, Clone, Default)]
pub struct DeviceSession {
    context: DeviceContext,
}

impl DeviceSession {
    pub fn new(context: DeviceContext) -> Self {
        Self { context }
    }

    /// Session starting from the configured default device
    pub fn from_config(config: &CodecConfig) -> Self {
        Self::new(config.default_context())
    }

    pub fn context(&self) -> &DeviceContext {
        &self.context
    }

    /// Replace the context, typically after reading the Identity Object
    ///
    /// Returns the previous context.
    pub fn set_context(&mut self, context: DeviceContext) -> DeviceContext {
        if context != self.context {
            info!(
                "CIP device context changed: vendor {:?} -> {:?} ({})",
                self.context.vendor(),
                context.vendor(),
                context.product_name
            );
        }
        std::mem::replace(&mut self.context, context)
    }

    /// Decode a read response payload
    pub fn decode(&self, kind: CipType, bytes: &[u8]) -> Result<CipValue> {
        CipValue::from_wire_bytes(kind, bytes, &self.context)
    }

    /// Decode a complete wire frame (header included)
    pub fn decode_frame(&self, frame: &[u8]) -> Result<CipValue> {
        CipValue::from_wire(frame, &self.context)
    }

    /// Zero-filled numeric value for a write request
    pub fn empty(&self, kind: CipType, element_count: u16) -> Result<CipValue> {
        CipValue::new_empty(kind, element_count, &self.context)
    }

    /// String value for a write request
    pub fn strings<S: AsRef<str>>(&self, kind: CipType, values: &[S]) -> Result<CipValue> {
        CipValue::from_strings(kind, values)
    }

    /// Decode straight into a lockable value
    pub fn decode_shared(&self, kind: CipType, bytes: &[u8]) -> Result<SharedCipValue> {
        self.decode(kind, bytes).map(SharedCipValue::new)
    }
}
