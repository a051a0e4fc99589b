//! Lockable CIP value
//!
//! A tag value shared between, for example, a polling task and a write
//! request handler. Every accessor and mutator runs under the value's own
//! lock, so no reader ever observes a half-written payload. There is no
//! ordering between different values.
//!
//! ```text
//! SharedCipValue (Clone = another handle)
//!   └─ Arc<RwLock<CipValue>>
//!        readers: get_number / get_string / encode / Display
//!        writers: set / set_string / replace
//! ```

use bytes::{BufMut, Bytes};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::number::CipNumber;
use crate::types::CipType;
use crate::value::CipValue;

/// Shared handle to a [`CipValue`]
#[derive(Debug, Clone)]
pub struct SharedCipValue {
    inner: Arc<RwLock<CipValue>>,
}

impl SharedCipValue {
    pub fn new(value: CipValue) -> Self {
        Self {
            inner: Arc::new(RwLock::new(value)),
        }
    }

    pub fn kind(&self) -> CipType {
        self.inner.read().kind()
    }

    pub fn element_count(&self) -> Option<u16> {
        self.inner.read().element_count()
    }

    pub fn get_number(&self, index: usize) -> Result<CipNumber> {
        self.inner.read().get_number(index)
    }

    pub fn set(&self, index: usize, value: impl Into<CipNumber>) -> Result<()> {
        self.inner.write().set(index, value)
    }

    pub fn get_string(&self) -> Result<String> {
        self.inner.read().get_string()
    }

    pub fn get_strings(&self, expected_count: usize) -> Result<Vec<String>> {
        self.inner.read().get_strings(expected_count)
    }

    pub fn set_string(&self, text: &str) -> Result<()> {
        self.inner.write().set_string(text)
    }

    pub fn encoded_size(&self) -> usize {
        self.inner.read().encoded_size()
    }

    pub fn encode<B: BufMut>(&self, out: &mut B) -> Result<()> {
        self.inner.read().encode(out)
    }

    pub fn to_bytes(&self) -> Result<Bytes> {
        self.inner.read().to_bytes()
    }

    /// Run `f` with shared access
    pub fn with_read<R>(&self, f: impl FnOnce(&CipValue) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` with exclusive access; several mutations become one atomic step
    pub fn with_write<R>(&self, f: impl FnOnce(&mut CipValue) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Replace the whole value (a fresh read from the device)
    pub fn replace(&self, value: CipValue) -> CipValue {
        std::mem::replace(&mut *self.inner.write(), value)
    }

    /// Copy of the current value
    pub fn snapshot(&self) -> CipValue {
        self.inner.read().clone()
    }
}

impl From<CipValue> for SharedCipValue {
    fn from(value: CipValue) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for SharedCipValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.inner.read(), f)
    }
}
