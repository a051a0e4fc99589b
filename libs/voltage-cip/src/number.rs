//! Typed numeric element
//!
//! [`CipNumber`] is what a scalar read returns and what a scalar write accepts.
//! The variant records the native width the element was read with, so
//! `USINT 0xF9` comes back as `Int(249)` rather than `Sint(-7)`.

use std::fmt;

/// One numeric element in its native (possibly widened) representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CipNumber {
    /// BOOL, SINT and BITS results
    Sint(i8),
    /// INT, and USINT widened
    Int(i16),
    /// DINT, and UINT widened
    Dint(i32),
    /// LINT, ULINT (signed), and UDINT widened
    Lint(i64),
    Real(f32),
    Lreal(f64),
}

impl CipNumber {
    /// Integer view; floating values truncate toward zero (saturating)
    pub fn as_i64(&self) -> i64 {
        match *self {
            Self::Sint(v) => v as i64,
            Self::Int(v) => v as i64,
            Self::Dint(v) => v as i64,
            Self::Lint(v) => v,
            Self::Real(v) => v as i64,
            Self::Lreal(v) => v as i64,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::Sint(v) => v as f64,
            Self::Int(v) => v as f64,
            Self::Dint(v) => v as f64,
            Self::Lint(v) => v as f64,
            Self::Real(v) => v as f64,
            Self::Lreal(v) => v,
        }
    }

    pub fn as_f32(&self) -> f32 {
        match *self {
            Self::Real(v) => v,
            other => other.as_f64() as f32,
        }
    }

    /// Truthiness used for BOOL and BITS writes (after integer truncation)
    pub fn is_nonzero(&self) -> bool {
        self.as_i64() != 0
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Self::Real(_) | Self::Lreal(_))
    }
}

/// Render a float the way controller tooling prints it
///
/// Shortest round-trip digits, always with a fractional part. Magnitudes in
/// `[1e-3, 1e7)` are written plainly (`42.0`, `3.1416`); anything else uses
/// `d.dddE±n` (`1.0E7`, `1.5E-5`).
pub(crate) fn fmt_float<T>(f: &mut fmt::Formatter<'_>, v: T) -> fmt::Result
where
    T: fmt::Debug + fmt::LowerExp + Into<f64> + Copy,
{
    let wide: f64 = v.into();
    if wide.is_nan() {
        return f.write_str("NaN");
    }
    if wide.is_infinite() {
        let sign = if wide < 0.0 { "-" } else { "" };
        return write!(f, "{}Infinity", sign);
    }
    if wide == 0.0 || (1e-3..1e7).contains(&wide.abs()) {
        return write!(f, "{:?}", v);
    }

    let sci = format!("{:e}", v);
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    if mantissa.contains('.') {
        write!(f, "{}E{}", mantissa, exponent)
    } else {
        write!(f, "{}.0E{}", mantissa, exponent)
    }
}

impl fmt::Display for CipNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Sint(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Dint(v) => write!(f, "{}", v),
            Self::Lint(v) => write!(f, "{}", v),
            Self::Real(v) => fmt_float(f, v),
            Self::Lreal(v) => fmt_float(f, v),
        }
    }
}

impl From<bool> for CipNumber {
    fn from(v: bool) -> Self {
        Self::Sint(v as i8)
    }
}

impl From<i8> for CipNumber {
    fn from(v: i8) -> Self {
        Self::Sint(v)
    }
}

impl From<u8> for CipNumber {
    fn from(v: u8) -> Self {
        Self::Int(v as i16)
    }
}

impl From<i16> for CipNumber {
    fn from(v: i16) -> Self {
        Self::Int(v)
    }
}

impl From<u16> for CipNumber {
    fn from(v: u16) -> Self {
        Self::Dint(v as i32)
    }
}

impl From<i32> for CipNumber {
    fn from(v: i32) -> Self {
        Self::Dint(v)
    }
}

impl From<u32> for CipNumber {
    fn from(v: u32) -> Self {
        Self::Lint(v as i64)
    }
}

impl From<i64> for CipNumber {
    fn from(v: i64) -> Self {
        Self::Lint(v)
    }
}

/// Bit-preserving: values above `i64::MAX` wrap negative, like ULINT reads
impl From<u64> for CipNumber {
    fn from(v: u64) -> Self {
        Self::Lint(v as i64)
    }
}

impl From<f32> for CipNumber {
    fn from(v: f32) -> Self {
        Self::Real(v)
    }
}

impl From<f64> for CipNumber {
    fn from(v: f64) -> Self {
        Self::Lreal(v)
    }
}
