//! Parameter types and coerced argument values.
//!
//! Every rendered parameter is text first. [`ParameterType::coerce`] turns
//! that text into a [`ParameterValue`] using locale-invariant rules:
//!
//! - numbers accept surrounding whitespace and a leading sign, `.` is the
//!   only decimal separator and no digit grouping is allowed
//! - booleans are `true` / `false`, case-insensitive, surrounding whitespace
//!   ignored
//! - `char` requires exactly one character
//! - strings are taken verbatim

use crate::error::{BoxError, CoercionError};
use std::{fmt, str::FromStr};

/// The scalar type a parameter is converted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParameterType {
    /// Text, no conversion.
    #[default]
    String,
    /// `true` or `false`.
    Bool,
    /// A single character.
    Char,
    /// Signed 8-bit integer.
    I8,
    /// Signed 16-bit integer.
    I16,
    /// Signed 32-bit integer.
    I32,
    /// Signed 64-bit integer.
    I64,
    /// Unsigned 8-bit integer.
    U8,
    /// Unsigned 16-bit integer.
    U16,
    /// Unsigned 32-bit integer.
    U32,
    /// Unsigned 64-bit integer.
    U64,
    /// 32-bit floating point.
    F32,
    /// 64-bit floating point.
    F64,
}

impl ParameterType {
    /// Convert rendered text into a value of this type.
    pub fn coerce(self, text: &str) -> Result<ParameterValue, CoercionError> {
        let value = match self {
            ParameterType::String => ParameterValue::String(text.to_owned()),
            ParameterType::Bool => {
                let trimmed = text.trim();
                if trimmed.eq_ignore_ascii_case("true") {
                    ParameterValue::Bool(true)
                } else if trimmed.eq_ignore_ascii_case("false") {
                    ParameterValue::Bool(false)
                } else {
                    return Err(CoercionError::new(text, self, None));
                }
            }
            ParameterType::Char => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => ParameterValue::Char(c),
                    _ => return Err(CoercionError::new(text, self, None)),
                }
            }
            ParameterType::I8 => ParameterValue::I8(parse(text, self)?),
            ParameterType::I16 => ParameterValue::I16(parse(text, self)?),
            ParameterType::I32 => ParameterValue::I32(parse(text, self)?),
            ParameterType::I64 => ParameterValue::I64(parse(text, self)?),
            ParameterType::U8 => ParameterValue::U8(parse(text, self)?),
            ParameterType::U16 => ParameterValue::U16(parse(text, self)?),
            ParameterType::U32 => ParameterValue::U32(parse(text, self)?),
            ParameterType::U64 => ParameterValue::U64(parse(text, self)?),
            ParameterType::F32 => ParameterValue::F32(parse(text, self)?),
            ParameterType::F64 => ParameterValue::F64(parse(text, self)?),
        };
        Ok(value)
    }

    /// Short lowercase name, as used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            ParameterType::String => "string",
            ParameterType::Bool => "bool",
            ParameterType::Char => "char",
            ParameterType::I8 => "i8",
            ParameterType::I16 => "i16",
            ParameterType::I32 => "i32",
            ParameterType::I64 => "i64",
            ParameterType::U8 => "u8",
            ParameterType::U16 => "u16",
            ParameterType::U32 => "u32",
            ParameterType::U64 => "u64",
            ParameterType::F32 => "f32",
            ParameterType::F64 => "f64",
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn parse<T>(text: &str, target: ParameterType) -> Result<T, CoercionError>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    text.trim()
        .parse::<T>()
        .map_err(|e| CoercionError::new(text, target, Some(BoxError::from(e))))
}

/// One positional argument of a method call.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    /// Text.
    String(String),
    /// Boolean.
    Bool(bool),
    /// Single character.
    Char(char),
    /// Signed 8-bit integer.
    I8(i8),
    /// Signed 16-bit integer.
    I16(i16),
    /// Signed 32-bit integer.
    I32(i32),
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 8-bit integer.
    U8(u8),
    /// Unsigned 16-bit integer.
    U16(u16),
    /// Unsigned 32-bit integer.
    U32(u32),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 32-bit float.
    F32(f32),
    /// 64-bit float.
    F64(f64),
}

impl ParameterValue {
    /// The type this value was coerced into.
    pub fn parameter_type(&self) -> ParameterType {
        match self {
            ParameterValue::String(_) => ParameterType::String,
            ParameterValue::Bool(_) => ParameterType::Bool,
            ParameterValue::Char(_) => ParameterType::Char,
            ParameterValue::I8(_) => ParameterType::I8,
            ParameterValue::I16(_) => ParameterType::I16,
            ParameterValue::I32(_) => ParameterType::I32,
            ParameterValue::I64(_) => ParameterType::I64,
            ParameterValue::U8(_) => ParameterType::U8,
            ParameterValue::U16(_) => ParameterType::U16,
            ParameterValue::U32(_) => ParameterType::U32,
            ParameterValue::U64(_) => ParameterType::U64,
            ParameterValue::F32(_) => ParameterType::F32,
            ParameterValue::F64(_) => ParameterType::F64,
        }
    }

    /// Borrow the text if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParameterValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Widen any integer value to `i64`, if it fits.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            ParameterValue::I8(v) => Some(v.into()),
            ParameterValue::I16(v) => Some(v.into()),
            ParameterValue::I32(v) => Some(v.into()),
            ParameterValue::I64(v) => Some(v),
            ParameterValue::U8(v) => Some(v.into()),
            ParameterValue::U16(v) => Some(v.into()),
            ParameterValue::U32(v) => Some(v.into()),
            ParameterValue::U64(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    /// Widen any floating point value to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            ParameterValue::F32(v) => Some(v.into()),
            ParameterValue::F64(v) => Some(v),
            _ => None,
        }
    }

    /// The boolean, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            ParameterValue::Bool(v) => Some(v),
            _ => None,
        }
    }

    /// Returns `true` if both values would produce the same argument.
    ///
    /// Unlike `==`, floats compare by bit pattern, so `NaN` matches an
    /// identical `NaN` and `0.0` does not match `-0.0`.
    pub fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (ParameterValue::F32(a), ParameterValue::F32(b)) => a.to_bits() == b.to_bits(),
            (ParameterValue::F64(a), ParameterValue::F64(b)) => a.to_bits() == b.to_bits(),
            _ => self == other,
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::String(v) => f.write_str(v),
            ParameterValue::Bool(v) => write!(f, "{v}"),
            ParameterValue::Char(v) => write!(f, "{v}"),
            ParameterValue::I8(v) => write!(f, "{v}"),
            ParameterValue::I16(v) => write!(f, "{v}"),
            ParameterValue::I32(v) => write!(f, "{v}"),
            ParameterValue::I64(v) => write!(f, "{v}"),
            ParameterValue::U8(v) => write!(f, "{v}"),
            ParameterValue::U16(v) => write!(f, "{v}"),
            ParameterValue::U32(v) => write!(f, "{v}"),
            ParameterValue::U64(v) => write!(f, "{v}"),
            ParameterValue::F32(v) => write!(f, "{v}"),
            ParameterValue::F64(v) => write!(f, "{v}"),
        }
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        ParameterValue::String(value)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::String(value.to_owned())
    }
}

impl From<i32> for ParameterValue {
    fn from(value: i32) -> Self {
        ParameterValue::I32(value)
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        ParameterValue::I64(value)
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Bool(value)
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::F64(value)
    }
}
