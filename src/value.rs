use crate::data_type::DataType;
use crate::element::Number;
use crate::error::{Error, Result};

/// Represents a single cell value read from or written to a column.
///
/// This enum is the dynamic, type-erased face of a cell, used by the file
/// layer when it only knows the column type at runtime. Typed code should go
/// through [Element](crate::element::Element) instead.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A boolean flag.
    Bool(bool),
    /// An unsigned 8-bit integer.
    UInt8(u8),
    /// A signed 16-bit integer.
    Int16(i16),
    /// A signed 32-bit integer.
    Int32(i32),
    /// A signed 64-bit integer.
    Int64(i64),
    /// A 32-bit floating-point value.
    Float32(f32),
    /// A 64-bit floating-point value.
    Float64(f64),
    /// A UTF-8 string value.
    Text(String),
}

impl Value {
    /// Returns the [DataType] corresponding to this value.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Bool(_) => DataType::Bool,
            Self::UInt8(_) => DataType::UInt8,
            Self::Int16(_) => DataType::Int16,
            Self::Int32(_) => DataType::Int32,
            Self::Int64(_) => DataType::Int64,
            Self::Float32(_) => DataType::Float32,
            Self::Float64(_) => DataType::Float64,
            Self::Text(_) => DataType::Text,
        }
    }

    /// Returns the value widened to `f64`.
    ///
    /// # Errors
    /// Fails with [Error::NotNumeric] for boolean and text values.
    pub fn as_f64(&self) -> Result<f64> {
        match self.as_number()? {
            Number::Int(i) => Ok(i as f64),
            Number::Float(f) => Ok(f),
        }
    }

    pub(crate) fn as_number(&self) -> Result<Number> {
        match self {
            Self::UInt8(v) => Ok(Number::Int(i64::from(*v))),
            Self::Int16(v) => Ok(Number::Int(i64::from(*v))),
            Self::Int32(v) => Ok(Number::Int(i64::from(*v))),
            Self::Int64(v) => Ok(Number::Int(*v)),
            Self::Float32(v) => Ok(Number::Float(f64::from(*v))),
            Self::Float64(v) => Ok(Number::Float(*v)),
            Self::Bool(_) | Self::Text(_) => Err(Error::NotNumeric(self.data_type())),
        }
    }

    /// Returns a reference to the inner string slice if this is a [Value::Text].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the inner boolean value if this is a [Value::Bool].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}
