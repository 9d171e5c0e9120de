//! Decoded values and the record that collects them.

use indexmap::IndexMap;

/// Output of a decode: field name to value, in program order.
pub type Record = IndexMap<String, Value>;

/// A value produced by decoding one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Unsigned integer read from `width` bits.
    UInt {
        value: u64,
        width: u32,
    },
    /// Two's-complement signed integer read from `width` bits.
    Int {
        value: i64,
        width: u32,
    },
    Float32(f32),
    Text(String),
}

impl Value {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::UInt { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Float32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Bit width of a numeric value (integers and `Float32`); `None` for text.
    pub fn width(&self) -> Option<u32> {
        match self {
            Value::UInt { width, .. } | Value::Int { width, .. } => Some(*width),
            Value::Float32(_) => Some(32),
            Value::Text(_) => None,
        }
    }
}
