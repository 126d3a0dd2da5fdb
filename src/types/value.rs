//! # Owned Value Representation
//!
//! This module provides `Value`, the heap-owned representation of a single
//! column value. Cursor rows, cached records and where-clause parameters all
//! store `Value`s, so every record in the cache owns its data outright and can
//! be handed to a caller by move.
//!
//! ## Value Variants
//!
//! | Variant | Rust Type | DataType |
//! |---------|-----------|----------|
//! | Null | - | none |
//! | Bool | bool | Bool |
//! | Int2 | i16 | Int2 |
//! | Int4 | i32 | Int4 |
//! | Int8 | i64 | Int8 |
//! | Float4 | f32 | Float4 |
//! | Float8 | f64 | Float8 |
//! | Text | String | Text |
//! | Blob | Vec<u8> | Blob |
//!
//! ## Integer Access
//!
//! Composite keys are 32-bit. `as_i32` widens `Int2`, passes `Int4` through
//! and narrows `Int8` only when the value fits, so backends that report all
//! integers as 64-bit still produce usable keys.

use super::DataType;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int2(i16),
    Int4(i32),
    Int8(i64),
    Float4(f32),
    Float8(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the DataType for this value, or None for NULL.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(DataType::Bool),
            Value::Int2(_) => Some(DataType::Int2),
            Value::Int4(_) => Some(DataType::Int4),
            Value::Int8(_) => Some(DataType::Int8),
            Value::Float4(_) => Some(DataType::Float4),
            Value::Float8(_) => Some(DataType::Float8),
            Value::Text(_) => Some(DataType::Text),
            Value::Blob(_) => Some(DataType::Blob),
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int2(i) => Some(i32::from(*i)),
            Value::Int4(i) => Some(*i),
            Value::Int8(i) => i32::try_from(*i).ok(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int2(i) => Some(i64::from(*i)),
            Value::Int4(i) => Some(i64::from(*i)),
            Value::Int8(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float4(f) => Some(f64::from(*f)),
            Value::Float8(f) => Some(*f),
            other => other.as_i64().map(|i| i as f64),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Value::Blob(b) => Some(b),
            _ => None,
        }
    }

    /// Formats the value as a display string.
    pub fn display_string(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => if *b { "true" } else { "false" }.to_string(),
            Value::Int2(i) => i.to_string(),
            Value::Int4(i) => i.to_string(),
            Value::Int8(i) => i.to_string(),
            Value::Float4(f) => f.to_string(),
            Value::Float8(f) => f.to_string(),
            Value::Text(s) => s.clone(),
            Value::Blob(b) => {
                let hex: String = b.iter().map(|byte| format!("{:02x}", byte)).collect();
                format!("\\x{}", hex)
            }
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int4(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int8(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float8(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}
