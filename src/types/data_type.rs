//! # Column Data Types
//!
//! This module provides the closed `DataType` enum describing every value kind
//! a selected column may carry. Column declarations are checked against this
//! set when they are made, so a row decoder never meets an unknown kind.
//!
//! ## Type Categories
//!
//! | Category | Types | Fixed Size |
//! |----------|-------|------------|
//! | **Boolean** | Bool | 1 byte |
//! | **Integer** | Int2, Int4, Int8 | 2, 4, 8 bytes |
//! | **Float** | Float4, Float8 | 4, 8 bytes |
//! | **Text** | Text | Variable |
//! | **Binary** | Blob | Variable |
//!
//! ## Parsing Type Names
//!
//! `DataType` implements `FromStr` so declarations coming from configuration
//! or catalog text can use familiar SQL spellings:
//!
//! ```ignore
//! use multiselect::types::DataType;
//!
//! let dt: DataType = "integer".parse()?;
//! assert_eq!(dt, DataType::Int4);
//! assert!("geometry".parse::<DataType>().is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::SelectError;

/// Closed set of value kinds supported by record schemas.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Bool = 0,
    Int2 = 1,
    Int4 = 2,
    Int8 = 3,
    Float4 = 4,
    Float8 = 5,

    Text = 20,
    Blob = 21,
}

impl DataType {
    /// Returns the fixed byte size for this type, or None for variable-length types.
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            DataType::Bool => Some(1),
            DataType::Int2 => Some(2),
            DataType::Int4 => Some(4),
            DataType::Int8 => Some(8),
            DataType::Float4 => Some(4),
            DataType::Float8 => Some(8),
            DataType::Text | DataType::Blob => None,
        }
    }

    /// Returns true if this type requires variable-length storage.
    pub fn is_variable(&self) -> bool {
        self.fixed_size().is_none()
    }

    /// Returns true for the signed integer kinds.
    pub fn is_integer(&self) -> bool {
        matches!(self, DataType::Int2 | DataType::Int4 | DataType::Int8)
    }

    pub fn name(&self) -> &'static str {
        match self {
            DataType::Bool => "bool",
            DataType::Int2 => "int2",
            DataType::Int4 => "int4",
            DataType::Int8 => "int8",
            DataType::Float4 => "float4",
            DataType::Float8 => "float8",
            DataType::Text => "text",
            DataType::Blob => "blob",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DataType {
    type Err = SelectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let dt = match lowered.as_str() {
            "bool" | "boolean" => DataType::Bool,
            "int2" | "smallint" => DataType::Int2,
            "int" | "int4" | "integer" => DataType::Int4,
            "int8" | "bigint" => DataType::Int8,
            "float4" | "real" | "float" => DataType::Float4,
            "float8" | "double" | "double precision" => DataType::Float8,
            "text" | "varchar" | "string" => DataType::Text,
            "blob" | "bytea" | "binary" => DataType::Blob,
            _ => {
                return Err(SelectError::UnsupportedType {
                    name: s.to_string(),
                })
            }
        };
        Ok(dt)
    }
}
