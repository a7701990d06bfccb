//! Scan value type enumeration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ClientError;

/// The closed set of value types the scanner understands.
///
/// Wire names match the service exactly (`float`, `double`, `utf-8`,
/// `aob`, ...). `Regex` is exposed by the panel but its client-side
/// value path is identical to a raw byte pattern; the service performs
/// the actual matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    #[serde(rename = "int8")]
    Int8,
    #[serde(rename = "uint8")]
    Uint8,
    #[serde(rename = "int16")]
    Int16,
    #[serde(rename = "uint16")]
    Uint16,
    #[serde(rename = "int32")]
    Int32,
    #[serde(rename = "uint32")]
    Uint32,
    #[serde(rename = "int64")]
    Int64,
    #[serde(rename = "uint64")]
    Uint64,
    #[serde(rename = "float")]
    Float32,
    #[serde(rename = "double")]
    Float64,
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "utf-16")]
    Utf16,
    #[serde(rename = "aob")]
    Bytes,
    #[serde(rename = "regex")]
    Regex,
}

impl ValueType {
    /// Returns the encoded width in bytes, or `None` for variable-length types
    pub const fn width(&self) -> Option<usize> {
        match self {
            ValueType::Int8 | ValueType::Uint8 => Some(1),
            ValueType::Int16 | ValueType::Uint16 => Some(2),
            ValueType::Int32 | ValueType::Uint32 | ValueType::Float32 => Some(4),
            ValueType::Int64 | ValueType::Uint64 | ValueType::Float64 => Some(8),
            ValueType::Utf8 | ValueType::Utf16 | ValueType::Bytes | ValueType::Regex => None,
        }
    }

    /// True for the fixed-width numeric types
    pub const fn is_numeric(&self) -> bool {
        self.width().is_some()
    }

    /// The wire name of this type
    pub const fn as_str(&self) -> &'static str {
        match self {
            ValueType::Int8 => "int8",
            ValueType::Uint8 => "uint8",
            ValueType::Int16 => "int16",
            ValueType::Uint16 => "uint16",
            ValueType::Int32 => "int32",
            ValueType::Uint32 => "uint32",
            ValueType::Int64 => "int64",
            ValueType::Uint64 => "uint64",
            ValueType::Float32 => "float",
            ValueType::Float64 => "double",
            ValueType::Utf8 => "utf-8",
            ValueType::Utf16 => "utf-16",
            ValueType::Bytes => "aob",
            ValueType::Regex => "regex",
        }
    }

    /// All selectable types, in panel order
    pub const fn all() -> [ValueType; 14] {
        [
            ValueType::Int8,
            ValueType::Uint8,
            ValueType::Int16,
            ValueType::Uint16,
            ValueType::Int32,
            ValueType::Uint32,
            ValueType::Int64,
            ValueType::Uint64,
            ValueType::Float32,
            ValueType::Float64,
            ValueType::Utf8,
            ValueType::Utf16,
            ValueType::Bytes,
            ValueType::Regex,
        ]
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValueType::all()
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ClientError::InvalidValue {
                value: s.to_string(),
                value_type: "value type".to_string(),
            })
    }
}
