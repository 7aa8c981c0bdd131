/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Field types and owned field values.
//!
//! This module provides:
//! - [`FieldType`]: The FAST primitive type of a template field
//! - [`FieldValue`]: An owned, dynamically typed field value

use crate::types::Decimal;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// FAST primitive field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    /// Signed 32-bit integer.
    Int32,
    /// Unsigned 32-bit integer.
    UInt32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 64-bit integer.
    UInt64,
    /// Scaled decimal (exponent and mantissa).
    Decimal,
    /// 7-bit ASCII string, stop-bit terminated.
    AsciiString,
    /// UTF-8 string, length prefixed.
    UnicodeString,
    /// Raw bytes, length prefixed.
    ByteVector,
}

impl FieldType {
    /// Returns the name used for this type in FAST templates.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Int32 => "int32",
            Self::UInt32 => "uInt32",
            Self::Int64 => "int64",
            Self::UInt64 => "uInt64",
            Self::Decimal => "decimal",
            Self::AsciiString => "ascii",
            Self::UnicodeString => "unicode",
            Self::ByteVector => "byteVector",
        }
    }

    /// Returns true for the four integer types.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Self::Int32 | Self::UInt32 | Self::Int64 | Self::UInt64)
    }

    /// Returns true for strings and byte vectors.
    #[must_use]
    pub const fn is_string_like(&self) -> bool {
        matches!(
            self,
            Self::AsciiString | Self::UnicodeString | Self::ByteVector
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Owned value of a single template field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Signed 32-bit integer.
    Int32(i32),
    /// Unsigned 32-bit integer.
    UInt32(u32),
    /// Signed 64-bit integer.
    Int64(i64),
    /// Unsigned 64-bit integer.
    UInt64(u64),
    /// Scaled decimal.
    Decimal(Decimal),
    /// ASCII string.
    Ascii(String),
    /// Unicode string.
    Unicode(String),
    /// Byte vector.
    Bytes(Bytes),
}

impl FieldValue {
    /// Returns the FAST type of this value.
    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        match self {
            Self::Int32(_) => FieldType::Int32,
            Self::UInt32(_) => FieldType::UInt32,
            Self::Int64(_) => FieldType::Int64,
            Self::UInt64(_) => FieldType::UInt64,
            Self::Decimal(_) => FieldType::Decimal,
            Self::Ascii(_) => FieldType::AsciiString,
            Self::Unicode(_) => FieldType::UnicodeString,
            Self::Bytes(_) => FieldType::ByteVector,
        }
    }

    /// Returns the value as an i32, if it is an Int32 variant.
    #[must_use]
    pub const fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int32(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a u32, if it is a UInt32 variant.
    #[must_use]
    pub const fn as_u32(&self) -> Option<u32> {
        match self {
            Self::UInt32(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as an i64, if it is an Int64 variant.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int64(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a u64, if it is a UInt64 variant.
    #[must_use]
    pub const fn as_u64(&self) -> Option<u64> {
        match self {
            Self::UInt64(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a Decimal, if it is a Decimal variant.
    #[must_use]
    pub const fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Decimal(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the raw bytes of a string or byte vector value.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Ascii(s) | Self::Unicode(s) => Some(s.as_bytes()),
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int32(v) => write!(f, "{}", v),
            Self::UInt32(v) => write!(f, "{}", v),
            Self::Int64(v) => write!(f, "{}", v),
            Self::UInt64(v) => write!(f, "{}", v),
            Self::Decimal(v) => write!(f, "{}", v),
            Self::Ascii(s) | Self::Unicode(s) => write!(f, "{}", s),
            Self::Bytes(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Int32(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::UInt32(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int64(value)
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        Self::UInt64(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<Bytes> for FieldValue {
    fn from(value: Bytes) -> Self {
        Self::Bytes(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_classification() {
        assert!(FieldType::UInt64.is_integer());
        assert!(!FieldType::Decimal.is_integer());
        assert!(FieldType::ByteVector.is_string_like());
        assert!(!FieldType::Int32.is_string_like());
    }

    #[test]
    fn test_field_value_type() {
        assert_eq!(FieldValue::from(7u32).field_type(), FieldType::UInt32);
        assert_eq!(
            FieldValue::Unicode("é".to_string()).field_type(),
            FieldType::UnicodeString
        );
        assert_eq!(
            FieldValue::from(Decimal::new(1, -2)).field_type(),
            FieldType::Decimal
        );
    }

    #[test]
    fn test_field_value_accessors() {
        assert_eq!(FieldValue::Int64(-5).as_i64(), Some(-5));
        assert_eq!(FieldValue::Int64(-5).as_u64(), None);
        assert_eq!(
            FieldValue::Ascii("IBM".to_string()).as_bytes(),
            Some(&b"IBM"[..])
        );
        assert_eq!(FieldValue::UInt32(1).as_bytes(), None);
    }

    #[test]
    fn test_field_value_display() {
        assert_eq!(FieldValue::Int32(42).to_string(), "42");
        assert_eq!(FieldValue::Decimal(Decimal::new(5, -1)).to_string(), "5E-1");
        assert_eq!(
            FieldValue::Bytes(Bytes::from_static(b"abc")).to_string(),
            "<3 bytes>"
        );
    }
}
