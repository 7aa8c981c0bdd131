/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Error types for the fastwire FAST encoder.
//!
//! This module provides a unified error hierarchy using `thiserror` for typed,
//! domain-specific errors across schema compilation, encoding and primitive
//! decoding.

use crate::field::FieldType;
use thiserror::Error;

/// Result type alias using [`FastError`] as the error type.
pub type Result<T> = std::result::Result<T, FastError>;

/// Top-level error type for all fastwire operations.
#[derive(Debug, Error)]
pub enum FastError {
    /// Error during field or message encoding.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Error during primitive decoding.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Error while compiling a template.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// I/O error from an underlying writer.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur while encoding a field or a message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// A mandatory field has no value and its operator cannot express absence.
    #[error("missing mandatory field: {name}")]
    MissingMandatoryField {
        /// Field name.
        name: String,
    },

    /// The supplied value does not have the type declared by the instruction.
    #[error("type mismatch for field {name}: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Field name.
        name: String,
        /// Type declared in the template.
        expected: FieldType,
        /// Type of the supplied value.
        actual: FieldType,
    },

    /// The operator has no encoding for this field type.
    #[error("operator {operator} cannot encode {field_type} field {name}")]
    UnsupportedOperator {
        /// Field name.
        name: String,
        /// Operator name.
        operator: String,
        /// Field type.
        field_type: FieldType,
    },

    /// A constant field was given a value other than its constant.
    #[error("value of constant field {name} differs from its initial value")]
    ConstantMismatch {
        /// Field name.
        name: String,
    },

    /// The difference against the base value does not fit the wire type.
    #[error("delta overflow for field {name}")]
    DeltaOverflow {
        /// Field name.
        name: String,
    },

    /// Delta was applied against a previous value that is empty.
    #[error("delta base of field {name} is empty")]
    EmptyDeltaBase {
        /// Field name.
        name: String,
    },

    /// The previous value stored under the field key has another type.
    #[error("previous value of field {name} has an incompatible type")]
    IncompatiblePreviousValue {
        /// Field name.
        name: String,
    },

    /// A byte outside the 7-bit range was found in an ASCII string.
    #[error("invalid ascii byte 0x{byte:02x}")]
    InvalidAscii {
        /// Offending byte.
        byte: u8,
    },

    /// Decimal exponent outside the representable range.
    #[error("decimal exponent {exponent} out of range")]
    ExponentOutOfRange {
        /// The exponent.
        exponent: i32,
    },

    /// The message does not supply one value per template field.
    #[error("template {template_id} expects {expected} values, got {actual}")]
    FieldCountMismatch {
        /// Template identifier.
        template_id: u32,
        /// Number of fields in the template.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// Encoded message exceeds the configured maximum size.
    #[error("message too large: {size} bytes exceeds maximum {max_size}")]
    MessageTooLarge {
        /// Actual message size in bytes.
        size: usize,
        /// Maximum allowed size in bytes.
        max_size: usize,
    },
}

/// Errors that occur while decoding FAST primitives.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Unexpected end of input.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// Integer does not fit its declared type.
    #[error("integer overflow")]
    IntegerOverflow,

    /// String payload is not valid for its declared encoding.
    #[error("invalid string encoding")]
    InvalidString,

    /// Decimal exponent outside the representable range.
    #[error("invalid decimal exponent: {exponent}")]
    InvalidDecimal {
        /// Decoded exponent.
        exponent: i64,
    },
}

/// Errors raised while compiling field instructions into a template.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The operator is not defined for the field type.
    #[error("operator {operator} is not applicable to {field_type} field {name}")]
    UnsupportedOperator {
        /// Field name.
        name: String,
        /// Operator name.
        operator: String,
        /// Field type.
        field_type: FieldType,
    },

    /// The operator needs an initial value and none was declared.
    #[error("operator {operator} on field {name} requires an initial value")]
    MissingInitialValue {
        /// Field name.
        name: String,
        /// Operator name.
        operator: String,
    },

    /// The initial value cannot be represented by the field type.
    #[error("initial value of field {name} is not a valid {field_type}")]
    InitialValueMismatch {
        /// Field name.
        name: String,
        /// Field type.
        field_type: FieldType,
    },

    /// Individual exponent/mantissa operators are malformed.
    #[error("invalid decimal operators on field {name}: {reason}")]
    InvalidDecimalOperators {
        /// Field name.
        name: String,
        /// Description of the problem.
        reason: String,
    },

    /// Two fields of the same template share a name.
    #[error("duplicate field {name} in template {template_id}")]
    DuplicateField {
        /// Template identifier.
        template_id: u32,
        /// Field name.
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_error_display() {
        let err = EncodeError::TypeMismatch {
            name: "Price".to_string(),
            expected: FieldType::Decimal,
            actual: FieldType::UInt32,
        };
        assert_eq!(
            err.to_string(),
            "type mismatch for field Price: expected decimal, got uInt32"
        );
    }

    #[test]
    fn test_fast_error_from_encode() {
        let encode_err = EncodeError::EmptyDeltaBase {
            name: "Px".to_string(),
        };
        let err: FastError = encode_err.into();
        assert!(matches!(
            err,
            FastError::Encode(EncodeError::EmptyDeltaBase { .. })
        ));
    }

    #[test]
    fn test_schema_error_display() {
        let err = SchemaError::MissingInitialValue {
            name: "MsgType".to_string(),
            operator: "constant".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "operator constant on field MsgType requires an initial value"
        );
    }

    #[test]
    fn test_invalid_ascii_display() {
        let err = EncodeError::InvalidAscii { byte: 0xC3 };
        assert_eq!(err.to_string(), "invalid ascii byte 0xc3");
    }
}
