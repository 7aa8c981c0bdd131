/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # fastwire Core
//!
//! Core value types and error definitions for the fastwire FAST encoder.
//!
//! This crate provides the fundamental building blocks used across all fastwire crates:
//! - **Error types**: Unified error handling with `thiserror`
//! - **Field types**: `FieldType` and the owned `FieldValue`
//! - **Core types**: the FAST scaled `Decimal`

pub mod error;
pub mod field;
pub mod types;

pub use error::{DecodeError, EncodeError, FastError, Result, SchemaError};
pub use field::{FieldType, FieldValue};
pub use types::{Decimal, MAX_EXPONENT, MIN_EXPONENT};
