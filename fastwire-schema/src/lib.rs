/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # fastwire Schema
//!
//! Template and field instruction definitions for the fastwire FAST encoder.
//!
//! This crate provides:
//! - **Operators**: The seven FAST field operators, presence and dictionary scopes
//! - **Instructions**: Per-field encoding rules with compile-time validation
//! - **Templates**: Ordered field lists with resolved dictionary keys
//!
//! Schema objects are immutable once built and can be shared across threads.

pub mod operator;
pub mod schema;

pub use operator::{DictionaryScope, Operator, Presence};
pub use schema::{
    DecimalOperators, DictionaryKey, FieldInstruction, InitialValue, Template, TemplateBuilder,
};
