/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # fastwire
//!
//! A FAST (FIX Adapted for Streaming) field operator encoder for Rust.
//!
//! Templates describe each field's type, presence and operator. The encoder
//! keeps the previous value of every stateful field and writes only what the
//! receiver cannot infer.
//!
//! ## Quick Start
//!
//! ```rust
//! use fastwire::prelude::*;
//!
//! let template = TemplateBuilder::new(1, "Trade")
//!     .field(
//!         FieldInstruction::new("Seq", FieldType::UInt32).with_operator(Operator::Increment),
//!     )
//!     .field(
//!         FieldInstruction::new("Symbol", FieldType::AsciiString).with_operator(Operator::Copy),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let mut encoder = FastEncoder::new();
//! let values = [
//!     Some(FieldValue::UInt32(1)),
//!     Some(FieldValue::Ascii("IBM".to_string())),
//! ];
//! let first = encoder.encode_message(&template, &values).unwrap();
//! assert_eq!(&first[..], &[0xF0, 0x81, 0x81, b'I', b'B', b'M' | 0x80]);
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`]: Value types and error definitions
//! - [`schema`]: Operators, field instructions and templates
//! - [`encoder`]: Stop-bit primitives, dictionary, operators and the message encoder

pub mod core {
    //! Value types and error definitions.
    pub use fastwire_core::*;
}

pub mod schema {
    //! Operators, field instructions and templates.
    pub use fastwire_schema::*;
}

pub mod encoder {
    //! Field operator encoding.
    pub use fastwire_encoder::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    // Core types
    pub use fastwire_core::{
        Decimal, DecodeError, EncodeError, FastError, FieldType, FieldValue, Result, SchemaError,
    };

    // Schema
    pub use fastwire_schema::{
        DictionaryScope, FieldInstruction, InitialValue, Operator, Presence, Template,
        TemplateBuilder,
    };

    // Encoder
    pub use fastwire_encoder::{
        EncoderConfig, FastDecoder, FastEncoder, FastStream, PresenceMap, PreviousValue,
    };
}
