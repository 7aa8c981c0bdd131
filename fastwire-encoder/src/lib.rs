/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # fastwire Encoder
//!
//! FAST (FIX Adapted for Streaming) field operator encoding.
//!
//! Each field of a template is encoded by its operator against the previous
//! value kept in a session dictionary. Operators decide whether the field
//! occupies a presence map bit and whether its value is written at all.
//!
//! ## Features
//!
//! - **Stop-bit encoding**: Integers, strings, byte vectors and decimals
//! - **Presence maps**: Bit accumulation with trailing-zero trimming
//! - **Field operators**: None, Constant, Copy, Default, Increment, Delta, Tail
//! - **Dictionary**: Previous values keyed by global, template or type scope
//! - **Primitive decoding**: Enough to inspect what the encoder produced

pub mod config;
pub mod decoder;
pub mod dictionary;
pub mod encoder;
pub mod field;
pub mod operators;
pub mod pmap;
pub mod stream;

pub use config::{EncoderConfig, EncoderConfigBuilder};
pub use decoder::FastDecoder;
pub use dictionary::{Dictionary, PreviousValue};
pub use encoder::FastEncoder;
pub use field::{
    AsciiRef, ByteVectorRef, DecimalRef, FastField, FastInt, IntRef, StringRef, UnicodeRef,
};
pub use operators::{EncodeContext, FieldOperator, encode_value, encoder_operator};
pub use pmap::{PresenceMap, PresenceMapEncoder};
pub use stream::FastStream;
