/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Typed, read-only field references.
//!
//! A field reference pairs a borrowed value (or its absence) with the
//! instruction that governs how it is encoded. Operators work on references
//! only, so one operator implementation serves every field of a given type.

use crate::dictionary::PreviousValue;
use crate::stream::FastStream;
use bytes::Bytes;
use fastwire_core::{Decimal, EncodeError};
use fastwire_schema::FieldInstruction;
use num_traits::{One, WrappingAdd};
use std::fmt::Debug;
use std::marker::PhantomData;

/// A field value seen through its instruction.
pub trait FastField {
    /// Returns the instruction of the field.
    fn instruction(&self) -> &FieldInstruction;

    /// Returns true if the field carries a value.
    fn is_present(&self) -> bool;

    /// Returns true if the field carries no value.
    fn is_absent(&self) -> bool {
        !self.is_present()
    }

    /// Converts the current value into a dictionary entry.
    ///
    /// An absent field becomes [`PreviousValue::Empty`].
    fn to_previous_value(&self) -> PreviousValue;

    /// Writes the value, nullable if the instruction is, or NULL when absent.
    ///
    /// # Errors
    /// Returns the stream error for values the wire type cannot carry.
    fn write(&self, stream: &mut FastStream) -> Result<(), EncodeError>;

    /// Returns true if the field is present and equals its initial value.
    fn is_initial_value(&self) -> bool {
        match self.instruction().initial_value() {
            Some(initial) if self.is_present() => {
                self.to_previous_value() == PreviousValue::from(initial)
            }
            _ => false,
        }
    }

    /// Returns true if the field matches the previous value.
    ///
    /// An absent field matches an undefined or empty previous value; a
    /// present field matches an equal assigned value.
    fn is_same(&self, previous: &PreviousValue) -> bool {
        match self.to_previous_value() {
            PreviousValue::Empty => !previous.is_assigned(),
            current => &current == previous,
        }
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for i32 {}
    impl Sealed for u32 {}
    impl Sealed for i64 {}
    impl Sealed for u64 {}
}

/// Integer types a FAST field can hold.
pub trait FastInt:
    sealed::Sealed + Copy + PartialEq + Debug + Into<i128> + WrappingAdd + One
{
    /// Converts into a dictionary entry.
    fn to_previous(self) -> PreviousValue;

    /// Reads back a dictionary entry of the matching signedness and range.
    fn from_previous(previous: &PreviousValue) -> Option<Self>;

    /// Writes the integer in its mandatory or nullable form.
    fn write_to(self, stream: &mut FastStream, nullable: bool);
}

macro_rules! impl_fast_int {
    ($ty:ty, signed) => {
        impl FastInt for $ty {
            fn to_previous(self) -> PreviousValue {
                PreviousValue::Int(i64::from(self))
            }

            fn from_previous(previous: &PreviousValue) -> Option<Self> {
                match previous {
                    PreviousValue::Int(v) => <$ty>::try_from(*v).ok(),
                    _ => None,
                }
            }

            fn write_to(self, stream: &mut FastStream, nullable: bool) {
                stream.encode_signed(i64::from(self), nullable);
            }
        }
    };
    ($ty:ty, unsigned) => {
        impl FastInt for $ty {
            fn to_previous(self) -> PreviousValue {
                PreviousValue::UInt(u64::from(self))
            }

            fn from_previous(previous: &PreviousValue) -> Option<Self> {
                match previous {
                    PreviousValue::UInt(v) => <$ty>::try_from(*v).ok(),
                    _ => None,
                }
            }

            fn write_to(self, stream: &mut FastStream, nullable: bool) {
                stream.encode_unsigned(u64::from(self), nullable);
            }
        }
    };
}

impl_fast_int!(i32, signed);
impl_fast_int!(u32, unsigned);
impl_fast_int!(i64, signed);
impl_fast_int!(u64, unsigned);

/// Reference to an integer field.
#[derive(Debug, Clone, Copy)]
pub struct IntRef<'a, T: FastInt> {
    instruction: &'a FieldInstruction,
    value: Option<T>,
}

impl<'a, T: FastInt> IntRef<'a, T> {
    /// Creates a reference; `None` means the field is absent.
    #[must_use]
    pub const fn new(instruction: &'a FieldInstruction, value: Option<T>) -> Self {
        Self { instruction, value }
    }

    /// Returns the value, if present.
    #[must_use]
    pub const fn value(&self) -> Option<T> {
        self.value
    }

    /// Returns true if the value is one more than `previous`, wrapping.
    #[must_use]
    pub fn is_increment_of(&self, previous: &PreviousValue) -> bool {
        match (self.value, T::from_previous(previous)) {
            (Some(value), Some(previous)) => value == previous.wrapping_add(&T::one()),
            _ => false,
        }
    }
}

impl<T: FastInt> FastField for IntRef<'_, T> {
    fn instruction(&self) -> &FieldInstruction {
        self.instruction
    }

    fn is_present(&self) -> bool {
        self.value.is_some()
    }

    fn to_previous_value(&self) -> PreviousValue {
        self.value.map_or(PreviousValue::Empty, T::to_previous)
    }

    fn write(&self, stream: &mut FastStream) -> Result<(), EncodeError> {
        match self.value {
            Some(value) => value.write_to(stream, self.instruction.is_nullable()),
            None => stream.encode_null(),
        }
        Ok(())
    }
}

/// Reference to a decimal field.
#[derive(Debug, Clone, Copy)]
pub struct DecimalRef<'a> {
    instruction: &'a FieldInstruction,
    value: Option<Decimal>,
}

impl<'a> DecimalRef<'a> {
    /// Creates a reference; `None` means the field is absent.
    #[must_use]
    pub const fn new(instruction: &'a FieldInstruction, value: Option<Decimal>) -> Self {
        Self { instruction, value }
    }

    /// Returns the value, if present.
    #[must_use]
    pub const fn value(&self) -> Option<Decimal> {
        self.value
    }

    /// Returns the exponent as its own field, when the decimal has
    /// individual operators.
    #[must_use]
    pub fn for_exponent(&self) -> Option<IntRef<'a, i32>> {
        let operators = self.instruction.decimal_operators()?;
        Some(IntRef::new(
            operators.exponent(),
            self.value.map(|d| d.exponent()),
        ))
    }

    /// Returns the mantissa as its own field, when the decimal has
    /// individual operators.
    #[must_use]
    pub fn for_mantissa(&self) -> Option<IntRef<'a, i64>> {
        let operators = self.instruction.decimal_operators()?;
        Some(IntRef::new(
            operators.mantissa(),
            self.value.map(|d| d.mantissa()),
        ))
    }
}

impl FastField for DecimalRef<'_> {
    fn instruction(&self) -> &FieldInstruction {
        self.instruction
    }

    fn is_present(&self) -> bool {
        self.value.is_some()
    }

    fn to_previous_value(&self) -> PreviousValue {
        self.value.map_or(PreviousValue::Empty, PreviousValue::Decimal)
    }

    fn write(&self, stream: &mut FastStream) -> Result<(), EncodeError> {
        match self.value {
            Some(value) => stream.encode_decimal(value, self.instruction.is_nullable()),
            None => {
                stream.encode_null();
                Ok(())
            }
        }
    }
}

/// Wire representation of a string-like field.
pub trait StringKind: Debug {
    /// Writes raw content in this kind's encoding.
    ///
    /// # Errors
    /// Returns `EncodeError::InvalidAscii` for ASCII content above `0x7F`.
    fn write(stream: &mut FastStream, value: &[u8], nullable: bool) -> Result<(), EncodeError>;
}

/// Stop-bit terminated ASCII strings.
#[derive(Debug, Clone, Copy)]
pub struct Ascii;

/// Length-prefixed UTF-8 strings.
#[derive(Debug, Clone, Copy)]
pub struct Unicode;

/// Length-prefixed byte vectors.
#[derive(Debug, Clone, Copy)]
pub struct ByteVector;

impl StringKind for Ascii {
    fn write(stream: &mut FastStream, value: &[u8], nullable: bool) -> Result<(), EncodeError> {
        stream.encode_ascii(value, nullable)
    }
}

impl StringKind for Unicode {
    fn write(stream: &mut FastStream, value: &[u8], nullable: bool) -> Result<(), EncodeError> {
        stream.encode_unicode(value, nullable);
        Ok(())
    }
}

impl StringKind for ByteVector {
    fn write(stream: &mut FastStream, value: &[u8], nullable: bool) -> Result<(), EncodeError> {
        stream.encode_bytes(value, nullable);
        Ok(())
    }
}

/// Reference to a string or byte vector field.
#[derive(Debug, Clone, Copy)]
pub struct StringRef<'a, K: StringKind> {
    instruction: &'a FieldInstruction,
    value: Option<&'a [u8]>,
    kind: PhantomData<K>,
}

/// Reference to an ASCII string field.
pub type AsciiRef<'a> = StringRef<'a, Ascii>;

/// Reference to a Unicode string field.
pub type UnicodeRef<'a> = StringRef<'a, Unicode>;

/// Reference to a byte vector field.
pub type ByteVectorRef<'a> = StringRef<'a, ByteVector>;

impl<'a, K: StringKind> StringRef<'a, K> {
    /// Creates a reference; `None` means the field is absent.
    #[must_use]
    pub const fn new(instruction: &'a FieldInstruction, value: Option<&'a [u8]>) -> Self {
        Self {
            instruction,
            value,
            kind: PhantomData,
        }
    }

    /// Returns the content, if present.
    #[must_use]
    pub const fn value(&self) -> Option<&'a [u8]> {
        self.value
    }
}

impl<K: StringKind> FastField for StringRef<'_, K> {
    fn instruction(&self) -> &FieldInstruction {
        self.instruction
    }

    fn is_present(&self) -> bool {
        self.value.is_some()
    }

    fn to_previous_value(&self) -> PreviousValue {
        self.value.map_or(PreviousValue::Empty, |v| {
            PreviousValue::Bytes(Bytes::copy_from_slice(v))
        })
    }

    fn write(&self, stream: &mut FastStream) -> Result<(), EncodeError> {
        match self.value {
            Some(value) => K::write(stream, value, self.instruction.is_nullable()),
            None => {
                stream.encode_null();
                Ok(())
            }
        }
    }

    fn is_same(&self, previous: &PreviousValue) -> bool {
        match (self.value, previous) {
            (None, PreviousValue::Undefined | PreviousValue::Empty) => true,
            (Some(value), PreviousValue::Bytes(previous)) => value == &previous[..],
            _ => false,
        }
    }
}
