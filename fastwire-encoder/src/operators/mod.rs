/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! FAST field operators.
//!
//! Each operator is a stateless unit struct implementing [`FieldOperator`].
//! [`encoder_operator`] maps an [`Operator`] to its singleton. An operator
//! call appends at most one presence map bit per field (two for a decimal
//! with individual operators), writes to the stream, and updates the
//! dictionary.

/// Implements the listed `FieldOperator` entry points by delegating to a
/// generic inherent method of the operator.
macro_rules! delegate_encode {
    ($target:ident => $($method:ident: $field:ty),+ $(,)?) => {
        $(
            fn $method(
                &self,
                field: &$field,
                cx: &mut $crate::operators::EncodeContext<'_>,
            ) -> Result<(), fastwire_core::EncodeError> {
                self.$target(field, cx)
            }
        )+
    };
}

/// Delegates all four integer entry points.
macro_rules! delegate_integers {
    ($target:ident) => {
        delegate_encode!($target =>
            encode_i32: $crate::field::IntRef<'_, i32>,
            encode_u32: $crate::field::IntRef<'_, u32>,
            encode_i64: $crate::field::IntRef<'_, i64>,
            encode_u64: $crate::field::IntRef<'_, u64>,
        );
    };
}

/// Delegates the three string-like entry points.
macro_rules! delegate_strings {
    ($target:ident) => {
        delegate_encode!($target =>
            encode_ascii: $crate::field::AsciiRef<'_>,
            encode_unicode: $crate::field::UnicodeRef<'_>,
            encode_bytes: $crate::field::ByteVectorRef<'_>,
        );
    };
}

mod constant;
mod copy;
mod default;
mod delta;
mod increment;
mod none;
mod tail;

pub use constant::ConstantOperator;
pub use copy::CopyOperator;
pub use default::DefaultOperator;
pub use delta::{DeltaOperator, StringDelta};
pub use increment::IncrementOperator;
pub use none::NoOperator;
pub use tail::{TailOperator, tail_of};

use crate::dictionary::{Dictionary, PreviousValue};
use crate::field::{
    AsciiRef, ByteVectorRef, DecimalRef, FastField, FastInt, IntRef, UnicodeRef,
};
use crate::pmap::PresenceMapEncoder;
use crate::stream::FastStream;
use fastwire_core::{EncodeError, FieldType, FieldValue};
use fastwire_schema::{FieldInstruction, Operator};

/// Mutable state one message is encoded into.
#[derive(Debug)]
pub struct EncodeContext<'a> {
    /// Output stream for field values.
    pub stream: &'a mut FastStream,
    /// Presence map of the message.
    pub pmap: &'a mut PresenceMapEncoder,
    /// Previous values of the session.
    pub dictionary: &'a mut Dictionary,
}

impl<'a> EncodeContext<'a> {
    /// Creates a context over the given state.
    pub fn new(
        stream: &'a mut FastStream,
        pmap: &'a mut PresenceMapEncoder,
        dictionary: &'a mut Dictionary,
    ) -> Self {
        Self {
            stream,
            pmap,
            dictionary,
        }
    }

    /// Returns a copy of the previous value of a field.
    #[must_use]
    pub fn previous_value_of<F: FastField + ?Sized>(&self, field: &F) -> PreviousValue {
        self.dictionary
            .previous_value_of(field.instruction())
            .clone()
    }

    /// Records the field's current value, or its absence.
    pub fn save_previous_value<F: FastField + ?Sized>(&mut self, field: &F) {
        self.dictionary
            .save(field.instruction(), field.to_previous_value());
    }
}

fn unsupported(
    operator: Operator,
    instruction: &FieldInstruction,
    field_type: FieldType,
) -> EncodeError {
    EncodeError::UnsupportedOperator {
        name: instruction.name().to_string(),
        operator: operator.to_string(),
        field_type,
    }
}

/// Encoding strategy of one operator.
///
/// Every method defaults to `EncodeError::UnsupportedOperator`, so an
/// operator only implements the value types it is defined for.
pub trait FieldOperator: Sync {
    /// Returns the operator this strategy implements.
    fn operator(&self) -> Operator;

    /// Encodes an `int32` field.
    fn encode_i32(
        &self,
        field: &IntRef<'_, i32>,
        _cx: &mut EncodeContext<'_>,
    ) -> Result<(), EncodeError> {
        Err(unsupported(
            self.operator(),
            field.instruction(),
            FieldType::Int32,
        ))
    }

    /// Encodes a `uInt32` field.
    fn encode_u32(
        &self,
        field: &IntRef<'_, u32>,
        _cx: &mut EncodeContext<'_>,
    ) -> Result<(), EncodeError> {
        Err(unsupported(
            self.operator(),
            field.instruction(),
            FieldType::UInt32,
        ))
    }

    /// Encodes an `int64` field.
    fn encode_i64(
        &self,
        field: &IntRef<'_, i64>,
        _cx: &mut EncodeContext<'_>,
    ) -> Result<(), EncodeError> {
        Err(unsupported(
            self.operator(),
            field.instruction(),
            FieldType::Int64,
        ))
    }

    /// Encodes a `uInt64` field.
    fn encode_u64(
        &self,
        field: &IntRef<'_, u64>,
        _cx: &mut EncodeContext<'_>,
    ) -> Result<(), EncodeError> {
        Err(unsupported(
            self.operator(),
            field.instruction(),
            FieldType::UInt64,
        ))
    }

    /// Encodes a decimal field.
    fn encode_decimal(
        &self,
        field: &DecimalRef<'_>,
        _cx: &mut EncodeContext<'_>,
    ) -> Result<(), EncodeError> {
        Err(unsupported(
            self.operator(),
            field.instruction(),
            FieldType::Decimal,
        ))
    }

    /// Encodes an ASCII string field.
    fn encode_ascii(
        &self,
        field: &AsciiRef<'_>,
        _cx: &mut EncodeContext<'_>,
    ) -> Result<(), EncodeError> {
        Err(unsupported(
            self.operator(),
            field.instruction(),
            FieldType::AsciiString,
        ))
    }

    /// Encodes a Unicode string field.
    fn encode_unicode(
        &self,
        field: &UnicodeRef<'_>,
        _cx: &mut EncodeContext<'_>,
    ) -> Result<(), EncodeError> {
        Err(unsupported(
            self.operator(),
            field.instruction(),
            FieldType::UnicodeString,
        ))
    }

    /// Encodes a byte vector field.
    fn encode_bytes(
        &self,
        field: &ByteVectorRef<'_>,
        _cx: &mut EncodeContext<'_>,
    ) -> Result<(), EncodeError> {
        Err(unsupported(
            self.operator(),
            field.instruction(),
            FieldType::ByteVector,
        ))
    }
}

static NO_OPERATOR: NoOperator = NoOperator;
static CONSTANT_OPERATOR: ConstantOperator = ConstantOperator;
static DELTA_OPERATOR: DeltaOperator = DeltaOperator;
static DEFAULT_OPERATOR: DefaultOperator = DefaultOperator;
static COPY_OPERATOR: CopyOperator = CopyOperator;
static INCREMENT_OPERATOR: IncrementOperator = IncrementOperator;
static TAIL_OPERATOR: TailOperator = TailOperator;

/// Returns the strategy of an operator.
#[must_use]
pub fn encoder_operator(operator: Operator) -> &'static dyn FieldOperator {
    match operator {
        Operator::None => &NO_OPERATOR,
        Operator::Constant => &CONSTANT_OPERATOR,
        Operator::Delta => &DELTA_OPERATOR,
        Operator::Default => &DEFAULT_OPERATOR,
        Operator::Copy => &COPY_OPERATOR,
        Operator::Increment => &INCREMENT_OPERATOR,
        Operator::Tail => &TAIL_OPERATOR,
    }
}

/// Predicate deciding whether a copy-like operator can omit a value.
pub trait Comparison<F: FastField> {
    /// Returns true if `field` is implied by the assigned `previous` value.
    fn matches(field: &F, previous: &PreviousValue) -> bool;
}

/// The value equals the previous value.
#[derive(Debug)]
pub struct IsSame;

/// The value is the previous value plus one.
#[derive(Debug)]
pub struct IsIncrement;

impl<F: FastField> Comparison<F> for IsSame {
    fn matches(field: &F, previous: &PreviousValue) -> bool {
        field.is_same(previous)
    }
}

impl<T: FastInt> Comparison<IntRef<'_, T>> for IsIncrement {
    fn matches(field: &IntRef<'_, T>, previous: &PreviousValue) -> bool {
        field.is_increment_of(previous)
    }
}

/// Shared algorithm of the copy and increment operators.
///
/// The current value is saved before the bit is decided, so the dictionary
/// is updated on every path.
pub(crate) fn encode_copy_or_increment<F, C>(
    field: &F,
    cx: &mut EncodeContext<'_>,
) -> Result<(), EncodeError>
where
    F: FastField,
    C: Comparison<F>,
{
    require_mandatory(field)?;

    let previous = cx.previous_value_of(field);
    cx.save_previous_value(field);

    let unchanged = match &previous {
        PreviousValue::Undefined => field.is_initial_value() || field.is_absent(),
        PreviousValue::Empty => field.is_absent(),
        assigned => C::matches(field, assigned),
    };

    cx.pmap.set_next_bit(!unchanged);
    if unchanged {
        return Ok(());
    }
    field.write(cx.stream)
}

/// Fails when a mandatory field has no value.
pub(crate) fn require_mandatory<F: FastField + ?Sized>(field: &F) -> Result<(), EncodeError> {
    if field.is_absent() && field.instruction().is_mandatory() {
        return Err(EncodeError::MissingMandatoryField {
            name: field.instruction().name().to_string(),
        });
    }
    Ok(())
}

/// Encodes a decimal through `operator`, splitting it when the instruction
/// declares individual exponent and mantissa operators.
///
/// The exponent goes through `operator` itself; the mantissa, only when the
/// decimal is present, through its own operator. Atomic decimals are handed
/// to `atomic`.
pub(crate) fn encode_decimal_with<O, A>(
    operator: &O,
    field: &DecimalRef<'_>,
    cx: &mut EncodeContext<'_>,
    atomic: A,
) -> Result<(), EncodeError>
where
    O: FieldOperator + ?Sized,
    A: FnOnce(&DecimalRef<'_>, &mut EncodeContext<'_>) -> Result<(), EncodeError>,
{
    let (Some(exponent), Some(mantissa)) = (field.for_exponent(), field.for_mantissa()) else {
        return atomic(field, cx);
    };

    operator.encode_i32(&exponent, cx)?;
    if field.is_present() {
        encoder_operator(mantissa.instruction().operator()).encode_i64(&mantissa, cx)?;
    }
    Ok(())
}

fn mismatch(instruction: &FieldInstruction, actual: FieldType) -> EncodeError {
    EncodeError::TypeMismatch {
        name: instruction.name().to_string(),
        expected: instruction.field_type(),
        actual,
    }
}

/// Encodes one dynamically typed value under its instruction.
///
/// `None` encodes the field as absent.
///
/// # Errors
/// Returns `EncodeError::TypeMismatch` when the value does not have the
/// declared type, or any error of the field's operator.
pub fn encode_value(
    instruction: &FieldInstruction,
    value: Option<&FieldValue>,
    cx: &mut EncodeContext<'_>,
) -> Result<(), EncodeError> {
    if let Some(value) = value {
        if value.field_type() != instruction.field_type() {
            return Err(mismatch(instruction, value.field_type()));
        }
    }

    let operator = encoder_operator(instruction.operator());
    match instruction.field_type() {
        FieldType::Int32 => {
            let field = IntRef::new(instruction, value.and_then(FieldValue::as_i32));
            operator.encode_i32(&field, cx)
        }
        FieldType::UInt32 => {
            let field = IntRef::new(instruction, value.and_then(FieldValue::as_u32));
            operator.encode_u32(&field, cx)
        }
        FieldType::Int64 => {
            let field = IntRef::new(instruction, value.and_then(FieldValue::as_i64));
            operator.encode_i64(&field, cx)
        }
        FieldType::UInt64 => {
            let field = IntRef::new(instruction, value.and_then(FieldValue::as_u64));
            operator.encode_u64(&field, cx)
        }
        FieldType::Decimal => {
            let field = DecimalRef::new(instruction, value.and_then(FieldValue::as_decimal));
            operator.encode_decimal(&field, cx)
        }
        FieldType::AsciiString => {
            let field = AsciiRef::new(instruction, value.and_then(FieldValue::as_bytes));
            operator.encode_ascii(&field, cx)
        }
        FieldType::UnicodeString => {
            let field = UnicodeRef::new(instruction, value.and_then(FieldValue::as_bytes));
            operator.encode_unicode(&field, cx)
        }
        FieldType::ByteVector => {
            let field = ByteVectorRef::new(instruction, value.and_then(FieldValue::as_bytes));
            operator.encode_bytes(&field, cx)
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::Session;
    use super::*;
    use fastwire_core::Decimal;
    use fastwire_schema::InitialValue;

    #[test]
    fn test_encoder_operator_table() {
        for op in Operator::ALL {
            assert_eq!(encoder_operator(op).operator(), op);
        }
    }

    #[test]
    fn test_unsupported_pair_is_an_error() {
        let field = FieldInstruction::new("Px", FieldType::Decimal);
        let mut session = Session::new();
        let mut cx = EncodeContext::new(
            &mut session.stream,
            &mut session.pmap,
            &mut session.dictionary,
        );
        let result = encoder_operator(Operator::Increment)
            .encode_decimal(&DecimalRef::new(&field, Some(Decimal::ZERO)), &mut cx);
        assert!(matches!(
            result,
            Err(EncodeError::UnsupportedOperator { field_type: FieldType::Decimal, .. })
        ));
    }

    #[test]
    fn test_encode_value_type_mismatch() {
        let field = FieldInstruction::new("Qty", FieldType::UInt32);
        let mut session = Session::new();
        let result = session.encode(&field, Some(FieldValue::Int64(1)));
        assert_eq!(
            result,
            Err(EncodeError::TypeMismatch {
                name: "Qty".to_string(),
                expected: FieldType::UInt32,
                actual: FieldType::Int64,
            })
        );
    }

    #[test]
    fn test_missing_mandatory_field() {
        for op in [Operator::None, Operator::Copy, Operator::Delta, Operator::Increment] {
            let field = FieldInstruction::new("Seq", FieldType::UInt32).with_operator(op);
            let mut session = Session::new();
            assert_eq!(
                session.encode(&field, None),
                Err(EncodeError::MissingMandatoryField {
                    name: "Seq".to_string()
                })
            );
        }
    }

    #[test]
    fn test_copy_undefined_absent_ignores_initial_value() {
        let field = FieldInstruction::new("Qty", FieldType::UInt32)
            .optional()
            .with_operator(Operator::Copy)
            .with_initial_value(InitialValue::UInt(10));
        let mut session = Session::new();
        let (bits, bytes) = session.encode(&field, None).unwrap();
        assert_eq!(bits, vec![false]);
        assert!(bytes.is_empty());
        assert!(session.previous(&field).is_empty());
    }

    #[test]
    fn test_decimal_individual_operators() {
        let field = FieldInstruction::new("Px", FieldType::Decimal)
            .with_operator(Operator::Copy)
            .with_exponent_operator(Operator::Copy, Some(-2))
            .with_mantissa_operator(Operator::Delta, None);
        let mut session = Session::new();

        let first = Decimal::new(15025, -2);
        let (bits, bytes) = session.encode(&field, Some(first.into())).unwrap();
        // Exponent equals its initial value; mantissa delta from zero.
        assert_eq!(bits, vec![false]);
        let mut expected = FastStream::new();
        expected.encode_int(15025);
        assert_eq!(bytes, expected.as_bytes());

        let (bits, bytes) = session
            .encode(&field, Some(Decimal::new(15030, -2).into()))
            .unwrap();
        assert_eq!(bits, vec![false]);
        assert_eq!(bytes, vec![0x85]);
    }

    #[test]
    fn test_absent_decimal_skips_mantissa() {
        let field = FieldInstruction::new("Px", FieldType::Decimal)
            .optional()
            .with_exponent_operator(Operator::Copy, None)
            .with_mantissa_operator(Operator::Copy, None);
        let mut session = Session::new();
        session
            .encode(&field, Some(Decimal::new(5, -1).into()))
            .unwrap();

        let (bits, bytes) = session.encode(&field, None).unwrap();
        assert_eq!(bits, vec![true]);
        assert_eq!(bytes, vec![0x80]);

        let mantissa = field.decimal_operators().unwrap().mantissa();
        assert_eq!(session.previous(mantissa), &PreviousValue::Int(5));
    }
}
