/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! The delta operator.
//!
//! Integers are sent as the signed difference from the base value. Decimals
//! send the exponent and mantissa differences. Strings and byte vectors send
//! how many bytes to remove from the base, then the bytes to add: a
//! non-negative subtraction length removes from the back and appends, a
//! negative one removes `-(length + 1)` bytes from the front and prepends.

use super::{EncodeContext, FieldOperator, encode_decimal_with, require_mandatory};
use crate::dictionary::PreviousValue;
use crate::field::{DecimalRef, FastField, FastInt, IntRef, StringKind, StringRef};
use fastwire_core::EncodeError;
use fastwire_schema::{FieldInstruction, Operator};

/// Sends the difference from the base value. Uses no presence map bit.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeltaOperator;

fn overflow(instruction: &FieldInstruction) -> EncodeError {
    EncodeError::DeltaOverflow {
        name: instruction.name().to_string(),
    }
}

fn incompatible(instruction: &FieldInstruction) -> EncodeError {
    EncodeError::IncompatiblePreviousValue {
        name: instruction.name().to_string(),
    }
}

impl DeltaOperator {
    fn encode_integer<T: FastInt>(
        &self,
        field: &IntRef<'_, T>,
        cx: &mut EncodeContext<'_>,
    ) -> Result<(), EncodeError> {
        require_mandatory(field)?;
        let instruction = field.instruction();
        let Some(value) = field.value() else {
            cx.stream.encode_null();
            return Ok(());
        };

        let base = cx.dictionary.delta_base_value_of(instruction)?;
        let base: i128 = T::from_previous(&base)
            .ok_or_else(|| incompatible(instruction))?
            .into();
        let current: i128 = value.into();
        let delta = i64::try_from(current - base).map_err(|_| overflow(instruction))?;

        cx.stream.encode_signed(delta, instruction.is_nullable());
        cx.save_previous_value(field);
        Ok(())
    }

    fn encode_atomic_decimal(
        &self,
        field: &DecimalRef<'_>,
        cx: &mut EncodeContext<'_>,
    ) -> Result<(), EncodeError> {
        require_mandatory(field)?;
        let instruction = field.instruction();
        let Some(value) = field.value() else {
            cx.stream.encode_null();
            return Ok(());
        };
        if !value.has_valid_exponent() {
            return Err(EncodeError::ExponentOutOfRange {
                exponent: value.exponent(),
            });
        }

        let PreviousValue::Decimal(base) = cx.dictionary.delta_base_value_of(instruction)? else {
            return Err(incompatible(instruction));
        };
        let exponent = value
            .exponent()
            .checked_sub(base.exponent())
            .ok_or_else(|| overflow(instruction))?;
        let mantissa = value
            .mantissa()
            .checked_sub(base.mantissa())
            .ok_or_else(|| overflow(instruction))?;

        cx.stream
            .encode_scaled(exponent, mantissa, instruction.is_nullable());
        cx.save_previous_value(field);
        Ok(())
    }

    fn encode_string<K: StringKind>(
        &self,
        field: &StringRef<'_, K>,
        cx: &mut EncodeContext<'_>,
    ) -> Result<(), EncodeError> {
        require_mandatory(field)?;
        let instruction = field.instruction();
        let Some(value) = field.value() else {
            cx.stream.encode_null();
            return Ok(());
        };

        let PreviousValue::Bytes(base) = cx.dictionary.delta_base_value_of(instruction)? else {
            return Err(incompatible(instruction));
        };
        let diff = StringDelta::compute(&base, value);
        let subtraction =
            i32::try_from(diff.subtraction_length).map_err(|_| overflow(instruction))?;

        cx.stream
            .encode_signed(i64::from(subtraction), instruction.is_nullable());
        K::write(cx.stream, diff.delta, false)?;
        cx.save_previous_value(field);
        Ok(())
    }
}

impl FieldOperator for DeltaOperator {
    fn operator(&self) -> Operator {
        Operator::Delta
    }

    delegate_integers!(encode_integer);
    delegate_strings!(encode_string);

    fn encode_decimal(
        &self,
        field: &DecimalRef<'_>,
        cx: &mut EncodeContext<'_>,
    ) -> Result<(), EncodeError> {
        encode_decimal_with(self, field, cx, |field, cx| {
            self.encode_atomic_decimal(field, cx)
        })
    }
}

/// Difference between a base string and the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringDelta<'a> {
    /// Bytes removed from the back when non-negative; `-(n + 1)` removes
    /// `n` bytes from the front.
    pub subtraction_length: i64,
    /// Bytes appended (or prepended, for a negative subtraction length).
    pub delta: &'a [u8],
}

impl<'a> StringDelta<'a> {
    /// Computes the shorter of the prefix-based and suffix-based diffs.
    ///
    /// The prefix diff wins ties.
    #[must_use]
    pub fn compute(base: &[u8], current: &'a [u8]) -> Self {
        let prefix = common_prefix(base, current);
        let suffix = common_suffix(base, current);

        if prefix >= suffix {
            Self {
                subtraction_length: (base.len() - prefix) as i64,
                delta: &current[prefix..],
            }
        } else {
            Self {
                subtraction_length: -((base.len() - suffix) as i64) - 1,
                delta: &current[..current.len() - suffix],
            }
        }
    }

    /// Rebuilds the current value from the base.
    ///
    /// Returns `None` if the subtraction length exceeds the base.
    #[must_use]
    pub fn apply(&self, base: &[u8]) -> Option<Vec<u8>> {
        let mut result = Vec::with_capacity(base.len() + self.delta.len());
        if self.subtraction_length >= 0 {
            let keep = base.len().checked_sub(usize::try_from(self.subtraction_length).ok()?)?;
            result.extend_from_slice(&base[..keep]);
            result.extend_from_slice(self.delta);
        } else {
            let removed = usize::try_from(-(self.subtraction_length + 1)).ok()?;
            let kept = base.get(removed..)?;
            result.extend_from_slice(self.delta);
            result.extend_from_slice(kept);
        }
        Some(result)
    }
}

fn common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

fn common_suffix(a: &[u8], b: &[u8]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}
