/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! The tail operator.

use super::{EncodeContext, FieldOperator, require_mandatory};
use crate::dictionary::PreviousValue;
use crate::field::{FastField, StringKind, StringRef};
use fastwire_core::EncodeError;
use fastwire_schema::Operator;

/// Sends the part of a string that differs from the base value.
///
/// Defined for strings and byte vectors only.
#[derive(Debug, Clone, Copy, Default)]
pub struct TailOperator;

impl TailOperator {
    fn encode_impl<K: StringKind>(
        &self,
        field: &StringRef<'_, K>,
        cx: &mut EncodeContext<'_>,
    ) -> Result<(), EncodeError> {
        require_mandatory(field)?;
        let instruction = field.instruction();
        let previous = cx.previous_value_of(field);

        match field.value() {
            None => {
                cx.pmap.set_next_bit(previous.is_assigned());
                if previous.is_assigned() {
                    cx.stream.encode_null();
                }
            }
            Some(_) if field.is_same(&previous) => cx.pmap.set_next_bit(false),
            Some(value) => {
                cx.pmap.set_next_bit(true);
                let PreviousValue::Bytes(base) = cx.dictionary.tail_base_value_of(instruction)
                else {
                    return Err(EncodeError::IncompatiblePreviousValue {
                        name: instruction.name().to_string(),
                    });
                };
                K::write(cx.stream, tail_of(&base, value), instruction.is_nullable())?;
            }
        }

        cx.save_previous_value(field);
        Ok(())
    }
}

impl FieldOperator for TailOperator {
    fn operator(&self) -> Operator {
        Operator::Tail
    }

    delegate_strings!(encode_impl);
}

/// Returns the tail of `current` to send against `base`.
///
/// For equal lengths this is everything after the common prefix; otherwise
/// it is the whole value.
#[must_use]
pub fn tail_of<'a>(base: &[u8], current: &'a [u8]) -> &'a [u8] {
    if base.len() != current.len() {
        return current;
    }
    let prefix = base
        .iter()
        .zip(current)
        .take_while(|(x, y)| x == y)
        .count();
    &current[prefix..]
}
