/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! The default operator.

use super::{EncodeContext, FieldOperator, encode_decimal_with, require_mandatory};
use crate::field::{DecimalRef, FastField};
use fastwire_core::EncodeError;
use fastwire_schema::Operator;

/// Omits a value equal to the initial value.
///
/// A value equal to the previous value is sent as NULL.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultOperator;

impl DefaultOperator {
    fn encode_impl<F: FastField>(
        &self,
        field: &F,
        cx: &mut EncodeContext<'_>,
    ) -> Result<(), EncodeError> {
        require_mandatory(field)?;

        let same = field.is_same(cx.dictionary.previous_value_of(field.instruction()));
        cx.save_previous_value(field);

        let implied = if field.instruction().has_initial_value() {
            field.is_initial_value()
        } else {
            field.is_absent()
        };
        if implied {
            cx.pmap.set_next_bit(false);
            return Ok(());
        }

        cx.pmap.set_next_bit(true);
        if same {
            cx.stream.encode_null();
            Ok(())
        } else {
            field.write(cx.stream)
        }
    }
}

impl FieldOperator for DefaultOperator {
    fn operator(&self) -> Operator {
        Operator::Default
    }

    delegate_integers!(encode_impl);
    delegate_strings!(encode_impl);

    fn encode_decimal(
        &self,
        field: &DecimalRef<'_>,
        cx: &mut EncodeContext<'_>,
    ) -> Result<(), EncodeError> {
        encode_decimal_with(self, field, cx, |field, cx| self.encode_impl(field, cx))
    }
}
