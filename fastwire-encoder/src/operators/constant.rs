/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! The constant operator: values are implied by the template.

use super::{EncodeContext, FieldOperator, encode_decimal_with};
use crate::field::{DecimalRef, FastField};
use fastwire_core::EncodeError;
use fastwire_schema::Operator;

/// Never writes a value. Optional fields use one bit to signal presence.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantOperator;

impl ConstantOperator {
    fn encode_impl<F: FastField>(
        &self,
        field: &F,
        cx: &mut EncodeContext<'_>,
    ) -> Result<(), EncodeError> {
        let instruction = field.instruction();
        if field.is_present() && !field.is_initial_value() {
            return Err(EncodeError::ConstantMismatch {
                name: instruction.name().to_string(),
            });
        }

        if instruction.is_optional() {
            cx.pmap.set_next_bit(field.is_present());
            if field.is_present() {
                cx.save_previous_value(field);
            }
        }
        Ok(())
    }
}

impl FieldOperator for ConstantOperator {
    fn operator(&self) -> Operator {
        Operator::Constant
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
