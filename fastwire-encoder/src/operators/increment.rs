/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! The increment operator.

use super::{EncodeContext, FieldOperator, IsIncrement, encode_copy_or_increment};
use crate::field::{FastInt, IntRef};
use fastwire_core::EncodeError;
use fastwire_schema::Operator;

/// Omits a value one greater than the previous value.
///
/// Defined for integer fields only.
#[derive(Debug, Clone, Copy, Default)]
pub struct IncrementOperator;

impl IncrementOperator {
    fn encode_impl<T: FastInt>(
        &self,
        field: &IntRef<'_, T>,
        cx: &mut EncodeContext<'_>,
    ) -> Result<(), EncodeError> {
        encode_copy_or_increment::<_, IsIncrement>(field, cx)
    }
}

impl FieldOperator for IncrementOperator {
    fn operator(&self) -> Operator {
        Operator::Increment
    }

    delegate_integers!(encode_impl);
}
