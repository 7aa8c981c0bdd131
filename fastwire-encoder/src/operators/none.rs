/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! The none operator: every value is in the stream.

use super::{EncodeContext, FieldOperator, encode_decimal_with, require_mandatory};
use crate::field::{DecimalRef, FastField};
use fastwire_core::EncodeError;
use fastwire_schema::Operator;

/// Writes every value, using no presence map bit.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOperator;

impl NoOperator {
    fn encode_impl<F: FastField>(
        &self,
        field: &F,
        cx: &mut EncodeContext<'_>,
    ) -> Result<(), EncodeError> {
        require_mandatory(field)?;
        field.write(cx.stream)?;
        cx.save_previous_value(field);
        Ok(())
    }
}

impl FieldOperator for NoOperator {
    fn operator(&self) -> Operator {
        Operator::None
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

#[cfg(test)]
mod tests {
    use super::super::test_support::Session;
    use crate::dictionary::PreviousValue;
    use fastwire_core::{Decimal, FieldType, FieldValue};
    use fastwire_schema::FieldInstruction;

    #[test]
    fn test_none_writes_value_without_bit() {
        let field = FieldInstruction::new("Qty", FieldType::UInt32);
        let mut session = Session::new();
        let (bits, bytes) = session.encode(&field, Some(FieldValue::UInt32(942))).unwrap();
        assert!(bits.is_empty());
        assert_eq!(bytes, vec![0x07, 0xAE]);
        assert_eq!(session.previous(&field), &PreviousValue::UInt(942));
    }

    #[test]
    fn test_none_optional_absent_writes_null() {
        let field = FieldInstruction::new("Qty", FieldType::Int64).optional();
        let mut session = Session::new();
        let (bits, bytes) = session.encode(&field, None).unwrap();
        assert!(bits.is_empty());
        assert_eq!(bytes, vec![0x80]);
        assert!(session.previous(&field).is_empty());

        let (_, bytes) = session.encode(&field, Some(FieldValue::Int64(0))).unwrap();
        assert_eq!(bytes, vec![0x81]);
    }

    #[test]
    fn test_none_repeats_value() {
        let field = FieldInstruction::new("Symbol", FieldType::AsciiString);
        let mut session = Session::new();
        let value = FieldValue::Ascii("IBM".to_string());
        let (_, first) = session.encode(&field, Some(value.clone())).unwrap();
        let (_, second) = session.encode(&field, Some(value)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, vec![b'I', b'B', b'M' | 0x80]);
    }

    #[test]
    fn test_none_optional_decimal() {
        let field = FieldInstruction::new("Px", FieldType::Decimal).optional();
        let mut session = Session::new();
        let (_, bytes) = session
            .encode(&field, Some(FieldValue::Decimal(Decimal::new(942, 1))))
            .unwrap();
        assert_eq!(bytes, vec![0x82, 0x07, 0xAE]);
    }
}
