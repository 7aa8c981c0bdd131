/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! The copy operator.

use super::{
    EncodeContext, FieldOperator, IsSame, encode_copy_or_increment, encode_decimal_with,
};
use crate::field::{DecimalRef, FastField};
use fastwire_core::EncodeError;
use fastwire_schema::Operator;

/// Omits a value equal to the previous value.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyOperator;

impl CopyOperator {
    fn encode_impl<F: FastField>(
        &self,
        field: &F,
        cx: &mut EncodeContext<'_>,
    ) -> Result<(), EncodeError> {
        encode_copy_or_increment::<F, IsSame>(field, cx)
    }
}

impl FieldOperator for CopyOperator {
    fn operator(&self) -> Operator {
        Operator::Copy
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
    use fastwire_schema::{FieldInstruction, InitialValue, Operator};

    fn qty() -> FieldInstruction {
        FieldInstruction::new("Qty", FieldType::UInt32)
            .with_operator(Operator::Copy)
            .with_initial_value(InitialValue::UInt(10))
    }

    #[test]
    fn test_copy_initial_value_is_implied() {
        let field = qty();
        let mut session = Session::new();
        let (bits, bytes) = session.encode(&field, Some(FieldValue::UInt32(10))).unwrap();
        assert_eq!(bits, vec![false]);
        assert!(bytes.is_empty());
        assert_eq!(session.previous(&field), &PreviousValue::UInt(10));
    }

    #[test]
    fn test_copy_changed_value_is_written() {
        let field = qty();
        let mut session = Session::new();
        session.encode(&field, Some(FieldValue::UInt32(10))).unwrap();

        let (bits, bytes) = session.encode(&field, Some(FieldValue::UInt32(15))).unwrap();
        assert_eq!(bits, vec![true]);
        assert_eq!(bytes, vec![0x8F]);
        assert_eq!(session.previous(&field), &PreviousValue::UInt(15));
    }

    #[test]
    fn test_copy_repeat_emits_no_bytes() {
        let field = FieldInstruction::new("Symbol", FieldType::AsciiString)
            .with_operator(Operator::Copy);
        let mut session = Session::new();
        let value = FieldValue::Ascii("MSFT".to_string());

        let (bits, _) = session.encode(&field, Some(value.clone())).unwrap();
        assert_eq!(bits, vec![true]);
        let (bits, bytes) = session.encode(&field, Some(value)).unwrap();
        assert_eq!(bits, vec![false]);
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_copy_optional_absent_after_value() {
        let field = FieldInstruction::new("Px", FieldType::Decimal)
            .optional()
            .with_operator(Operator::Copy);
        let mut session = Session::new();
        session
            .encode(&field, Some(FieldValue::Decimal(Decimal::new(1, 0))))
            .unwrap();

        let (bits, bytes) = session.encode(&field, None).unwrap();
        assert_eq!(bits, vec![true]);
        assert_eq!(bytes, vec![0x80]);
        assert!(session.previous(&field).is_empty());

        let (bits, bytes) = session.encode(&field, None).unwrap();
        assert_eq!(bits, vec![false]);
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_copy_optional_byte_vector() {
        let field = FieldInstruction::new("Payload", FieldType::ByteVector)
            .optional()
            .with_operator(Operator::Copy);
        let payload = Some(FieldValue::Bytes(bytes::Bytes::from_static(&[1, 2])));
        let mut session = Session::new();

        let (bits, bytes) = session.encode(&field, payload.clone()).unwrap();
        assert_eq!(bits, vec![true]);
        assert_eq!(bytes, vec![0x83, 1, 2]);

        let (bits, bytes) = session.encode(&field, payload).unwrap();
        assert_eq!(bits, vec![false]);
        assert!(bytes.is_empty());

        let (bits, bytes) = session.encode(&field, None).unwrap();
        assert_eq!(bits, vec![true]);
        assert_eq!(bytes, vec![0x80]);
        assert!(session.previous(&field).is_empty());
    }

    #[test]
    fn test_copy_mandatory_unicode() {
        let field = FieldInstruction::new("Text", FieldType::UnicodeString)
            .with_operator(Operator::Copy)
            .with_initial_value(InitialValue::string("é"));
        let mut session = Session::new();

        let (bits, bytes) = session
            .encode(&field, Some(FieldValue::Unicode("é".to_string())))
            .unwrap();
        assert_eq!(bits, vec![false]);
        assert!(bytes.is_empty());

        let (bits, bytes) = session
            .encode(&field, Some(FieldValue::Unicode("ab".to_string())))
            .unwrap();
        assert_eq!(bits, vec![true]);
        assert_eq!(bytes, vec![0x82, b'a', b'b']);
        assert_eq!(
            session.previous(&field),
            &PreviousValue::Bytes(bytes::Bytes::from_static(b"ab"))
        );
    }
}
