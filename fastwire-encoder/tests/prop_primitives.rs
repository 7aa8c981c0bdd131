/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Property tests for stop-bit primitives and presence maps.

use fastwire_core::{Decimal, MAX_EXPONENT, MIN_EXPONENT};
use fastwire_encoder::{FastDecoder, FastStream, PresenceMapEncoder};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_uint_roundtrip(value in any::<u64>(), nullable in any::<bool>()) {
        let mut stream = FastStream::new();
        stream.encode_unsigned(value, nullable);
        let mut offset = 0;
        let decoded = if nullable {
            FastDecoder::decode_nullable_uint(stream.as_bytes(), &mut offset).unwrap()
        } else {
            Some(FastDecoder::decode_uint(stream.as_bytes(), &mut offset).unwrap())
        };
        prop_assert_eq!(decoded, Some(value));
        prop_assert_eq!(offset, stream.len());
    }

    #[test]
    fn test_int_roundtrip(value in any::<i64>(), nullable in any::<bool>()) {
        let mut stream = FastStream::new();
        stream.encode_signed(value, nullable);
        let mut offset = 0;
        let decoded = if nullable {
            FastDecoder::decode_nullable_int(stream.as_bytes(), &mut offset).unwrap()
        } else {
            Some(FastDecoder::decode_int(stream.as_bytes(), &mut offset).unwrap())
        };
        prop_assert_eq!(decoded, Some(value));
        prop_assert_eq!(offset, stream.len());
    }

    #[test]
    fn test_only_last_byte_has_stop_bit(value in any::<i64>()) {
        let mut stream = FastStream::new();
        stream.encode_int(value);
        let bytes = stream.as_bytes();
        let (last, rest) = bytes.split_last().unwrap();
        prop_assert!(last & 0x80 != 0);
        prop_assert!(rest.iter().all(|b| b & 0x80 == 0));
    }

    #[test]
    fn test_ascii_roundtrip(value in "[\\x00-\\x7f]{0,40}", nullable in any::<bool>()) {
        let mut stream = FastStream::new();
        stream.encode_ascii(value.as_bytes(), nullable).unwrap();
        let mut offset = 0;
        let decoded = if nullable {
            FastDecoder::decode_nullable_ascii(stream.as_bytes(), &mut offset).unwrap()
        } else {
            Some(FastDecoder::decode_ascii(stream.as_bytes(), &mut offset).unwrap())
        };
        prop_assert_eq!(decoded, Some(value));
        prop_assert_eq!(offset, stream.len());
    }

    #[test]
    fn test_bytes_roundtrip(
        value in proptest::collection::vec(any::<u8>(), 0..64),
        nullable in any::<bool>(),
    ) {
        let mut stream = FastStream::new();
        stream.encode_bytes(&value, nullable);
        let mut offset = 0;
        let decoded = if nullable {
            FastDecoder::decode_nullable_bytes(stream.as_bytes(), &mut offset).unwrap()
        } else {
            Some(FastDecoder::decode_bytes(stream.as_bytes(), &mut offset).unwrap())
        };
        prop_assert_eq!(decoded.as_deref(), Some(&value[..]));
    }

    #[test]
    fn test_decimal_roundtrip(
        mantissa in any::<i64>(),
        exponent in MIN_EXPONENT..=MAX_EXPONENT,
        nullable in any::<bool>(),
    ) {
        let value = Decimal::new(mantissa, exponent);
        let mut stream = FastStream::new();
        stream.encode_decimal(value, nullable).unwrap();
        let mut offset = 0;
        let decoded = if nullable {
            FastDecoder::decode_nullable_decimal(stream.as_bytes(), &mut offset).unwrap()
        } else {
            Some(FastDecoder::decode_decimal(stream.as_bytes(), &mut offset).unwrap())
        };
        prop_assert_eq!(decoded, Some(value));
    }

    #[test]
    fn test_pmap_roundtrip(bits in proptest::collection::vec(any::<bool>(), 0..50)) {
        let mut encoder = PresenceMapEncoder::new();
        for bit in &bits {
            encoder.set_next_bit(*bit);
        }
        let bytes = encoder.encode();
        let mut offset = 0;
        let mut pmap = FastDecoder::decode_pmap(&bytes, &mut offset).unwrap();
        prop_assert_eq!(offset, bytes.len());
        prop_assert!(pmap.len() <= bits.len().max(1) + 6);
        for bit in &bits {
            prop_assert_eq!(pmap.next_bit(), *bit);
        }
    }
}
