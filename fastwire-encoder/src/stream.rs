/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! FAST stop-bit output stream.
//!
//! This module provides [`FastStream`], the byte sink that field operators
//! write to. Integers are written in 7-bit groups with the high bit set on
//! the last byte. Nullable representations shift non-negative values up by
//! one so that a single `0x80` byte can stand for NULL.

use bytes::{BufMut, Bytes, BytesMut};
use fastwire_core::{Decimal, EncodeError};

/// The NULL byte of every nullable type.
pub const NULL: u8 = 0x80;

const STOP_BIT: u8 = 0x80;
const DATA_MASK: u8 = 0x7F;
const SIGN_BIT: u8 = 0x40;

/// Upper bound of 7-bit groups needed for any value written by this stream.
const MAX_GROUPS: usize = 19;

/// FAST stop-bit output stream.
#[derive(Debug, Default)]
pub struct FastStream {
    buffer: BytesMut,
}

impl FastStream {
    /// Creates an empty stream.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty stream with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
        }
    }

    /// Writes a NULL.
    #[inline]
    pub fn encode_null(&mut self) {
        self.buffer.put_u8(NULL);
    }

    /// Writes an unsigned integer.
    #[inline]
    pub fn encode_uint(&mut self, value: u64) {
        self.write_unsigned(u128::from(value));
    }

    /// Writes a nullable unsigned integer, `None` being NULL.
    pub fn encode_nullable_uint(&mut self, value: Option<u64>) {
        match value {
            Some(v) => self.write_unsigned(u128::from(v) + 1),
            None => self.encode_null(),
        }
    }

    /// Writes an unsigned integer in its mandatory or nullable form.
    #[inline]
    pub fn encode_unsigned(&mut self, value: u64, nullable: bool) {
        if nullable {
            self.encode_nullable_uint(Some(value));
        } else {
            self.encode_uint(value);
        }
    }

    /// Writes a signed integer.
    #[inline]
    pub fn encode_int(&mut self, value: i64) {
        self.write_signed(i128::from(value));
    }

    /// Writes a nullable signed integer, `None` being NULL.
    ///
    /// Non-negative values are shifted up by one; negative values are
    /// written unchanged.
    pub fn encode_nullable_int(&mut self, value: Option<i64>) {
        match value {
            Some(v) if v >= 0 => self.write_signed(i128::from(v) + 1),
            Some(v) => self.write_signed(i128::from(v)),
            None => self.encode_null(),
        }
    }

    /// Writes a signed integer in its mandatory or nullable form.
    #[inline]
    pub fn encode_signed(&mut self, value: i64, nullable: bool) {
        if nullable {
            self.encode_nullable_int(Some(value));
        } else {
            self.encode_int(value);
        }
    }

    /// Writes a stop-bit terminated ASCII string.
    ///
    /// # Arguments
    /// * `value` - The string bytes, all of which must be 7-bit
    /// * `nullable` - Whether the field uses the nullable representation
    ///
    /// # Errors
    /// Returns `EncodeError::InvalidAscii` on the first byte above `0x7F`.
    pub fn encode_ascii(&mut self, value: &[u8], nullable: bool) -> Result<(), EncodeError> {
        if let Some(&byte) = value.iter().find(|b| !b.is_ascii()) {
            return Err(EncodeError::InvalidAscii { byte });
        }

        let Some((&last, head)) = value.split_last() else {
            if nullable {
                self.buffer.put_u8(0x00);
            }
            self.buffer.put_u8(STOP_BIT);
            return Ok(());
        };

        // An all-zero value would read as an empty string or NULL. Any other
        // value, including one that starts with a zero byte, is sent as is.
        if value.iter().all(|&b| b == 0x00) {
            self.buffer.put_u8(0x00);
            if nullable {
                self.buffer.put_u8(0x00);
            }
        }

        self.buffer.extend_from_slice(head);
        self.buffer.put_u8(last | STOP_BIT);
        Ok(())
    }

    /// Writes a length-prefixed byte vector.
    ///
    /// The length is a nullable unsigned integer when `nullable` is set.
    pub fn encode_bytes(&mut self, value: &[u8], nullable: bool) {
        self.encode_unsigned(value.len() as u64, nullable);
        self.buffer.extend_from_slice(value);
    }

    /// Writes a length-prefixed UTF-8 string.
    #[inline]
    pub fn encode_unicode(&mut self, value: &[u8], nullable: bool) {
        self.encode_bytes(value, nullable);
    }

    /// Writes a scaled decimal: exponent, then mantissa.
    ///
    /// Only the exponent carries the nullable representation.
    ///
    /// # Errors
    /// Returns `EncodeError::ExponentOutOfRange` when the exponent is outside
    /// `-63..=63`.
    pub fn encode_decimal(&mut self, value: Decimal, nullable: bool) -> Result<(), EncodeError> {
        if !value.has_valid_exponent() {
            return Err(EncodeError::ExponentOutOfRange {
                exponent: value.exponent(),
            });
        }
        self.encode_scaled(value.exponent(), value.mantissa(), nullable);
        Ok(())
    }

    /// Writes an exponent/mantissa pair without range checks.
    ///
    /// Used for decimal deltas, whose exponent difference may exceed the
    /// range of a decimal value.
    pub fn encode_scaled(&mut self, exponent: i32, mantissa: i64, nullable: bool) {
        self.encode_signed(i64::from(exponent), nullable);
        self.encode_int(mantissa);
    }

    /// Appends bytes verbatim.
    #[inline]
    pub fn encode_raw(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Returns the written bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Returns the number of written bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clears the stream for reuse, keeping its allocation.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Takes the written bytes, leaving the stream empty.
    #[must_use]
    pub fn freeze(&mut self) -> Bytes {
        self.buffer.split().freeze()
    }

    fn write_unsigned(&mut self, value: u128) {
        let mut groups = [0u8; MAX_GROUPS];
        let mut count = 0;
        let mut v = value;

        loop {
            groups[count] = (v as u8) & DATA_MASK;
            count += 1;
            v >>= 7;
            if v == 0 {
                break;
            }
        }

        self.put_groups(&mut groups[..count]);
    }

    fn write_signed(&mut self, value: i128) {
        let mut groups = [0u8; MAX_GROUPS];
        let mut count = 0;
        let mut v = value;

        // Stop once the remaining bits are pure sign extension of bit 6.
        loop {
            let group = (v as u8) & DATA_MASK;
            groups[count] = group;
            count += 1;
            v >>= 7;
            let negative_group = group & SIGN_BIT != 0;
            if (v == 0 && !negative_group) || (v == -1 && negative_group) {
                break;
            }
        }

        self.put_groups(&mut groups[..count]);
    }

    /// Writes groups collected least significant first.
    fn put_groups(&mut self, groups: &mut [u8]) {
        groups[0] |= STOP_BIT;
        groups.reverse();
        self.buffer.extend_from_slice(groups);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(f: impl FnOnce(&mut FastStream)) -> Vec<u8> {
        let mut stream = FastStream::new();
        f(&mut stream);
        stream.as_bytes().to_vec()
    }

    #[test]
    fn test_encode_uint_zero() {
        assert_eq!(written(|s| s.encode_uint(0)), vec![0x80]);
    }

    #[test]
    fn test_encode_uint_one() {
        assert_eq!(written(|s| s.encode_uint(1)), vec![0x81]);
    }

    #[test]
    fn test_encode_uint_larger() {
        // 942 = 7 * 128 + 46
        assert_eq!(written(|s| s.encode_uint(942)), vec![0x07, 0xAE]);
    }

    #[test]
    fn test_encode_uint_max() {
        let bytes = written(|s| s.encode_uint(u64::MAX));
        assert_eq!(bytes.len(), 10);
        assert_eq!(bytes[0], 0x01);
        assert_eq!(*bytes.last().unwrap(), 0xFF);
    }

    #[test]
    fn test_encode_nullable_uint() {
        assert_eq!(written(|s| s.encode_nullable_uint(None)), vec![0x80]);
        assert_eq!(written(|s| s.encode_nullable_uint(Some(0))), vec![0x81]);
        assert_eq!(written(|s| s.encode_nullable_uint(Some(5))), vec![0x86]);

        // u64::MAX + 1 needs an extra group.
        let bytes = written(|s| s.encode_nullable_uint(Some(u64::MAX)));
        assert_eq!(bytes, vec![0x02, 0, 0, 0, 0, 0, 0, 0, 0, 0x80]);
    }

    #[test]
    fn test_encode_int_small() {
        assert_eq!(written(|s| s.encode_int(0)), vec![0x80]);
        assert_eq!(written(|s| s.encode_int(1)), vec![0x81]);
        assert_eq!(written(|s| s.encode_int(-1)), vec![0xFF]);
        assert_eq!(written(|s| s.encode_int(63)), vec![0xBF]);
        assert_eq!(written(|s| s.encode_int(-64)), vec![0xC0]);
    }

    #[test]
    fn test_encode_int_sign_extension() {
        // 64 needs a leading zero group so bit 6 does not read as a sign.
        assert_eq!(written(|s| s.encode_int(64)), vec![0x00, 0xC0]);
        assert_eq!(written(|s| s.encode_int(-65)), vec![0x7F, 0xBF]);
        assert_eq!(written(|s| s.encode_int(942)), vec![0x07, 0xAE]);
        assert_eq!(written(|s| s.encode_int(-942)), vec![0x78, 0xD2]);
    }

    #[test]
    fn test_encode_int_extremes() {
        assert_eq!(written(|s| s.encode_int(i64::MAX)).len(), 10);
        assert_eq!(written(|s| s.encode_int(i64::MIN)).len(), 10);
    }

    #[test]
    fn test_encode_nullable_int() {
        assert_eq!(written(|s| s.encode_nullable_int(None)), vec![0x80]);
        assert_eq!(written(|s| s.encode_nullable_int(Some(0))), vec![0x81]);
        assert_eq!(written(|s| s.encode_nullable_int(Some(-1))), vec![0xFF]);
        assert_eq!(written(|s| s.encode_nullable_int(Some(63))), vec![0x00, 0xC0]);
    }

    #[test]
    fn test_encode_ascii() {
        let bytes = written(|s| s.encode_ascii(b"Hi!", false).unwrap());
        assert_eq!(bytes, vec![b'H', b'i', b'!' | 0x80]);
    }

    #[test]
    fn test_encode_ascii_empty() {
        assert_eq!(written(|s| s.encode_ascii(b"", false).unwrap()), vec![0x80]);
        assert_eq!(
            written(|s| s.encode_ascii(b"", true).unwrap()),
            vec![0x00, 0x80]
        );
    }

    #[test]
    fn test_encode_ascii_leading_zero() {
        assert_eq!(
            written(|s| s.encode_ascii(b"\0", false).unwrap()),
            vec![0x00, 0x80]
        );
        assert_eq!(
            written(|s| s.encode_ascii(b"\0", true).unwrap()),
            vec![0x00, 0x00, 0x80]
        );
    }

    #[test]
    fn test_encode_ascii_zero_prefixed_value_is_not_escaped() {
        assert_eq!(
            written(|s| s.encode_ascii(b"\0A", false).unwrap()),
            vec![0x00, 0xC1]
        );
        assert_eq!(
            written(|s| s.encode_ascii(b"\0A", true).unwrap()),
            vec![0x00, 0xC1]
        );
        assert_eq!(
            written(|s| s.encode_ascii(b"\0\0", false).unwrap()),
            vec![0x00, 0x00, 0x80]
        );
    }

    #[test]
    fn test_encode_ascii_rejects_high_bytes() {
        let mut stream = FastStream::new();
        let result = stream.encode_ascii("é".as_bytes(), false);
        assert_eq!(result, Err(EncodeError::InvalidAscii { byte: 0xC3 }));
        assert!(stream.is_empty());
    }

    #[test]
    fn test_encode_bytes() {
        assert_eq!(
            written(|s| s.encode_bytes(&[1, 2, 3], false)),
            vec![0x83, 1, 2, 3]
        );
        assert_eq!(
            written(|s| s.encode_bytes(&[1, 2, 3], true)),
            vec![0x84, 1, 2, 3]
        );
        assert_eq!(written(|s| s.encode_bytes(&[], true)), vec![0x81]);
    }

    #[test]
    fn test_encode_unicode() {
        let bytes = written(|s| s.encode_unicode("é".as_bytes(), false));
        assert_eq!(bytes, vec![0x82, 0xC3, 0xA9]);
    }

    #[test]
    fn test_encode_decimal() {
        let bytes = written(|s| s.encode_decimal(Decimal::new(942, -2), false).unwrap());
        assert_eq!(bytes, vec![0xFE, 0x07, 0xAE]);

        let bytes = written(|s| s.encode_decimal(Decimal::new(942, -2), true).unwrap());
        assert_eq!(bytes, vec![0xFE, 0x07, 0xAE]);

        let bytes = written(|s| s.encode_decimal(Decimal::new(1, 2), true).unwrap());
        assert_eq!(bytes, vec![0x83, 0x81]);
    }

    #[test]
    fn test_encode_decimal_exponent_range() {
        let mut stream = FastStream::new();
        let result = stream.encode_decimal(Decimal::new(1, 64), false);
        assert_eq!(result, Err(EncodeError::ExponentOutOfRange { exponent: 64 }));
    }

    #[test]
    fn test_stream_clear_and_freeze() {
        let mut stream = FastStream::with_capacity(16);
        stream.encode_uint(42);
        assert!(!stream.is_empty());

        let frozen = stream.freeze();
        assert_eq!(&frozen[..], &[0xAA]);
        assert!(stream.is_empty());

        stream.encode_uint(1);
        stream.clear();
        assert_eq!(stream.len(), 0);
    }
}
