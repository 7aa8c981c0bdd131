/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! FAST primitive decoder.
//!
//! This module reads back the stop-bit primitives written by
//! [`FastStream`](crate::stream::FastStream). It does not interpret field
//! operators; decoding a message requires the same dictionary state the
//! encoder used.

use crate::pmap::PresenceMap;
use bytes::Bytes;
use fastwire_core::{DecodeError, Decimal, MAX_EXPONENT, MIN_EXPONENT};

const STOP_BIT: u8 = 0x80;
const DATA_MASK: u8 = 0x7F;
const SIGN_BIT: u8 = 0x40;

/// Longest stop-bit integer accepted, enough for a nullable `u64::MAX`.
const MAX_INTEGER_BYTES: usize = 10;

/// FAST primitive decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct FastDecoder;

impl FastDecoder {
    fn next_byte(data: &[u8], offset: &mut usize) -> Result<u8, DecodeError> {
        let byte = *data.get(*offset).ok_or(DecodeError::UnexpectedEof)?;
        *offset += 1;
        Ok(byte)
    }

    fn read_unsigned(data: &[u8], offset: &mut usize) -> Result<u128, DecodeError> {
        let mut result: u128 = 0;

        for _ in 0..MAX_INTEGER_BYTES {
            let byte = Self::next_byte(data, offset)?;
            result = (result << 7) | u128::from(byte & DATA_MASK);
            if byte & STOP_BIT != 0 {
                return Ok(result);
            }
        }
        Err(DecodeError::IntegerOverflow)
    }

    fn read_signed(data: &[u8], offset: &mut usize) -> Result<i128, DecodeError> {
        let first = *data.get(*offset).ok_or(DecodeError::UnexpectedEof)?;
        let mut result: i128 = if first & SIGN_BIT != 0 { -1 } else { 0 };

        for _ in 0..MAX_INTEGER_BYTES {
            let byte = Self::next_byte(data, offset)?;
            result = (result << 7) | i128::from(byte & DATA_MASK);
            if byte & STOP_BIT != 0 {
                return Ok(result);
            }
        }
        Err(DecodeError::IntegerOverflow)
    }

    fn read_stop_bit_bytes(data: &[u8], offset: &mut usize) -> Result<Vec<u8>, DecodeError> {
        let mut result = Vec::new();

        loop {
            let byte = Self::next_byte(data, offset)?;
            result.push(byte & DATA_MASK);
            if byte & STOP_BIT != 0 {
                return Ok(result);
            }
        }
    }

    fn take(data: &[u8], offset: &mut usize, length: u64) -> Result<Bytes, DecodeError> {
        let length = usize::try_from(length).map_err(|_| DecodeError::UnexpectedEof)?;
        let end = offset
            .checked_add(length)
            .filter(|&end| end <= data.len())
            .ok_or(DecodeError::UnexpectedEof)?;
        let bytes = Bytes::copy_from_slice(&data[*offset..end]);
        *offset = end;
        Ok(bytes)
    }

    /// Decodes an unsigned integer using stop-bit encoding.
    ///
    /// # Arguments
    /// * `data` - The input bytes
    /// * `offset` - Current position (will be updated)
    ///
    /// # Errors
    /// Returns `DecodeError::UnexpectedEof` if data is incomplete, or
    /// `DecodeError::IntegerOverflow` if the value exceeds 64 bits.
    pub fn decode_uint(data: &[u8], offset: &mut usize) -> Result<u64, DecodeError> {
        let value = Self::read_unsigned(data, offset)?;
        u64::try_from(value).map_err(|_| DecodeError::IntegerOverflow)
    }

    /// Decodes a nullable unsigned integer; `None` is NULL.
    ///
    /// # Errors
    /// Same as [`decode_uint`](Self::decode_uint).
    pub fn decode_nullable_uint(
        data: &[u8],
        offset: &mut usize,
    ) -> Result<Option<u64>, DecodeError> {
        match Self::read_unsigned(data, offset)? {
            0 => Ok(None),
            value => u64::try_from(value - 1)
                .map(Some)
                .map_err(|_| DecodeError::IntegerOverflow),
        }
    }

    /// Decodes a signed integer using stop-bit encoding.
    ///
    /// # Errors
    /// Returns `DecodeError::UnexpectedEof` if data is incomplete, or
    /// `DecodeError::IntegerOverflow` if the value exceeds 64 bits.
    pub fn decode_int(data: &[u8], offset: &mut usize) -> Result<i64, DecodeError> {
        let value = Self::read_signed(data, offset)?;
        i64::try_from(value).map_err(|_| DecodeError::IntegerOverflow)
    }

    /// Decodes a nullable signed integer; `None` is NULL.
    ///
    /// # Errors
    /// Same as [`decode_int`](Self::decode_int).
    pub fn decode_nullable_int(
        data: &[u8],
        offset: &mut usize,
    ) -> Result<Option<i64>, DecodeError> {
        let value = match Self::read_signed(data, offset)? {
            0 => return Ok(None),
            v if v > 0 => v - 1,
            v => v,
        };
        i64::try_from(value)
            .map(Some)
            .map_err(|_| DecodeError::IntegerOverflow)
    }

    /// Decodes a mandatory ASCII string.
    ///
    /// # Errors
    /// Returns `DecodeError::UnexpectedEof` if data is incomplete.
    pub fn decode_ascii(data: &[u8], offset: &mut usize) -> Result<String, DecodeError> {
        let mut bytes = Self::read_stop_bit_bytes(data, offset)?;
        if bytes.iter().all(|&b| b == 0) {
            bytes.remove(0);
        }
        String::from_utf8(bytes).map_err(|_| DecodeError::InvalidString)
    }

    /// Decodes a nullable ASCII string; `None` is NULL.
    ///
    /// # Errors
    /// Returns `DecodeError::UnexpectedEof` if data is incomplete.
    pub fn decode_nullable_ascii(
        data: &[u8],
        offset: &mut usize,
    ) -> Result<Option<String>, DecodeError> {
        let mut bytes = Self::read_stop_bit_bytes(data, offset)?;
        if bytes == [0] {
            return Ok(None);
        }
        // All-zero values carry two extra zero bytes in the nullable form.
        if bytes.iter().all(|&b| b == 0) {
            bytes.drain(..2);
        }
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|_| DecodeError::InvalidString)
    }

    /// Decodes a length-prefixed byte vector.
    ///
    /// # Errors
    /// Returns `DecodeError::UnexpectedEof` if data is incomplete.
    pub fn decode_bytes(data: &[u8], offset: &mut usize) -> Result<Bytes, DecodeError> {
        let length = Self::decode_uint(data, offset)?;
        Self::take(data, offset, length)
    }

    /// Decodes a nullable byte vector; `None` is NULL.
    ///
    /// # Errors
    /// Returns `DecodeError::UnexpectedEof` if data is incomplete.
    pub fn decode_nullable_bytes(
        data: &[u8],
        offset: &mut usize,
    ) -> Result<Option<Bytes>, DecodeError> {
        match Self::decode_nullable_uint(data, offset)? {
            Some(length) => Self::take(data, offset, length).map(Some),
            None => Ok(None),
        }
    }

    /// Decodes a length-prefixed UTF-8 string.
    ///
    /// # Errors
    /// Returns `DecodeError::InvalidString` if the content is not UTF-8.
    pub fn decode_unicode(data: &[u8], offset: &mut usize) -> Result<String, DecodeError> {
        let bytes = Self::decode_bytes(data, offset)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| DecodeError::InvalidString)
    }

    /// Decodes a nullable UTF-8 string; `None` is NULL.
    ///
    /// # Errors
    /// Returns `DecodeError::InvalidString` if the content is not UTF-8.
    pub fn decode_nullable_unicode(
        data: &[u8],
        offset: &mut usize,
    ) -> Result<Option<String>, DecodeError> {
        match Self::decode_nullable_bytes(data, offset)? {
            Some(bytes) => String::from_utf8(bytes.to_vec())
                .map(Some)
                .map_err(|_| DecodeError::InvalidString),
            None => Ok(None),
        }
    }

    fn checked_exponent(exponent: i64) -> Result<i32, DecodeError> {
        if (i64::from(MIN_EXPONENT)..=i64::from(MAX_EXPONENT)).contains(&exponent) {
            // range checked above
            Ok(exponent as i32)
        } else {
            Err(DecodeError::InvalidDecimal { exponent })
        }
    }

    /// Decodes a mandatory decimal.
    ///
    /// # Errors
    /// Returns `DecodeError::InvalidDecimal` if the exponent is out of range.
    pub fn decode_decimal(data: &[u8], offset: &mut usize) -> Result<Decimal, DecodeError> {
        let exponent = Self::checked_exponent(Self::decode_int(data, offset)?)?;
        let mantissa = Self::decode_int(data, offset)?;
        Ok(Decimal::new(mantissa, exponent))
    }

    /// Decodes a nullable decimal; `None` is NULL.
    ///
    /// # Errors
    /// Returns `DecodeError::InvalidDecimal` if the exponent is out of range.
    pub fn decode_nullable_decimal(
        data: &[u8],
        offset: &mut usize,
    ) -> Result<Option<Decimal>, DecodeError> {
        let Some(exponent) = Self::decode_nullable_int(data, offset)? else {
            return Ok(None);
        };
        let exponent = Self::checked_exponent(exponent)?;
        let mantissa = Self::decode_int(data, offset)?;
        Ok(Some(Decimal::new(mantissa, exponent)))
    }

    /// Decodes a presence map.
    ///
    /// # Errors
    /// Returns `DecodeError::UnexpectedEof` if data is incomplete.
    pub fn decode_pmap(data: &[u8], offset: &mut usize) -> Result<PresenceMap, DecodeError> {
        PresenceMap::decode(data, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_uint_single_byte() {
        let data = [0x81];
        let mut offset = 0;
        assert_eq!(FastDecoder::decode_uint(&data, &mut offset).unwrap(), 1);
        assert_eq!(offset, 1);
    }

    #[test]
    fn test_decode_uint_multi_byte() {
        // Redundant leading zero group.
        let data = [0x00, 0x81];
        let mut offset = 0;
        assert_eq!(FastDecoder::decode_uint(&data, &mut offset).unwrap(), 1);
        assert_eq!(offset, 2);
    }

    #[test]
    fn test_decode_uint_larger() {
        // 942 = 7 * 128 + 46
        let data = [0x07, 0xAE];
        let mut offset = 0;
        assert_eq!(FastDecoder::decode_uint(&data, &mut offset).unwrap(), 942);
    }

    #[test]
    fn test_decode_uint_overflow() {
        let data = [0x02, 0, 0, 0, 0, 0, 0, 0, 0, 0x80];
        let mut offset = 0;
        assert_eq!(
            FastDecoder::decode_uint(&data, &mut offset),
            Err(DecodeError::IntegerOverflow)
        );

        let mut offset = 0;
        assert_eq!(
            FastDecoder::decode_nullable_uint(&data, &mut offset).unwrap(),
            Some(u64::MAX)
        );
    }

    #[test]
    fn test_decode_uint_eof() {
        let data = [0x07];
        let mut offset = 0;
        assert_eq!(
            FastDecoder::decode_uint(&data, &mut offset),
            Err(DecodeError::UnexpectedEof)
        );
    }

    #[test]
    fn test_decode_int() {
        let mut offset = 0;
        assert_eq!(FastDecoder::decode_int(&[0x81], &mut offset).unwrap(), 1);
        let mut offset = 0;
        assert_eq!(FastDecoder::decode_int(&[0xFF], &mut offset).unwrap(), -1);
        let mut offset = 0;
        assert_eq!(FastDecoder::decode_int(&[0x00, 0xC0], &mut offset).unwrap(), 64);
    }

    #[test]
    fn test_decode_nullable_int() {
        let mut offset = 0;
        assert_eq!(
            FastDecoder::decode_nullable_int(&[0x80], &mut offset).unwrap(),
            None
        );
        let mut offset = 0;
        assert_eq!(
            FastDecoder::decode_nullable_int(&[0x81], &mut offset).unwrap(),
            Some(0)
        );
        let mut offset = 0;
        assert_eq!(
            FastDecoder::decode_nullable_int(&[0xFF], &mut offset).unwrap(),
            Some(-1)
        );
    }

    #[test]
    fn test_decode_ascii() {
        let data = [b'H', b'i', b'!' | 0x80];
        let mut offset = 0;
        assert_eq!(FastDecoder::decode_ascii(&data, &mut offset).unwrap(), "Hi!");
    }

    #[test]
    fn test_decode_ascii_special_forms() {
        let mut offset = 0;
        assert_eq!(FastDecoder::decode_ascii(&[0x80], &mut offset).unwrap(), "");
        let mut offset = 0;
        assert_eq!(
            FastDecoder::decode_ascii(&[0x00, 0x80], &mut offset).unwrap(),
            "\0"
        );
        let mut offset = 0;
        assert_eq!(
            FastDecoder::decode_nullable_ascii(&[0x80], &mut offset).unwrap(),
            None
        );
        let mut offset = 0;
        assert_eq!(
            FastDecoder::decode_nullable_ascii(&[0x00, 0x80], &mut offset).unwrap(),
            Some(String::new())
        );
        let mut offset = 0;
        assert_eq!(
            FastDecoder::decode_nullable_ascii(&[0x00, 0x00, 0x80], &mut offset).unwrap(),
            Some("\0".to_string())
        );
    }

    #[test]
    fn test_decode_ascii_leading_zero_is_data() {
        let mut offset = 0;
        assert_eq!(
            FastDecoder::decode_ascii(&[0x00, 0xC1], &mut offset).unwrap(),
            "\0A"
        );
        let mut offset = 0;
        assert_eq!(
            FastDecoder::decode_nullable_ascii(&[0x00, 0xC1], &mut offset).unwrap(),
            Some("\0A".to_string())
        );
    }

    #[test]
    fn test_decode_bytes() {
        let data = [0x83, 1, 2, 3];
        let mut offset = 0;
        assert_eq!(
            FastDecoder::decode_bytes(&data, &mut offset).unwrap(),
            Bytes::from_static(&[1, 2, 3])
        );
        assert_eq!(offset, 4);

        let mut offset = 0;
        assert_eq!(
            FastDecoder::decode_bytes(&[0x85, 1], &mut offset),
            Err(DecodeError::UnexpectedEof)
        );
    }

    #[test]
    fn test_decode_decimal() {
        let data = [0xFE, 0x07, 0xAE];
        let mut offset = 0;
        assert_eq!(
            FastDecoder::decode_decimal(&data, &mut offset).unwrap(),
            Decimal::new(942, -2)
        );

        let mut offset = 0;
        assert_eq!(
            FastDecoder::decode_decimal(&[0x00, 0xC0, 0x81], &mut offset),
            Err(DecodeError::InvalidDecimal { exponent: 64 })
        );
    }
}
