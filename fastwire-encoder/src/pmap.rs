/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! FAST presence map handling.
//!
//! The presence map (PMAP) is a bitmap that indicates which fields carry a
//! value in the stream. It uses stop-bit encoding where the high bit of each
//! byte marks the last byte, and the remaining 7 bits hold map bits from the
//! most significant down.

use fastwire_core::DecodeError;
use smallvec::SmallVec;

const STOP_BIT: u8 = 0x80;
const BITS_PER_BYTE: usize = 7;

/// Presence map being built while a message is encoded.
///
/// Operators append bits in field order with [`set_next_bit`](Self::set_next_bit).
#[derive(Debug, Clone, Default)]
pub struct PresenceMapEncoder {
    bits: SmallVec<[bool; 32]>,
}

impl PresenceMapEncoder {
    /// Creates an empty presence map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the next bit.
    #[inline]
    pub fn set_next_bit(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Returns the bit at the specified position.
    #[must_use]
    pub fn bit(&self, index: usize) -> bool {
        self.bits.get(index).copied().unwrap_or(false)
    }

    /// Returns the number of bits appended.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Returns true if no bit has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Clears the map for the next message.
    pub fn clear(&mut self) {
        self.bits.clear();
    }

    /// Encodes the presence map to bytes.
    ///
    /// Trailing bytes with no bit set are dropped, since a decoder reads
    /// missing bits as zero. At least one byte is always produced.
    #[must_use]
    pub fn encode(&self) -> SmallVec<[u8; 8]> {
        let mut result: SmallVec<[u8; 8]> = self
            .bits
            .chunks(BITS_PER_BYTE)
            .map(|chunk| {
                chunk.iter().enumerate().fold(0u8, |byte, (i, &bit)| {
                    if bit {
                        byte | (1 << (BITS_PER_BYTE - 1 - i))
                    } else {
                        byte
                    }
                })
            })
            .collect();

        while result.len() > 1 && result.last() == Some(&0) {
            result.pop();
        }
        match result.last_mut() {
            Some(last) => *last |= STOP_BIT,
            None => result.push(STOP_BIT),
        }
        result
    }
}

/// Decoded FAST presence map.
///
/// Bits are consumed in order as fields are read.
#[derive(Debug, Clone, Default)]
pub struct PresenceMap {
    /// The raw bits of the presence map.
    bits: Vec<bool>,
    /// Current bit position.
    position: usize,
}

impl PresenceMap {
    /// Creates a presence map from raw bits.
    #[must_use]
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits, position: 0 }
    }

    /// Decodes a presence map from a byte slice.
    ///
    /// # Arguments
    /// * `data` - The input bytes
    /// * `offset` - Current position in the data (will be updated)
    ///
    /// # Errors
    /// Returns `DecodeError::UnexpectedEof` if the data ends before a byte
    /// with the stop bit.
    pub fn decode(data: &[u8], offset: &mut usize) -> Result<Self, DecodeError> {
        let mut bits = Vec::new();

        loop {
            let byte = *data.get(*offset).ok_or(DecodeError::UnexpectedEof)?;
            *offset += 1;

            for i in (0..BITS_PER_BYTE).rev() {
                bits.push((byte >> i) & 1 == 1);
            }

            if byte & STOP_BIT != 0 {
                break;
            }
        }

        Ok(Self { bits, position: 0 })
    }

    /// Returns the next bit, or `false` once the map is exhausted.
    #[inline]
    pub fn next_bit(&mut self) -> bool {
        let bit = self.bit(self.position);
        self.position += 1;
        bit
    }

    /// Returns the bit at the specified position without consuming it.
    #[must_use]
    pub fn bit(&self, index: usize) -> bool {
        self.bits.get(index).copied().unwrap_or(false)
    }

    /// Returns the number of bits in the presence map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Returns true if the presence map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Returns the current position in the presence map.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(bits: &[bool]) -> Vec<u8> {
        let mut pmap = PresenceMapEncoder::new();
        for &bit in bits {
            pmap.set_next_bit(bit);
        }
        pmap.encode().to_vec()
    }

    #[test]
    fn test_presence_map_encode() {
        assert_eq!(
            encoded(&[true, true, false, false, false, false, false]),
            vec![0b1110_0000]
        );
        assert_eq!(encoded(&[true, false, true]), vec![0b1101_0000]);
    }

    #[test]
    fn test_presence_map_encode_empty() {
        assert_eq!(encoded(&[]), vec![0x80]);
        assert_eq!(encoded(&[false, false]), vec![0x80]);
    }

    #[test]
    fn test_presence_map_encode_multi_byte() {
        let mut bits = vec![false; 8];
        bits[0] = true;
        bits[7] = true;
        assert_eq!(encoded(&bits), vec![0b0100_0000, 0b1100_0000]);
    }

    #[test]
    fn test_presence_map_encode_trims_trailing_zero_bytes() {
        let mut bits = vec![false; 20];
        bits[1] = true;
        assert_eq!(encoded(&bits), vec![0b1010_0000]);
    }

    #[test]
    fn test_presence_map_decode_single_byte() {
        // Stop bit set, data bits 100_0000.
        let data = [0b1100_0000];
        let mut offset = 0;
        let pmap = PresenceMap::decode(&data, &mut offset).unwrap();

        assert_eq!(offset, 1);
        assert_eq!(pmap.len(), 7);
        assert!(pmap.bit(0));
        assert!(!pmap.bit(1));
        assert!(!pmap.bit(2));
    }

    #[test]
    fn test_presence_map_decode_multi_byte() {
        let data = [0b0100_0000, 0b1000_0000];
        let mut offset = 0;
        let pmap = PresenceMap::decode(&data, &mut offset).unwrap();

        assert_eq!(offset, 2);
        assert_eq!(pmap.len(), 14);
    }

    #[test]
    fn test_presence_map_decode_eof() {
        let data = [0b0100_0000];
        let mut offset = 0;
        assert_eq!(
            PresenceMap::decode(&data, &mut offset).unwrap_err(),
            DecodeError::UnexpectedEof
        );
    }

    #[test]
    fn test_presence_map_next_bit() {
        let mut pmap = PresenceMap::from_bits(vec![true, false, true]);

        assert!(pmap.next_bit());
        assert!(!pmap.next_bit());
        assert!(pmap.next_bit());
        assert!(!pmap.next_bit());
        assert_eq!(pmap.position(), 4);
    }

    #[test]
    fn test_presence_map_round_trip() {
        let bits = [true, false, false, true, true, false, true, false, true];
        let bytes = encoded(&bits);
        let mut offset = 0;
        let mut pmap = PresenceMap::decode(&bytes, &mut offset).unwrap();
        for &bit in &bits {
            assert_eq!(pmap.next_bit(), bit);
        }
    }
}
