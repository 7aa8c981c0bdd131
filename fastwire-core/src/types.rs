/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Scaled decimal type used by FAST decimal fields.
//!
//! A FAST decimal is a pair of integers: a signed 64-bit mantissa and a
//! base-10 exponent restricted to `-63..=63`. The value is
//! `mantissa * 10^exponent`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest exponent representable on the wire.
pub const MIN_EXPONENT: i32 = -63;

/// Largest exponent representable on the wire.
pub const MAX_EXPONENT: i32 = 63;

/// FAST scaled decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Decimal {
    mantissa: i64,
    exponent: i32,
}

impl Decimal {
    /// Zero with a zero exponent, the default delta base for decimals.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a decimal from its mantissa and exponent.
    ///
    /// The exponent is not range-checked here; the stream rejects values
    /// outside [`MIN_EXPONENT`]..=[`MAX_EXPONENT`] when they are written.
    #[inline]
    #[must_use]
    pub const fn new(mantissa: i64, exponent: i32) -> Self {
        Self { mantissa, exponent }
    }

    /// Returns the mantissa.
    #[inline]
    #[must_use]
    pub const fn mantissa(&self) -> i64 {
        self.mantissa
    }

    /// Returns the exponent.
    #[inline]
    #[must_use]
    pub const fn exponent(&self) -> i32 {
        self.exponent
    }

    /// Returns true if the exponent can be carried on the wire.
    #[inline]
    #[must_use]
    pub const fn has_valid_exponent(&self) -> bool {
        self.exponent >= MIN_EXPONENT && self.exponent <= MAX_EXPONENT
    }

    /// Converts to a [`rust_decimal::Decimal`].
    ///
    /// Returns `None` when the value is outside the range of `rust_decimal`
    /// (more than 28 fractional digits or an overflowing positive exponent).
    #[must_use]
    pub fn to_rust_decimal(&self) -> Option<rust_decimal::Decimal> {
        if self.exponent <= 0 {
            let scale = self.exponent.unsigned_abs();
            rust_decimal::Decimal::try_from_i128_with_scale(i128::from(self.mantissa), scale).ok()
        } else {
            let mut value = rust_decimal::Decimal::from(self.mantissa);
            for _ in 0..self.exponent {
                value = value.checked_mul(rust_decimal::Decimal::TEN)?;
            }
            Some(value)
        }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}E{}", self.mantissa, self.exponent)
    }
}

impl TryFrom<rust_decimal::Decimal> for Decimal {
    type Error = rust_decimal::Decimal;

    /// Converts a `rust_decimal` value, normalizing trailing zeros away.
    ///
    /// The original value is returned as the error when its mantissa does not
    /// fit in 64 bits.
    fn try_from(value: rust_decimal::Decimal) -> Result<Self, Self::Error> {
        let normalized = value.normalize();
        let mantissa = i64::try_from(normalized.mantissa()).map_err(|_| value)?;
        // scale is at most 28
        let exponent = -(normalized.scale() as i32);
        Ok(Self::new(mantissa, exponent))
    }
}
