/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! FAST field operators, presence and dictionary scopes.
//!
//! Operators define how field values are encoded relative to the previous
//! value held in the encoder's dictionary.

use fastwire_core::FieldType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// FAST field operator types.
///
/// The declaration order matches the operator table used by the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// No operator - value is always present in stream.
    #[default]
    None,
    /// Constant - value is never in stream, always uses initial value.
    Constant,
    /// Delta - value in stream is delta from previous value.
    Delta,
    /// Default - if absent, use initial value.
    Default,
    /// Copy - if absent, use previous value from dictionary.
    Copy,
    /// Increment - if absent, increment previous value by 1.
    Increment,
    /// Tail - value in stream replaces tail of previous value.
    Tail,
}

impl Operator {
    /// All operators in table order.
    pub const ALL: [Self; 7] = [
        Self::None,
        Self::Constant,
        Self::Delta,
        Self::Default,
        Self::Copy,
        Self::Increment,
        Self::Tail,
    ];

    /// Returns the operator name used in FAST templates.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Constant => "constant",
            Self::Delta => "delta",
            Self::Default => "default",
            Self::Copy => "copy",
            Self::Increment => "increment",
            Self::Tail => "tail",
        }
    }

    /// Returns true if this operator has an encoding for `field_type`.
    ///
    /// Increment is defined for integers only and tail for strings and
    /// byte vectors only.
    #[must_use]
    pub const fn supports(&self, field_type: FieldType) -> bool {
        match self {
            Self::Increment => field_type.is_integer(),
            Self::Tail => field_type.is_string_like(),
            _ => true,
        }
    }

    /// Returns the number of presence map bits one field occupies.
    #[must_use]
    pub const fn pmap_bits(&self, presence: Presence) -> usize {
        match self {
            Self::None | Self::Delta => 0,
            Self::Constant => match presence {
                Presence::Mandatory => 0,
                Presence::Optional => 1,
            },
            Self::Default | Self::Copy | Self::Increment | Self::Tail => 1,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Operator {
    type Err = String;

    /// Parses an operator from its template element name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown operator: {}", s))
    }
}

/// Field presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    /// The field always has a value.
    #[default]
    Mandatory,
    /// The field may be absent.
    Optional,
}

/// Dictionary scope for operator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DictionaryScope {
    /// Global dictionary shared across all templates.
    #[default]
    Global,
    /// Template-specific dictionary.
    Template,
    /// Application-type-specific dictionary.
    Type,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_supports() {
        for op in Operator::ALL {
            assert!(op.supports(FieldType::AsciiString) || op == Operator::Increment);
        }
        assert!(Operator::Increment.supports(FieldType::UInt32));
        assert!(!Operator::Increment.supports(FieldType::Decimal));
        assert!(!Operator::Increment.supports(FieldType::ByteVector));
        assert!(Operator::Tail.supports(FieldType::UnicodeString));
        assert!(!Operator::Tail.supports(FieldType::Int64));
        assert!(Operator::Delta.supports(FieldType::Decimal));
    }

    #[test]
    fn test_operator_pmap_bits() {
        assert_eq!(Operator::None.pmap_bits(Presence::Optional), 0);
        assert_eq!(Operator::Delta.pmap_bits(Presence::Optional), 0);
        assert_eq!(Operator::Constant.pmap_bits(Presence::Mandatory), 0);
        assert_eq!(Operator::Constant.pmap_bits(Presence::Optional), 1);
        assert_eq!(Operator::Copy.pmap_bits(Presence::Mandatory), 1);
        assert_eq!(Operator::Tail.pmap_bits(Presence::Optional), 1);
    }

    #[test]
    fn test_operator_from_str() {
        assert_eq!("copy".parse::<Operator>().unwrap(), Operator::Copy);
        assert_eq!("Increment".parse::<Operator>().unwrap(), Operator::Increment);
        assert!("xor".parse::<Operator>().is_err());
    }

    #[test]
    fn test_operator_table_order() {
        assert_eq!(Operator::ALL[0], Operator::None);
        assert_eq!(Operator::ALL[2], Operator::Delta);
        assert_eq!(Operator::ALL[6], Operator::Tail);
    }
}
