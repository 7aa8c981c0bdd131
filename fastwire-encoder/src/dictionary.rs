/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Operator state carried across messages.
//!
//! Every field with a stateful operator keeps its previous value in the
//! encoder's [`Dictionary`], under the key its instruction resolved to.

use bytes::Bytes;
use fastwire_core::{Decimal, EncodeError, FieldType};
use fastwire_schema::{DictionaryKey, FieldInstruction, InitialValue};
use std::collections::HashMap;

/// Previous value of a field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PreviousValue {
    /// No message has supplied a value yet.
    #[default]
    Undefined,
    /// The last message had the field absent.
    Empty,
    /// Signed integer value.
    Int(i64),
    /// Unsigned integer value.
    UInt(u64),
    /// Decimal value.
    Decimal(Decimal),
    /// String or byte vector value.
    Bytes(Bytes),
}

static UNDEFINED: PreviousValue = PreviousValue::Undefined;

impl PreviousValue {
    /// Returns true if no value has been recorded.
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Returns true if the field was last seen absent.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns true if a value is held.
    #[must_use]
    pub const fn is_assigned(&self) -> bool {
        !matches!(self, Self::Undefined | Self::Empty)
    }

    /// Returns the type default used when no initial value is declared.
    #[must_use]
    pub fn default_for(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Int32 | FieldType::Int64 => Self::Int(0),
            FieldType::UInt32 | FieldType::UInt64 => Self::UInt(0),
            FieldType::Decimal => Self::Decimal(Decimal::ZERO),
            FieldType::AsciiString | FieldType::UnicodeString | FieldType::ByteVector => {
                Self::Bytes(Bytes::new())
            }
        }
    }

    fn initial_or_default(instruction: &FieldInstruction) -> Self {
        match instruction.initial_value() {
            Some(initial) => Self::from(initial),
            None => Self::default_for(instruction.field_type()),
        }
    }
}

impl From<&InitialValue> for PreviousValue {
    fn from(value: &InitialValue) -> Self {
        match value {
            InitialValue::Int(v) => Self::Int(*v),
            InitialValue::UInt(v) => Self::UInt(*v),
            InitialValue::Decimal(v) => Self::Decimal(*v),
            InitialValue::Bytes(v) => Self::Bytes(v.clone()),
        }
    }
}

/// Prior state of one key, `None` if the key was not stored.
type JournalEntry = (DictionaryKey, Option<PreviousValue>);

/// Session-scoped store of previous values.
///
/// Changes made between [`begin`](Self::begin) and
/// [`commit`](Self::commit) can be undone with
/// [`rollback`](Self::rollback), so a message that fails to encode leaves
/// no trace.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: HashMap<DictionaryKey, PreviousValue>,
    journal: Option<Vec<JournalEntry>>,
}

impl Dictionary {
    /// Creates an empty dictionary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the previous value of a field, `Undefined` if none was saved.
    #[must_use]
    pub fn previous_value_of(&self, instruction: &FieldInstruction) -> &PreviousValue {
        self.entries
            .get(instruction.dictionary_key())
            .unwrap_or(&UNDEFINED)
    }

    /// Overwrites the previous value of a field.
    pub fn save(&mut self, instruction: &FieldInstruction, value: PreviousValue) {
        let key = instruction.dictionary_key();
        let old = self.entries.insert(key.clone(), value);
        if let Some(journal) = self.journal.as_mut() {
            journal.push((key.clone(), old));
        }
    }

    /// Starts recording changes so they can be rolled back.
    ///
    /// Changes recorded by an unfinished earlier `begin` are kept.
    pub fn begin(&mut self) {
        self.journal = Some(Vec::new());
    }

    /// Keeps every change since [`begin`](Self::begin).
    pub fn commit(&mut self) {
        self.journal = None;
    }

    /// Undoes every change since [`begin`](Self::begin), resets included.
    pub fn rollback(&mut self) {
        let Some(journal) = self.journal.take() else {
            return;
        };
        for (key, old) in journal.into_iter().rev() {
            match old {
                Some(value) => {
                    self.entries.insert(key, value);
                }
                None => {
                    self.entries.remove(&key);
                }
            }
        }
    }

    /// Returns the base value a delta is computed against.
    ///
    /// An undefined previous value falls back to the initial value, then to
    /// the type default.
    ///
    /// # Errors
    /// Returns `EncodeError::EmptyDeltaBase` when the previous value is empty.
    pub fn delta_base_value_of(
        &self,
        instruction: &FieldInstruction,
    ) -> Result<PreviousValue, EncodeError> {
        match self.previous_value_of(instruction) {
            PreviousValue::Undefined => Ok(PreviousValue::initial_or_default(instruction)),
            PreviousValue::Empty => Err(EncodeError::EmptyDeltaBase {
                name: instruction.name().to_string(),
            }),
            assigned => Ok(assigned.clone()),
        }
    }

    /// Returns the base value a tail is applied to.
    ///
    /// Undefined and empty previous values both fall back to the initial
    /// value, then to the type default.
    #[must_use]
    pub fn tail_base_value_of(&self, instruction: &FieldInstruction) -> PreviousValue {
        match self.previous_value_of(instruction) {
            PreviousValue::Undefined | PreviousValue::Empty => {
                PreviousValue::initial_or_default(instruction)
            }
            assigned => assigned.clone(),
        }
    }

    /// Returns the stored value for a key.
    #[must_use]
    pub fn get(&self, key: &DictionaryKey) -> Option<&PreviousValue> {
        self.entries.get(key)
    }

    /// Forgets every previous value.
    pub fn reset(&mut self) {
        match self.journal.as_mut() {
            Some(journal) => journal.extend(
                self.entries
                    .drain()
                    .map(|(key, value)| (key, Some(value))),
            ),
            None => self.entries.clear(),
        }
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
