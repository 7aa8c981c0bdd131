/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Schema definitions for FAST templates.
//!
//! This module defines the immutable descriptors the encoder consumes:
//! - [`InitialValue`]: Initial value declared on a field operator
//! - [`DictionaryKey`]: Resolved key of a field's previous value
//! - [`FieldInstruction`]: One scalar field with its operator and presence
//! - [`DecimalOperators`]: Individual exponent/mantissa instructions
//! - [`Template`]: An ordered list of field instructions with an identifier

use crate::operator::{DictionaryScope, Operator, Presence};
use bytes::Bytes;
use fastwire_core::{Decimal, FieldType, SchemaError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

/// Initial value of a field operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitialValue {
    /// Signed integer (for `int32` and `int64` fields).
    Int(i64),
    /// Unsigned integer (for `uInt32` and `uInt64` fields).
    UInt(u64),
    /// Decimal value.
    Decimal(Decimal),
    /// String or byte vector content.
    Bytes(Bytes),
}

impl InitialValue {
    /// Creates a string initial value.
    #[must_use]
    pub fn string(value: &str) -> Self {
        Self::Bytes(Bytes::copy_from_slice(value.as_bytes()))
    }

    /// Returns true if this value can be held by a field of `field_type`.
    #[must_use]
    pub fn fits(&self, field_type: FieldType) -> bool {
        match (self, field_type) {
            (Self::Int(v), FieldType::Int32) => i32::try_from(*v).is_ok(),
            (Self::Int(_), FieldType::Int64) => true,
            (Self::UInt(v), FieldType::UInt32) => u32::try_from(*v).is_ok(),
            (Self::UInt(_), FieldType::UInt64) => true,
            (Self::Decimal(d), FieldType::Decimal) => d.has_valid_exponent(),
            (Self::Bytes(b), FieldType::AsciiString) => b.is_ascii(),
            (Self::Bytes(b), FieldType::UnicodeString) => std::str::from_utf8(b).is_ok(),
            (Self::Bytes(_), FieldType::ByteVector) => true,
            _ => false,
        }
    }
}

/// Key under which a field's previous value is kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DictionaryKey {
    /// Key in the global dictionary.
    Global(String),
    /// Key in the dictionary of one template.
    Template(u32, String),
    /// Key in the dictionary of one application type.
    Type(String, String),
}

impl DictionaryKey {
    fn resolve(scope: DictionaryScope, key: &str, owner: Option<(u32, &str)>) -> Self {
        match (scope, owner) {
            (DictionaryScope::Template, Some((template_id, _))) => {
                Self::Template(template_id, key.to_string())
            }
            (DictionaryScope::Type, Some((_, type_name))) => {
                Self::Type(type_name.to_string(), key.to_string())
            }
            _ => Self::Global(key.to_string()),
        }
    }
}

/// Instruction for one scalar field.
///
/// Instructions are built with the `with_*` methods, then compiled into a
/// [`Template`], which validates them and resolves their dictionary keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInstruction {
    name: String,
    id: Option<u32>,
    field_type: FieldType,
    presence: Presence,
    operator: Operator,
    initial_value: Option<InitialValue>,
    scope: DictionaryScope,
    key: String,
    dictionary_key: DictionaryKey,
    decimal_operators: Option<Box<DecimalOperators>>,
}

/// Individually operated exponent and mantissa of a decimal field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecimalOperators {
    exponent: FieldInstruction,
    mantissa: FieldInstruction,
}

impl DecimalOperators {
    /// Returns the exponent instruction (`int32`, presence of the decimal).
    #[must_use]
    pub const fn exponent(&self) -> &FieldInstruction {
        &self.exponent
    }

    /// Returns the mantissa instruction (mandatory `int64`).
    #[must_use]
    pub const fn mantissa(&self) -> &FieldInstruction {
        &self.mantissa
    }
}

impl FieldInstruction {
    /// Creates a mandatory field without an operator.
    ///
    /// # Arguments
    /// * `name` - The field name, also the default dictionary key
    /// * `field_type` - The FAST primitive type
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        Self {
            dictionary_key: DictionaryKey::Global(name.clone()),
            key: name.clone(),
            name,
            id: None,
            field_type,
            presence: Presence::Mandatory,
            operator: Operator::None,
            initial_value: None,
            scope: DictionaryScope::Global,
            decimal_operators: None,
        }
    }

    /// Sets the field id (the FIX tag number).
    #[must_use]
    pub const fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the field presence.
    #[must_use]
    pub fn with_presence(mut self, presence: Presence) -> Self {
        self.presence = presence;
        self.refresh(None);
        self
    }

    /// Marks the field as optional.
    #[must_use]
    pub fn optional(self) -> Self {
        self.with_presence(Presence::Optional)
    }

    /// Sets the field operator.
    ///
    /// On a decimal with individual operators this is the exponent operator.
    #[must_use]
    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = operator;
        if let Some(operators) = self.decimal_operators.as_deref_mut() {
            operators.exponent.operator = operator;
        }
        self
    }

    /// Sets the operator's initial value.
    #[must_use]
    pub fn with_initial_value(mut self, value: InitialValue) -> Self {
        self.initial_value = Some(value);
        self
    }

    /// Sets the dictionary scope.
    #[must_use]
    pub fn with_scope(mut self, scope: DictionaryScope) -> Self {
        self.scope = scope;
        self.refresh(None);
        self
    }

    /// Sets the dictionary key, which defaults to the field name.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self.refresh(None);
        self
    }

    /// Gives the exponent of a decimal field its own operator.
    ///
    /// The decimal is then dispatched through this operator. The mantissa
    /// keeps no operator unless
    /// [`with_mantissa_operator`](Self::with_mantissa_operator) is also used.
    #[must_use]
    pub fn with_exponent_operator(mut self, operator: Operator, initial: Option<i32>) -> Self {
        let mut operators = self.take_decimal_operators();
        self.operator = operator;
        operators.exponent.operator = operator;
        operators.exponent.initial_value = initial.map(|v| InitialValue::Int(i64::from(v)));
        self.decimal_operators = Some(Box::new(operators));
        self.refresh(None);
        self
    }

    /// Gives the mantissa of a decimal field its own operator.
    #[must_use]
    pub fn with_mantissa_operator(mut self, operator: Operator, initial: Option<i64>) -> Self {
        let mut operators = self.take_decimal_operators();
        operators.mantissa.operator = operator;
        operators.mantissa.initial_value = initial.map(InitialValue::Int);
        self.decimal_operators = Some(Box::new(operators));
        self.refresh(None);
        self
    }

    fn take_decimal_operators(&mut self) -> DecimalOperators {
        match self.decimal_operators.take() {
            Some(operators) => *operators,
            None => DecimalOperators {
                exponent: Self::new(format!("{}.exponent", self.name), FieldType::Int32)
                    .with_operator(self.operator),
                mantissa: Self::new(format!("{}.mantissa", self.name), FieldType::Int64),
            },
        }
    }

    /// Recomputes the dictionary key and the sub-field instructions.
    fn refresh(&mut self, owner: Option<(u32, &str)>) {
        self.dictionary_key = DictionaryKey::resolve(self.scope, &self.key, owner);
        if let Some(operators) = self.decimal_operators.as_deref_mut() {
            operators.exponent.presence = self.presence;
            operators.exponent.scope = self.scope;
            operators.exponent.key = format!("{}.exponent", self.key);
            operators.exponent.refresh(owner);

            operators.mantissa.presence = Presence::Mandatory;
            operators.mantissa.scope = self.scope;
            operators.mantissa.key = format!("{}.mantissa", self.key);
            operators.mantissa.refresh(owner);
        }
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the field id, if any.
    #[must_use]
    pub const fn id(&self) -> Option<u32> {
        self.id
    }

    /// Returns the field type.
    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Returns the field presence.
    #[must_use]
    pub const fn presence(&self) -> Presence {
        self.presence
    }

    /// Returns the field operator.
    #[must_use]
    pub const fn operator(&self) -> Operator {
        self.operator
    }

    /// Returns the initial value, if declared.
    #[must_use]
    pub const fn initial_value(&self) -> Option<&InitialValue> {
        self.initial_value.as_ref()
    }

    /// Returns true if an initial value is declared.
    #[must_use]
    pub const fn has_initial_value(&self) -> bool {
        self.initial_value.is_some()
    }

    /// Returns true if the field is optional.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        matches!(self.presence, Presence::Optional)
    }

    /// Returns true if the field is mandatory.
    #[must_use]
    pub const fn is_mandatory(&self) -> bool {
        matches!(self.presence, Presence::Mandatory)
    }

    /// Returns true if values use the nullable representation.
    ///
    /// Optional fields are nullable unless their operator is constant, in
    /// which case presence travels in the presence map.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.is_optional() && !matches!(self.operator, Operator::Constant)
    }

    /// Returns the dictionary scope.
    #[must_use]
    pub const fn scope(&self) -> DictionaryScope {
        self.scope
    }

    /// Returns the resolved dictionary key.
    #[must_use]
    pub const fn dictionary_key(&self) -> &DictionaryKey {
        &self.dictionary_key
    }

    /// Returns the individual exponent/mantissa instructions, if any.
    #[must_use]
    pub fn decimal_operators(&self) -> Option<&DecimalOperators> {
        self.decimal_operators.as_deref()
    }

    /// Returns true if the exponent and mantissa have their own operators.
    #[must_use]
    pub const fn has_individual_operators(&self) -> bool {
        self.decimal_operators.is_some()
    }

    /// Returns the maximum number of presence map bits this field can use.
    #[must_use]
    pub fn presence_bits(&self) -> usize {
        match self.decimal_operators() {
            Some(operators) => {
                operators.exponent.presence_bits() + operators.mantissa.presence_bits()
            }
            None => self.operator.pmap_bits(self.presence),
        }
    }

    /// Validates the instruction.
    ///
    /// # Errors
    /// Returns a [`SchemaError`] if the operator does not apply to the type,
    /// a required initial value is missing, the initial value does not fit the
    /// type, or individual decimal operators are malformed.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if let Some(operators) = self.decimal_operators() {
            if self.field_type != FieldType::Decimal {
                return Err(SchemaError::InvalidDecimalOperators {
                    name: self.name.clone(),
                    reason: format!("{} field cannot split exponent and mantissa", self.field_type),
                });
            }
            operators.exponent.validate()?;
            return operators.mantissa.validate();
        }

        if !self.operator.supports(self.field_type) {
            return Err(SchemaError::UnsupportedOperator {
                name: self.name.clone(),
                operator: self.operator.to_string(),
                field_type: self.field_type,
            });
        }

        let needs_initial = match self.operator {
            Operator::Constant => true,
            Operator::Default => self.is_mandatory(),
            _ => false,
        };
        if needs_initial && self.initial_value.is_none() {
            return Err(SchemaError::MissingInitialValue {
                name: self.name.clone(),
                operator: self.operator.to_string(),
            });
        }

        match &self.initial_value {
            Some(initial) if !initial.fits(self.field_type) => {
                Err(SchemaError::InitialValueMismatch {
                    name: self.name.clone(),
                    field_type: self.field_type,
                })
            }
            _ => Ok(()),
        }
    }

    fn bind(&mut self, template_id: u32, type_name: &str) {
        self.refresh(Some((template_id, type_name)));
    }
}

/// Compiled FAST template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    id: u32,
    name: String,
    type_name: String,
    reset: bool,
    fields: Vec<FieldInstruction>,
}

impl Template {
    /// Returns the template identifier.
    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Returns the template name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the application type name used for type-scoped keys.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns true if the dictionary is reset before each message.
    #[must_use]
    pub const fn reset(&self) -> bool {
        self.reset
    }

    /// Returns the field instructions in encoding order.
    #[must_use]
    pub fn fields(&self) -> &[FieldInstruction] {
        &self.fields
    }

    /// Gets a field instruction by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldInstruction> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the template has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the maximum number of presence map bits the fields can use,
    /// not counting the template identifier bit.
    #[must_use]
    pub fn presence_bits(&self) -> usize {
        self.fields.iter().map(FieldInstruction::presence_bits).sum()
    }
}

/// Builder for templates.
#[derive(Debug, Default)]
pub struct TemplateBuilder {
    id: u32,
    name: String,
    type_name: Option<String>,
    reset: bool,
    fields: Vec<FieldInstruction>,
}

impl TemplateBuilder {
    /// Creates a new builder.
    ///
    /// # Arguments
    /// * `id` - The template identifier carried on the wire
    /// * `name` - The template name
    #[must_use]
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the application type name, which defaults to the template name.
    #[must_use]
    pub fn type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Sets whether the dictionary is reset before each message.
    #[must_use]
    pub const fn reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }

    /// Appends a field.
    #[must_use]
    pub fn field(mut self, field: FieldInstruction) -> Self {
        self.fields.push(field);
        self
    }

    /// Validates every field and resolves dictionary keys.
    ///
    /// # Errors
    /// Returns the first [`SchemaError`] found.
    pub fn build(self) -> Result<Template, SchemaError> {
        let type_name = self.type_name.unwrap_or_else(|| self.name.clone());
        let mut fields = self.fields;
        let mut seen = HashSet::new();

        for field in &mut fields {
            if !seen.insert(field.name().to_string()) {
                warn!(template_id = self.id, field = field.name(), "duplicate field");
                return Err(SchemaError::DuplicateField {
                    template_id: self.id,
                    name: field.name().to_string(),
                });
            }
            if let Err(err) = field.validate() {
                warn!(template_id = self.id, error = %err, "rejected template");
                return Err(err);
            }
            field.bind(self.id, &type_name);
        }

        Ok(Template {
            id: self.id,
            name: self.name,
            type_name,
            reset: self.reset,
            fields,
        })
    }
}
