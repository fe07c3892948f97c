use std::collections::{BTreeMap, BTreeSet};
use std::sync::mpsc::Receiver;

use tracing::debug;

use super::engine::{ValidationResult, Validator};
use super::rule::{FieldValue, ValidationRule};
use crate::observer::Subscribers;

/// A field value together with the rules it must satisfy
#[derive(Debug, Clone, Default)]
pub struct FormField {
    pub value: FieldValue,
    pub rules: Vec<ValidationRule>,
}

impl FormField {
    pub fn new(value: impl Into<FieldValue>, rules: Vec<ValidationRule>) -> Self {
        Self {
            value: value.into(),
            rules,
        }
    }
}

/// Fields of a form in insertion order
#[derive(Debug, Clone, Default)]
pub struct Form {
    fields: Vec<(String, FormField)>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing (in place) any field with the same name
    pub fn field(mut self, name: impl Into<String>, value: impl Into<FieldValue>, rules: Vec<ValidationRule>) -> Self {
        self.insert(name, FormField::new(value, rules));
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, field: FormField) {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = field,
            None => self.fields.push((name, field)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|(existing, _)| existing == name).map(|(_, field)| field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormField)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Change notifications published by [`FormValidation`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    ErrorsChanged { field: String },
    ErrorsCleared,
    Touched { field: String },
    Dirty { field: String },
    Reset,
}

/// Per-form validation state: stored errors plus touched and dirty flags.
///
/// A field present in the error map always has at least one message.
/// Touched and dirty flags only ever go from unset to set; [`reset`]
/// is the one way back.
///
/// [`reset`]: FormValidation::reset
#[derive(Debug, Default)]
pub struct FormValidation {
    validator: Validator,
    errors: BTreeMap<String, Vec<String>>,
    touched: BTreeSet<String>,
    dirty: BTreeSet<String>,
    subscribers: Subscribers<FormEvent>,
}

impl FormValidation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_validator(validator: Validator) -> Self {
        Self {
            validator,
            ..Self::default()
        }
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn subscribe(&mut self) -> Receiver<FormEvent> {
        self.subscribers.subscribe()
    }

    /// Validate one field without touching the stored state
    pub fn validate_field(&self, field_name: &str, value: &FieldValue, rules: &[ValidationRule]) -> ValidationResult {
        self.validator.validate_field(field_name, value, rules)
    }

    /// Validate one field and store or clear its errors
    pub fn validate_single(&mut self, field_name: &str, value: &FieldValue, rules: &[ValidationRule]) -> ValidationResult {
        let result = self.validate_field(field_name, value, rules);
        self.set_field_error(field_name, result.errors.clone());
        result
    }

    /// Re-validate every field from scratch.
    ///
    /// Returns true when no field has a stored error afterwards.
    pub fn validate_form(&mut self, form: &Form) -> bool {
        self.clear_all_errors();

        for (name, field) in form.iter() {
            let result = self.validate_field(name, &field.value, &field.rules);
            self.set_field_error(name, result.errors);
        }

        debug!(fields = form.len(), invalid = self.errors.len(), "form validated");
        self.is_valid()
    }

    /// Store errors for a field; an empty list removes the entry
    pub fn set_field_error(&mut self, field_name: &str, errors: Vec<String>) {
        let changed = if errors.is_empty() {
            self.errors.remove(field_name).is_some()
        } else {
            self.errors.insert(field_name.to_string(), errors);
            true
        };

        if changed {
            self.subscribers.publish(FormEvent::ErrorsChanged {
                field: field_name.to_string(),
            });
        }
    }

    pub fn clear_field_error(&mut self, field_name: &str) {
        self.set_field_error(field_name, Vec::new());
    }

    pub fn clear_all_errors(&mut self) {
        if !self.errors.is_empty() {
            self.errors.clear();
            self.subscribers.publish(FormEvent::ErrorsCleared);
        }
    }

    pub fn mark_field_as_touched(&mut self, field_name: &str) {
        if self.touched.insert(field_name.to_string()) {
            self.subscribers.publish(FormEvent::Touched {
                field: field_name.to_string(),
            });
        }
    }

    pub fn mark_field_as_dirty(&mut self, field_name: &str) {
        if self.dirty.insert(field_name.to_string()) {
            self.subscribers.publish(FormEvent::Dirty {
                field: field_name.to_string(),
            });
        }
    }

    /// Forget all errors, touched and dirty flags
    pub fn reset(&mut self) {
        self.errors.clear();
        self.touched.clear();
        self.dirty.clear();
        self.subscribers.publish(FormEvent::Reset);
    }

    pub fn field_errors(&self, field_name: &str) -> &[String] {
        self.errors.get(field_name).map(Vec::as_slice).unwrap_or_default()
    }

    /// First stored message for the field, or an empty string
    pub fn field_error_message(&self, field_name: &str) -> &str {
        self.field_errors(field_name).first().map(String::as_str).unwrap_or("")
    }

    pub fn is_field_touched(&self, field_name: &str) -> bool {
        self.touched.contains(field_name)
    }

    pub fn is_field_dirty(&self, field_name: &str) -> bool {
        self.dirty.contains(field_name)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }
}
