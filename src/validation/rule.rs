use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::validators;

/// A form field value.
///
/// `Null` doubles as the representation of an absent value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Null, or text that is empty once trimmed
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::Bool(_) | FieldValue::Number(_) => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Bool(value) => write!(f, "{}", value),
            FieldValue::Number(value) => write!(f, "{}", value),
            FieldValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

/// Outcome of a custom check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    /// Failed; reported with the rule's message or the default one
    Invalid,
    /// Failed with this exact message
    Message(String),
}

impl From<bool> for Verdict {
    fn from(valid: bool) -> Self {
        if valid {
            Verdict::Valid
        } else {
            Verdict::Invalid
        }
    }
}

impl From<String> for Verdict {
    fn from(message: String) -> Self {
        Verdict::Message(message)
    }
}

impl From<&str> for Verdict {
    fn from(message: &str) -> Self {
        Verdict::Message(message.to_string())
    }
}

/// Type alias for custom check functions
pub type CustomCheck = Arc<dyn Fn(&FieldValue) -> anyhow::Result<Verdict> + Send + Sync>;

/// A constraint set applied to one field value.
///
/// Built once through the consuming builder methods and immutable afterwards.
#[derive(Clone, Default)]
pub struct ValidationRule {
    pub(crate) required: bool,
    pub(crate) min_length: Option<usize>,
    pub(crate) max_length: Option<usize>,
    pub(crate) pattern: Option<Regex>,
    pub(crate) custom: Option<CustomCheck>,
    pub(crate) message: Option<String>,
}

impl fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationRule")
            .field("required", &self.required)
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("pattern", &self.pattern.as_ref().map(Regex::as_str))
            .field("custom", &self.custom.is_some())
            .field("message", &self.message)
            .finish()
    }
}

impl ValidationRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Minimum character count; zero disables the check
    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Maximum character count; zero disables the check
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Attach an infallible custom check returning anything convertible to
    /// a [`Verdict`], such as `bool` or a message `String`.
    pub fn custom<F, V>(mut self, check: F) -> Self
    where
        F: Fn(&FieldValue) -> V + Send + Sync + 'static,
        V: Into<Verdict>,
    {
        self.custom = Some(Arc::new(move |value: &FieldValue| -> anyhow::Result<Verdict> {
            Ok(check(value).into())
        }));
        self
    }

    /// Attach a custom check that may fail to run.
    ///
    /// An `Err` is reported on the field with a generic message.
    pub fn try_custom<F>(mut self, check: F) -> Self
    where
        F: Fn(&FieldValue) -> anyhow::Result<Verdict> + Send + Sync + 'static,
    {
        self.custom = Some(Arc::new(check));
        self
    }

    /// Override text used for every failure this rule reports
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn email() -> Self {
        Self::new().custom(|value: &FieldValue| validators::is_valid_email(&value.to_string()))
    }

    pub fn phone() -> Self {
        Self::new().custom(|value: &FieldValue| validators::is_valid_phone(&value.to_string()))
    }

    pub fn url() -> Self {
        Self::new().custom(|value: &FieldValue| validators::is_valid_url(&value.to_string()))
    }

    pub fn is_required(&self) -> bool {
        self.required
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_emptiness() {
        assert!(FieldValue::Null.is_empty());
        assert!(FieldValue::from("   ").is_empty());
        assert!(!FieldValue::from("a").is_empty());
        assert!(!FieldValue::from(0i64).is_empty());
        assert!(!FieldValue::from(false).is_empty());
        assert!(FieldValue::from(None::<String>).is_empty());
    }

    #[test]
    fn test_field_value_string_representation() {
        assert_eq!(FieldValue::from(3i64).to_string(), "3");
        assert_eq!(FieldValue::from(3.5).to_string(), "3.5");
        assert_eq!(FieldValue::from(true).to_string(), "true");
        assert_eq!(FieldValue::Null.to_string(), "");
    }

    #[test]
    fn test_field_value_deserializes_untagged() {
        let values: Vec<FieldValue> = serde_json::from_str(r#"[null, true, 42, "text"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                FieldValue::Null,
                FieldValue::Bool(true),
                FieldValue::Number(42.0),
                FieldValue::Text("text".to_string()),
            ]
        );
    }

    #[test]
    fn test_rule_debug_hides_closure() {
        let rule = ValidationRule::new().required().custom(|_: &FieldValue| true);
        let debug = format!("{:?}", rule);
        assert!(debug.contains("required: true"));
        assert!(debug.contains("custom: true"));
    }
}
