use serde::{Deserialize, Serialize};
use tracing::warn;

use super::messages::MessageCatalog;
use super::rule::{FieldValue, ValidationRule, Verdict};

/// Outcome of validating one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    /// Messages in the order the failures were detected
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Evaluates rules against field values using a message catalog for
/// default messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    messages: MessageCatalog,
}

impl Validator {
    pub fn new(messages: MessageCatalog) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &MessageCatalog {
        &self.messages
    }

    /// Validate a value against every rule, accumulating all failures.
    ///
    /// An empty value is only checked against `required`; every other
    /// constraint is skipped for it.
    pub fn validate_field(
        &self,
        field_name: &str,
        value: &FieldValue,
        rules: &[ValidationRule],
    ) -> ValidationResult {
        let mut errors = Vec::new();
        let empty = value.is_empty();
        let text = value.to_string();
        let length = text.chars().count();

        for rule in rules {
            let message_or = |default: String| rule.message.clone().unwrap_or(default);

            if empty {
                if rule.required {
                    errors.push(message_or(self.messages.required(field_name)));
                }
                continue;
            }

            if let Some(min) = rule.min_length.filter(|min| *min > 0) {
                if length < min {
                    errors.push(message_or(self.messages.min_length(field_name, min)));
                }
            }

            if let Some(max) = rule.max_length.filter(|max| *max > 0) {
                if length > max {
                    errors.push(message_or(self.messages.max_length(field_name, max)));
                }
            }

            if let Some(pattern) = &rule.pattern {
                if !pattern.is_match(&text) {
                    errors.push(message_or(self.messages.pattern(field_name)));
                }
            }

            if let Some(check) = &rule.custom {
                match check(value) {
                    Ok(Verdict::Valid) => {}
                    Ok(Verdict::Invalid) => {
                        errors.push(message_or(self.messages.custom(field_name)));
                    }
                    Ok(Verdict::Message(message)) => errors.push(message),
                    Err(e) => {
                        warn!(field = field_name, error = %e, "custom validation check failed");
                        errors.push(self.messages.check_failed(field_name));
                    }
                }
            }
        }

        ValidationResult::from_errors(errors)
    }
}

/// Validate with the default (Korean) messages
pub fn validate_field(field_name: &str, value: &FieldValue, rules: &[ValidationRule]) -> ValidationResult {
    Validator::default().validate_field(field_name, value, rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Locale;
    use regex::Regex;

    #[test]
    fn test_required_empty_value() {
        let result = validate_field("field", &FieldValue::from(""), &[ValidationRule::new().required()]);
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec!["field은(는) 필수입니다.".to_string()]);
    }

    #[test]
    fn test_required_empty_reports_only_required_message() {
        let rules = vec![
            ValidationRule::new().required(),
            ValidationRule::new().min_length(3),
            ValidationRule::new().pattern(Regex::new("^x$").unwrap()),
            ValidationRule::new().custom(|_: &FieldValue| false),
        ];
        for value in [FieldValue::Null, FieldValue::from(""), FieldValue::from("   ")] {
            let result = validate_field("name", &value, &rules);
            assert_eq!(result.errors, vec!["name은(는) 필수입니다.".to_string()]);
        }
    }

    #[test]
    fn test_empty_value_without_required_passes() {
        let rules = vec![
            ValidationRule::new().min_length(3),
            ValidationRule::new().custom(|_: &FieldValue| false),
        ];
        let result = validate_field("nickname", &FieldValue::Null, &rules);
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_min_length() {
        let rules = vec![ValidationRule::new().min_length(8)];

        let short = validate_field("password", &FieldValue::from("abc"), &rules);
        assert_eq!(short.errors, vec!["password은(는) 최소 8자 이상이어야 합니다.".to_string()]);

        let ok = validate_field("password", &FieldValue::from("abcdefgh"), &rules);
        assert!(ok.is_valid);
        assert!(ok.errors.is_empty());
    }

    #[test]
    fn test_length_counts_characters() {
        let rules = vec![ValidationRule::new().max_length(3)];
        assert!(validate_field("name", &FieldValue::from("홍길동"), &rules).is_valid);
        assert!(!validate_field("name", &FieldValue::from("홍길동전"), &rules).is_valid);
    }

    #[test]
    fn test_zero_bounds_are_ignored() {
        let rules = vec![ValidationRule::new().min_length(0).max_length(0)];
        assert!(validate_field("memo", &FieldValue::from("anything"), &rules).is_valid);
    }

    #[test]
    fn test_failures_accumulate_in_rule_order() {
        let rules = vec![
            ValidationRule::new().max_length(2),
            ValidationRule::new().pattern(Regex::new(r"^\d+$").unwrap()),
            ValidationRule::new().custom(|_: &FieldValue| "custom says no"),
        ];
        let result = validate_field("code", &FieldValue::from("abc"), &rules);
        assert_eq!(
            result.errors,
            vec![
                "code은(는) 최대 2자까지 입력 가능합니다.".to_string(),
                "code의 형식이 올바르지 않습니다.".to_string(),
                "custom says no".to_string(),
            ]
        );
    }

    #[test]
    fn test_message_override_applies_to_each_failure() {
        let rule = ValidationRule::new().min_length(5).pattern(Regex::new("^z").unwrap()).message("bad");
        let result = validate_field("code", &FieldValue::from("abc"), &[rule]);
        assert_eq!(result.errors, vec!["bad".to_string(), "bad".to_string()]);
    }

    #[test]
    fn test_custom_verdicts() {
        let pass = ValidationRule::new().custom(|_: &FieldValue| true);
        let fail = ValidationRule::new().custom(|_: &FieldValue| false);
        let value = FieldValue::from("x");

        assert!(validate_field("f", &value, &[pass]).is_valid);
        assert_eq!(
            validate_field("f", &value, &[fail]).errors,
            vec!["f의 값이 유효하지 않습니다.".to_string()]
        );
    }

    #[test]
    fn test_custom_check_error_becomes_field_error() {
        let rule = ValidationRule::new().try_custom(|_| Err(anyhow::anyhow!("lookup unavailable")));
        let result = validate_field("username", &FieldValue::from("kim"), &[rule]);
        assert_eq!(result.errors, vec!["username의 값을 검증할 수 없습니다.".to_string()]);
    }

    #[test]
    fn test_numbers_use_string_representation() {
        let rules = vec![ValidationRule::new().min_length(3)];
        assert!(!validate_field("age", &FieldValue::from(42i64), &rules).is_valid);
        assert!(validate_field("age", &FieldValue::from(100i64), &rules).is_valid);
        assert!(validate_field("age", &FieldValue::from(0i64), &[ValidationRule::new().required()]).is_valid);
    }

    #[test]
    fn test_builtin_checks() {
        let result = validate_field("email", &FieldValue::from("nope"), &[ValidationRule::email()]);
        assert_eq!(result.errors, vec!["email의 값이 유효하지 않습니다.".to_string()]);
        assert!(validate_field("email", &FieldValue::from("a@b.co"), &[ValidationRule::email()]).is_valid);
    }

    #[test]
    fn test_english_catalog() {
        let validator = Validator::new(MessageCatalog::new(Locale::En));
        let result = validator.validate_field("email", &FieldValue::Null, &[ValidationRule::new().required()]);
        assert_eq!(result.errors, vec!["email is required.".to_string()]);
    }
}
