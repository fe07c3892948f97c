use std::fs;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::form::{Form, FormField};
use super::rule::{FieldValue, ValidationRule};
use crate::error::{FormstateError, Result};

/// Supported form definition file formats
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DefinitionFormat {
    Json,
    Yaml,
    Toml,
}

impl DefinitionFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(DefinitionFormat::Json),
            Some("yaml") | Some("yml") => Ok(DefinitionFormat::Yaml),
            Some("toml") => Ok(DefinitionFormat::Toml),
            _ => Err(FormstateError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Named built-in checks usable in place of a custom closure
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinCheck {
    Email,
    Phone,
    Url,
}

/// Declarative rule as written in a definition file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSpec {
    pub required: bool,
    #[serde(alias = "minLength")]
    pub min_length: Option<usize>,
    #[serde(alias = "maxLength")]
    pub max_length: Option<usize>,
    pub pattern: Option<String>,
    pub check: Option<String>,
    pub message: Option<String>,
}

impl RuleSpec {
    fn into_rule(self, field: &str) -> Result<ValidationRule> {
        let mut rule = match self.check.as_deref() {
            None => ValidationRule::new(),
            Some(name) => match parse_check(name) {
                Some(BuiltinCheck::Email) => ValidationRule::email(),
                Some(BuiltinCheck::Phone) => ValidationRule::phone(),
                Some(BuiltinCheck::Url) => ValidationRule::url(),
                None => {
                    return Err(FormstateError::UnknownCheck {
                        field: field.to_string(),
                        check: name.to_string(),
                    })
                }
            },
        };

        if self.required {
            rule = rule.required();
        }
        if let Some(min) = self.min_length {
            rule = rule.min_length(min);
        }
        if let Some(max) = self.max_length {
            rule = rule.max_length(max);
        }
        if let Some(pattern) = self.pattern {
            let regex = Regex::new(&pattern).map_err(|source| FormstateError::Pattern {
                field: field.to_string(),
                source,
            })?;
            rule = rule.pattern(regex);
        }
        if let Some(message) = self.message {
            rule = rule.message(message);
        }
        Ok(rule)
    }
}

fn parse_check(name: &str) -> Option<BuiltinCheck> {
    match name.to_lowercase().as_str() {
        "email" => Some(BuiltinCheck::Email),
        "phone" => Some(BuiltinCheck::Phone),
        "url" => Some(BuiltinCheck::Url),
        _ => None,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default)]
    pub value: FieldValue,
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

/// A form as loaded from disk: an ordered list of fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormDefinition {
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl FormDefinition {
    pub fn load(path: &Path) -> Result<Self> {
        let format = DefinitionFormat::from_extension(path)?;
        let content = fs::read_to_string(path).map_err(|source| FormstateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, format).map_err(|reason| FormstateError::Parse {
            path: path.to_path_buf(),
            reason,
        })
    }

    pub fn parse(content: &str, format: DefinitionFormat) -> std::result::Result<Self, String> {
        match format {
            DefinitionFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            DefinitionFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            DefinitionFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        }
    }

    /// Compile the declarative rules into a validatable form
    pub fn into_form(self) -> Result<Form> {
        let mut form = Form::new();
        for spec in self.fields {
            let rules = spec
                .rules
                .into_iter()
                .map(|rule| rule.into_rule(&spec.name))
                .collect::<Result<Vec<_>>>()?;
            form.insert(spec.name, FormField::new(spec.value, rules));
        }
        Ok(form)
    }
}
