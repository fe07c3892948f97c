//! Field validation engine and per-form validation state.

pub mod definition;
pub mod engine;
pub mod form;
pub mod messages;
pub mod rule;

pub use definition::{BuiltinCheck, DefinitionFormat, FieldSpec, FormDefinition, RuleSpec};
pub use engine::{validate_field, ValidationResult, Validator};
pub use form::{Form, FormEvent, FormField, FormValidation};
pub use messages::MessageCatalog;
pub use rule::{CustomCheck, FieldValue, ValidationRule, Verdict};
