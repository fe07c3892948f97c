use std::path::PathBuf;

/// Errors raised by fallible crate operations.
///
/// Validation failures are never reported through this type; they are
/// collected as message strings on the field instead.
#[derive(Debug, thiserror::Error)]
pub enum FormstateError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported file format for '{path}'")]
    UnsupportedFormat { path: PathBuf },

    #[error("Failed to parse '{path}': {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Invalid pattern for field '{field}': {source}")]
    Pattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unknown built-in check '{check}' for field '{field}'")]
    UnknownCheck { field: String, check: String },

    #[error("Preference store error: {0}")]
    Store(String),

    #[error("No tokio runtime available to schedule timers")]
    NoRuntime,
}

pub type Result<T> = std::result::Result<T, FormstateError>;
