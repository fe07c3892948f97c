//! Stand-alone input checks and formatters used by forms and the CLI.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
const PHONE_PATTERN: &str = r"^01[0-9]-?[0-9]{3,4}-?[0-9]{4}$";
const PASSWORD_SPECIALS: &str = "!@#$%^&*(),.?\":{}|<>";

fn regex_match(cell: &'static OnceLock<Option<Regex>>, pattern: &str, value: &str) -> bool {
    cell.get_or_init(|| Regex::new(pattern).ok())
        .as_ref()
        .is_some_and(|re| re.is_match(value))
}

/// Password strength grade
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

impl std::fmt::Display for PasswordStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PasswordStrength::Weak => write!(f, "weak"),
            PasswordStrength::Medium => write!(f, "medium"),
            PasswordStrength::Strong => write!(f, "strong"),
        }
    }
}

/// Check for a `local@domain.tld` shaped address
pub fn is_valid_email(email: &str) -> bool {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    regex_match(&RE, EMAIL_PATTERN, email)
}

/// Check for a Korean mobile number such as `010-1234-5678`.
///
/// Whitespace anywhere in the input is ignored; the dashes are optional.
pub fn is_valid_phone(phone: &str) -> bool {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    regex_match(&RE, PHONE_PATTERN, &compact)
}

/// Check that the value parses as an absolute URL
pub fn is_valid_url(value: &str) -> bool {
    Url::parse(value).is_ok()
}

/// Grade a password by length and character class variety
pub fn password_strength(password: &str) -> PasswordStrength {
    if password.chars().count() < 8 {
        return PasswordStrength::Weak;
    }

    let classes = [
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| PASSWORD_SPECIALS.contains(c)),
    ];

    match classes.iter().filter(|present| **present).count() {
        4 => PasswordStrength::Strong,
        2 | 3 => PasswordStrength::Medium,
        _ => PasswordStrength::Weak,
    }
}

/// Keep only ASCII digits
pub fn extract_numbers(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Cut text to `max_length` characters, marking the cut with `...`
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }
    let head: String = text.chars().take(max_length).collect();
    format!("{}...", head)
}

/// Group a card number into blocks of four separated by spaces
pub fn format_card_number(card_number: &str) -> String {
    let cleaned: Vec<char> = card_number.chars().filter(|c| !c.is_whitespace()).collect();
    cleaned
        .chunks(4)
        .map(|group| group.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format 10 or 11 digit phone numbers with dashes; anything else is
/// returned as its bare digits.
pub fn format_phone_number(phone: &str) -> String {
    let digits = extract_numbers(phone);
    match digits.len() {
        11 => format!("{}-{}-{}", &digits[..3], &digits[3..7], &digits[7..]),
        10 => format!("{}-{}-{}", &digits[..3], &digits[3..6], &digits[6..]),
        _ => digits,
    }
}
