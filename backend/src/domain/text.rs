//! Shared text normalisation used by entity constructors.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Failure produced while normalising a required text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextError {
    /// Value was missing or blank once trimmed.
    Blank,
    /// Value exceeded the allowed length in characters.
    TooLong { max: usize },
}

impl fmt::Display for TextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => write!(f, "must not be blank"),
            Self::TooLong { max } => write!(f, "must be at most {max} characters"),
        }
    }
}

/// Trim `value` and require it to be non-empty and at most `max` characters.
pub(crate) fn required(value: &str, max: usize) -> Result<String, TextError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TextError::Blank);
    }
    if trimmed.chars().count() > max {
        return Err(TextError::TooLong { max });
    }
    Ok(trimmed.to_owned())
}

/// Trim an optional value, collapsing blanks to `None`.
pub(crate) fn optional(value: Option<String>, max: usize) -> Result<Option<String>, TextError> {
    match value {
        None => Ok(None),
        Some(raw) => match required(&raw, max) {
            Ok(text) => Ok(Some(text)),
            Err(TextError::Blank) => Ok(None),
            Err(err) => Err(err),
        },
    }
}

/// Validation errors for [`Email`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailError {
    /// Value was blank.
    Blank,
    /// Value does not look like `local@domain.tld`.
    Malformed,
}

impl fmt::Display for EmailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => write!(f, "email must not be empty"),
            Self::Malformed => write!(f, "email must be a valid address"),
        }
    }
}

impl std::error::Error for EmailError {}

const EMAIL_MAX: usize = 254;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Lower-cased, shape-checked e-mail address.
///
/// # Examples
/// ```
/// use stable_backend::domain::Email;
///
/// let email = Email::new("  Admin@Example.com ").unwrap();
/// assert_eq!(email.as_ref(), "admin@example.com");
/// assert!(Email::new("not-an-email").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and normalise an e-mail address.
    pub fn new(value: impl AsRef<str>) -> Result<Self, EmailError> {
        let normalized = value.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(EmailError::Blank);
        }
        if normalized.len() > EMAIL_MAX || !email_regex().is_match(&normalized) {
            return Err(EmailError::Malformed);
        }
        Ok(Self(normalized))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
