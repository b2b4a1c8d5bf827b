//! Staff members working at the stables.

use std::fmt;

use chrono::{DateTime, Utc};

use super::text::{self, TextError};
use super::{Email, EmailError, StaffId};

const NAME_MAX: usize = 100;
const ROLE_MAX: usize = 100;
const ENTRY_MAX: usize = 200;
const PHONE_DIGITS_MIN: usize = 6;
const PHONE_DIGITS_MAX: usize = 15;

/// Validation errors raised by [`Phone::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneError {
    Blank,
    Malformed,
}

impl fmt::Display for PhoneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => write!(f, "phone must not be empty"),
            Self::Malformed => write!(
                f,
                "phone must contain {PHONE_DIGITS_MIN} to {PHONE_DIGITS_MAX} digits"
            ),
        }
    }
}

impl std::error::Error for PhoneError {}

/// Phone number normalised to digits with an optional leading `+`.
///
/// # Examples
/// ```
/// use stable_backend::domain::Phone;
///
/// let phone = Phone::new("+48 600-100-200").unwrap();
/// assert_eq!(phone.as_ref(), "+48600100200");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Phone(String);

impl Phone {
    pub fn new(value: impl AsRef<str>) -> Result<Self, PhoneError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(PhoneError::Blank);
        }
        let (prefix, rest) = match trimmed.strip_prefix('+') {
            Some(rest) => ("+", rest),
            None => ("", trimmed),
        };
        let mut digits = String::with_capacity(rest.len());
        for c in rest.chars() {
            match c {
                '0'..='9' => digits.push(c),
                ' ' | '-' => {}
                _ => return Err(PhoneError::Malformed),
            }
        }
        if !(PHONE_DIGITS_MIN..=PHONE_DIGITS_MAX).contains(&digits.len()) {
            return Err(PhoneError::Malformed);
        }
        Ok(Self(format!("{prefix}{digits}")))
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validation errors raised by [`StaffProfile::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaffValidationError {
    Name(TextError),
    Role(TextError),
    Phone(PhoneError),
    Email(EmailError),
    Speciality(TextError),
    Schedule(TextError),
}

impl StaffValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Role(_) => "role",
            Self::Phone(_) => "phone",
            Self::Email(_) => "email",
            Self::Speciality(_) => "specialities",
            Self::Schedule(_) => "schedule",
        }
    }
}

impl fmt::Display for StaffValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(err) => write!(f, "name {err}"),
            Self::Role(err) => write!(f, "role {err}"),
            Self::Phone(err) => err.fmt(f),
            Self::Email(err) => err.fmt(f),
            Self::Speciality(err) => write!(f, "each speciality {err}"),
            Self::Schedule(err) => write!(f, "each schedule entry {err}"),
        }
    }
}

impl std::error::Error for StaffValidationError {}

/// Unvalidated staff fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaffDraft {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub role: String,
    pub specialities: Vec<String>,
    pub schedule: Vec<String>,
}

/// Validated staff fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffProfile {
    name: String,
    phone: Phone,
    email: Email,
    role: String,
    specialities: Vec<String>,
    schedule: Vec<String>,
}

fn entries(values: Vec<String>) -> Result<Vec<String>, TextError> {
    values
        .iter()
        .map(|value| text::required(value, ENTRY_MAX))
        .collect()
}

impl StaffProfile {
    pub fn new(draft: StaffDraft) -> Result<Self, StaffValidationError> {
        Ok(Self {
            name: text::required(&draft.name, NAME_MAX).map_err(StaffValidationError::Name)?,
            phone: Phone::new(&draft.phone).map_err(StaffValidationError::Phone)?,
            email: Email::new(&draft.email).map_err(StaffValidationError::Email)?,
            role: text::required(&draft.role, ROLE_MAX).map_err(StaffValidationError::Role)?,
            specialities: entries(draft.specialities).map_err(StaffValidationError::Speciality)?,
            schedule: entries(draft.schedule).map_err(StaffValidationError::Schedule)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &Phone {
        &self.phone
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn specialities(&self) -> &[String] {
        &self.specialities
    }

    pub fn schedule(&self) -> &[String] {
        &self.schedule
    }
}

/// Persisted staff member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Staff {
    pub id: StaffId,
    pub profile: StaffProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
