//! Horses boarded at the stables.
//!
//! A horse never stores its stall. The stall holding it is resolved on read,
//! and [`HorseStatus`] is derived from that, so the two cannot disagree.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

use super::text::{self, TextError};
use super::{Email, EmailError, HorseId, StableId, StallId};

const NAME_MAX: usize = 100;
const FIELD_MAX: usize = 200;
const NOTES_MAX: usize = 4000;
/// Oldest age accepted for a horse, in years.
pub const AGE_MAX: i64 = 60;

/// Validation errors raised by [`HorseProfile::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HorseValidationError {
    Name(TextError),
    Breed(TextError),
    Owner(TextError),
    Notes(TextError),
    OwnerEmail(EmailError),
    AgeOutOfRange { max: i64 },
}

impl HorseValidationError {
    /// Name of the offending request field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Breed(_) => "breed",
            Self::Owner(_) => "owner",
            Self::Notes(_) => "notes",
            Self::OwnerEmail(_) => "ownerEmail",
            Self::AgeOutOfRange { .. } => "age",
        }
    }
}

impl fmt::Display for HorseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(err) => write!(f, "name {err}"),
            Self::Breed(err) => write!(f, "breed {err}"),
            Self::Owner(err) => write!(f, "owner {err}"),
            Self::Notes(err) => write!(f, "notes {err}"),
            Self::OwnerEmail(err) => write!(f, "ownerEmail: {err}"),
            Self::AgeOutOfRange { max } => write!(f, "age must be between 0 and {max}"),
        }
    }
}

impl std::error::Error for HorseValidationError {}

/// Unvalidated horse fields as received from an adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HorseDraft {
    pub name: String,
    pub age: Option<i64>,
    pub breed: Option<String>,
    pub owner: Option<String>,
    pub owner_email: String,
    pub birth_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Validated, editable horse fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HorseProfile {
    name: String,
    age: Option<u8>,
    breed: Option<String>,
    owner: Option<String>,
    owner_email: Email,
    birth_date: Option<NaiveDate>,
    notes: Option<String>,
}

impl HorseProfile {
    /// Validate a draft.
    ///
    /// # Examples
    /// ```
    /// use stable_backend::domain::{HorseDraft, HorseProfile};
    ///
    /// let profile = HorseProfile::new(HorseDraft {
    ///     name: "Spirit".into(),
    ///     owner_email: "admin@example.com".into(),
    ///     ..HorseDraft::default()
    /// })
    /// .unwrap();
    /// assert_eq!(profile.name(), "Spirit");
    /// ```
    pub fn new(draft: HorseDraft) -> Result<Self, HorseValidationError> {
        let HorseDraft {
            name,
            age,
            breed,
            owner,
            owner_email,
            birth_date,
            notes,
        } = draft;

        let age = match age {
            None => None,
            Some(years) => Some(
                u8::try_from(years)
                    .ok()
                    .filter(|value| i64::from(*value) <= AGE_MAX)
                    .ok_or(HorseValidationError::AgeOutOfRange { max: AGE_MAX })?,
            ),
        };

        Ok(Self {
            name: text::required(&name, NAME_MAX).map_err(HorseValidationError::Name)?,
            age,
            breed: text::optional(breed, FIELD_MAX).map_err(HorseValidationError::Breed)?,
            owner: text::optional(owner, FIELD_MAX).map_err(HorseValidationError::Owner)?,
            owner_email: Email::new(owner_email).map_err(HorseValidationError::OwnerEmail)?,
            birth_date,
            notes: text::optional(notes, NOTES_MAX).map_err(HorseValidationError::Notes)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> Option<u8> {
        self.age
    }

    pub fn breed(&self) -> Option<&str> {
        self.breed.as_deref()
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn owner_email(&self) -> &Email {
        &self.owner_email
    }

    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_date
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

/// Stall placement of a horse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HorseStatus {
    /// No stall currently holds the horse.
    WaitingForStall,
    /// A stall has been assigned.
    StallGranted,
}

impl HorseStatus {
    /// Wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WaitingForStall => "waiting for stall",
            Self::StallGranted => "stall granted",
        }
    }
}

impl fmt::Display for HorseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of the stall holding a horse, populated on reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StallPlacement {
    pub stall_id: StallId,
    pub number: String,
    pub name: Option<String>,
    pub size: String,
    pub stable_id: Option<StableId>,
}

/// Persisted horse with its current placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Horse {
    pub id: HorseId,
    pub profile: HorseProfile,
    pub placement: Option<StallPlacement>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Horse {
    /// Placement-derived status.
    pub fn status(&self) -> HorseStatus {
        if self.placement.is_some() {
            HorseStatus::StallGranted
        } else {
            HorseStatus::WaitingForStall
        }
    }

    /// Stall currently holding the horse.
    pub fn stall_id(&self) -> Option<StallId> {
        self.placement.as_ref().map(|placement| placement.stall_id)
    }
}

/// Filters accepted when listing horses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HorseFilter {
    pub owner_email: Option<Email>,
}
