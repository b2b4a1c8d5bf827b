//! Per-horse activity log: feeding, training, vet appointments and so on.

use std::fmt;

use chrono::{DateTime, Utc};

use super::text::{self, TextError};
use super::{HorseActivityId, HorseId};

const KIND_MAX: usize = 100;
const NOTES_MAX: usize = 4000;

/// Validation errors raised by [`ActivityEntry::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityValidationError {
    Kind(TextError),
    Notes(TextError),
    /// Duration must be a positive number of minutes.
    InvalidDuration,
}

impl ActivityValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Kind(_) => "type",
            Self::Notes(_) => "notes",
            Self::InvalidDuration => "durationMinutes",
        }
    }
}

impl fmt::Display for ActivityValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kind(err) => write!(f, "type {err}"),
            Self::Notes(err) => write!(f, "notes {err}"),
            Self::InvalidDuration => write!(f, "durationMinutes must be a positive integer"),
        }
    }
}

impl std::error::Error for ActivityValidationError {}

/// Unvalidated activity fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityDraft {
    pub date: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
    pub all_day: bool,
    pub kind: Option<String>,
    pub notes: Option<String>,
}

/// Validated activity fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    horse_id: HorseId,
    date: Option<DateTime<Utc>>,
    duration_minutes: Option<u32>,
    all_day: bool,
    kind: Option<String>,
    notes: Option<String>,
}

impl ActivityEntry {
    pub fn new(horse_id: HorseId, draft: ActivityDraft) -> Result<Self, ActivityValidationError> {
        let duration_minutes = match draft.duration_minutes {
            None => None,
            Some(minutes) => Some(
                u32::try_from(minutes)
                    .ok()
                    .filter(|value| *value > 0)
                    .ok_or(ActivityValidationError::InvalidDuration)?,
            ),
        };
        Ok(Self {
            horse_id,
            date: draft.date,
            duration_minutes,
            all_day: draft.all_day,
            kind: text::optional(draft.kind, KIND_MAX).map_err(ActivityValidationError::Kind)?,
            notes: text::optional(draft.notes, NOTES_MAX)
                .map_err(ActivityValidationError::Notes)?,
        })
    }

    pub fn horse_id(&self) -> HorseId {
        self.horse_id
    }

    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.date
    }

    pub fn duration_minutes(&self) -> Option<u32> {
        self.duration_minutes
    }

    pub fn all_day(&self) -> bool {
        self.all_day
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

/// Persisted activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HorseActivity {
    pub id: HorseActivityId,
    pub entry: ActivityEntry,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
