//! Stables: named buildings with a fixed stall capacity.

use std::fmt;

use chrono::{DateTime, Utc};

use super::text::{self, TextError};
use super::{StableId, StallId, UserId};

const NAME_MAX: usize = 120;
const FIELD_MAX: usize = 200;
const DESCRIPTION_MAX: usize = 4000;

/// Validation errors raised by [`StableProfile::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StableValidationError {
    FullName(TextError),
    Location(TextError),
    Description(TextError),
    StallSize(TextError),
    /// Capacity must be at least one stall.
    CapacityTooSmall,
}

impl StableValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::FullName(_) => "fullName",
            Self::Location(_) => "location",
            Self::Description(_) => "description",
            Self::StallSize(_) => "stallSize",
            Self::CapacityTooSmall => "capacity",
        }
    }
}

impl fmt::Display for StableValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FullName(err) => write!(f, "fullName {err}"),
            Self::Location(err) => write!(f, "location {err}"),
            Self::Description(err) => write!(f, "description {err}"),
            Self::StallSize(err) => write!(f, "stallSize {err}"),
            Self::CapacityTooSmall => write!(f, "capacity must be at least 1"),
        }
    }
}

impl std::error::Error for StableValidationError {}

/// Unvalidated stable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StableDraft {
    pub full_name: String,
    pub location: Option<String>,
    pub capacity: i64,
    pub description: Option<String>,
    pub stall_size: Option<String>,
    pub managed_by: Option<UserId>,
}

/// Validated, editable stable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StableProfile {
    full_name: String,
    location: Option<String>,
    capacity: u32,
    description: Option<String>,
    stall_size: Option<String>,
    managed_by: Option<UserId>,
}

impl StableProfile {
    pub fn new(draft: StableDraft) -> Result<Self, StableValidationError> {
        let capacity = u32::try_from(draft.capacity)
            .ok()
            .filter(|capacity| *capacity >= 1)
            .ok_or(StableValidationError::CapacityTooSmall)?;
        Ok(Self {
            full_name: text::required(&draft.full_name, NAME_MAX)
                .map_err(StableValidationError::FullName)?,
            location: text::optional(draft.location, FIELD_MAX)
                .map_err(StableValidationError::Location)?,
            capacity,
            description: text::optional(draft.description, DESCRIPTION_MAX)
                .map_err(StableValidationError::Description)?,
            stall_size: text::optional(draft.stall_size, FIELD_MAX)
                .map_err(StableValidationError::StallSize)?,
            managed_by: draft.managed_by,
        })
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn stall_size(&self) -> Option<&str> {
        self.stall_size.as_deref()
    }

    pub fn managed_by(&self) -> Option<UserId> {
        self.managed_by
    }
}

/// Persisted stable together with the stalls it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stable {
    pub id: StableId,
    pub profile: StableProfile,
    pub stall_ids: Vec<StallId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Broken stable rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StableRuleError {
    /// Requested capacity is smaller than the number of stalls already inside.
    CapacityBelowStallCount { capacity: u32, stalls: usize },
}

impl StableRuleError {
    pub const fn code(self) -> &'static str {
        match self {
            Self::CapacityBelowStallCount { .. } => "capacity_below_stall_count",
        }
    }
}

impl fmt::Display for StableRuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityBelowStallCount { capacity, stalls } => write!(
                f,
                "capacity {capacity} is below the {stalls} stalls already in the stable"
            ),
        }
    }
}

impl std::error::Error for StableRuleError {}

/// Require `profile` to fit the stalls already inside the stable.
pub fn check_capacity(profile: &StableProfile, stall_count: usize) -> Result<(), StableRuleError> {
    if (profile.capacity() as usize) < stall_count {
        Err(StableRuleError::CapacityBelowStallCount {
            capacity: profile.capacity(),
            stalls: stall_count,
        })
    } else {
        Ok(())
    }
}
