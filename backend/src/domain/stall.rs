//! Stalls and the rules governing which horse occupies them.
//!
//! ## Invariants
//! - `status == Occupied` exactly when `horse_id` is set.
//! - A horse is held by at most one stall.
//! - A stall under maintenance never holds a horse.
//!
//! Adapters apply the rule functions in this module inside their atomic
//! section (a row-locking transaction for PostgreSQL, the store mutex for the
//! in-memory adapter).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::text::{self, TextError};
use super::{HorseId, StableId, StallId};

const NUMBER_MAX: usize = 32;
const NAME_MAX: usize = 100;
const SIZE_MAX: usize = 32;

/// Occupancy state of a stall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StallStatus {
    #[default]
    Available,
    Occupied,
    Maintenance,
}

impl StallStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for StallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for unknown stall status strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown stall status: {0}")]
pub struct UnknownStallStatus(pub String);

impl FromStr for StallStatus {
    type Err = UnknownStallStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "occupied" => Ok(Self::Occupied),
            "maintenance" => Ok(Self::Maintenance),
            other => Err(UnknownStallStatus(other.to_owned())),
        }
    }
}

/// Validation errors raised by [`StallSpec::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StallValidationError {
    Number(TextError),
    Name(TextError),
    Size(TextError),
}

impl StallValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Name(_) => "name",
            Self::Size(_) => "size",
        }
    }
}

impl fmt::Display for StallValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(err) => write!(f, "number {err}"),
            Self::Name(err) => write!(f, "name {err}"),
            Self::Size(err) => write!(f, "size {err}"),
        }
    }
}

impl std::error::Error for StallValidationError {}

/// Unvalidated stall fields plus the status an edit asks for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StallDraft {
    pub number: String,
    pub name: Option<String>,
    pub size: String,
    pub stable_id: Option<StableId>,
    pub status: Option<StallStatus>,
}

/// Editable stall fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StallSpec {
    number: String,
    name: Option<String>,
    size: String,
    stable_id: Option<StableId>,
}

impl StallSpec {
    pub fn new(
        number: &str,
        name: Option<String>,
        size: &str,
        stable_id: Option<StableId>,
    ) -> Result<Self, StallValidationError> {
        Ok(Self {
            number: text::required(number, NUMBER_MAX).map_err(StallValidationError::Number)?,
            name: text::optional(name, NAME_MAX).map_err(StallValidationError::Name)?,
            size: text::required(size, SIZE_MAX).map_err(StallValidationError::Size)?,
            stable_id,
        })
    }

    /// Validate the field part of a draft.
    pub fn from_draft(draft: &StallDraft) -> Result<Self, StallValidationError> {
        Self::new(
            &draft.number,
            draft.name.clone(),
            &draft.size,
            draft.stable_id,
        )
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn size(&self) -> &str {
        &self.size
    }

    pub fn stable_id(&self) -> Option<StableId> {
        self.stable_id
    }

    /// The same fields outside any stable.
    #[must_use]
    pub fn detached(&self) -> Self {
        Self {
            stable_id: None,
            ..self.clone()
        }
    }
}

/// Persisted stall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stall {
    pub id: StallId,
    pub spec: StallSpec,
    pub status: StallStatus,
    pub horse_id: Option<HorseId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Stall {
    /// Whether a horse currently occupies the stall.
    pub fn is_occupied(&self) -> bool {
        self.horse_id.is_some()
    }
}

/// Filters accepted when listing stalls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StallFilter {
    pub stable_id: Option<StableId>,
    pub status: Option<StallStatus>,
}

impl StallFilter {
    pub fn matches(&self, stall: &Stall) -> bool {
        self.stable_id
            .is_none_or(|stable| stall.spec.stable_id() == Some(stable))
            && self.status.is_none_or(|status| stall.status == status)
    }
}

/// Broken stall rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StallRuleError {
    /// Stall is under maintenance and cannot take a horse.
    UnderMaintenance,
    /// Another horse already occupies the stall.
    OccupiedBy { horse_id: HorseId },
    /// Operation requires an empty stall.
    StillOccupied { horse_id: HorseId },
    /// `occupied` can only be reached through an assignment.
    CannotMarkOccupied,
    /// The target stable already holds as many stalls as it has capacity.
    StableFull { capacity: u32 },
}

impl StallRuleError {
    /// Stable machine-readable code used in error details.
    pub const fn code(self) -> &'static str {
        match self {
            Self::UnderMaintenance => "stall_unavailable",
            Self::OccupiedBy { .. } | Self::StillOccupied { .. } => "stall_occupied",
            Self::CannotMarkOccupied => "status_requires_assignment",
            Self::StableFull { .. } => "stable_full",
        }
    }
}

impl fmt::Display for StallRuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnderMaintenance => write!(f, "stall is under maintenance"),
            Self::OccupiedBy { .. } => write!(f, "stall is occupied by another horse"),
            Self::StillOccupied { .. } => write!(f, "stall is occupied; release it first"),
            Self::CannotMarkOccupied => {
                write!(f, "a stall becomes occupied only by assigning a horse")
            }
            Self::StableFull { capacity } => {
                write!(f, "stable is full (capacity {capacity})")
            }
        }
    }
}

impl std::error::Error for StallRuleError {}

/// Outcome of checking an assignment request against the locked stall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// The stall is free; the horse should be moved into it.
    Proceed,
    /// The horse already occupies this stall.
    AlreadyAssigned,
}

/// Decide whether `horse_id` may be placed in `stall`.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use stable_backend::domain::{
///     check_assignment, Assignment, HorseId, Stall, StallId, StallSpec, StallStatus,
/// };
///
/// let stall = Stall {
///     id: StallId::random(),
///     spec: StallSpec::new("1", None, "large", None).unwrap(),
///     status: StallStatus::Available,
///     horse_id: None,
///     created_at: Utc::now(),
///     updated_at: Utc::now(),
/// };
/// assert_eq!(check_assignment(&stall, HorseId::random()), Ok(Assignment::Proceed));
/// ```
pub fn check_assignment(stall: &Stall, horse_id: HorseId) -> Result<Assignment, StallRuleError> {
    match (stall.status, stall.horse_id) {
        (StallStatus::Maintenance, _) => Err(StallRuleError::UnderMaintenance),
        (_, Some(current)) if current == horse_id => Ok(Assignment::AlreadyAssigned),
        (_, Some(current)) => Err(StallRuleError::OccupiedBy { horse_id: current }),
        (_, None) => Ok(Assignment::Proceed),
    }
}

/// Status for a newly created stall.
pub fn initial_status(requested: Option<StallStatus>) -> Result<StallStatus, StallRuleError> {
    match requested {
        Some(StallStatus::Occupied) => Err(StallRuleError::CannotMarkOccupied),
        Some(status) => Ok(status),
        None => Ok(StallStatus::Available),
    }
}

/// Status after an edit that may request a new one.
///
/// Only `available` and `maintenance` can be requested, and only for an empty
/// stall. Requesting the status the stall already has is always accepted.
pub fn resolve_status(
    stall: &Stall,
    requested: Option<StallStatus>,
) -> Result<StallStatus, StallRuleError> {
    let Some(requested) = requested else {
        return Ok(stall.status);
    };
    if requested == stall.status {
        return Ok(requested);
    }
    match (requested, stall.horse_id) {
        (StallStatus::Occupied, _) => Err(StallRuleError::CannotMarkOccupied),
        (_, Some(horse_id)) => Err(StallRuleError::StillOccupied { horse_id }),
        (status, None) => Ok(status),
    }
}

/// Require `stall` to be empty before it is deleted.
pub fn check_removable(stall: &Stall) -> Result<(), StallRuleError> {
    match stall.horse_id {
        Some(horse_id) => Err(StallRuleError::StillOccupied { horse_id }),
        None => Ok(()),
    }
}

/// Require free room in a stable holding `stall_count` stalls.
pub fn check_stable_room(capacity: u32, stall_count: usize) -> Result<(), StallRuleError> {
    if stall_count >= capacity as usize {
        Err(StallRuleError::StableFull { capacity })
    } else {
        Ok(())
    }
}
