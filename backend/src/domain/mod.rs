//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed entities of the stable manager and the
//! services that drive them. Nothing here knows about HTTP or SQL; adapters
//! reach the domain through [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport agnostic failure payload.
//! - Entities: User, Horse, Stall, Stable, Staff, Expense, Event,
//!   HorseActivity, with validated profile types for their editable fields.
//! - Stall rules: [`check_assignment`], [`resolve_status`] and friends.
//! - Weather: forecast slot selection for events.
//! - Services implementing the driving ports.

pub mod auth;
pub mod error;
pub mod event;
pub mod expense;
pub mod horse;
pub mod horse_activity;
pub mod ids;
pub mod ports;
pub mod stable;
pub mod staff;
pub mod stall;
mod text;
pub mod trace_id;
pub mod user;
pub mod weather;

mod auth_service;
mod event_service;
mod expense_service;
mod horse_activity_service;
mod horse_service;
mod stable_service;
mod staff_service;
mod stall_service;

pub use self::auth::{
    AccessClaims, AccessToken, CredentialsValidationError, GoogleProfile, LoginCredentials,
    PASSWORD_MIN, Registration, SignedIn,
};
pub use self::auth_service::AuthServiceImpl;
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::event::{
    DEFAULT_LOCATION, DURATION_MAX_MINUTES, Event, EventDetails, EventDraft, EventRange,
    EventValidationError, InvertedRange, TrainingWindow, default_hour, parse_event_date,
    parse_event_hour,
};
pub use self::event_service::EventServiceImpl;
pub use self::expense::{
    AMOUNT_MAX, Amount, Expense, ExpenseDraft, ExpenseEntry, ExpenseFilter, ExpenseKind,
    ExpenseSummary, ExpenseValidationError, RelatedEntity, RelatedModel, UnknownExpenseKind,
    UnknownRelatedModel,
};
pub use self::expense_service::ExpenseServiceImpl;
pub use self::horse::{
    AGE_MAX, Horse, HorseDraft, HorseFilter, HorseProfile, HorseStatus, HorseValidationError,
    StallPlacement,
};
pub use self::horse_activity::{
    ActivityDraft, ActivityEntry, ActivityValidationError, HorseActivity,
};
pub use self::horse_activity_service::HorseActivityServiceImpl;
pub use self::horse_service::HorseServiceImpl;
pub use self::ids::{
    EventId, ExpenseId, HorseActivityId, HorseId, StableId, StaffId, StallId, UserId,
};
pub use self::stable::{
    Stable, StableDraft, StableProfile, StableRuleError, StableValidationError, check_capacity,
};
pub use self::stable_service::StableServiceImpl;
pub use self::staff::{
    Phone, PhoneError, Staff, StaffDraft, StaffProfile, StaffValidationError,
};
pub use self::staff_service::StaffServiceImpl;
pub use self::stall::{
    Assignment, Stall, StallDraft, StallFilter, StallRuleError, StallSpec, StallStatus,
    StallValidationError, UnknownStallStatus, check_assignment, check_removable,
    check_stable_room, initial_status, resolve_status,
};
pub use self::stall_service::StallServiceImpl;
pub use self::text::{Email, EmailError, TextError};
pub use self::trace_id::TraceId;
pub use self::user::{
    NewUser, Role, USERNAME_MAX, USERNAME_MIN, UnknownRole, User, Username, UsernameError,
};
pub use self::weather::{
    DEFAULT_PROVIDER_LOCATION, FORECAST_HORIZON_DAYS, ForecastSlot, SLOT_HOURS, WeatherOutlook,
    WeatherReport, days_until, provider_location, select_slot,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use stable_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
