//! Scheduled stable events such as trainings and vet visits.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use super::text::{self, TextError};
use super::{EventId, HorseId};

const TITLE_MAX: usize = 200;
const LOCATION_MAX: usize = 100;
/// Longest accepted event, in minutes.
pub const DURATION_MAX_MINUTES: u32 = 24 * 60;
/// Location assumed when an event does not name one.
pub const DEFAULT_LOCATION: &str = "Warszawa";

/// Start hour assumed when an event does not name one.
pub const fn default_hour() -> NaiveTime {
    match NaiveTime::from_hms_opt(9, 0, 0) {
        Some(time) => time,
        None => NaiveTime::MIN,
    }
}

/// Parse a calendar date in any of the accepted wire forms.
///
/// Accepts `YYYY-MM-DD`, the `Mon Jun 09 2025` form produced by browsers'
/// `Date.toDateString()`, and RFC 3339 timestamps (the UTC date is used).
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use stable_backend::domain::parse_event_date;
///
/// let expected = NaiveDate::from_ymd_opt(2025, 6, 9);
/// assert_eq!(parse_event_date("2025-06-09"), expected);
/// assert_eq!(parse_event_date("Mon Jun 09 2025"), expected);
/// assert_eq!(parse_event_date("2025-06-09T22:00:00Z"), expected);
/// ```
pub fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%a %b %d %Y"))
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|stamp| stamp.with_timezone(&Utc).date_naive())
        })
}

/// Parse an `HH:MM` start hour.
pub fn parse_event_hour(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok()
}

/// Validation errors raised by [`EventDetails::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventValidationError {
    Title(TextError),
    Location(TextError),
    /// Duration was not positive or exceeded a day.
    InvalidDuration,
}

impl EventValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Title(_) => "title",
            Self::Location(_) => "location",
            Self::InvalidDuration => "duration",
        }
    }
}

impl fmt::Display for EventValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title(err) => write!(f, "title {err}"),
            Self::Location(err) => write!(f, "location {err}"),
            Self::InvalidDuration => write!(f, "duration must be between 0 and 24 hours"),
        }
    }
}

impl std::error::Error for EventValidationError {}

/// Unvalidated event fields.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub title: String,
    pub date: NaiveDate,
    pub hour: Option<NaiveTime>,
    /// Length in hours.
    pub duration_hours: Option<f64>,
    pub location: Option<String>,
    pub horse_id: Option<HorseId>,
}

/// Validated event fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDetails {
    title: String,
    date: NaiveDate,
    hour: Option<NaiveTime>,
    duration_minutes: Option<u32>,
    location: Option<String>,
    horse_id: Option<HorseId>,
}

fn duration_minutes(hours: f64) -> Option<u32> {
    if !hours.is_finite() || hours <= 0.0 {
        return None;
    }
    let minutes = (hours * 60.0).round();
    if minutes < 1.0 || minutes > f64::from(DURATION_MAX_MINUTES) {
        return None;
    }
    Some(minutes as u32)
}

impl EventDetails {
    pub fn new(draft: EventDraft) -> Result<Self, EventValidationError> {
        let duration_minutes = match draft.duration_hours {
            None => None,
            Some(hours) => {
                Some(duration_minutes(hours).ok_or(EventValidationError::InvalidDuration)?)
            }
        };
        Ok(Self {
            title: text::required(&draft.title, TITLE_MAX).map_err(EventValidationError::Title)?,
            date: draft.date,
            hour: draft.hour,
            duration_minutes,
            location: text::optional(draft.location, LOCATION_MAX)
                .map_err(EventValidationError::Location)?,
            horse_id: draft.horse_id,
        })
    }

    /// Rebuild details already validated by an adapter.
    pub fn from_stored(
        title: String,
        date: NaiveDate,
        hour: Option<NaiveTime>,
        duration_minutes: Option<u32>,
        location: Option<String>,
        horse_id: Option<HorseId>,
    ) -> Self {
        Self {
            title,
            date,
            hour,
            duration_minutes,
            location,
            horse_id,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn hour(&self) -> Option<NaiveTime> {
        self.hour
    }

    pub fn duration_minutes(&self) -> Option<u32> {
        self.duration_minutes
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn horse_id(&self) -> Option<HorseId> {
        self.horse_id
    }
}

/// Persisted event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: EventId,
    pub details: EventDetails,
    pub created_at: DateTime<Utc>,
}

/// UTC window covered by an event once defaults are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Event {
    /// Location label, falling back to [`DEFAULT_LOCATION`].
    pub fn location_or_default(&self) -> &str {
        self.details.location().unwrap_or(DEFAULT_LOCATION)
    }

    /// Training window starting at the event hour (default 09:00 UTC).
    pub fn training_window(&self) -> TrainingWindow {
        let hour = self.details.hour().unwrap_or_else(default_hour);
        let start = NaiveDateTime::new(self.details.date(), hour).and_utc();
        let minutes = self.details.duration_minutes().unwrap_or(60);
        TrainingWindow {
            start,
            end: start + Duration::minutes(i64::from(minutes)),
        }
    }
}

/// Inclusive date range used to query events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventRange {
    start: NaiveDate,
    end: NaiveDate,
}

/// Error returned when a range ends before it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("start must not be after end")]
pub struct InvertedRange;

impl EventRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InvertedRange> {
        if start > end {
            return Err(InvertedRange);
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.start..=self.end).contains(&date)
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    fn june(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).expect("valid date")
    }

    #[fixture]
    fn draft() -> EventDraft {
        EventDraft {
            title: "Training".into(),
            date: june(9),
            hour: None,
            duration_hours: None,
            location: None,
            horse_id: None,
        }
    }

    #[rstest]
    #[case("2025-06-09", Some(june(9)))]
    #[case("Mon Jun 09 2025", Some(june(9)))]
    #[case("2025-06-09T10:30:00+02:00", Some(june(9)))]
    #[case("09/06/2025", None)]
    #[case("", None)]
    fn date_forms(#[case] raw: &str, #[case] expected: Option<NaiveDate>) {
        assert_eq!(parse_event_date(raw), expected);
    }

    #[rstest]
    #[case(Some(0.0))]
    #[case(Some(-1.0))]
    #[case(Some(24.5))]
    #[case(Some(f64::NAN))]
    fn rejects_bad_durations(mut draft: EventDraft, #[case] hours: Option<f64>) {
        draft.duration_hours = hours;
        assert_eq!(
            EventDetails::new(draft),
            Err(EventValidationError::InvalidDuration)
        );
    }

    #[rstest]
    #[case(Some(0.5), Some(30))]
    #[case(Some(12.0), Some(720))]
    #[case(None, None)]
    fn stores_duration_in_minutes(
        mut draft: EventDraft,
        #[case] hours: Option<f64>,
        #[case] minutes: Option<u32>,
    ) {
        draft.duration_hours = hours;
        let details = EventDetails::new(draft).expect("valid event");
        assert_eq!(details.duration_minutes(), minutes);
    }

    #[rstest]
    fn window_uses_defaults(draft: EventDraft) {
        let event = Event {
            id: EventId::random(),
            details: EventDetails::new(draft).expect("valid event"),
            created_at: Utc::now(),
        };
        let window = event.training_window();
        assert_eq!(window.start.to_rfc3339(), "2025-06-09T09:00:00+00:00");
        assert_eq!(window.end - window.start, Duration::hours(1));
        assert_eq!(event.location_or_default(), "Warszawa");
    }

    #[rstest]
    fn window_honours_hour_and_duration(mut draft: EventDraft) {
        draft.hour = parse_event_hour("14:30");
        draft.duration_hours = Some(1.5);
        let event = Event {
            id: EventId::random(),
            details: EventDetails::new(draft).expect("valid event"),
            created_at: Utc::now(),
        };
        let window = event.training_window();
        assert_eq!(window.end.to_rfc3339(), "2025-06-09T16:00:00+00:00");
    }

    #[rstest]
    fn range_rejects_inverted_bounds() {
        assert_eq!(EventRange::new(june(10), june(9)), Err(InvertedRange));
        let range = EventRange::new(june(9), june(10)).expect("valid range");
        assert!(range.contains(june(10)));
        assert!(!range.contains(june(11)));
    }
}
