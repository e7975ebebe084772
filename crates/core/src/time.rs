use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

/// A simple clock abstraction for deterministic time in services and tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock that uses the current system time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid timestamp: {raw}")]
pub struct TimestampError {
    raw: String,
}

/// Parse an ISO-8601 timestamp as sent by the backend.
///
/// Offset-less values (`2025-06-01T10:00:00`, optionally with fractional
/// seconds) are wall-clock times on the client and are read in the local
/// time zone.
///
/// # Errors
///
/// Returns `TimestampError` if the value matches neither RFC 3339 nor the
/// offset-less form.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
    parse_timestamp_in(raw, &Local)
}

/// Like [`parse_timestamp`], reading offset-less values in `zone`.
///
/// A wall-clock time that occurs twice resolves to the earlier instant; one
/// skipped by a transition is rejected.
///
/// # Errors
///
/// Returns `TimestampError` if the value cannot be parsed or does not exist
/// in `zone`.
pub fn parse_timestamp_in<Tz: TimeZone>(
    raw: &str,
    zone: &Tz,
) -> Result<DateTime<Utc>, TimestampError> {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }
    let invalid = || TimestampError {
        raw: raw.to_owned(),
    };
    let naive =
        NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f").map_err(|_| invalid())?;
    zone.from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(invalid)
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}
