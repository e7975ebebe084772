use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum TimerError {
    #[error("session duration must be a finite, non-negative number of minutes (got {0})")]
    InvalidDuration(f64),
}

/// Server-reported timing of an attempt session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimerWindow {
    started_at: DateTime<Utc>,
    duration_minutes: f64,
}

impl TimerWindow {
    /// # Errors
    ///
    /// Returns `TimerError::InvalidDuration` for negative, NaN or infinite durations.
    pub fn new(started_at: DateTime<Utc>, duration_minutes: f64) -> Result<Self, TimerError> {
        if !duration_minutes.is_finite() || duration_minutes < 0.0 {
            return Err(TimerError::InvalidDuration(duration_minutes));
        }
        Ok(Self {
            started_at,
            duration_minutes,
        })
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Total session length in whole seconds.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn total_secs(&self) -> u64 {
        // Validated finite and non-negative in `new`.
        (self.duration_minutes * 60.0).round() as u64
    }
}

/// Outcome of a single countdown step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// The timer is frozen or already at zero; nothing changed.
    Idle,
    /// One second elapsed; time is still left.
    Ticked { remaining_secs: u64 },
    /// This step brought the timer to zero.
    Expired,
}

/// Local countdown for one attempt.
///
/// Resolved once from a [`TimerWindow`] and the client's clock, then only
/// ever decremented locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimer {
    total_secs: u64,
    remaining_secs: u64,
    frozen: bool,
}

impl SessionTimer {
    /// Translate the server window into a local starting point.
    ///
    /// `remaining = total - floor(now - started_at)`, clamped to `[0, total]`.
    #[must_use]
    pub fn resolve(window: &TimerWindow, now: DateTime<Utc>) -> Self {
        let total_secs = window.total_secs();
        let elapsed_ms = (now - window.started_at()).num_milliseconds();
        let elapsed_secs = elapsed_ms.div_euclid(1000);
        let total = i64::try_from(total_secs).unwrap_or(i64::MAX);
        let remaining = total.saturating_sub(elapsed_secs).clamp(0, total);

        Self {
            total_secs,
            remaining_secs: u64::try_from(remaining).unwrap_or(0),
            frozen: false,
        }
    }

    #[must_use]
    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.remaining_secs == 0
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self) -> TimerTick {
        if self.frozen || self.remaining_secs == 0 {
            return TimerTick::Idle;
        }
        self.remaining_secs -= 1;
        if self.remaining_secs == 0 {
            TimerTick::Expired
        } else {
            TimerTick::Ticked {
                remaining_secs: self.remaining_secs,
            }
        }
    }
}
