//! Time types for availability queries.
//!
//! This module provides [`TimeWindow`] for defining query ranges and the
//! RFC3339 parsing/formatting helpers used at the engine's boundaries.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from timestamp parsing.
#[derive(Debug, Error)]
pub enum TimeError {
    /// The input could not be parsed as an RFC3339 timestamp.
    #[error("malformed timestamp {input:?}: {source}")]
    MalformedTimestamp {
        /// The offending input text.
        input: String,
        /// The underlying chrono parse error.
        #[source]
        source: chrono::ParseError,
    },
}

/// Parses an RFC3339 timestamp into a UTC instant.
///
/// A trailing `Z` is accepted as shorthand for the UTC offset. Offsets other
/// than UTC are normalized to UTC, preserving the instant.
///
/// # Errors
///
/// Returns [`TimeError::MalformedTimestamp`] on unparsable input.
pub fn parse_instant(text: &str) -> Result<DateTime<Utc>, TimeError> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| TimeError::MalformedTimestamp {
            input: text.to_string(),
            source,
        })
}

/// Formats a UTC instant as an RFC3339 timestamp.
///
/// The output reparses via [`parse_instant`] to the same instant.
pub fn format_instant(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

/// A time window for an availability query.
///
/// Represents a half-open interval `[start, end)` in UTC. Construction never
/// fails: a window with `end <= start` is simply empty and yields zero slots
/// downstream rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Start of the window (inclusive).
    pub start: DateTime<Utc>,
    /// End of the window (exclusive).
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Creates a time window from a start time and duration.
    pub fn from_duration(start: DateTime<Utc>, duration: Duration) -> Self {
        Self::new(start, start + duration)
    }

    /// Returns `true` if the window contains no time (`end <= start`).
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Returns the duration of this time window.
    ///
    /// Negative for inverted windows.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Checks if a datetime falls within this window.
    ///
    /// Uses half-open interval semantics: `[start, end)`.
    pub fn contains(&self, dt: DateTime<Utc>) -> bool {
        self.start <= dt && dt < self.end
    }

    /// Checks if an interval with the given bounds overlaps this window.
    ///
    /// An interval overlaps if it starts before the window ends AND ends
    /// after the window starts.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start < self.end && end > self.start
    }
}
