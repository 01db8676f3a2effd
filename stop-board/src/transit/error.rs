//! Transit API error types.

use crate::domain::StopId;

use super::types::MalformedTimetable;

/// Errors that can occur when fetching stop timetables.
#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status
    #[error("transit API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// The stop is not known to the journey planner
    #[error("stop {stop} not found")]
    StopNotFound { stop: StopId },

    /// Response parsed but is missing required fields
    #[error("malformed timetable for stop {stop}: {source}")]
    Malformed {
        stop: StopId,
        source: MalformedTimetable,
    },
}
