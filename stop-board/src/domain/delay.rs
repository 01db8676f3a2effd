//! Departure delay classification.

use std::fmt;

use chrono::DateTime;

/// How a departure compares to its schedule.
///
/// Derived from the scheduled departure time and the realtime expected
/// time, when the latter is available. Differences of a minute or less
/// count as on time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayStatus {
    /// No realtime estimate; only the static schedule is known.
    Scheduled,
    /// Running within a minute of schedule.
    OnTime,
    /// Running late by this many minutes.
    Late(i64),
    /// Running early by this many minutes.
    Early(i64),
}

impl DelayStatus {
    /// Classify a departure from its scheduled and expected UTC times.
    ///
    /// Both arguments are RFC 3339 timestamps as reported by the
    /// transit API. An absent or unparseable expected time yields
    /// `Scheduled`; an unparseable scheduled time likewise falls back
    /// to `Scheduled` rather than guessing.
    pub fn classify(scheduled_utc: &str, expected_utc: Option<&str>) -> DelayStatus {
        let Some(expected_utc) = expected_utc else {
            return DelayStatus::Scheduled;
        };

        let (Ok(scheduled), Ok(expected)) = (
            DateTime::parse_from_rfc3339(scheduled_utc),
            DateTime::parse_from_rfc3339(expected_utc),
        ) else {
            return DelayStatus::Scheduled;
        };

        let diff_minutes = (expected - scheduled).num_seconds() as f64 / 60.0;
        let diff_minutes = diff_minutes.round() as i64;

        if diff_minutes > 1 {
            DelayStatus::Late(diff_minutes)
        } else if diff_minutes < -1 {
            DelayStatus::Early(-diff_minutes)
        } else {
            DelayStatus::OnTime
        }
    }
}

impl fmt::Display for DelayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DelayStatus::Scheduled => f.write_str("Scheduled"),
            DelayStatus::OnTime => f.write_str("On time"),
            DelayStatus::Late(mins) => write!(f, "Late ({mins} min)"),
            DelayStatus::Early(mins) => write!(f, "Early ({mins} min)"),
        }
    }
}
