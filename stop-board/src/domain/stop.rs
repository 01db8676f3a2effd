//! Stop identifier types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid stop id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stop id: {reason}")]
pub struct InvalidStopId {
    reason: &'static str,
}

/// Error returned when a pasted URL contains no stop id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no stop id found in URL (expected a stops/<digits> path segment)")]
pub struct InvalidStopUrl;

/// A validated transit stop identifier.
///
/// Stop ids are non-empty strings of ASCII digits as assigned by the
/// journey planner (e.g. `"002023"`). Leading zeros are significant,
/// so the id is kept as a string rather than a number. This type
/// guarantees that any `StopId` value is valid by construction.
///
/// # Examples
///
/// ```
/// use stop_board::domain::StopId;
///
/// let stop = StopId::parse("002023").unwrap();
/// assert_eq!(stop.as_str(), "002023");
///
/// // Non-digits are rejected
/// assert!(StopId::parse("OO2O23").is_err());
/// assert!(StopId::parse("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StopId(String);

impl StopId {
    /// Parse a stop id from a string.
    ///
    /// The input must be one or more ASCII digits.
    pub fn parse(s: &str) -> Result<Self, InvalidStopId> {
        if s.is_empty() {
            return Err(InvalidStopId {
                reason: "must not be empty",
            });
        }

        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidStopId {
                reason: "must be ASCII digits 0-9",
            });
        }

        Ok(StopId(s.to_string()))
    }

    /// Extract a stop id from a pasted journey-planner URL.
    ///
    /// Users copy URLs like
    /// `https://jp.translink.com.au/plan-your-journey/stops/002023`;
    /// the id is the run of digits following a `stops/` path segment.
    /// Anything without such a segment is rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use stop_board::domain::StopId;
    ///
    /// let stop = StopId::from_url("https://example.com/stops/002023").unwrap();
    /// assert_eq!(stop.as_str(), "002023");
    ///
    /// assert!(StopId::from_url("https://example.com/plan").is_err());
    /// ```
    pub fn from_url(url: &str) -> Result<Self, InvalidStopUrl> {
        let mut rest = url;
        while let Some(idx) = rest.find("stops/") {
            let after = &rest[idx + "stops/".len()..];
            let digits: &str = {
                let end = after
                    .as_bytes()
                    .iter()
                    .position(|b| !b.is_ascii_digit())
                    .unwrap_or(after.len());
                &after[..end]
            };

            if !digits.is_empty() {
                // parse cannot fail here: digits is non-empty ASCII digits
                return StopId::parse(digits).map_err(|_| InvalidStopUrl);
            }

            rest = after;
        }

        Err(InvalidStopUrl)
    }

    /// Returns the stop id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StopId {
    type Error = InvalidStopId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        StopId::parse(&s)
    }
}

impl From<StopId> for String {
    fn from(id: StopId) -> String {
        id.0
    }
}

impl fmt::Debug for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopId({})", self.0)
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
