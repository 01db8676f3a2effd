//! Favorite stop records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::stop::StopId;
use super::transport::TransportType;

/// A stop the user has bookmarked, as stored by the backend.
///
/// The `id` is assigned by the storage backend on insert and is the
/// record's identity; `stop_id` is the journey-planner identifier the
/// timetable is fetched with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteStop {
    /// Backend-assigned record id.
    pub id: String,

    /// Owner of this favorite.
    pub user_id: String,

    /// Display name (the stop name at the time the favorite was added).
    pub name: String,

    /// Journey-planner stop identifier.
    pub stop_id: StopId,

    /// Which id space the stop belongs to.
    #[serde(default)]
    pub transport_type: TransportType,

    /// When the favorite was created (RFC 3339, set by the backend).
    pub created_at: Option<String>,
}

impl FavoriteStop {
    /// Parse the creation timestamp, if present and well-formed.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.created_at.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

/// The client-supplied fields for creating a favorite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteStopInput {
    pub name: String,
    pub stop_id: StopId,
    pub transport_type: TransportType,
}
