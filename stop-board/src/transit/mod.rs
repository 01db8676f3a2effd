//! Journey-planner transit API client.
//!
//! This module provides an HTTP client for the public journey-planner
//! stop timetable endpoint, which reports the routes and upcoming
//! departures for a stop together with realtime adjustments.
//!
//! Key characteristics of the API:
//! - Timetable data is **transient**: each response is a live snapshot
//!   and is re-fetched fresh on every refresh cycle, never merged
//! - Times are RFC 3339 UTC timestamps
//! - Fields are omitted rather than sent as null, so the wire DTOs use
//!   `Option` liberally and responses are validated before use

mod client;
mod error;
pub mod mock;
mod types;

pub use client::{TransitClient, TransitConfig};
pub use error::TransitError;
pub use mock::MockTransitClient;
pub use types::{
    Departure, MalformedTimetable, Position, Realtime, Route, ServiceAlertInfo, ServiceAlerts,
    StopTimetableDto, Timetable,
};
