//! Transit API response DTOs.
//!
//! These types map directly to the journey-planner stop timetable JSON
//! responses. The raw DTO uses `Option` liberally because the API omits
//! fields rather than sending null values; `Timetable` is the validated
//! form the rest of the crate works with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DelayStatus;

/// Raw response from the stop timetable endpoint.
///
/// Everything is optional at this layer; `Timetable::from_dto` decides
/// what a usable response must contain.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopTimetableDto {
    /// Stop identifier, echoed back by the API.
    pub id: Option<String>,

    /// Human-readable stop name.
    pub name: Option<String>,

    /// Fare zone.
    pub zone: Option<String>,

    /// Stop location.
    pub position: Option<Position>,

    /// Routes serving this stop.
    pub routes: Option<Vec<Route>>,

    /// Upcoming departures.
    pub departures: Option<Vec<Departure>>,

    /// Current and upcoming service alerts for the stop.
    pub service_alerts: Option<ServiceAlerts>,
}

/// Geographic coordinates of a stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

/// A route serving a stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: String,

    /// Route short name (e.g. "66").
    pub name: Option<String>,

    pub region_name: Option<String>,

    pub head_sign: Option<String>,

    pub direction: Option<String>,
}

/// Live-tracking annotations for a departure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Realtime {
    /// When the vehicle is actually expected to depart.
    pub expected_departure_utc: String,

    #[serde(default)]
    pub is_extra: bool,

    #[serde(default)]
    pub is_skipped: bool,

    #[serde(default)]
    pub is_cancelled: bool,
}

/// A single departure from a stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Departure {
    pub id: String,

    pub route_id: String,

    pub headsign: Option<String>,

    pub direction: Option<String>,

    /// Static scheduled departure time (RFC 3339).
    pub scheduled_departure_utc: String,

    /// Human-readable description, e.g. "5 minutes".
    pub departure_description: Option<String>,

    pub can_board_debark: Option<String>,

    /// Present only when live tracking data exists for this departure.
    pub realtime: Option<Realtime>,
}

impl Departure {
    /// Parse the scheduled departure time.
    pub fn scheduled_time(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.scheduled_departure_utc)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }

    /// Classify this departure against its realtime estimate.
    pub fn delay_status(&self) -> DelayStatus {
        DelayStatus::classify(
            &self.scheduled_departure_utc,
            self.realtime
                .as_ref()
                .map(|rt| rt.expected_departure_utc.as_str()),
        )
    }

    /// Whether the departure has been cancelled outright.
    pub fn is_cancelled(&self) -> bool {
        self.realtime.as_ref().is_some_and(|rt| rt.is_cancelled)
    }
}

/// A single service alert notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAlertInfo {
    pub id: Option<i64>,
    pub title: String,
    pub url: Option<String>,
    pub severity: Option<String>,
    pub cause: Option<String>,
    pub effect: Option<String>,
    pub starts_utc: Option<String>,
}

/// Service alerts attached to a stop timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAlerts {
    /// When the alert set was generated.
    pub at: Option<String>,

    #[serde(default)]
    pub current: Vec<ServiceAlertInfo>,

    #[serde(default)]
    pub upcoming: Vec<ServiceAlertInfo>,
}

/// Error returned when a timetable response lacks required fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct MalformedTimetable {
    reason: &'static str,
}

/// A validated stop timetable.
///
/// Guaranteed to carry a non-empty stop name and a departures list
/// (possibly empty: a stop with no upcoming services is still a valid
/// timetable). Fetched fresh each refresh cycle, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Timetable {
    pub id: Option<String>,
    pub name: String,
    pub zone: Option<String>,
    pub position: Option<Position>,
    pub routes: Vec<Route>,
    pub departures: Vec<Departure>,
    pub service_alerts: Option<ServiceAlerts>,
}

impl Timetable {
    /// Validate a raw API response.
    ///
    /// A response without a stop name or without a departures field is
    /// rejected; a nominally successful request that returns such a
    /// body counts as a fetch failure for that stop.
    pub fn from_dto(dto: StopTimetableDto) -> Result<Timetable, MalformedTimetable> {
        let name = match dto.name {
            Some(name) if !name.is_empty() => name,
            _ => {
                return Err(MalformedTimetable {
                    reason: "missing stop name",
                });
            }
        };

        let departures = dto.departures.ok_or(MalformedTimetable {
            reason: "missing departures",
        })?;

        Ok(Timetable {
            id: dto.id,
            name,
            zone: dto.zone,
            position: dto.position,
            routes: dto.routes.unwrap_or_default(),
            departures,
            service_alerts: dto.service_alerts,
        })
    }

    /// Find the route details for a departure by route id.
    pub fn route(&self, route_id: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.id == route_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto_from(json: &str) -> StopTimetableDto {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn validates_complete_response() {
        let dto = dto_from(
            r#"{
                "id": "002023",
                "name": "Adelaide St Stop 23",
                "zone": "1",
                "position": { "lat": -27.468, "lng": 153.028 },
                "routes": [
                    { "id": "66-4158", "name": "66", "headSign": "RBWH", "direction": "0" }
                ],
                "departures": [
                    {
                        "id": "dep-1",
                        "routeId": "66-4158",
                        "headsign": "RBWH",
                        "scheduledDepartureUtc": "2026-08-01T09:30:00+00:00",
                        "departureDescription": "5 minutes"
                    }
                ]
            }"#,
        );

        let timetable = Timetable::from_dto(dto).unwrap();
        assert_eq!(timetable.name, "Adelaide St Stop 23");
        assert_eq!(timetable.departures.len(), 1);
        assert_eq!(timetable.route("66-4158").unwrap().name.as_deref(), Some("66"));
        assert!(timetable.route("other").is_none());
    }

    #[test]
    fn missing_name_is_malformed() {
        let dto = dto_from(r#"{ "departures": [] }"#);
        assert!(Timetable::from_dto(dto).is_err());
    }

    #[test]
    fn empty_name_is_malformed() {
        let dto = dto_from(r#"{ "name": "", "departures": [] }"#);
        assert!(Timetable::from_dto(dto).is_err());
    }

    #[test]
    fn missing_departures_is_malformed() {
        let dto = dto_from(r#"{ "name": "Adelaide St Stop 23" }"#);
        assert!(Timetable::from_dto(dto).is_err());
    }

    #[test]
    fn empty_departures_is_valid() {
        let dto = dto_from(r#"{ "name": "Adelaide St Stop 23", "departures": [] }"#);
        let timetable = Timetable::from_dto(dto).unwrap();
        assert!(timetable.departures.is_empty());
        assert!(timetable.routes.is_empty());
    }

    #[test]
    fn departure_realtime_flags_default_false() {
        let departure: Departure = serde_json::from_str(
            r#"{
                "id": "dep-1",
                "routeId": "66-4158",
                "scheduledDepartureUtc": "2026-08-01T09:30:00+00:00",
                "realtime": { "expectedDepartureUtc": "2026-08-01T09:34:00+00:00" }
            }"#,
        )
        .unwrap();

        let rt = departure.realtime.as_ref().unwrap();
        assert!(!rt.is_cancelled);
        assert!(!rt.is_skipped);
        assert!(!rt.is_extra);
        assert!(!departure.is_cancelled());
    }

    #[test]
    fn delay_status_uses_realtime() {
        let departure: Departure = serde_json::from_str(
            r#"{
                "id": "dep-1",
                "routeId": "66-4158",
                "scheduledDepartureUtc": "2026-08-01T09:30:00+00:00",
                "realtime": { "expectedDepartureUtc": "2026-08-01T09:34:00+00:00" }
            }"#,
        )
        .unwrap();

        assert_eq!(departure.delay_status(), DelayStatus::Late(4));
    }

    #[test]
    fn delay_status_without_realtime_is_scheduled() {
        let departure: Departure = serde_json::from_str(
            r#"{
                "id": "dep-1",
                "routeId": "66-4158",
                "scheduledDepartureUtc": "2026-08-01T09:30:00+00:00"
            }"#,
        )
        .unwrap();

        assert_eq!(departure.delay_status(), DelayStatus::Scheduled);
    }

    #[test]
    fn scheduled_time_parses() {
        let departure = Departure {
            id: "dep-1".to_string(),
            route_id: "66-4158".to_string(),
            headsign: None,
            direction: None,
            scheduled_departure_utc: "2026-08-01T19:30:00+10:00".to_string(),
            departure_description: None,
            can_board_debark: None,
            realtime: None,
        };

        let time = departure.scheduled_time().unwrap();
        assert_eq!(time.to_rfc3339(), "2026-08-01T09:30:00+00:00");
    }
}
