//! Request and response types for the JSON API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{FavoriteStop, StopId};
use crate::refresh::{DashboardPhase, TimerState};
use crate::transit::Timetable;

/// Error payload returned with non-success statuses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body of `POST /api/favorites`.
#[derive(Debug, Deserialize)]
pub struct AddFavoriteRequest {
    /// A pasted journey-planner stop URL.
    pub url: String,
}

/// A favorite as presented to clients.
#[derive(Debug, Serialize)]
pub struct FavoriteView {
    pub id: String,
    pub name: String,
    pub stop_id: String,
    pub transport_type: String,
    pub created_at: Option<String>,
}

impl From<FavoriteStop> for FavoriteView {
    fn from(favorite: FavoriteStop) -> Self {
        Self {
            id: favorite.id,
            name: favorite.name,
            stop_id: favorite.stop_id.to_string(),
            transport_type: favorite.transport_type.label().to_string(),
            created_at: favorite.created_at,
        }
    }
}

/// Response of `GET /api/favorites`.
#[derive(Debug, Serialize)]
pub struct FavoritesResponse {
    pub favorites: Vec<FavoriteView>,
}

/// A single departure row for display.
#[derive(Debug, Serialize)]
pub struct DepartureView {
    /// Route short name, when the stop's route list knows it.
    pub route: Option<String>,
    pub headsign: Option<String>,
    pub scheduled_departure_utc: String,
    pub expected_departure_utc: Option<String>,
    /// Delay classification, e.g. "On time" or "Late (4 min)".
    pub status: String,
    pub is_cancelled: bool,
}

/// A stop's timetable for display.
#[derive(Debug, Serialize)]
pub struct TimetableView {
    pub stop_id: String,
    pub name: String,
    pub zone: Option<String>,
    pub departures: Vec<DepartureView>,
    /// Number of service alerts currently in effect.
    pub current_alerts: usize,
}

impl TimetableView {
    /// Build the display form of a fetched timetable.
    pub fn from_timetable(stop_id: &StopId, timetable: &Timetable) -> Self {
        let departures = timetable
            .departures
            .iter()
            .map(|dep| DepartureView {
                route: timetable
                    .route(&dep.route_id)
                    .and_then(|r| r.name.clone()),
                headsign: dep.headsign.clone(),
                scheduled_departure_utc: dep.scheduled_departure_utc.clone(),
                expected_departure_utc: dep
                    .realtime
                    .as_ref()
                    .map(|rt| rt.expected_departure_utc.clone()),
                status: dep.delay_status().to_string(),
                is_cancelled: dep.is_cancelled(),
            })
            .collect();

        Self {
            stop_id: stop_id.to_string(),
            name: timetable.name.clone(),
            zone: timetable.zone.clone(),
            departures,
            current_alerts: timetable
                .service_alerts
                .as_ref()
                .map_or(0, |alerts| alerts.current.len()),
        }
    }
}

/// Response of `GET /api/timetables`: the displayed mapping, keyed by
/// stop id. A favorite absent from the mapping is still loading.
#[derive(Debug, Serialize)]
pub struct TimetablesResponse {
    pub timetables: BTreeMap<String, TimetableView>,
}

/// Response of `GET /api/refresh`.
#[derive(Debug, Serialize)]
pub struct RefreshStateView {
    pub progress: u8,
    pub is_active: bool,
    pub millis_left: u64,
    pub phase: &'static str,
}

impl RefreshStateView {
    pub fn new(state: TimerState, millis_left: u64, phase: DashboardPhase) -> Self {
        Self {
            progress: state.progress,
            is_active: state.is_active,
            millis_left,
            phase: phase_label(phase),
        }
    }
}

/// Response of `GET /api/session`.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub signed_in: bool,
}

fn phase_label(phase: DashboardPhase) -> &'static str {
    match phase {
        DashboardPhase::Idle => "idle",
        DashboardPhase::LoadingFavorites => "loading_favorites",
        DashboardPhase::Ready => "ready",
        DashboardPhase::Refreshing => "refreshing",
        DashboardPhase::SyncingFavorites => "syncing_favorites",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransportType;
    use crate::transit::{Departure, Realtime, Route};

    #[test]
    fn favorite_view_from_record() {
        let favorite = FavoriteStop {
            id: "fav-1".to_string(),
            user_id: "user-1".to_string(),
            name: "Main St".to_string(),
            stop_id: StopId::parse("002023").unwrap(),
            transport_type: TransportType::Bus,
            created_at: Some("2026-08-01T09:30:00+00:00".to_string()),
        };

        let view = FavoriteView::from(favorite);
        assert_eq!(view.stop_id, "002023");
        assert_eq!(view.transport_type, "Bus");
    }

    #[test]
    fn timetable_view_resolves_routes_and_delay() {
        let timetable = Timetable {
            id: None,
            name: "Main St".to_string(),
            zone: Some("1".to_string()),
            position: None,
            routes: vec![Route {
                id: "66-4158".to_string(),
                name: Some("66".to_string()),
                region_name: None,
                head_sign: Some("RBWH".to_string()),
                direction: None,
            }],
            departures: vec![Departure {
                id: "dep-1".to_string(),
                route_id: "66-4158".to_string(),
                headsign: Some("RBWH".to_string()),
                direction: None,
                scheduled_departure_utc: "2026-08-01T09:30:00+00:00".to_string(),
                departure_description: None,
                can_board_debark: None,
                realtime: Some(Realtime {
                    expected_departure_utc: "2026-08-01T09:34:00+00:00".to_string(),
                    is_extra: false,
                    is_skipped: false,
                    is_cancelled: false,
                }),
            }],
            service_alerts: None,
        };

        let stop = StopId::parse("002023").unwrap();
        let view = TimetableView::from_timetable(&stop, &timetable);

        assert_eq!(view.departures.len(), 1);
        assert_eq!(view.departures[0].route.as_deref(), Some("66"));
        assert_eq!(view.departures[0].status, "Late (4 min)");
        assert!(!view.departures[0].is_cancelled);
        assert_eq!(view.current_alerts, 0);
    }

    #[test]
    fn unknown_route_id_renders_without_route_name() {
        let timetable = Timetable {
            id: None,
            name: "Main St".to_string(),
            zone: None,
            position: None,
            routes: Vec::new(),
            departures: vec![Departure {
                id: "dep-1".to_string(),
                route_id: "unknown".to_string(),
                headsign: None,
                direction: None,
                scheduled_departure_utc: "2026-08-01T09:30:00+00:00".to_string(),
                departure_description: None,
                can_board_debark: None,
                realtime: None,
            }],
            service_alerts: None,
        };

        let stop = StopId::parse("002023").unwrap();
        let view = TimetableView::from_timetable(&stop, &timetable);

        assert!(view.departures[0].route.is_none());
        assert_eq!(view.departures[0].status, "Scheduled");
    }
}
