//! Mock transit client for testing without API access.
//!
//! Serves stop timetables from memory, optionally pre-loaded from JSON
//! files, as if they were live API responses. Individual stops can be
//! marked as failing to exercise partial-failure handling.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::RwLock;

use crate::domain::StopId;

use super::error::TransitError;
use super::types::{StopTimetableDto, Timetable};

/// Mock transit client that serves timetables from memory.
///
/// Useful for development and testing without hitting the real journey
/// planner. Counts requests so tests can assert that an operation was
/// rejected before any fetch happened.
#[derive(Clone, Default)]
pub struct MockTransitClient {
    boards: Arc<RwLock<HashMap<StopId, Timetable>>>,
    failing: Arc<RwLock<HashSet<StopId>>>,
    latency: Arc<RwLock<Duration>>,
    calls: Arc<AtomicUsize>,
}

impl MockTransitClient {
    /// Create an empty mock client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock client by loading JSON files from a directory.
    ///
    /// Expects files named `{stop_id}.json` (e.g. `002023.json`), each
    /// containing a stop timetable response body.
    pub fn from_dir(data_dir: impl AsRef<Path>) -> Result<Self, TransitError> {
        let data_dir = data_dir.as_ref();
        let mut boards = HashMap::new();

        let entries = std::fs::read_dir(data_dir).map_err(|e| TransitError::Api {
            status: 0,
            message: format!("failed to read mock data directory: {e}"),
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| TransitError::Api {
                status: 0,
                message: format!("failed to read directory entry: {e}"),
            })?;

            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            // Extract the stop id from the filename ("002023.json" -> "002023")
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| TransitError::Api {
                    status: 0,
                    message: format!("invalid filename: {path:?}"),
                })?;

            let stop = StopId::parse(stem).map_err(|_| TransitError::Api {
                status: 0,
                message: format!("invalid stop id in filename: {stem}"),
            })?;

            let json = std::fs::read_to_string(&path).map_err(|e| TransitError::Api {
                status: 0,
                message: format!("failed to read {path:?}: {e}"),
            })?;

            let dto: StopTimetableDto =
                serde_json::from_str(&json).map_err(|e| TransitError::Json {
                    message: format!("failed to parse {path:?}: {e}"),
                })?;

            let timetable = Timetable::from_dto(dto).map_err(|source| TransitError::Malformed {
                stop: stop.clone(),
                source,
            })?;

            boards.insert(stop, timetable);
        }

        Ok(Self {
            boards: Arc::new(RwLock::new(boards)),
            failing: Arc::new(RwLock::new(HashSet::new())),
            latency: Arc::new(RwLock::new(Duration::ZERO)),
            calls: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Insert or replace a timetable.
    pub async fn insert(&self, stop: StopId, timetable: Timetable) {
        self.boards.write().await.insert(stop, timetable);
    }

    /// Remove a stop's timetable (subsequent fetches return not-found).
    pub async fn remove(&self, stop: &StopId) {
        self.boards.write().await.remove(stop);
    }

    /// Mark a stop as failing; fetches for it return an API error
    /// until cleared.
    pub async fn set_failing(&self, stop: StopId, failing: bool) {
        let mut guard = self.failing.write().await;
        if failing {
            guard.insert(stop);
        } else {
            guard.remove(&stop);
        }
    }

    /// Delay every fetch by the given duration, simulating a slow
    /// upstream.
    pub async fn set_latency(&self, latency: Duration) {
        *self.latency.write().await = latency;
    }

    /// How many fetches have been issued against this mock.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// List stops with mock data.
    pub async fn available_stops(&self) -> Vec<StopId> {
        self.boards.read().await.keys().cloned().collect()
    }

    /// Fetch the timetable for a stop.
    ///
    /// Mimics the real `TransitClient::get_stop_timetable` interface.
    pub async fn get_stop_timetable(&self, stop: &StopId) -> Result<Timetable, TransitError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let latency = *self.latency.read().await;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if self.failing.read().await.contains(stop) {
            return Err(TransitError::Api {
                status: 503,
                message: format!("mock failure for stop {stop}"),
            });
        }

        let boards = self.boards.read().await;
        boards
            .get(stop)
            .cloned()
            .ok_or_else(|| TransitError::StopNotFound { stop: stop.clone() })
    }
}
