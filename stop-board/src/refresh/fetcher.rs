//! Batch timetable fetching.

use std::collections::HashMap;
use std::future::Future;

use tracing::warn;

use crate::domain::{FavoriteStop, StopId};
use crate::transit::{MockTransitClient, Timetable, TransitClient, TransitError};

/// Trait for retrieving a single stop's timetable.
///
/// This abstraction allows the refresh cycle to be tested with mock
/// data.
pub trait TimetableSource {
    /// Fetch the current timetable for a stop.
    fn stop_timetable(
        &self,
        stop: &StopId,
    ) -> impl Future<Output = Result<Timetable, TransitError>> + Send;
}

impl TimetableSource for TransitClient {
    fn stop_timetable(
        &self,
        stop: &StopId,
    ) -> impl Future<Output = Result<Timetable, TransitError>> + Send {
        self.get_stop_timetable(stop)
    }
}

impl TimetableSource for MockTransitClient {
    fn stop_timetable(
        &self,
        stop: &StopId,
    ) -> impl Future<Output = Result<Timetable, TransitError>> + Send {
        self.get_stop_timetable(stop)
    }
}

/// Fetches timetables for a batch of favorite stops.
///
/// Stops are fetched one at a time; favorite lists are small, and
/// sequential requests keep the load on the upstream API predictable.
pub struct TimetableFetcher<'a, C: TimetableSource> {
    source: &'a C,
}

impl<'a, C: TimetableSource> TimetableFetcher<'a, C> {
    /// Create a fetcher over the given source.
    pub fn new(source: &'a C) -> Self {
        Self { source }
    }

    /// Fetch timetables for every favorite in the batch.
    ///
    /// A stop that fails retrieval (network error, error status,
    /// malformed payload) is logged and omitted from the result; the
    /// rest of the batch proceeds, and no error escapes this call.
    /// Consumers must treat a stop missing from the result as "still
    /// loading", not as a stop with no service: the entry reappears
    /// once a later cycle fetches it successfully.
    ///
    /// The returned mapping is a complete replacement for whatever the
    /// caller held before, never a partial merge.
    pub async fn fetch_timetables(&self, stops: &[FavoriteStop]) -> HashMap<StopId, Timetable> {
        let mut timetables = HashMap::with_capacity(stops.len());

        for favorite in stops {
            if timetables.contains_key(&favorite.stop_id) {
                // Duplicate favorites share a single fetch per cycle.
                continue;
            }

            match self.source.stop_timetable(&favorite.stop_id).await {
                Ok(timetable) => {
                    timetables.insert(favorite.stop_id.clone(), timetable);
                }
                Err(error) => {
                    warn!(
                        stop = %favorite.stop_id,
                        %error,
                        "timetable fetch failed; stop omitted until next cycle"
                    );
                }
            }
        }

        timetables
    }
}
