//! Dashboard refresh orchestration.
//!
//! Owns the favorites list and the displayed timetable mapping, and
//! wires the refresh timer to the fetcher: on each completed cycle the
//! mapping is rebuilt from live data and swapped in whole. Mutating
//! the favorites re-syncs the list only; the timetables catch up on
//! the next scheduled cycle.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use crate::domain::{FavoriteStop, FavoriteStopInput, InvalidStopUrl, StopId, TransportType};
use crate::favorites::{FavoriteList, FavoritesBackend, FavoritesError};
use crate::transit::{Timetable, TransitError};

use super::fetcher::{TimetableFetcher, TimetableSource};
use super::timer::{CompletionCallback, RefreshTimer, TimerConfig};

/// Error from adding a favorite by pasted URL.
#[derive(Debug, thiserror::Error)]
pub enum AddFavoriteError {
    /// The URL carries no recognizable stop id; rejected before any
    /// network call.
    #[error("invalid stop URL: {0}")]
    InvalidUrl(#[from] InvalidStopUrl),

    /// The stop's timetable could not be fetched to resolve its name.
    #[error("failed to look up stop: {0}")]
    Lookup(#[from] TransitError),

    /// The storage backend rejected the new favorite.
    #[error("failed to store favorite: {0}")]
    Storage(#[from] FavoritesError),
}

/// Where the dashboard is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardPhase {
    /// Nothing loaded; also the terminal state when the favorites
    /// list could not be loaded at mount.
    Idle,
    /// The one-time favorites load on mount is in progress.
    LoadingFavorites,
    /// Favorites loaded, timer running, timetables on display.
    Ready,
    /// A refresh cycle's fetch pass is in progress.
    Refreshing,
    /// A mutation-triggered favorites re-sync is in progress.
    SyncingFavorites,
}

/// State owned by the dashboard, shared with the timer callback.
struct DashboardInner<C, B> {
    source: Arc<C>,
    favorites: FavoriteList<B>,
    timetables: RwLock<HashMap<StopId, Timetable>>,
    phase: RwLock<DashboardPhase>,
    torn_down: AtomicBool,
}

impl<C: TimetableSource, B: FavoritesBackend> DashboardInner<C, B> {
    /// One refresh pass: fetch every favorite's timetable and replace
    /// the displayed mapping wholesale.
    ///
    /// The swap happens only after the whole batch has resolved, so
    /// readers never observe a half-updated mapping. If the dashboard
    /// was torn down while the batch was in flight, the results are
    /// discarded.
    async fn refresh_timetables(&self) {
        if self.torn_down.load(Ordering::SeqCst) {
            return;
        }

        *self.phase.write().await = DashboardPhase::Refreshing;

        let stops = self.favorites.all().await;
        let fetcher = TimetableFetcher::new(self.source.as_ref());
        let fresh = fetcher.fetch_timetables(&stops).await;

        if self.torn_down.load(Ordering::SeqCst) {
            debug!("dashboard torn down mid-refresh; discarding batch");
            return;
        }

        *self.timetables.write().await = fresh;
        *self.phase.write().await = DashboardPhase::Ready;
    }

    /// Re-sync the favorites list after a mutation. The timetable
    /// mapping is left alone; the next cycle picks up the change.
    async fn sync_favorites(&self) {
        *self.phase.write().await = DashboardPhase::SyncingFavorites;

        match self.favorites.refresh().await {
            Ok(count) => debug!(count, "favorites re-synced"),
            Err(error) => warn!(%error, "favorites re-sync failed; keeping previous list"),
        }

        *self.phase.write().await = DashboardPhase::Ready;
    }
}

/// The favorites dashboard.
///
/// Construction is `mount`: the favorites list is loaded once, the
/// timetables are fetched, and the refresh timer takes over. The
/// collaborators (timetable source, storage backend) are explicit
/// constructor inputs so the whole refresh core runs against mocks in
/// tests.
pub struct Dashboard<C, B> {
    inner: Arc<DashboardInner<C, B>>,
    timer: RefreshTimer,
}

impl<C, B> Dashboard<C, B>
where
    C: TimetableSource + Send + Sync + 'static,
    B: FavoritesBackend + Send + Sync + 'static,
{
    /// Load favorites, fetch their timetables, and start the refresh
    /// timer.
    ///
    /// A favorites-load failure is logged and leaves an empty, idle
    /// dashboard: no retry loop runs, and the timer stays off until a
    /// caller remounts. Individual timetable failures never fail a
    /// mount.
    pub async fn mount(source: Arc<C>, backend: Arc<B>, timer_config: TimerConfig) -> Self {
        let inner = Arc::new(DashboardInner {
            source,
            favorites: FavoriteList::empty(backend),
            timetables: RwLock::new(HashMap::new()),
            phase: RwLock::new(DashboardPhase::LoadingFavorites),
            torn_down: AtomicBool::new(false),
        });

        let loaded = match inner.favorites.refresh().await {
            Ok(count) => {
                debug!(count, "favorites loaded");
                true
            }
            Err(error) => {
                error!(%error, "failed to load favorites; dashboard starts empty");
                *inner.phase.write().await = DashboardPhase::Idle;
                false
            }
        };

        if loaded {
            inner.refresh_timetables().await;
        }

        // The callback holds a weak reference: a dropped dashboard
        // must not be kept alive by its own timer.
        let callback: CompletionCallback = {
            let weak = Arc::downgrade(&inner);
            Arc::new(move || {
                let weak = weak.clone();
                Box::pin(async move {
                    if let Some(inner) = weak.upgrade() {
                        inner.refresh_timetables().await;
                    }
                    Ok(())
                })
            })
        };

        let mut timer_config = timer_config;
        if !loaded {
            timer_config.auto_start = false;
        }
        let timer = RefreshTimer::new(timer_config, callback);

        Self { inner, timer }
    }

    /// Add a favorite from a pasted stop URL.
    ///
    /// The stop id is extracted first; an unparseable URL is rejected
    /// before anything touches the network. The stop's timetable is
    /// then fetched to resolve its display name, the favorite is
    /// stored, and the favorites list re-synced. The new stop's
    /// timetable appears with the next refresh cycle.
    pub async fn add_favorite(&self, url: &str) -> Result<FavoriteStop, AddFavoriteError> {
        let stop_id = StopId::from_url(url)?;

        let timetable = self.inner.source.stop_timetable(&stop_id).await?;

        let input = FavoriteStopInput {
            name: timetable.name.clone(),
            stop_id,
            // The stops/ URL id space is the bus-stop one.
            transport_type: TransportType::Bus,
        };

        let created = self.inner.favorites.backend().add(&input).await?;
        self.inner.sync_favorites().await;

        Ok(created)
    }

    /// Remove a favorite by its record id, then re-sync the list.
    pub async fn remove_favorite(&self, id: &str) -> Result<(), FavoritesError> {
        self.inner.favorites.backend().delete(id).await?;
        self.inner.sync_favorites().await;
        Ok(())
    }

    /// Re-sync the favorites list from the backend, e.g. after a
    /// session change. A failure keeps the previous list.
    pub async fn sync_favorites(&self) {
        self.inner.sync_favorites().await;
    }

    /// Snapshot of the favorites list, newest first.
    pub async fn favorites(&self) -> Vec<FavoriteStop> {
        self.inner.favorites.all().await
    }

    /// Snapshot of the displayed timetable mapping.
    ///
    /// A favorite missing from the mapping is still loading (or failed
    /// its last fetch); it is never an assertion that the stop has no
    /// service.
    pub async fn timetables(&self) -> HashMap<StopId, Timetable> {
        self.inner.timetables.read().await.clone()
    }

    /// Current lifecycle phase.
    pub async fn phase(&self) -> DashboardPhase {
        *self.inner.phase.read().await
    }

    /// The refresh timer, for progress display and manual control.
    pub fn timer(&self) -> &RefreshTimer {
        &self.timer
    }

    /// Stop refreshing and mark the dashboard torn down.
    ///
    /// An in-flight fetch batch is not cancelled, but its result will
    /// be discarded rather than applied.
    pub fn unmount(&self) {
        self.timer.stop();
        self.inner.torn_down.store(true, Ordering::SeqCst);
    }
}

impl<C, B> Drop for Dashboard<C, B> {
    fn drop(&mut self) {
        self.timer.stop();
        self.inner.torn_down.store(true, Ordering::SeqCst);
    }
}
