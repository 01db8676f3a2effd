//! In-memory favorites backend for testing.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::DateTime;

use crate::auth::SessionProvider;
use crate::domain::{FavoriteStop, FavoriteStopInput};

use super::client::FavoritesBackend;
use super::error::FavoritesError;

/// Synthetic creation timestamps start here and advance one second per
/// insert, keeping ordering deterministic without touching the clock.
const EPOCH_SECS: i64 = 1_780_000_000;

/// Mock favorites backend backed by a Vec.
///
/// Mimics the hosted store's behavior: rows are owned by the signed-in
/// user, `add` is rejected without a session, and `list` returns rows
/// sorted by creation time descending. Operations are counted so tests
/// can assert what was (or was not) called, and list/mutation failures
/// can be injected.
#[derive(Clone)]
pub struct MockFavoritesBackend {
    session: SessionProvider,
    rows: Arc<Mutex<Vec<FavoriteStop>>>,
    next_id: Arc<AtomicUsize>,
    fail_list: Arc<AtomicBool>,
    fail_mutations: Arc<AtomicBool>,
    list_calls: Arc<AtomicUsize>,
    add_calls: Arc<AtomicUsize>,
    delete_calls: Arc<AtomicUsize>,
}

impl MockFavoritesBackend {
    /// Create an empty mock backend gated by the given session provider.
    pub fn new(session: SessionProvider) -> Self {
        Self {
            session,
            rows: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicUsize::new(1)),
            fail_list: Arc::new(AtomicBool::new(false)),
            fail_mutations: Arc::new(AtomicBool::new(false)),
            list_calls: Arc::new(AtomicUsize::new(0)),
            add_calls: Arc::new(AtomicUsize::new(0)),
            delete_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make `list` fail until cleared.
    pub fn set_fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    /// Make `add` and `delete` fail until cleared.
    pub fn set_fail_mutations(&self, fail: bool) {
        self.fail_mutations.store(fail, Ordering::SeqCst);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn add_calls(&self) -> usize {
        self.add_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Number of stored rows.
    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

impl FavoritesBackend for MockFavoritesBackend {
    async fn list(&self) -> Result<Vec<FavoriteStop>, FavoritesError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_list.load(Ordering::SeqCst) {
            return Err(FavoritesError::Api {
                status: 503,
                message: "mock list failure".to_string(),
            });
        }

        let mut rows = self.rows.lock().unwrap().clone();
        // created_at descending, like the hosted store's ordered query
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn add(&self, input: &FavoriteStopInput) -> Result<FavoriteStop, FavoritesError> {
        self.add_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(FavoritesError::Api {
                status: 503,
                message: "mock add failure".to_string(),
            });
        }

        let session = self.session.current().ok_or(FavoritesError::Unauthorized)?;

        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created_at = DateTime::from_timestamp(EPOCH_SECS + n as i64, 0)
            .map(|t| t.to_rfc3339());

        let row = FavoriteStop {
            id: format!("fav-{n}"),
            user_id: session.user_id,
            name: input.name.clone(),
            stop_id: input.stop_id.clone(),
            transport_type: input.transport_type,
            created_at,
        };

        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn delete(&self, id: &str) -> Result<(), FavoritesError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(FavoritesError::Api {
                status: 503,
                message: "mock delete failure".to_string(),
            });
        }

        self.rows.lock().unwrap().retain(|row| row.id != id);
        Ok(())
    }
}
