//! Read-through cached favorites list.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::FavoriteStop;

use super::client::FavoritesBackend;
use super::error::FavoritesError;

/// The client-side favorites list, synchronized against the backend.
///
/// Holds an ordered snapshot (newest first, as the backend returns it)
/// behind a lock. `refresh` replaces the snapshot wholesale on success
/// and preserves the existing one on failure.
pub struct FavoriteList<B> {
    inner: Arc<RwLock<Vec<FavoriteStop>>>,
    backend: Arc<B>,
}

impl<B> Clone for FavoriteList<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: FavoritesBackend> FavoriteList<B> {
    /// Create a list by fetching from the backend.
    ///
    /// Fails if the backend is unreachable.
    pub async fn fetch(backend: Arc<B>) -> Result<Self, FavoritesError> {
        let favorites = backend.list().await?;

        Ok(Self {
            inner: Arc::new(RwLock::new(favorites)),
            backend,
        })
    }

    /// Create an empty list without contacting the backend.
    pub fn empty(backend: Arc<B>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Vec::new())),
            backend,
        }
    }

    /// Snapshot of the current favorites, newest first.
    pub async fn all(&self) -> Vec<FavoriteStop> {
        self.inner.read().await.clone()
    }

    /// Number of favorites in the snapshot.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Whether the snapshot is empty.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Re-sync the list from the backend.
    ///
    /// On success, replaces the snapshot and returns the new count. On
    /// failure, the existing snapshot is preserved and the error is
    /// returned.
    pub async fn refresh(&self) -> Result<usize, FavoritesError> {
        let favorites = self.backend.list().await?;
        let count = favorites.len();

        let mut guard = self.inner.write().await;
        *guard = favorites;

        Ok(count)
    }

    /// The backend this list syncs against.
    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }
}
