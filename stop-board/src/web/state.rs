//! Application state for the web layer.

use std::sync::Arc;

use crate::auth::SessionProvider;
use crate::favorites::FavoritesClient;
use crate::refresh::Dashboard;
use crate::transit::TransitClient;

/// Shared application state.
///
/// Contains the mounted dashboard and the session collaborator.
#[derive(Clone)]
pub struct AppState {
    /// The mounted favorites dashboard
    pub dashboard: Arc<Dashboard<TransitClient, FavoritesClient>>,

    /// Current authentication session
    pub session: SessionProvider,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        dashboard: Arc<Dashboard<TransitClient, FavoritesClient>>,
        session: SessionProvider,
    ) -> Self {
        Self { dashboard, session }
    }
}
