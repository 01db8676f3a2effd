use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use stop_board::auth::{Session, SessionProvider};
use stop_board::favorites::{FavoritesClient, FavoritesConfig};
use stop_board::refresh::{Dashboard, TimerConfig};
use stop_board::transit::{TransitClient, TransitConfig};
use stop_board::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Transit API endpoint (defaults to the production journey planner)
    let transit_config = match std::env::var("STOPBOARD_TRANSIT_URL") {
        Ok(url) => TransitConfig::new().with_base_url(url),
        Err(_) => TransitConfig::new(),
    };
    let transit = TransitClient::new(transit_config).expect("Failed to create transit client");

    // Storage backend credentials from environment
    let storage_url = std::env::var("STOPBOARD_STORAGE_URL").unwrap_or_else(|_| {
        warn!("STOPBOARD_STORAGE_URL not set. Favorites calls will fail.");
        String::new()
    });
    let storage_key = std::env::var("STOPBOARD_STORAGE_API_KEY").unwrap_or_else(|_| {
        warn!("STOPBOARD_STORAGE_API_KEY not set. Favorites calls will fail.");
        String::new()
    });

    // Optional pre-established session (user id + access token)
    let session = match (
        std::env::var("STOPBOARD_USER_ID"),
        std::env::var("STOPBOARD_ACCESS_TOKEN"),
    ) {
        (Ok(user_id), Ok(token)) => {
            info!(%user_id, "starting with a signed-in session");
            SessionProvider::with_session(Session::new(user_id, token))
        }
        _ => SessionProvider::new(),
    };

    let favorites = FavoritesClient::new(
        FavoritesConfig::new(storage_url, storage_key),
        session.clone(),
    )
    .expect("Failed to create favorites client");

    // Mount the dashboard: load favorites, fetch timetables, start the
    // refresh timer
    let dashboard = Arc::new(
        Dashboard::mount(Arc::new(transit), Arc::new(favorites), TimerConfig::new()).await,
    );
    info!(
        favorites = dashboard.favorites().await.len(),
        "dashboard mounted"
    );

    // Re-sync the favorites list whenever the session changes
    let mut session_rx = session.subscribe();
    let dashboard_sync = Arc::clone(&dashboard);
    tokio::spawn(async move {
        while session_rx.changed().await.is_ok() {
            info!("session changed; re-syncing favorites");
            dashboard_sync.sync_favorites().await;
        }
    });

    // Build app state and router
    let state = AppState::new(dashboard, session);
    let app = create_router(state);

    // Bind and serve
    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    info!("stop-board listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
