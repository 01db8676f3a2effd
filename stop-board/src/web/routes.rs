//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
use tracing::warn;

use crate::favorites::FavoritesError;
use crate::refresh::AddFavoriteError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/favorites", get(list_favorites).post(add_favorite))
        .route("/api/favorites/:id", delete(delete_favorite))
        .route("/api/timetables", get(timetables))
        .route("/api/refresh", get(refresh_state))
        .route("/api/session", get(session))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Current favorites, newest first.
async fn list_favorites(State(state): State<AppState>) -> Json<FavoritesResponse> {
    let favorites = state
        .dashboard
        .favorites()
        .await
        .into_iter()
        .map(FavoriteView::from)
        .collect();

    Json(FavoritesResponse { favorites })
}

/// Add a favorite from a pasted stop URL.
async fn add_favorite(
    State(state): State<AppState>,
    Json(req): Json<AddFavoriteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let created = state.dashboard.add_favorite(&req.url).await?;
    Ok((StatusCode::CREATED, Json(FavoriteView::from(created))))
}

/// Remove a favorite by record id.
async fn delete_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.dashboard.remove_favorite(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The displayed timetable mapping.
async fn timetables(State(state): State<AppState>) -> Json<TimetablesResponse> {
    let timetables = state
        .dashboard
        .timetables()
        .await
        .iter()
        .map(|(stop, timetable)| {
            (
                stop.to_string(),
                TimetableView::from_timetable(stop, timetable),
            )
        })
        .collect();

    Json(TimetablesResponse { timetables })
}

/// Refresh timer progress and dashboard phase.
async fn refresh_state(State(state): State<AppState>) -> Json<RefreshStateView> {
    let timer = state.dashboard.timer();
    let phase = state.dashboard.phase().await;

    Json(RefreshStateView::new(
        timer.state(),
        timer.time_left().as_millis() as u64,
        phase,
    ))
}

/// Whether a user is currently signed in.
async fn session(State(state): State<AppState>) -> Json<SessionView> {
    Json(SessionView {
        signed_in: state.session.is_signed_in(),
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Unauthorized { message: String },
    Upstream { message: String },
}

impl From<AddFavoriteError> for AppError {
    fn from(e: AddFavoriteError) -> Self {
        match e {
            AddFavoriteError::InvalidUrl(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            AddFavoriteError::Storage(FavoritesError::Unauthorized) => AppError::Unauthorized {
                message: e.to_string(),
            },
            AddFavoriteError::Lookup(_) | AddFavoriteError::Storage(_) => AppError::Upstream {
                message: e.to_string(),
            },
        }
    }
}

impl From<FavoritesError> for AppError {
    fn from(e: FavoritesError) -> Self {
        match e {
            FavoritesError::Unauthorized => AppError::Unauthorized {
                message: e.to_string(),
            },
            _ => AppError::Upstream {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Unauthorized { message } => (StatusCode::UNAUTHORIZED, message),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message),
        };

        warn!(%status, %message, "request failed");

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
