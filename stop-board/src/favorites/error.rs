//! Favorites storage error types.

/// Errors that can occur when interacting with the favorites backend.
#[derive(Debug, thiserror::Error)]
pub enum FavoritesError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No signed-in session, or the backend rejected the credentials
    #[error("must be signed in to modify favorites")]
    Unauthorized,

    /// Backend returned an error status
    #[error("storage API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },
}
