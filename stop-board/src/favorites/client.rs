//! Favorites backend HTTP client.

use std::future::Future;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;

use crate::auth::SessionProvider;
use crate::domain::{FavoriteStop, FavoriteStopInput, StopId, TransportType};

use super::error::FavoritesError;

/// Operations the favorites store must provide.
///
/// This abstraction allows the dashboard to be tested with mock data.
/// `list` returns favorites sorted by creation time, descending.
/// `add` fails with [`FavoritesError::Unauthorized`] when no user is
/// signed in.
pub trait FavoritesBackend {
    fn list(&self) -> impl Future<Output = Result<Vec<FavoriteStop>, FavoritesError>> + Send;

    fn add(
        &self,
        input: &FavoriteStopInput,
    ) -> impl Future<Output = Result<FavoriteStop, FavoritesError>> + Send;

    fn delete(&self, id: &str) -> impl Future<Output = Result<(), FavoritesError>> + Send;
}

/// Configuration for the favorites backend client.
#[derive(Debug, Clone)]
pub struct FavoritesConfig {
    /// Base URL of the hosted backend's REST endpoint
    pub base_url: String,
    /// Project API key, sent with every request
    pub api_key: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl FavoritesConfig {
    /// Create a new config for the given project endpoint.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout_secs: 30,
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Row payload for inserts.
#[derive(Serialize)]
struct InsertRow<'a> {
    stop_id: &'a StopId,
    name: &'a str,
    transport_type: TransportType,
    user_id: &'a str,
}

/// HTTP client for the hosted favorites store.
///
/// The backend speaks a row-oriented REST dialect: rows of the
/// `favorite_stops` collection are listed, inserted and deleted over
/// plain HTTP with an API key plus a per-user bearer token. Row-level
/// security on the backend scopes every operation to the signed-in
/// user.
#[derive(Debug, Clone)]
pub struct FavoritesClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionProvider,
}

impl FavoritesClient {
    /// Create a new favorites client.
    ///
    /// The session provider supplies the bearer token for authenticated
    /// requests; without a session the project API key is used alone,
    /// which the backend treats as an anonymous read-only caller.
    pub fn new(config: FavoritesConfig, session: SessionProvider) -> Result<Self, FavoritesError> {
        let mut headers = HeaderMap::new();

        let api_key = HeaderValue::from_str(&config.api_key).map_err(|_| FavoritesError::Api {
            status: 0,
            message: "invalid API key format".to_string(),
        })?;
        headers.insert(HeaderName::from_static("apikey"), api_key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            session,
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/favorite_stops", self.base_url)
    }

    /// Attach the signed-in user's bearer token, if any.
    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.current() {
            Some(session) => req.bearer_auth(session.access_token),
            None => req,
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, FavoritesError> {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(FavoritesError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FavoritesError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response)
    }
}

impl FavoritesBackend for FavoritesClient {
    /// Fetch all favorites for the current user, newest first.
    async fn list(&self) -> Result<Vec<FavoriteStop>, FavoritesError> {
        let req = self
            .http
            .get(self.collection_url())
            .query(&[("select", "*"), ("order", "created_at.desc")]);

        let response = Self::check_status(self.authorize(req).send().await?).await?;
        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| FavoritesError::Json {
            message: e.to_string(),
        })
    }

    /// Insert a favorite for the signed-in user and return the stored row.
    async fn add(&self, input: &FavoriteStopInput) -> Result<FavoriteStop, FavoritesError> {
        let session = self.session.current().ok_or(FavoritesError::Unauthorized)?;

        let row = InsertRow {
            stop_id: &input.stop_id,
            name: &input.name,
            transport_type: input.transport_type,
            user_id: &session.user_id,
        };

        let req = self
            .http
            .post(self.collection_url())
            .header("Prefer", "return=representation")
            .json(&[row]);

        let response = Self::check_status(self.authorize(req).send().await?).await?;
        let body = response.text().await?;

        let mut rows: Vec<FavoriteStop> =
            serde_json::from_str(&body).map_err(|e| FavoritesError::Json {
                message: e.to_string(),
            })?;

        rows.pop().ok_or_else(|| FavoritesError::Api {
            status: 0,
            message: "insert returned no row".to_string(),
        })
    }

    /// Delete a favorite by its record id.
    async fn delete(&self, id: &str) -> Result<(), FavoritesError> {
        let req = self
            .http
            .delete(self.collection_url())
            .query(&[("id", format!("eq.{id}"))]);

        Self::check_status(self.authorize(req).send().await?).await?;
        Ok(())
    }
}
