//! # Spotify Integration Module
//!
//! This module is the only place that talks to Spotify. It is split by the
//! three roles the rest of the application depends on:
//!
//! ```text
//! Handlers / Management
//!          ↓
//! IdentityProvider   Catalog            Playback
//!  (auth.rs)          (catalog.rs)       (playback.rs)
//!          ↓
//! SpotifyClient (reqwest, JSON)
//!          ↓
//! Spotify Accounts Service + Web API
//! ```
//!
//! ## Roles
//!
//! - [`IdentityProvider`] - authorization URL construction, authorization
//!   code exchange (PKCE) and token refresh for signed in users.
//! - [`Catalog`] - read only catalog access. Calls made on behalf of the
//!   sharer take the sharer's access token; calls made while rendering a
//!   shared link use the service identity obtained through the client
//!   credentials grant, so links keep working while the sharer is offline.
//! - [`Playback`] - adds a track to the queue of the active device of the
//!   user owning the given access token.
//!
//! The traits are the seams the HTTP layer is written against; the
//! production implementation of all three is [`SpotifyClient`].
//!
//! ## Error Handling
//!
//! Every call returns [`SpotifyError`], which separates authentication
//! failures, inaccessible resources, missing playback devices, rate limiting
//! and generic upstream failures. A `429 Too Many Requests` carrying a
//! `Retry-After` of at most [`MAX_RETRY_AFTER`] seconds is retried once.
//!
//! ## API Coverage
//!
//! - `GET /me`, `GET /me/playlists`
//! - `GET /playlists/{id}`, `GET /playlists/{id}/tracks`
//! - `GET /users/{id}`
//! - `POST /me/player/queue`
//! - `POST /api/token` (accounts service)

pub mod auth;
pub mod catalog;
mod error;
pub mod playback;

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use tokio::{sync::Mutex, time::sleep};

pub use error::SpotifyError;

use crate::{
    config::SpotifySettings,
    types::{Playlist, PlaylistDetails, PlaylistItem, Token, UserProfile},
    warning,
};

/// Longest `Retry-After` (in seconds) that is waited out before retrying.
pub const MAX_RETRY_AFTER: u64 = 120;

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// URL the browser is sent to for signing in.
    fn authorize_url(&self, state: &str, code_challenge: &str) -> Result<String, SpotifyError>;

    /// Exchanges the authorization code from the callback for a token pair.
    async fn exchange_code(&self, code: &str, code_verifier: &str) -> Result<Token, SpotifyError>;

    /// Trades a refresh token for a fresh access token.
    async fn refresh_token(&self, refresh_token: &str) -> Result<Token, SpotifyError>;
}

#[async_trait]
pub trait Catalog: Send + Sync {
    async fn current_user(&self, access_token: &str) -> Result<UserProfile, SpotifyError>;

    async fn current_user_playlists(
        &self,
        access_token: &str,
        limit: u32,
    ) -> Result<Vec<Playlist>, SpotifyError>;

    /// Playlist name, images and owner, read with the service identity.
    async fn playlist(&self, playlist_id: &str) -> Result<PlaylistDetails, SpotifyError>;

    /// Public profile of a user, read with the service identity.
    async fn user(&self, user_id: &str) -> Result<UserProfile, SpotifyError>;

    /// Every item of a playlist across all pages, read with the service identity.
    async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<PlaylistItem>, SpotifyError>;
}

#[async_trait]
pub trait Playback: Send + Sync {
    async fn add_to_queue(&self, access_token: &str, track_id: &str) -> Result<(), SpotifyError>;
}

/// reqwest based client for the Spotify accounts service and Web API.
///
/// Cheap to clone; clones share the connection pool and the cached service
/// token.
#[derive(Clone)]
pub struct SpotifyClient {
    http: Client,
    settings: SpotifySettings,
    service_token: Arc<Mutex<Option<Token>>>,
}

impl SpotifyClient {
    pub fn new(settings: SpotifySettings) -> Self {
        Self {
            http: Client::new(),
            settings,
            service_token: Arc::new(Mutex::new(None)),
        }
    }

    pub fn settings(&self) -> &SpotifySettings {
        &self.settings
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.settings.api_url, path)
    }

    /// Web API URL built from `segments`, each one encoded as a single path
    /// segment. Ids taken from request paths go through here.
    fn api_endpoint(&self, segments: &[&str]) -> Result<Url, SpotifyError> {
        if let Some(segment) = segments
            .iter()
            .find(|segment| matches!(**segment, "" | "." | ".."))
        {
            return Err(SpotifyError::NotFound(format!("invalid id {:?}", segment)));
        }

        let mut url = Url::parse(&self.settings.api_url)
            .map_err(|e| SpotifyError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| SpotifyError::InvalidUrl(self.settings.api_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends the request and turns non-success statuses into [`SpotifyError`].
    async fn send(&self, request: RequestBuilder) -> Result<Response, SpotifyError> {
        let retry = request.try_clone();
        let response = request.send().await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = retry_after(&response);
            match (retry, retry_after) {
                (Some(retry), Some(seconds)) if seconds <= MAX_RETRY_AFTER => {
                    warning!("Rate limited by Spotify, retrying in {} seconds", seconds);
                    sleep(Duration::from_secs(seconds)).await;
                    return check(retry.send().await?).await;
                }
                (_, Some(seconds)) => {
                    warning!(
                        "Retry after has reached an abnormal high of {} seconds.",
                        seconds
                    );
                }
                _ => {}
            }
        }

        check(response).await
    }

    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, SpotifyError> {
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| SpotifyError::Decode(e.to_string()))
    }
}

async fn check(response: Response) -> Result<Response, SpotifyError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = retry_after(&response);
    let body = response.text().await.unwrap_or_default();
    Err(SpotifyError::from_response(status, retry_after, &body))
}

fn retry_after(response: &Response) -> Option<u64> {
    response
        .headers()
        .get("retry-after")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
}
