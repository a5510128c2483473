//! Configuration management for SpotySwipe.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. Spotify credentials and the session secret are never
//! embedded in the binary; they have to be supplied by the environment.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (only for non-secret values)

use std::{env, path::PathBuf};

use thiserror::Error;

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:5000";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:5000/callback";
pub const DEFAULT_SCOPE: &str = "playlist-read-private user-read-private playlist-modify-public playlist-modify-private user-modify-playback-state user-read-email streaming";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";

/// Minimum length in bytes of the secret used to sign session cookies.
pub const MIN_SESSION_SECRET_LEN: usize = 16;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("SESSION_SECRET must be at least {} bytes long", MIN_SESSION_SECRET_LEN)]
    WeakSessionSecret,
}

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from a `.env` file located in the platform-specific
/// local data directory under `spotyswipe/.env`.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/spotyswipe/.env`
/// - macOS: `~/Library/Application Support/spotyswipe/.env`
/// - Windows: `%LOCALAPPDATA%/spotyswipe/.env`
///
/// # Errors
///
/// This function will return an error if:
/// - The parent directory cannot be created
/// - The `.env` file exists but cannot be read or parsed
///
/// A missing `.env` file is not an error; the variables may come from the
/// process environment instead.
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotyswipe/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path)
        .map(|_| ())
        .map_err(|e| format!("Failed to load {}: {}", path.display(), e))
}

/// Endpoints and credentials of the Spotify application.
#[derive(Debug, Clone)]
pub struct SpotifySettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
}

/// Runtime configuration of the web service.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to, e.g. `127.0.0.1:5000`.
    pub server_addr: String,
    /// Externally visible base URL used in share links. When unset the
    /// `Host` header of the request is used.
    pub public_url: Option<String>,
    /// Key for signing session cookies.
    pub session_secret: String,
    pub spotify: SpotifySettings,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] for an unset required variable and
    /// [`ConfigError::WeakSessionSecret`] for a too short session secret.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from `lookup`, which maps a variable name to
    /// its value. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let optional = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let required = |name: &'static str| optional(name).ok_or(ConfigError::Missing(name));

        let session_secret = required("SESSION_SECRET")?;
        if session_secret.len() < MIN_SESSION_SECRET_LEN {
            return Err(ConfigError::WeakSessionSecret);
        }

        Ok(Self {
            server_addr: optional("SERVER_ADDRESS")
                .unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string()),
            public_url: optional("PUBLIC_URL").map(|url| url.trim_end_matches('/').to_string()),
            session_secret,
            spotify: SpotifySettings {
                client_id: required("SPOTIFY_API_AUTH_CLIENT_ID")?,
                client_secret: required("SPOTIFY_API_AUTH_CLIENT_SECRET")?,
                redirect_uri: optional("SPOTIFY_API_REDIRECT_URI")
                    .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
                scope: optional("SPOTIFY_API_AUTH_SCOPE").unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
                auth_url: optional("SPOTIFY_API_AUTH_URL")
                    .unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
                token_url: optional("SPOTIFY_API_TOKEN_URL")
                    .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
                api_url: optional("SPOTIFY_API_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            },
        })
    }
}
