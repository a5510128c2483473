#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use chrono::Utc;
use http_body_util::BodyExt;
use tower::util::ServiceExt;

use spotyswipe::{
    management::{LinkRegistry, OwnerCredentials, Session, SessionStore},
    server::{AppState, router},
    spotify::{Catalog, IdentityProvider, Playback, SpotifyError},
    types::{
        AlbumRef, ArtistRef, Image, Playlist, PlaylistDetails, PlaylistItem, PlaylistTrack,
        PlaylistTracksRef, Token, UserProfile,
    },
};

pub const SESSION_SECRET: &str = "test-session-secret-0123456789";

/// In-memory stand-in for the Spotify services.
#[derive(Default)]
pub struct FakeSpotify {
    pub playlists: Vec<Playlist>,
    pub details: HashMap<String, PlaylistDetails>,
    pub items: HashMap<String, Vec<PlaylistItem>>,
    pub fail_tracks: bool,
    pub fail_queue: bool,
    pub fail_refresh: bool,
    pub queued: Mutex<Vec<(String, String)>>,
    pub refreshes: Mutex<u32>,
    /// Refresh tokens already traded in; Spotify rejects their reuse.
    pub spent_refresh_tokens: Mutex<HashSet<String>>,
}

impl FakeSpotify {
    pub fn queued(&self) -> Vec<(String, String)> {
        self.queued.lock().unwrap().clone()
    }

    pub fn refreshes(&self) -> u32 {
        *self.refreshes.lock().unwrap()
    }
}

#[async_trait]
impl IdentityProvider for FakeSpotify {
    fn authorize_url(&self, state: &str, code_challenge: &str) -> Result<String, SpotifyError> {
        Ok(format!(
            "https://accounts.example/authorize?state={}&code_challenge={}",
            state, code_challenge
        ))
    }

    async fn exchange_code(&self, code: &str, _code_verifier: &str) -> Result<Token, SpotifyError> {
        if code == "good-code" {
            Ok(token("access-new", "refresh-new"))
        } else {
            Err(SpotifyError::Unauthorized("Invalid authorization code".to_string()))
        }
    }

    /// Rotates the refresh token on every use, like Spotify does for PKCE
    /// clients.
    async fn refresh_token(&self, refresh_token: &str) -> Result<Token, SpotifyError> {
        *self.refreshes.lock().unwrap() += 1;
        let fresh = self
            .spent_refresh_tokens
            .lock()
            .unwrap()
            .insert(refresh_token.to_string());
        if self.fail_refresh || !fresh {
            return Err(SpotifyError::Unauthorized("Refresh token revoked".to_string()));
        }
        Ok(token(
            &format!("refreshed-{}", refresh_token),
            &format!("{}-next", refresh_token),
        ))
    }
}

#[async_trait]
impl Catalog for FakeSpotify {
    async fn current_user(&self, _access_token: &str) -> Result<UserProfile, SpotifyError> {
        Ok(profile("u1", Some("User One")))
    }

    async fn current_user_playlists(
        &self,
        _access_token: &str,
        limit: u32,
    ) -> Result<Vec<Playlist>, SpotifyError> {
        Ok(self.playlists.iter().take(limit as usize).cloned().collect())
    }

    async fn playlist(&self, playlist_id: &str) -> Result<PlaylistDetails, SpotifyError> {
        self.details
            .get(playlist_id)
            .cloned()
            .ok_or_else(|| SpotifyError::NotFound("Resource not found".to_string()))
    }

    async fn user(&self, user_id: &str) -> Result<UserProfile, SpotifyError> {
        Ok(profile(user_id, Some("User One")))
    }

    async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<PlaylistItem>, SpotifyError> {
        if self.fail_tracks {
            return Err(SpotifyError::Forbidden("Private playlist".to_string()));
        }
        Ok(self.items.get(playlist_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl Playback for FakeSpotify {
    async fn add_to_queue(&self, access_token: &str, track_id: &str) -> Result<(), SpotifyError> {
        if self.fail_queue {
            return Err(SpotifyError::NoActiveDevice(
                "Player command failed: No active device found".to_string(),
            ));
        }
        self.queued
            .lock()
            .unwrap()
            .push((access_token.to_string(), track_id.to_string()));
        Ok(())
    }
}

pub fn token(access: &str, refresh: &str) -> Token {
    Token {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
        scope: "user-modify-playback-state".to_string(),
        expires_in: 3600,
        obtained_at: Utc::now().timestamp() as u64,
    }
}

pub fn expired_token(access: &str, refresh: &str) -> Token {
    Token {
        obtained_at: (Utc::now().timestamp() - 7200) as u64,
        ..token(access, refresh)
    }
}

pub fn profile(id: &str, display_name: Option<&str>) -> UserProfile {
    UserProfile {
        id: id.to_string(),
        display_name: display_name.map(str::to_string),
    }
}

pub fn image(url: &str) -> Image {
    Image {
        url: url.to_string(),
        height: Some(640),
        width: Some(640),
    }
}

pub fn item(id: Option<&str>, name: &str, artists: &[&str]) -> PlaylistItem {
    PlaylistItem {
        track: Some(PlaylistTrack {
            id: id.map(str::to_string),
            name: name.to_string(),
            artists: artists
                .iter()
                .map(|name| ArtistRef {
                    name: name.to_string(),
                })
                .collect(),
            album: Some(AlbumRef {
                images: Some(vec![image(&format!("https://img.example/{}.jpg", name))]),
            }),
            preview_url: None,
        }),
    }
}

pub fn playlist(id: &str, name: &str, total: u64) -> Playlist {
    Playlist {
        id: id.to_string(),
        name: name.to_string(),
        images: Some(vec![image(&format!("https://img.example/{}.jpg", id))]),
        owner: Some(profile("u1", Some("User One"))),
        tracks: Some(PlaylistTracksRef { total }),
    }
}

pub fn details(name: &str) -> PlaylistDetails {
    PlaylistDetails {
        name: name.to_string(),
        images: Some(vec![image("https://img.example/cover.jpg")]),
        owner: Some(profile("u1", Some("User One"))),
    }
}

pub struct TestApp {
    pub state: AppState,
    pub spotify: Arc<FakeSpotify>,
}

impl TestApp {
    pub fn new(spotify: FakeSpotify) -> Self {
        let spotify = Arc::new(spotify);
        let state = AppState {
            links: Arc::new(LinkRegistry::new()),
            sessions: Arc::new(SessionStore::new(SESSION_SECRET)),
            owners: Arc::new(OwnerCredentials::new()),
            identity: spotify.clone(),
            catalog: spotify.clone(),
            playback: spotify.clone(),
            public_url: None,
        };
        Self { state, spotify }
    }

    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    /// Cookie header value of a new session holding `token`.
    pub async fn login(&self, token: Token) -> String {
        let id = self
            .state
            .sessions
            .create(Session {
                token: Some(token),
                ..Session::default()
            })
            .await;
        self.state.sessions.cookie(&id)
    }

    /// Like [`login`](Self::login) for a user who already issued a link:
    /// the session knows the user id and the owner credentials hold `token`.
    /// Returns the cookie and the session id.
    pub async fn login_as_owner(&self, user_id: &str, token: Token) -> (String, String) {
        self.state.owners.store(user_id, token.clone()).await;
        let id = self
            .state
            .sessions
            .create(Session {
                token: Some(token),
                user_id: Some(user_id.to_string()),
                ..Session::default()
            })
            .await;
        (self.state.sessions.cookie(&id), id)
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router().oneshot(request).await.unwrap()
    }
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}
