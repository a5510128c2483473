use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Router,
    http::HeaderMap,
    routing::{get, post},
};

use crate::{
    Res, api,
    config::Config,
    error::AppError,
    info,
    management::{LinkRegistry, OwnerCredentials, Session, SessionStore, TokenManager},
    spotify::{Catalog, IdentityProvider, Playback, SpotifyClient},
    types::Token,
    warning,
};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub links: Arc<LinkRegistry>,
    pub sessions: Arc<SessionStore>,
    pub owners: Arc<OwnerCredentials>,
    pub identity: Arc<dyn IdentityProvider>,
    pub catalog: Arc<dyn Catalog>,
    pub playback: Arc<dyn Playback>,
    pub public_url: Option<String>,
}

impl AppState {
    /// State backed by the real Spotify client.
    pub fn new(config: &Config) -> Self {
        let spotify = SpotifyClient::new(config.spotify.clone());
        Self {
            links: Arc::new(LinkRegistry::new()),
            sessions: Arc::new(SessionStore::new(&config.session_secret)),
            owners: Arc::new(OwnerCredentials::new()),
            identity: Arc::new(spotify.clone()),
            catalog: Arc::new(spotify.clone()),
            playback: Arc::new(spotify),
            public_url: config.public_url.clone(),
        }
    }

    /// Valid access token of the session attached to the request.
    ///
    /// Once the session's user owns a link the token lives in the owner
    /// credentials and is refreshed there, so a refresh triggered by a
    /// swiper is seen by the sharer's session as well. The session keeps a
    /// copy of the latest token. A failed refresh counts as being logged
    /// out.
    pub async fn session_access_token(
        &self,
        headers: &HeaderMap,
    ) -> Result<(String, Session, String), AppError> {
        let (session_id, mut session) = self
            .sessions
            .load(headers)
            .await
            .ok_or(AppError::NotLoggedIn)?;
        let mut token = session.token.clone().ok_or(AppError::NotLoggedIn)?;

        let owner_slot = match &session.user_id {
            Some(user_id) => self.owners.slot(user_id).await,
            None => None,
        };
        let access_token = match owner_slot {
            Some(slot) => {
                let mut owner_token = slot.lock().await;
                let access_token = self.refresh_in_place(&mut *owner_token).await?;
                token = owner_token.clone();
                access_token
            }
            None => self.refresh_in_place(&mut token).await?,
        };

        if session.token.as_ref() != Some(&token) {
            session.token = Some(token);
            self.sessions.save(&session_id, session.clone()).await;
        }

        Ok((session_id, session, access_token))
    }

    /// Valid access token of a link owner, from the stored owner credentials.
    ///
    /// Refreshes of the same owner are serialized, so concurrent requests
    /// never present the same refresh token twice.
    pub async fn owner_access_token(&self, owner_user_id: &str) -> Result<String, AppError> {
        let slot = self
            .owners
            .slot(owner_user_id)
            .await
            .ok_or(AppError::NotLoggedIn)?;
        let mut token = slot.lock().await;
        self.refresh_in_place(&mut *token).await
    }

    /// Refreshes `token` when expired and returns its access token.
    async fn refresh_in_place(&self, token: &mut Token) -> Result<String, AppError> {
        let mut manager = TokenManager::new(token.clone());
        let access_token = manager
            .get_valid_token(self.identity.as_ref())
            .await
            .map_err(|e| {
                warning!("Token refresh failed: {}", e);
                AppError::NotLoggedIn
            })?;

        if manager.was_refreshed() {
            *token = manager.into_token();
        }
        Ok(access_token)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/select", get(api::select))
        .route("/generate-link/{playlist_id}", get(api::generate_link))
        .route("/swipe/{link_id}", get(api::swipe))
        .route("/api/add-song", post(api::add_song))
        .route("/api/token", get(api::token))
        .route("/health", get(api::health))
        .route("/static/js/swipe.js", get(api::swipe_js))
        .with_state(state)
}

pub async fn start_api_server(config: Config) -> Res<()> {
    let addr = SocketAddr::from_str(&config.server_addr)
        .map_err(|e| format!("Failed to parse server address {}: {}", config.server_addr, e))?;

    let app = router(AppState::new(&config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("SpotySwipe listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
