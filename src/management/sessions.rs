use std::collections::HashMap;

use axum::http::{HeaderMap, header::COOKIE};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::types::Token;

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_COOKIE: &str = "spotyswipe_session";

/// Lifetime of the session cookie in the browser (30 days).
const SESSION_MAX_AGE: u64 = 60 * 60 * 24 * 30;

/// Login started at `/login` and not yet completed at `/callback`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLogin {
    pub state: String,
    pub code_verifier: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub pending_login: Option<PendingLogin>,
    pub token: Option<Token>,
    /// Spotify user id, known once the user issued a link.
    pub user_id: Option<String>,
}

/// Server-side session storage.
///
/// The browser only holds `id.signature`, where the signature is the
/// HMAC-SHA256 of the id under the configured secret. Cookies with a bad
/// signature or an id the store does not know are treated as absent.
pub struct SessionStore {
    key: HmacSha256,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new(secret: &str) -> Self {
        // HMAC accepts keys of any length, so this cannot fail
        let key = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes())
            .unwrap_or_else(|_| unreachable!("HMAC takes keys of any size"));
        Self {
            key,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Stores `session` under a fresh id and returns the id.
    pub async fn create(&self, session: Session) -> String {
        let id = Uuid::new_v4().simple().to_string();
        self.sessions.write().await.insert(id.clone(), session);
        id
    }

    pub async fn get(&self, id: &str) -> Option<Session> {
        self.sessions.read().await.get(id).cloned()
    }

    pub async fn save(&self, id: &str, session: Session) {
        self.sessions.write().await.insert(id.to_string(), session);
    }

    pub async fn remove(&self, id: &str) {
        self.sessions.write().await.remove(id);
    }

    /// Session referenced by the request's cookie, together with its id.
    pub async fn load(&self, headers: &HeaderMap) -> Option<(String, Session)> {
        let id = self.session_id(headers)?;
        let session = self.get(&id).await?;
        Some((id, session))
    }

    /// Id carried by a correctly signed session cookie.
    pub fn session_id(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(|header| get_cookie(header, SESSION_COOKIE))
            .and_then(|value| self.verify(&value))
    }

    /// `name=value` pair for a `Cookie` request header.
    pub fn cookie(&self, id: &str) -> String {
        format!("{}={}", SESSION_COOKIE, self.sign(id))
    }

    /// Value of the `Set-Cookie` response header for session `id`.
    pub fn set_cookie(&self, id: &str) -> String {
        format!(
            "{}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
            self.cookie(id),
            SESSION_MAX_AGE
        )
    }

    fn sign(&self, id: &str) -> String {
        let mut mac = self.key.clone();
        mac.update(id.as_bytes());
        format!("{}.{}", id, URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
    }

    fn verify(&self, value: &str) -> Option<String> {
        let (id, signature) = value.split_once('.')?;
        let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;
        let mut mac = self.key.clone();
        mac.update(id.as_bytes());
        mac.verify_slice(&signature).ok()?;
        Some(id.to_string())
    }
}

/// Value of cookie `name` in a `Cookie` header such as `a=1; name=XYZ; b=2`.
pub fn get_cookie(header: &str, name: &str) -> Option<String> {
    header.split(';').find_map(|part| {
        part.trim()
            .strip_prefix(name)
            .and_then(|rest| rest.strip_prefix('='))
            .map(str::to_string)
    })
}
