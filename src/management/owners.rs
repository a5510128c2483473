use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, RwLock};

use crate::types::Token;

/// Token slot of one link owner. Holding the lock serializes refreshes.
pub type OwnerToken = Arc<Mutex<Token>>;

/// Latest known token of every user who issued a link.
///
/// Lets a swiper queue tracks on the sharer's device without being signed
/// in as the sharer. Once a user owns a link this store is the only place
/// their token is refreshed; sessions of that user read it from here.
#[derive(Default)]
pub struct OwnerCredentials {
    tokens: RwLock<HashMap<String, OwnerToken>>,
}

impl OwnerCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `token` for `user_id`, replacing the one held so far.
    pub async fn store(&self, user_id: &str, token: Token) {
        let slot = self
            .tokens
            .write()
            .await
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(token.clone())))
            .clone();
        *slot.lock().await = token;
    }

    pub async fn get(&self, user_id: &str) -> Option<Token> {
        let slot = self.slot(user_id).await?;
        let token = slot.lock().await.clone();
        Some(token)
    }

    pub async fn slot(&self, user_id: &str) -> Option<OwnerToken> {
        self.tokens.read().await.get(user_id).cloned()
    }
}
