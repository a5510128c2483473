use crate::{
    spotify::{IdentityProvider, SpotifyError},
    types::Token,
};

/// Keeps a user token valid, refreshing it through the identity provider
/// once it is (about to be) expired.
pub struct TokenManager {
    token: Token,
    refreshed: bool,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        TokenManager {
            token,
            refreshed: false,
        }
    }

    pub async fn get_valid_token(
        &mut self,
        identity: &dyn IdentityProvider,
    ) -> Result<String, SpotifyError> {
        if self.is_expired() {
            self.token = identity.refresh_token(&self.token.refresh_token).await?;
            self.refreshed = true;
        }

        Ok(self.token.access_token.clone())
    }

    pub fn is_expired(&self) -> bool {
        self.token.is_expired()
    }

    /// True when [`get_valid_token`](Self::get_valid_token) replaced the
    /// token; the caller has to store the new one.
    pub fn was_refreshed(&self) -> bool {
        self.refreshed
    }

    pub fn into_token(self) -> Token {
        self.token
    }
}
