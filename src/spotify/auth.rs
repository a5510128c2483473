use async_trait::async_trait;
use reqwest::Url;

use crate::{
    spotify::{IdentityProvider, SpotifyClient, SpotifyError},
    types::{Token, TokenResponse},
};

#[async_trait]
impl IdentityProvider for SpotifyClient {
    /// Builds the authorization URL of the OAuth 2.0 PKCE flow.
    ///
    /// The URL carries the client id, redirect URI and scope from the
    /// settings plus the per-login `state` and the S256 `code_challenge`
    /// derived from the verifier kept in the user's session.
    fn authorize_url(&self, state: &str, code_challenge: &str) -> Result<String, SpotifyError> {
        let settings = self.settings();
        let url = Url::parse_with_params(
            &settings.auth_url,
            &[
                ("client_id", settings.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", settings.redirect_uri.as_str()),
                ("code_challenge", code_challenge),
                ("code_challenge_method", "S256"),
                ("scope", settings.scope.as_str()),
                ("state", state),
            ],
        )
        .map_err(|e| SpotifyError::InvalidUrl(e.to_string()))?;

        Ok(url.into())
    }

    /// Exchanges an authorization code for an access token using PKCE.
    ///
    /// The code verifier proves that the browser completing the flow is the
    /// one that started it. The authorization code is single-use and expires
    /// quickly, so the exchange happens right inside the callback request.
    async fn exchange_code(&self, code: &str, code_verifier: &str) -> Result<Token, SpotifyError> {
        let settings = self.settings();
        let request = self.http.post(&settings.token_url).form(&[
            ("grant_type", "authorization_code"),
            ("client_id", settings.client_id.as_str()),
            ("code", code),
            ("code_verifier", code_verifier),
            ("redirect_uri", settings.redirect_uri.as_str()),
        ]);

        let response: TokenResponse = self.send_json(request).await?;
        Ok(response.into_token())
    }

    /// Refreshes an expired access token using a refresh token.
    ///
    /// Spotify may or may not rotate the refresh token. When the response
    /// carries none, the returned token keeps the one passed in.
    async fn refresh_token(&self, refresh_token: &str) -> Result<Token, SpotifyError> {
        let settings = self.settings();
        let request = self.http.post(&settings.token_url).form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", settings.client_id.as_str()),
        ]);

        let response: TokenResponse = self.send_json(request).await?;
        let mut token = response.into_token();
        if token.refresh_token.is_empty() {
            token.refresh_token = refresh_token.to_string();
        }
        Ok(token)
    }
}

impl SpotifyClient {
    /// Returns an access token of the application itself.
    ///
    /// Obtained through the client credentials grant and cached until it
    /// expires. Only public catalog data is visible with this token.
    pub async fn service_access_token(&self) -> Result<String, SpotifyError> {
        let mut cached = self.service_token.lock().await;
        if let Some(token) = cached.as_ref().filter(|token| !token.is_expired()) {
            return Ok(token.access_token.clone());
        }

        let settings = self.settings();
        let request = self
            .http
            .post(&settings.token_url)
            .basic_auth(&settings.client_id, Some(&settings.client_secret))
            .form(&[("grant_type", "client_credentials")]);

        let response: TokenResponse = self.send_json(request).await?;
        let token = response.into_token();
        let access_token = token.access_token.clone();
        *cached = Some(token);

        Ok(access_token)
    }
}
