use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    error::{AppError, PageError, found},
    management::{PendingLogin, Session},
    server::AppState,
    success, utils, warning,
};

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// Starts the OAuth 2.0 PKCE flow.
///
/// Generates the code verifier, its S256 challenge and a random `state`,
/// remembers verifier and state in the session and redirects the browser
/// to Spotify's authorization page.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);
    let oauth_state = utils::generate_state();
    let auth_url = state
        .identity
        .authorize_url(&oauth_state, &code_challenge)?;

    let pending = PendingLogin {
        state: oauth_state,
        code_verifier,
    };
    let session_id = match state.sessions.load(&headers).await {
        Some((id, mut session)) => {
            session.pending_login = Some(pending);
            state.sessions.save(&id, session).await;
            id
        }
        None => {
            state
                .sessions
                .create(Session {
                    pending_login: Some(pending),
                    ..Session::default()
                })
                .await
        }
    };

    Ok((
        StatusCode::FOUND,
        [
            (header::LOCATION, auth_url),
            (header::SET_COOKIE, state.sessions.set_cookie(&session_id)),
        ],
    )
        .into_response())
}

/// Completes the OAuth flow.
///
/// The login session is discarded and replaced by a fresh one holding only
/// the token pair, then the browser continues to `/select`. A denied
/// authorization, a missing login session or a `state` mismatch send the
/// browser back to the landing page.
pub async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<CallbackParams>,
) -> Result<Response, PageError> {
    if let Some(error) = &params.error {
        warning!("Spotify login was not completed: {}", error);
        return Ok(found("/"));
    }

    let Some((session_id, session)) = state.sessions.load(&headers).await else {
        warning!("Login callback without a login session");
        return Ok(found("/"));
    };
    let Some(pending) = session.pending_login else {
        warning!("Login callback without a pending login");
        return Ok(found("/"));
    };
    if params.state.as_deref() != Some(pending.state.as_str()) {
        warning!("Login callback with mismatching state");
        return Ok(found("/"));
    }

    let code = params
        .code
        .filter(|code| !code.is_empty())
        .ok_or(AppError::MissingField("code"))?;

    let token = state
        .identity
        .exchange_code(&code, &pending.code_verifier)
        .await
        .inspect_err(|e| warning!("Token exchange failed: {}", e))?;

    state.sessions.remove(&session_id).await;
    let session_id = state
        .sessions
        .create(Session {
            token: Some(token),
            ..Session::default()
        })
        .await;
    success!("Authentication successful");

    Ok((
        StatusCode::FOUND,
        [
            (header::LOCATION, "/select".to_string()),
            (header::SET_COOKIE, state.sessions.set_cookie(&session_id)),
        ],
    )
        .into_response())
}
