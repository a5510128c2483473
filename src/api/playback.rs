use axum::{Json, body::Bytes, extract::State, http::HeaderMap};
use serde_json::{Value, json};

use crate::{
    error::{ApiError, AppError},
    server::AppState,
    success,
    types::AddSongRequest,
    warning,
};

/// Queues a track.
///
/// With a `link_id` the track goes to the queue of the user who issued that
/// link, using the credentials recorded when the link was created. Without
/// one it goes to the queue of the user signed in on this session.
/// Credentials are checked before the body, so an anonymous request without
/// a link is answered with `not_logged_in` whatever its body.
pub async fn add_song(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    // an empty or malformed body is handled like `{}`
    let request: AddSongRequest = serde_json::from_slice(&body).unwrap_or_default();

    let access_token = match request.link_id.as_deref().filter(|id| !id.is_empty()) {
        Some(link_id) => {
            let entry = state
                .links
                .resolve(link_id)
                .await
                .ok_or(AppError::LinkNotFound)?;
            state.owner_access_token(&entry.owner_user_id).await?
        }
        None => state.session_access_token(&headers).await?.2,
    };

    let track_id = request
        .track_id
        .filter(|id| !id.trim().is_empty())
        .ok_or(AppError::MissingField("track_id"))?;

    state
        .playback
        .add_to_queue(&access_token, &track_id)
        .await
        .inspect_err(|e| warning!("Failed to queue {}: {}", track_id, e))?;
    success!("Queued {}", track_id);

    Ok(Json(json!({
        "success": true,
        "message": format!("Added {} to the queue!", track_id),
    })))
}

/// Live access token of the session, for scripts calling Spotify directly.
pub async fn token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let (_, _, access_token) = state.session_access_token(&headers).await?;
    Ok(Json(json!({ "access_token": access_token })))
}
