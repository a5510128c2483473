use axum::{
    extract::{Path, State},
    http::{HeaderMap, header},
    response::Html,
};

use crate::{
    error::{AppError, PageError},
    info,
    management::redeem,
    server::AppState,
    success, utils, views, warning,
};

/// Number of playlists listed on the selection page.
const SELECT_PLAYLIST_LIMIT: u32 = 50;

pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    let logged_in = state
        .sessions
        .load(&headers)
        .await
        .is_some_and(|(_, session)| session.token.is_some());
    Html(views::index_page(logged_in))
}

pub async fn select(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>, PageError> {
    let (_, _, access_token) = state.session_access_token(&headers).await?;
    let playlists = state
        .catalog
        .current_user_playlists(&access_token, SELECT_PLAYLIST_LIMIT)
        .await
        .inspect_err(|e| warning!("Failed to load playlists: {}", e))?;

    Ok(Html(views::select_page(&playlists)))
}

/// Issues a link for `playlist_id` on behalf of the signed in user.
///
/// The user's token is recorded as owner credentials so that swipers can
/// queue tracks on the sharer's device later on.
pub async fn generate_link(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(playlist_id): Path<String>,
) -> Result<Html<String>, PageError> {
    let (session_id, mut session, access_token) = state.session_access_token(&headers).await?;
    let user = state
        .catalog
        .current_user(&access_token)
        .await
        .inspect_err(|e| warning!("Failed to load the current user: {}", e))?;

    let link_id = state.links.issue(&user.id, &playlist_id).await;
    if let Some(token) = session.token.clone() {
        state.owners.store(&user.id, token).await;
    }
    session.user_id = Some(user.id.clone());
    state.sessions.save(&session_id, session).await;

    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok());
    let share_url = utils::share_url(state.public_url.as_deref(), host, &link_id);
    success!(
        "Issued link {} for playlist {} of {}",
        link_id,
        playlist_id,
        user.id
    );

    Ok(Html(views::share_page(&share_url)))
}

pub async fn swipe(
    State(state): State<AppState>,
    Path(link_id): Path<String>,
) -> Result<Html<String>, PageError> {
    let deck = match redeem(&state.links, state.catalog.as_ref(), &link_id).await {
        Ok(deck) => deck,
        Err(AppError::LinkNotFound) => {
            info!("Unknown link {} requested", link_id);
            return Err(AppError::LinkNotFound.into());
        }
        Err(e) => {
            warning!("Failed to redeem link {}: {}", link_id, e);
            return Err(e.into());
        }
    };

    Ok(Html(views::swipe_page(&deck)))
}
