use crate::{
    error::AppError,
    management::LinkRegistry,
    spotify::Catalog,
    types::SwipeDeck,
    utils,
};

/// Turns a link id into the shuffled deck of tracks shown to the swiper.
///
/// Catalog data is read with the service identity and fetched fresh on
/// every call; nothing is cached.
///
/// # Errors
///
/// - [`AppError::LinkNotFound`] when the link id was never issued
/// - [`AppError::Upstream`] when any catalog call fails
pub async fn redeem(
    links: &LinkRegistry,
    catalog: &dyn Catalog,
    link_id: &str,
) -> Result<SwipeDeck, AppError> {
    let entry = links
        .resolve(link_id)
        .await
        .ok_or(AppError::LinkNotFound)?;

    let playlist = catalog.playlist(&entry.playlist_id).await?;
    let sharer = catalog.user(&entry.owner_user_id).await?;
    let items = catalog.playlist_tracks(&entry.playlist_id).await?;

    let mut tracks = utils::project_tracks(items);
    utils::shuffle_tracks(&mut tracks);

    Ok(SwipeDeck {
        link_id: entry.link_id,
        playlist_cover_url: playlist.cover_url().to_string(),
        playlist_name: playlist.name,
        sharer_name: sharer.name().to_string(),
        tracks,
    })
}
