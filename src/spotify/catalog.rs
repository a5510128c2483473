use async_trait::async_trait;

use crate::{
    spotify::{Catalog, SpotifyClient, SpotifyError},
    types::{Page, Playlist, PlaylistDetails, PlaylistItem, UserProfile},
};

/// Largest page size `GET /playlists/{id}/tracks` accepts.
const TRACKS_PAGE_LIMIT: u32 = 100;

/// Upper bound for `GET /me/playlists`.
const PLAYLISTS_PAGE_LIMIT: u32 = 50;

#[async_trait]
impl Catalog for SpotifyClient {
    async fn current_user(&self, access_token: &str) -> Result<UserProfile, SpotifyError> {
        let request = self.http.get(self.api_url("/me")).bearer_auth(access_token);
        self.send_json(request).await
    }

    /// Retrieves the first page of the signed in user's playlists.
    ///
    /// `limit` is clamped to 1..=50, the range accepted by the endpoint.
    async fn current_user_playlists(
        &self,
        access_token: &str,
        limit: u32,
    ) -> Result<Vec<Playlist>, SpotifyError> {
        let limit = limit.clamp(1, PLAYLISTS_PAGE_LIMIT);
        let request = self
            .http
            .get(self.api_url("/me/playlists"))
            .query(&[("limit", limit)])
            .bearer_auth(access_token);

        let page: Page<Playlist> = self.send_json(request).await?;
        Ok(page.items)
    }

    async fn playlist(&self, playlist_id: &str) -> Result<PlaylistDetails, SpotifyError> {
        let url = self.api_endpoint(&["playlists", playlist_id])?;
        let token = self.service_access_token().await?;
        let request = self
            .http
            .get(url)
            .query(&[("fields", "name,images,owner")])
            .bearer_auth(token);

        self.send_json(request).await
    }

    async fn user(&self, user_id: &str) -> Result<UserProfile, SpotifyError> {
        let url = self.api_endpoint(&["users", user_id])?;
        let token = self.service_access_token().await?;
        let request = self
            .http
            .get(url)
            .bearer_auth(token);

        self.send_json(request).await
    }

    /// Retrieves every item of a playlist, following the `next` links of
    /// the paging object until the last page.
    async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<PlaylistItem>, SpotifyError> {
        let url = self.api_endpoint(&["playlists", playlist_id, "tracks"])?;
        let token = self.service_access_token().await?;
        let mut items = Vec::new();

        let first = self
            .http
            .get(url)
            .query(&[("limit", TRACKS_PAGE_LIMIT), ("offset", 0)])
            .bearer_auth(&token);
        let mut page: Page<PlaylistItem> = self.send_json(first).await?;

        loop {
            items.append(&mut page.items);
            let Some(next) = page.next.take() else {
                break;
            };
            let request = self.http.get(&next).bearer_auth(&token);
            page = self.send_json(request).await?;
        }

        Ok(items)
    }
}
