use async_trait::async_trait;
use reqwest::header::CONTENT_LENGTH;

use crate::spotify::{Playback, SpotifyClient, SpotifyError};

const TRACK_URI_PREFIX: &str = "spotify:track:";

#[async_trait]
impl Playback for SpotifyClient {
    /// Adds a track to the end of the user's playback queue.
    ///
    /// Spotify answers `404` with reason `NO_ACTIVE_DEVICE` when the user has
    /// no device playing, which surfaces as [`SpotifyError::NoActiveDevice`].
    async fn add_to_queue(&self, access_token: &str, track_id: &str) -> Result<(), SpotifyError> {
        let request = self
            .http
            .post(self.api_url("/me/player/queue"))
            .query(&[("uri", track_uri(track_id))])
            .header(CONTENT_LENGTH, 0)
            .bearer_auth(access_token);

        self.send(request).await?;
        Ok(())
    }
}

/// Accepts either a bare track id or a full `spotify:track:` URI.
pub fn track_uri(track_id: &str) -> String {
    if track_id.starts_with(TRACK_URI_PREFIX) {
        track_id.to_string()
    } else {
        format!("{}{}", TRACK_URI_PREFIX, track_id)
    }
}
