use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric, seq::SliceRandom};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::types::{PlaylistItem, SwipeTrack, first_image_url};

pub fn generate_code_verifier() -> String {
    random_alphanumeric(128)
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Value of the OAuth `state` parameter of one login.
pub fn generate_state() -> String {
    random_alphanumeric(32)
}

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Projects playlist items to swipe tracks.
///
/// Items without a track or without a track id (local files, tracks removed
/// from the catalog) are dropped; the order of the rest is kept.
pub fn project_tracks(items: Vec<PlaylistItem>) -> Vec<SwipeTrack> {
    items
        .into_iter()
        .filter_map(|item| item.track)
        .filter_map(|track| {
            let id = track.id.filter(|id| !id.is_empty())?;
            let artist = track
                .artists
                .iter()
                .map(|artist| artist.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            let album_art =
                first_image_url(track.album.as_ref().and_then(|album| album.images.as_deref()))
                    .to_string();

            Some(SwipeTrack {
                id,
                name: track.name,
                artist,
                album_art,
                preview_url: track.preview_url,
            })
        })
        .collect()
}

pub fn shuffle_tracks(tracks: &mut [SwipeTrack]) {
    tracks.shuffle(&mut rand::rng());
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders `value` for embedding inside a `<script>` element.
///
/// `<` is escaped so that no string in the data can close the element.
pub fn json_for_script(value: &Value) -> String {
    value.to_string().replace('<', "\\u003c")
}

/// Public URL of a link: `{base}/swipe/{link_id}`.
///
/// `base` is the configured public URL, or `http://{host}` from the request.
pub fn share_url(public_url: Option<&str>, host: Option<&str>, link_id: &str) -> String {
    let base = match (public_url, host) {
        (Some(url), _) => url.trim_end_matches('/').to_string(),
        (None, Some(host)) => format!("http://{}", host),
        (None, None) => String::new(),
    };
    format!("{}/swipe/{}", base, link_id)
}
