use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Seconds before the nominal expiry at which a token is treated as expired.
pub const TOKEN_EXPIRY_MARGIN: u64 = 240;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

impl Token {
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now >= self.obtained_at + self.expires_in.saturating_sub(TOKEN_EXPIRY_MARGIN)
    }
}

/// Raw body of the accounts service token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

impl TokenResponse {
    pub fn into_token(self) -> Token {
        Token {
            access_token: self.access_token,
            refresh_token: self.refresh_token.unwrap_or_default(),
            scope: self.scope.unwrap_or_default(),
            expires_in: self.expires_in.unwrap_or(3600),
            obtained_at: Utc::now().timestamp() as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    pub link_id: String,
    pub owner_user_id: String,
    pub playlist_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl UserProfile {
    pub fn name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.id)
    }
}

/// Generic paging object of the Web API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksRef {
    #[serde(default)]
    pub total: u64,
}

/// Entry of `GET /me/playlists`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Option<Vec<Image>>,
    #[serde(default)]
    pub owner: Option<UserProfile>,
    #[serde(default)]
    pub tracks: Option<PlaylistTracksRef>,
}

impl Playlist {
    pub fn cover_url(&self) -> &str {
        first_image_url(self.images.as_deref())
    }

    pub fn track_count(&self) -> u64 {
        self.tracks.as_ref().map_or(0, |tracks| tracks.total)
    }
}

/// Body of `GET /playlists/{id}?fields=name,images,owner`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistDetails {
    pub name: String,
    #[serde(default)]
    pub images: Option<Vec<Image>>,
    #[serde(default)]
    pub owner: Option<UserProfile>,
}

impl PlaylistDetails {
    pub fn cover_url(&self) -> &str {
        first_image_url(self.images.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistRef {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlbumRef {
    #[serde(default)]
    pub images: Option<Vec<Image>>,
}

/// Track (or episode) object inside a playlist item. Local files and
/// removed tracks come without an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTrack {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    #[serde(default)]
    pub album: Option<AlbumRef>,
    #[serde(default)]
    pub preview_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    #[serde(default)]
    pub track: Option<PlaylistTrack>,
}

/// A track as presented to the swiper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwipeTrack {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub album_art: String,
    pub preview_url: Option<String>,
}

/// Everything the swipe page renders for one redemption of a link.
#[derive(Debug, Clone, Serialize)]
pub struct SwipeDeck {
    pub link_id: String,
    pub playlist_name: String,
    pub playlist_cover_url: String,
    pub sharer_name: String,
    pub tracks: Vec<SwipeTrack>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddSongRequest {
    #[serde(default)]
    pub track_id: Option<String>,
    #[serde(default)]
    pub link_id: Option<String>,
}

pub fn first_image_url(images: Option<&[Image]>) -> &str {
    images
        .and_then(|images| images.first())
        .map_or("", |image| image.url.as_str())
}
