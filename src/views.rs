//! HTML pages.
//!
//! Plain string rendering; every interpolated value goes through
//! [`escape_html`] and data handed to scripts through [`json_for_script`].

use serde_json::json;

use crate::{
    types::{Playlist, SwipeDeck},
    utils::{escape_html, json_for_script},
};

/// Spotify Web Playback SDK, the in-browser player of the swipe page.
pub const WEB_PLAYBACK_SDK_URL: &str = "https://sdk.scdn.co/spotify-player.js";

const STYLE: &str = r#"
body { font-family: sans-serif; background: #121212; color: #fff; margin: 0; padding: 2rem; text-align: center; }
a.button, button { background: #1db954; color: #fff; border: 0; border-radius: 2rem; padding: .75rem 1.5rem; font-size: 1rem; text-decoration: none; cursor: pointer; }
ul.playlists { list-style: none; padding: 0; max-width: 40rem; margin: 0 auto; text-align: left; }
ul.playlists li { display: flex; align-items: center; gap: 1rem; padding: .5rem 0; border-bottom: 1px solid #333; }
ul.playlists img { width: 64px; height: 64px; object-fit: cover; }
ul.playlists .name { flex: 1; }
.share-url { width: 100%; max-width: 30rem; padding: .5rem; font-size: 1rem; }
.cover { width: 96px; height: 96px; object-fit: cover; }
#card-stack .card { max-width: 20rem; margin: 1rem auto; background: #282828; border-radius: 1rem; padding: 1rem; }
#card-stack .card img { width: 100%; border-radius: .5rem; }
.controls, .player { display: flex; justify-content: center; align-items: center; gap: 1rem; margin: .5rem 0; }
#login-prompt { background: #282828; border-radius: 1rem; padding: 1rem; max-width: 20rem; margin: 1rem auto; }
#status { min-height: 1.5rem; color: #b3b3b3; }
"#;

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{style}</style>
</head>
<body>
{body}
</body>
</html>"#,
        title = escape_html(title),
        style = STYLE,
        body = body,
    )
}

pub fn index_page(logged_in: bool) -> String {
    let action = if logged_in {
        r#"<p><a class="button" href="/select">Choose a playlist</a></p>"#
    } else {
        r#"<p><a class="button" href="/login">Log in with Spotify</a></p>"#
    };
    layout(
        "SpotySwipe",
        &format!(
            "<h1>SpotySwipe</h1>\n<p>Share a playlist with a friend and let them swipe through it.</p>\n{}",
            action
        ),
    )
}

pub fn select_page(playlists: &[Playlist]) -> String {
    let items = if playlists.is_empty() {
        "<li>You don't have any playlists yet.</li>".to_string()
    } else {
        playlists
            .iter()
            .map(|playlist| {
                format!(
                    r#"<li><img src="{cover}" alt=""><span class="name">{name} <small>({count} tracks)</small></span><a class="button" href="/generate-link/{id}">Share</a></li>"#,
                    cover = escape_html(playlist.cover_url()),
                    name = escape_html(&playlist.name),
                    count = playlist.track_count(),
                    id = escape_html(&playlist.id),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    layout(
        "Choose a playlist",
        &format!(
            "<h1>Choose a playlist to share</h1>\n<ul class=\"playlists\">\n{}\n</ul>",
            items
        ),
    )
}

pub fn share_page(share_url: &str) -> String {
    let url = escape_html(share_url);
    layout(
        "Share your playlist",
        &format!(
            r#"<h1>Your link is ready</h1>
<p>Send this link to a friend:</p>
<p><input class="share-url" type="text" readonly value="{url}" onclick="this.select()"></p>
<p><a href="{url}">{url}</a></p>
<p><a href="/select">Share another playlist</a></p>"#,
            url = url
        ),
    )
}

pub fn swipe_page(deck: &SwipeDeck) -> String {
    let tracks = json_for_script(&json!(deck.tracks));
    let link_id = json_for_script(&json!(deck.link_id));
    let cover = if deck.playlist_cover_url.is_empty() {
        String::new()
    } else {
        format!(
            r#"<img class="cover" src="{}" alt="">"#,
            escape_html(&deck.playlist_cover_url)
        )
    };

    layout(
        &deck.playlist_name,
        &format!(
            r#"{cover}
<h1>{name}</h1>
<p>Shared by {sharer}</p>
<div id="login-prompt" style="display: none">
<p>Log in with Spotify to play full tracks in your browser.</p>
<p><a class="button" href="/login">Log in with Spotify</a></p>
</div>
<div id="card-stack"></div>
<audio id="preview"></audio>
<div class="player">
<button id="play-pause-btn">Play</button>
<input id="volume-slider" type="range" min="0" max="1" step="0.05" value="0.5">
</div>
<div class="controls">
<button id="dislike-btn">Skip</button>
<button id="like-btn">Add to queue</button>
</div>
<p id="status"></p>
<script>
const tracks = {tracks};
const linkId = {link_id};
</script>
<script src="/static/js/swipe.js"></script>
<script src="{sdk}"></script>"#,
            cover = cover,
            name = escape_html(&deck.playlist_name),
            sharer = escape_html(&deck.sharer_name),
            tracks = tracks,
            link_id = link_id,
            sdk = WEB_PLAYBACK_SDK_URL,
        ),
    )
}

pub fn error_page(title: &str, message: &str) -> String {
    layout(
        title,
        &format!(
            "<h1>{}</h1><p>{}</p>",
            escape_html(title),
            escape_html(message)
        ),
    )
}
