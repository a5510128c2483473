//! # API Module
//!
//! HTTP handlers of the SpotySwipe web service, built on
//! [Axum](https://docs.rs/axum). The router itself lives in
//! [`crate::server`].
//!
//! ## Endpoints
//!
//! ### Sharer
//!
//! - [`index`] - landing page with the login entry point
//! - [`login`] / [`callback`] - Spotify OAuth 2.0 PKCE flow storing the token
//!   pair in a server-side session
//! - [`select`] - the user's playlists
//! - [`generate_link`] - issues a short link for a playlist
//!
//! ### Swiper
//!
//! - [`swipe`] - resolves a link and renders the shuffled tracks
//! - [`add_song`] - queues a track on the sharer's (or the session's) device
//! - [`token`] - live access token of the session for client side scripts
//!
//! ### Misc
//!
//! - [`health`] - status and version for monitoring
//! - [`swipe_js`] - script driving the swipe page
//!
//! ## Error Handling
//!
//! Page handlers return [`crate::error::PageError`]: a missing login
//! redirects to `/`, everything else becomes an HTML error block. JSON
//! handlers return [`crate::error::ApiError`] with a `success: false` body.

mod assets;
mod callback;
mod health;
mod pages;
mod playback;

pub use assets::swipe_js;
pub use callback::{callback, login};
pub use health::health;
pub use pages::{generate_link, index, select, swipe};
pub use playback::{add_song, token};
