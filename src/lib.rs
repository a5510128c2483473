//! SpotySwipe Library
//!
//! This library powers a small web service that lets a Spotify user share one
//! of their playlists through a short link. Whoever opens the link gets the
//! playlist's tracks as a shuffled card stack and can push the tracks they
//! like onto the sharer's playback queue.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for pages, the OAuth callback and the JSON API
//! - `config` - Configuration management and environment variables
//! - `error` - Request level error taxonomy and its HTTP rendering
//! - `management` - Link registry, sessions, token refresh and deck building
//! - `server` - Application state and router assembly
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//! - `views` - HTML rendering of the pages
//!
//! # Example
//!
//! ```
//! use spotyswipe::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> spotyswipe::Res<()> {
//!     config::load_env().await?;
//!     let config = config::Config::from_env()?;
//!     server::start_api_server(config).await
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;
pub mod views;

/// A convenient Result type alias for operations that may fail.
///
/// Provides a standard error handling pattern for the glue code of the
/// application (startup, configuration, server bootstrap) using a boxed
/// dynamic error trait object. Request handling uses the typed errors in
/// [`error`] and [`spotify::SpotifyError`] instead.
///
/// # Example
///
/// ```
/// use spotyswipe::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Listening on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Issued link {}", link_id);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only meant for startup failures. Request handlers never call it: every
/// failure while serving a request is scoped to that request.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable problems such as a failed token refresh or an
/// upstream error that is reported back to the browser.
///
/// # Example
///
/// ```
/// warning!("Token refresh failed: {}", e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
