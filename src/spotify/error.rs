use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpotifyError {
    #[error("request to Spotify failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Spotify rejected the credentials: {0}")]
    Unauthorized(String),
    #[error("Spotify denied access: {0}")]
    Forbidden(String),
    #[error("not found on Spotify: {0}")]
    NotFound(String),
    #[error("no active playback device: {0}")]
    NoActiveDevice(String),
    #[error("rate limited by Spotify, retry after {0} seconds")]
    RateLimited(u64),
    #[error("Spotify returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("unexpected response from Spotify: {0}")]
    Decode(String),
    #[error("invalid Spotify URL: {0}")]
    InvalidUrl(String),
}

impl SpotifyError {
    /// Builds the error for a non-success response from its status and body.
    ///
    /// Understands both the Web API shape
    /// `{"error": {"status": 404, "message": "...", "reason": "..."}}` and the
    /// accounts service shape `{"error": "invalid_grant", "error_description": "..."}`.
    pub fn from_response(status: StatusCode, retry_after: Option<u64>, body: &str) -> Self {
        let (message, reason) = parse_error_body(body);
        let message = message.unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });

        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized(message),
            StatusCode::FORBIDDEN => Self::Forbidden(message),
            StatusCode::NOT_FOUND if reason.as_deref() == Some("NO_ACTIVE_DEVICE") => {
                Self::NoActiveDevice(message)
            }
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited(retry_after.unwrap_or(0)),
            // the accounts service reports a bad refresh token as 400 invalid_grant
            StatusCode::BAD_REQUEST if reason.as_deref() == Some("invalid_grant") => {
                Self::Unauthorized(message)
            }
            _ => Self::Api {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Short machine readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Http(_) => "network",
            Self::Unauthorized(_) => "unauthorized",
            Self::Forbidden(_) => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::NoActiveDevice(_) => "no_active_device",
            Self::RateLimited(_) => "rate_limited",
            Self::Api { .. } => "upstream",
            Self::Decode(_) => "decode",
            Self::InvalidUrl(_) => "invalid_url",
        }
    }

    /// True when the resource exists but is not visible to the caller, or
    /// does not exist at all. Private playlists fall into this category when
    /// read with service credentials.
    pub fn is_inaccessible(&self) -> bool {
        matches!(self, Self::Forbidden(_) | Self::NotFound(_))
    }
}

fn parse_error_body(body: &str) -> (Option<String>, Option<String>) {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        let body = body.trim();
        return ((!body.is_empty()).then(|| body.to_string()), None);
    };

    match &json["error"] {
        Value::Object(error) => (
            error
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
            error
                .get("reason")
                .and_then(Value::as_str)
                .map(str::to_string),
        ),
        Value::String(code) => (
            json["error_description"]
                .as_str()
                .map(str::to_string)
                .or_else(|| Some(code.clone())),
            Some(code.clone()),
        ),
        _ => (None, None),
    }
}
