//! Request level errors.
//!
//! Every failure is scoped to the request that hit it. Page routes render an
//! [`AppError`] through [`PageError`] (redirect to the landing page or an
//! HTML error block); JSON routes render it through [`ApiError`].

use axum::{
    Json,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::{spotify::SpotifyError, views};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("not_logged_in")]
    NotLoggedIn,
    #[error("link_not_found")]
    LinkNotFound,
    #[error("no_{0}")]
    MissingField(&'static str),
    #[error(transparent)]
    Upstream(#[from] SpotifyError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotLoggedIn => StatusCode::UNAUTHORIZED,
            Self::LinkNotFound => StatusCode::NOT_FOUND,
            Self::MissingField(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Renders an [`AppError`] for a browser page.
#[derive(Debug)]
pub struct PageError(pub AppError);

impl<E: Into<AppError>> From<E> for PageError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self.0 {
            AppError::NotLoggedIn => found("/"),
            AppError::LinkNotFound => (
                StatusCode::NOT_FOUND,
                Html(views::error_page(
                    "Error: Link not found",
                    "This SpotySwipe link is invalid or has expired.",
                )),
            )
                .into_response(),
            AppError::MissingField(field) => (
                StatusCode::BAD_REQUEST,
                Html(views::error_page(
                    "Error",
                    &format!("The request is missing the {} parameter.", field),
                )),
            )
                .into_response(),
            AppError::Upstream(err) => {
                let message = if err.is_inaccessible() {
                    format!("Could not load playlist. It might be private. Error: {}", err)
                } else {
                    format!("Could not talk to Spotify. Error: {}", err)
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(views::error_page("Error", &message)),
                )
                    .into_response()
            }
        }
    }
}

/// Renders an [`AppError`] as `{"success": false, "error": ...}`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl<E: Into<AppError>> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        let body = match &self.0 {
            AppError::Upstream(err) => json!({
                "success": false,
                "error": err.to_string(),
                "kind": err.kind(),
            }),
            other => json!({
                "success": false,
                "error": other.to_string(),
            }),
        };
        (status, Json(body)).into_response()
    }
}

/// `302 Found` redirect to `location`.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
