use axum::{http::header, response::IntoResponse};

const SWIPE_JS: &str = include_str!("../../static/js/swipe.js");

pub async fn swipe_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        SWIPE_JS,
    )
}
