//! Embedded chat widget assets
//!
//! Falls back to the `ui/` directory on disk when a file is not embedded.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
};
use rust_embed::Embed;
use std::path::PathBuf;

const UI_DIR: &str = "ui";

#[derive(Embed)]
#[folder = "ui"]
struct Assets;

/// Serve a static file by request path
pub async fn serve_static(req: Request<Body>) -> Response {
    let path = req.uri().path().trim_start_matches('/');

    match load(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.as_ref().to_string())],
                content,
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

/// The widget page, if present
pub fn index_html() -> Option<String> {
    load("index.html").and_then(|bytes| String::from_utf8(bytes).ok())
}

fn load(path: &str) -> Option<Vec<u8>> {
    if path.split('/').any(|segment| segment == "..") {
        return None;
    }
    if let Some(content) = Assets::get(path) {
        return Some(content.data.into_owned());
    }
    std::fs::read(PathBuf::from(UI_DIR).join(path)).ok()
}
