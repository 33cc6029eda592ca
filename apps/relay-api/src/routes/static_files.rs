//! Static files for every path that is not a relay endpoint.

use std::path::{Path, PathBuf};

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use percent_encoding::percent_decode_str;

use crate::error::ApiError;
use crate::AppState;

const INDEX: &str = "index.html";

/// Router fallback: serve `uri` from the configured document root.
pub async fn serve(State(state): State<AppState>, uri: Uri) -> Response {
    serve_path(&state.config.public_dir, uri.path()).await
}

/// Serve `request_path` from `root`, or 404 if no regular file matches.
pub async fn serve_path(root: &Path, request_path: &str) -> Response {
    let file = resolve(root, request_path);

    match tokio::fs::metadata(&file).await {
        Ok(meta) if meta.is_file() => {}
        _ => return ApiError::not_found("Not found").into_response(),
    }

    match tokio::fs::read(&file).await {
        Ok(bytes) => (StatusCode::OK, [(CONTENT_TYPE, content_type_for(&file))], bytes).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

/// Map a URL path onto a file below `root`.
///
/// The path is percent-decoded and normalized: empty and `.` segments are
/// skipped, `..` removes the previous segment and is ignored at the root, so
/// the result never leaves `root`. `/` maps to the index document.
pub fn resolve(root: &Path, request_path: &str) -> PathBuf {
    let decoded = percent_decode_str(request_path).decode_utf8_lossy();

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    if segments.is_empty() {
        return root.join(INDEX);
    }
    segments.iter().fold(root.to_path_buf(), |path, s| path.join(s))
}

/// Content type derived from the file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml; charset=utf-8",
        _ => "application/octet-stream",
    }
}
