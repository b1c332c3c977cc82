use crate::http::ApiState;
use axum::{
    extract::State,
    response::{Html, IntoResponse},
};

const FALLBACK_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Vocalis Pronunciation Service</title>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <style>
        body { font-family: Arial, sans-serif; max-width: 1200px; margin: 0 auto; padding: 20px; }
        h1 { color: #1f77b4; }
        code { background: #f4f4f4; padding: 2px 6px; }
    </style>
</head>
<body>
    <h1>Vocalis Pronunciation Service</h1>
    <p>No index.html found in the static directory; this fallback page is served instead.</p>
    <p>API endpoints: <code>POST /api/train</code>, <code>POST /api/generate</code>,
       <code>GET /api/stats</code>, <code>GET /api/health</code></p>
</body>
</html>
"#;

/// Serve the frontend page.
///
/// Reads index.html from the configured static directory if present,
/// otherwise serves the inline fallback. File contents go through a
/// lossy UTF-8 conversion so a page saved in another encoding still
/// renders rather than failing the request.
pub async fn index_handler(State(state): State<ApiState>) -> impl IntoResponse {
    let index_path = state.service.config().static_dir.join("index.html");

    match tokio::fs::read(&index_path).await {
        Ok(bytes) => Html(String::from_utf8_lossy(&bytes).into_owned()),
        Err(_) => Html(FALLBACK_HTML.to_string()),
    }
}
