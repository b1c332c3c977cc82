// Tests for the health, stats, and static page endpoints

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower::ServiceExt;
use vocalis_core::ServiceConfig;
use vocalis_server::http::{create_router, ApiState};
use vocalis_spk::{
    EspeakEngine, PhonemeOutcome, PronunciationService, RenderOptions, SpeechEngine, SpeechError,
};

/// Always-available engine that resolves nothing; enough for the
/// read-only endpoints
struct IdleEngine;

#[async_trait]
impl SpeechEngine for IdleEngine {
    async fn extract_phonemes(&self, word: &str) -> Result<PhonemeOutcome, SpeechError> {
        Ok(PhonemeOutcome::placeholder_for(word))
    }

    async fn render_audio(
        &self,
        _text: &str,
        _output: &Path,
        _options: &RenderOptions,
    ) -> Result<(), SpeechError> {
        Err(SpeechError::Engine("not implemented".to_string()))
    }

    fn is_available(&self) -> bool {
        true
    }

    fn executable(&self) -> &Path {
        Path::new("espeak-ng")
    }
}

fn app_with(config: ServiceConfig, engine: Arc<dyn SpeechEngine>) -> Router {
    let service = Arc::new(PronunciationService::new(config, engine));
    create_router(ApiState { service })
}

async fn get(app: Router, uri: &str) -> axum::response::Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_reports_unavailable_binary() {
    let mut config = ServiceConfig::default();
    config.espeak_path = PathBuf::from("/nonexistent/espeak-ng");
    let engine = Arc::new(EspeakEngine::new(&config));
    let app = app_with(config, engine);

    let response = get(app, "/api/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["espeak_available"], false);
    assert_eq!(body["espeak_path"], "/nonexistent/espeak-ng");
}

#[tokio::test]
async fn test_health_reports_available_engine() {
    let app = app_with(ServiceConfig::default(), Arc::new(IdleEngine));

    let response = get(app, "/api/health").await;
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["espeak_available"], true);
    assert_eq!(body["espeak_path"], "espeak-ng");
}

#[tokio::test]
async fn test_stats_endpoint_on_fresh_service() {
    let app = app_with(ServiceConfig::default(), Arc::new(IdleEngine));

    let response = get(app, "/api/stats").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["stats"]["words_learned"], 0);
    assert_eq!(body["stats"]["unique_phonemes"], 0);
    assert_eq!(body["stats"]["phoneme_patterns"], 0);
    assert_eq!(body["training_words"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_index_serves_inline_fallback() {
    let mut config = ServiceConfig::default();
    config.static_dir = PathBuf::from("./does-not-exist");
    let app = app_with(config, Arc::new(IdleEngine));

    let response = get(app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8_lossy(&body);
    assert!(html.contains("Vocalis"));
}

#[tokio::test]
async fn test_index_serves_file_from_static_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html>custom page</html>").unwrap();

    let mut config = ServiceConfig::default();
    config.static_dir = dir.path().to_path_buf();
    let app = app_with(config, Arc::new(IdleEngine));

    let response = get(app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(String::from_utf8_lossy(&body).contains("custom page"));
}
