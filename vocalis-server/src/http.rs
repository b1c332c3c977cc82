// HTTP server with API routes for training, generation, and stats

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::error;
use vocalis_spk::{PronunciationService, SpeechError, StoreStats, TrainedWord};

// API state
#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<PronunciationService>,
}

// Request types
#[derive(Debug, Deserialize)]
pub struct TrainRequest {
    pub words: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub word: String,
    pub voice: Option<String>,
    pub speed: Option<u32>,
    pub pitch: Option<u32>,
}

// Response types
#[derive(Debug, Serialize)]
pub struct TrainResponse {
    pub success: bool,
    pub results: Vec<TrainedWord>,
    pub stats: StoreStats,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub phonemes: String,
    pub audio_base64: String,
    pub word: String,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: StoreStats,
    pub training_words: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub espeak_available: bool,
    pub espeak_path: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

fn bad_request(message: &str) -> axum::response::Response {
    let response = Json(ErrorResponse {
        error: message.to_string(),
        code: "INVALID_INPUT".to_string(),
    });
    (StatusCode::BAD_REQUEST, response).into_response()
}

fn internal_error(message: &str, code: &str) -> axum::response::Response {
    let response = Json(ErrorResponse {
        error: message.to_string(),
        code: code.to_string(),
    });
    (StatusCode::INTERNAL_SERVER_ERROR, response).into_response()
}

/// Create HTTP router with all API routes
pub fn create_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(crate::static_files::index_handler))
        .route("/api/train", post(train_handler))
        .route("/api/generate", post(generate_handler))
        .route("/api/stats", get(stats_handler))
        .route("/api/health", get(health_handler))
        .layer(cors)
        .with_state(state)
}

/// Train on a batch of words
async fn train_handler(
    State(state): State<ApiState>,
    Json(request): Json<TrainRequest>,
) -> impl IntoResponse {
    if request.words.is_empty() {
        return bad_request("Word list cannot be empty");
    }

    let max_len = state.service.config().max_word_len;
    if request.words.iter().any(|w| w.trim().is_empty()) {
        return bad_request("Words cannot be empty");
    }
    if request.words.iter().any(|w| w.len() > max_len) {
        return bad_request("Word too long");
    }

    match state.service.train(&request.words).await {
        Ok(results) => {
            let stats = state.service.stats();
            let message = format!("Trained on {} words", results.len());
            Json(TrainResponse {
                success: true,
                results,
                stats,
                message,
            })
            .into_response()
        }
        Err(e) => {
            error!("Training failed: {}", e);
            internal_error(&e.to_string(), "INTERNAL")
        }
    }
}

/// Generate a pronunciation for a word
async fn generate_handler(
    State(state): State<ApiState>,
    Json(request): Json<GenerateRequest>,
) -> impl IntoResponse {
    let config = state.service.config();

    let word = request.word.trim();
    if word.is_empty() {
        return bad_request("Word cannot be empty");
    }
    if word.len() > config.max_word_len {
        return bad_request("Word too long");
    }

    let voice = request
        .voice
        .unwrap_or_else(|| config.default_voice.clone());
    if voice.is_empty() || !voice.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return bad_request("Voice contains invalid characters");
    }

    let speed = request.speed.unwrap_or(config.default_speed);
    if speed == 0 || speed > 500 {
        return bad_request("Speed must be between 1 and 500");
    }

    let pitch = request.pitch.unwrap_or(config.default_pitch);
    if pitch > 99 {
        return bad_request("Pitch must be between 0 and 99");
    }

    match state.service.generate(word, &voice, speed, pitch).await {
        Ok(pronunciation) => Json(GenerateResponse {
            success: true,
            phonemes: pronunciation.phonemes,
            audio_base64: general_purpose::STANDARD.encode(&pronunciation.audio),
            word: request.word.clone(),
        })
        .into_response(),
        Err(SpeechError::InvalidInput(msg)) => bad_request(&msg),
        Err(e) => {
            error!("Audio generation failed for '{}': {}", word, e);
            internal_error("Audio generation failed", "GENERATION_FAILED")
        }
    }
}

/// System statistics
async fn stats_handler(State(state): State<ApiState>) -> impl IntoResponse {
    Json(StatsResponse {
        success: true,
        stats: state.service.stats(),
        training_words: state.service.training_words(),
    })
}

/// Check if eSpeak NG is available
async fn health_handler(State(state): State<ApiState>) -> impl IntoResponse {
    let engine = state.service.engine();
    let available = engine.is_available();

    Json(HealthResponse {
        status: if available { "healthy" } else { "unhealthy" }.to_string(),
        espeak_available: available,
        espeak_path: engine.executable().display().to_string(),
    })
}
