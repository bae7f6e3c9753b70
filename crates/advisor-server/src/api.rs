//! JSON API and audio clip handlers.

use crate::AppState;
use advisor_types::{IntentSignal, Tone};
use axum::{
    extract::{Extension, Json, Path},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Longest challenge accepted by `/api/ask`.
const MAX_CHALLENGE_CHARS: usize = 4000;

/// Request body for `POST /api/ask`.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub challenge: String,
}

/// Response body for `POST /api/ask`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub response: String,
    pub tone: Tone,
    pub intent: IntentSignal,
    /// Where the spoken version can be fetched, when synthesis succeeded.
    pub audio_url: Option<String>,
}

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found: {0}")]
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        let body = Json(serde_json::json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

/// Handler for `POST /api/ask`.
pub async fn ask_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let challenge = payload.challenge.trim();
    if challenge.is_empty() {
        return Err(ApiError::BadRequest("challenge must not be empty".to_string()));
    }
    if challenge.chars().count() > MAX_CHALLENGE_CHARS {
        return Err(ApiError::BadRequest(format!(
            "challenge exceeds {} characters",
            MAX_CHALLENGE_CHARS
        )));
    }

    let consultation = state.orchestrator.consult(challenge).await;
    let audio_url = match consultation.audio.filter(|audio| !audio.is_empty()) {
        Some(audio) => match state.clips.insert(&audio) {
            Ok(clip_id) => Some(state.twiml.audio_url(&clip_id)),
            Err(e) => {
                tracing::warn!(error = %e, "could not store synthesized answer");
                None
            }
        },
        None => None,
    };

    tracing::info!(
        tone = %consultation.tone,
        decision = consultation.intent.is_decision_request,
        audio = audio_url.is_some(),
        "answered challenge"
    );

    Ok(Json(AskResponse {
        response: consultation.response,
        tone: consultation.tone,
        intent: consultation.intent,
        audio_url,
    }))
}

/// Handler for `GET /audio/{clip_id}`.
pub async fn audio_clip_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(clip_id): Path<String>,
) -> Result<Response, ApiError> {
    let wav = state
        .clips
        .get(&clip_id)
        .ok_or_else(|| ApiError::NotFound(format!("audio clip {}", clip_id)))?;

    Ok((
        [
            (header::CONTENT_TYPE, "audio/wav"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        wav,
    )
        .into_response())
}
