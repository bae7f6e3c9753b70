//! Strategic advisor call server.
//!
//! Maps telephony gateway webhooks onto the call orchestrator, renders its
//! instructions as TwiML, serves synthesized audio clips and exposes a small
//! text API for trying the persona without a phone.

pub mod api;
pub mod api_twilio;
pub mod background;
pub mod clips;
pub mod config;
pub mod middleware;
pub mod services;
pub mod sessions;
pub mod telephony;
pub mod twiml;

use advisor_call::{CallServices, Orchestrator};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Json, Router,
};
use clips::ClipStore;
use config::{Config, SessionsConfig};
use serde_json::{json, Value};
use sessions::SessionRegistry;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use twiml::TwimlRenderer;

/// Application state shared across all request handlers.
pub struct AppState {
    /// Call-turn state machine and its provider collaborators.
    pub orchestrator: Arc<Orchestrator>,
    /// Live calls by gateway call id.
    pub sessions: SessionRegistry,
    /// Synthesized audio waiting to be fetched by the gateway.
    pub clips: ClipStore,
    /// TwiML output settings.
    pub twiml: TwimlRenderer,
    /// Bearer key protecting `/api/ask`.
    pub api_key: Option<String>,
    /// Idle eviction settings for the reaper.
    pub sessions_config: SessionsConfig,
}

impl AppState {
    pub fn new(config: &Config, services: CallServices) -> Self {
        Self {
            orchestrator: Arc::new(Orchestrator::new(services, config.call.clone())),
            sessions: SessionRegistry::new(),
            clips: ClipStore::new(
                Duration::from_secs(config.audio.clip_ttl_seconds),
                config.audio.max_clips,
                config.cartesia.sample_rate,
            ),
            twiml: TwimlRenderer::new(
                config.server.public_url.clone(),
                config.telephony.say_voice.clone(),
                config.telephony.language.clone(),
            ),
            api_key: config
                .api
                .key
                .clone()
                .filter(|key| !key.trim().is_empty()),
            sessions_config: config.sessions.clone(),
        }
    }
}

/// Maximum request body size (1 MiB). Webhook forms and challenges are small.
const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

/// Health check handler.
async fn health(Extension(state): Extension<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "active_calls": state.sessions.active_calls(),
    }))
}

/// Builds the application router with all routes.
pub fn app(state: Arc<AppState>) -> Router {
    let protected_routes = Router::new()
        .route("/api/ask", post(api::ask_handler))
        .layer(axum::middleware::from_fn(middleware::api_key_middleware));

    let webhook_routes = Router::new()
        .route(
            "/twilio/webhook/incoming-call",
            post(api_twilio::incoming_call_handler),
        )
        .route(
            twiml::PROCESS_AUDIO_PATH,
            post(api_twilio::process_audio_handler),
        )
        .route(
            "/twilio/webhook/process-deepgram-audio",
            post(api_twilio::process_audio_handler),
        )
        .route(
            "/twilio/webhook/call-status",
            post(api_twilio::call_status_handler),
        )
        .route(
            "/twilio/webhook/voice-fallback",
            post(api_twilio::voice_fallback_handler),
        );

    Router::new()
        .route("/health", get(health))
        .route("/audio/{clip_id}", get(api::audio_clip_handler))
        .merge(webhook_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(state))
}
