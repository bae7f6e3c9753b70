#![allow(dead_code)]

use advisor_call::{CallError, CallServices, RecordingFetcher};
use advisor_persona::{PersonaError, PersonaResponder};
use advisor_server::{app, config::Config, AppState};
use advisor_types::{IntentSignal, Tone, TranscriptEntry};
use advisor_voice::{SpeechToText, TextToSpeech, Transcription, VoiceError};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub struct QueueStt(Mutex<VecDeque<Transcription>>);

impl QueueStt {
    pub fn heard(transcripts: &[&str]) -> Self {
        Self(Mutex::new(
            transcripts
                .iter()
                .map(|t| Transcription::recognized(*t, 0.9))
                .collect(),
        ))
    }
}

#[async_trait]
impl SpeechToText for QueueStt {
    async fn transcribe(&self, _audio_data: &[u8]) -> Result<Transcription, VoiceError> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(Transcription::unrecognized))
    }
}

pub struct SilentTts;

#[async_trait]
impl TextToSpeech for SilentTts {
    async fn synthesize(&self, _text: &str, _tone: Tone) -> Result<Option<Vec<u8>>, VoiceError> {
        Ok(Some(vec![0u8; 320]))
    }
}

/// Persona that answers after an optional delay.
pub struct SlowPersona {
    pub reply: String,
    pub delay: Duration,
}

impl SlowPersona {
    pub fn instant(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            delay: Duration::ZERO,
        }
    }
}

#[async_trait]
impl PersonaResponder for SlowPersona {
    async fn respond(
        &self,
        _input: &str,
        _intent: &IntentSignal,
        _history: &[TranscriptEntry],
    ) -> Result<String, PersonaError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.reply.clone())
    }
}

pub struct StubRecordings;

#[async_trait]
impl RecordingFetcher for StubRecordings {
    async fn fetch(&self, _recording_ref: &str) -> Result<Vec<u8>, CallError> {
        Ok(vec![1u8; 512])
    }
}

pub fn services(stt: QueueStt, persona: SlowPersona) -> CallServices {
    CallServices {
        stt: Arc::new(stt),
        tts: Arc::new(SilentTts),
        persona: Arc::new(persona),
        recordings: Arc::new(StubRecordings),
    }
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.server.public_url = "https://advisor.test".to_string();
    config
}

pub fn test_app(config: &Config, services: CallServices) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config, services));
    (app(state.clone()), state)
}

pub fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
