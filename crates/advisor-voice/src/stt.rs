use crate::config::DeepgramConfig;
use crate::error::VoiceError;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use std::time::Duration;

/// Maximum audio input size for STT (10 MiB). Prevents OOM from oversized payloads.
const MAX_STT_INPUT_BYTES: usize = 10 * 1024 * 1024;

/// Result of one transcription request.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcription {
    pub transcript: String,
    /// Recognizer confidence in `[0, 1]`.
    pub confidence: f32,
    /// Whether the provider produced any alternative at all.
    pub success: bool,
}

impl Transcription {
    pub fn recognized(transcript: impl Into<String>, confidence: f32) -> Self {
        Self {
            transcript: transcript.into(),
            confidence,
            success: true,
        }
    }

    /// The provider answered but had nothing to offer.
    pub fn unrecognized() -> Self {
        Self {
            transcript: String::new(),
            confidence: 0.0,
            success: false,
        }
    }
}

/// Converts captured caller audio into text.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe(&self, audio_data: &[u8]) -> Result<Transcription, VoiceError>;
}

#[derive(Deserialize)]
struct ListenResponse {
    results: Option<ListenResults>,
}

#[derive(Deserialize)]
struct ListenResults {
    #[serde(default)]
    channels: Vec<ListenChannel>,
}

#[derive(Deserialize)]
struct ListenChannel {
    #[serde(default)]
    alternatives: Vec<ListenAlternative>,
}

#[derive(Deserialize)]
struct ListenAlternative {
    #[serde(default)]
    transcript: String,
    #[serde(default)]
    confidence: f32,
}

impl ListenResponse {
    fn into_transcription(self) -> Transcription {
        self.results
            .and_then(|r| r.channels.into_iter().next())
            .and_then(|c| c.alternatives.into_iter().next())
            .map(|alt| Transcription::recognized(alt.transcript.trim(), alt.confidence))
            .unwrap_or_else(Transcription::unrecognized)
    }
}

/// Deepgram prerecorded transcription over HTTPS.
#[derive(Debug, Clone)]
pub struct DeepgramStt {
    config: DeepgramConfig,
    client: reqwest::Client,
}

impl DeepgramStt {
    pub fn new(config: DeepgramConfig) -> Result<Self, VoiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| VoiceError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    pub fn is_configured(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("model", self.config.model.clone()),
            ("language", self.config.language.clone()),
            ("smart_format", "true".to_string()),
            ("punctuate", "true".to_string()),
        ];
        query.extend(
            self.config
                .keywords
                .iter()
                .map(|keyword| ("keywords", keyword.clone())),
        );
        query
    }
}

#[async_trait]
impl SpeechToText for DeepgramStt {
    async fn transcribe(&self, audio_data: &[u8]) -> Result<Transcription, VoiceError> {
        if audio_data.len() > MAX_STT_INPUT_BYTES {
            return Err(VoiceError::Transcription(format!(
                "audio data exceeds maximum size: {} bytes (limit: {} bytes)",
                audio_data.len(),
                MAX_STT_INPUT_BYTES
            )));
        }
        if audio_data.is_empty() {
            return Err(VoiceError::Transcription("audio data is empty".to_string()));
        }
        if !self.is_configured() {
            return Err(VoiceError::Config(
                "Deepgram API key is not configured. Set deepgram.api_key in config \
                 or the DEEPGRAM_API_KEY environment variable."
                    .to_string(),
            ));
        }

        let url = format!("{}/v1/listen", self.config.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(url)
            .query(&self.query())
            .header(AUTHORIZATION, format!("Token {}", self.config.api_key))
            .header(CONTENT_TYPE, "audio/wav")
            .body(audio_data.to_vec())
            .send()
            .await
            .map_err(|e| VoiceError::Transcription(format!("Deepgram request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VoiceError::Transcription(format!(
                "Deepgram returned {}: {}",
                status, body
            )));
        }

        let body: ListenResponse = response.json().await.map_err(|e| {
            VoiceError::Transcription(format!("Failed to decode Deepgram response: {}", e))
        })?;

        let transcription = body.into_transcription();
        tracing::debug!(
            success = transcription.success,
            confidence = transcription.confidence,
            chars = transcription.transcript.len(),
            "deepgram transcription finished"
        );
        Ok(transcription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_alternative_wins() {
        let body: ListenResponse = serde_json::from_str(
            r#"{"results":{"channels":[{"alternatives":[
                {"transcript":" Should I raise my prices? ","confidence":0.92},
                {"transcript":"should i raise my price","confidence":0.4}
            ]}]}}"#,
        )
        .unwrap();
        let t = body.into_transcription();
        assert!(t.success);
        assert_eq!(t.transcript, "Should I raise my prices?");
        assert!((t.confidence - 0.92).abs() < f32::EPSILON);
    }

    #[test]
    fn missing_alternatives_are_unrecognized() {
        let body: ListenResponse =
            serde_json::from_str(r#"{"results":{"channels":[{"alternatives":[]}]}}"#).unwrap();
        assert_eq!(body.into_transcription(), Transcription::unrecognized());

        let body: ListenResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(!body.into_transcription().success);
    }
}
