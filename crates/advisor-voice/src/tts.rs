use crate::config::CartesiaConfig;
use crate::error::VoiceError;
use advisor_types::Tone;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Maximum text input size for TTS (64 KiB). Prevents resource exhaustion from
/// oversized synthesis requests.
const MAX_TTS_INPUT_BYTES: usize = 64 * 1024;

/// Renders reply text as audio.
///
/// `Ok(None)` means the provider answered but produced no audio. Callers
/// fall back to having the gateway read the text aloud.
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    async fn synthesize(&self, text: &str, tone: Tone) -> Result<Option<Vec<u8>>, VoiceError>;
}

/// One server-sent event from the Cartesia stream.
#[derive(Deserialize)]
struct SseEvent {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    data: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Experimental voice controls for a tone, or `None` for the voice's
/// natural delivery.
fn voice_controls(tone: Tone) -> Option<Value> {
    match tone {
        Tone::Confident => None,
        Tone::Assertive => Some(json!({
            "speed": "normal",
            "emotion": ["assertive", "confident"],
        })),
        Tone::Analytical => Some(json!({
            "speed": "slightly_slow",
            "emotion": ["thoughtful", "professional"],
        })),
    }
}

/// Decodes an SSE body into concatenated raw audio.
fn collect_audio(body: &str) -> Result<Vec<u8>, VoiceError> {
    let mut audio = Vec::new();

    for line in body.lines() {
        let Some(payload) = line.strip_prefix("data:") else {
            continue;
        };
        let payload = payload.trim();
        if payload.is_empty() {
            continue;
        }

        let event: SseEvent = match serde_json::from_str(payload) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!("skipping undecodable Cartesia event: {}", e);
                continue;
            }
        };

        if event.kind == "error" {
            return Err(VoiceError::Synthesis(format!(
                "Cartesia stream error: {}",
                event.error.unwrap_or_default()
            )));
        }

        if let Some(chunk) = event.data.filter(|d| !d.is_empty()) {
            let bytes = STANDARD.decode(chunk.as_bytes()).map_err(|e| {
                VoiceError::Synthesis(format!("Invalid base64 audio chunk: {}", e))
            })?;
            audio.extend_from_slice(&bytes);
        }
    }

    Ok(audio)
}

/// Cartesia server-sent-event synthesis producing raw `pcm_s16le` mono audio.
#[derive(Debug, Clone)]
pub struct CartesiaTts {
    config: CartesiaConfig,
    client: reqwest::Client,
}

impl CartesiaTts {
    pub fn new(config: CartesiaConfig) -> Result<Self, VoiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| VoiceError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    pub fn is_configured(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    /// Sample rate of the audio this service returns.
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    fn request_body(&self, text: &str, tone: Tone) -> Value {
        let mut voice = json!({
            "mode": "id",
            "id": self.config.voice_id,
        });
        if let Some(controls) = voice_controls(tone) {
            voice["__experimental_controls"] = controls;
        }

        json!({
            "model_id": self.config.model_id,
            "transcript": text,
            "voice": voice,
            "output_format": {
                "container": "raw",
                "encoding": "pcm_s16le",
                "sample_rate": self.config.sample_rate,
            },
            "language": self.config.language,
        })
    }
}

#[async_trait]
impl TextToSpeech for CartesiaTts {
    async fn synthesize(&self, text: &str, tone: Tone) -> Result<Option<Vec<u8>>, VoiceError> {
        if text.len() > MAX_TTS_INPUT_BYTES {
            return Err(VoiceError::Synthesis(format!(
                "text exceeds maximum size: {} bytes (limit: {} bytes)",
                text.len(),
                MAX_TTS_INPUT_BYTES
            )));
        }
        if text.trim().is_empty() {
            return Ok(None);
        }
        if !self.is_configured() {
            return Err(VoiceError::Config(
                "Cartesia API key is not configured. Set cartesia.api_key in config \
                 or the CARTESIA_API_KEY environment variable."
                    .to_string(),
            ));
        }

        let url = format!("{}/tts/sse", self.config.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(url)
            .header("X-API-Key", &self.config.api_key)
            .header("Cartesia-Version", &self.config.api_version)
            .json(&self.request_body(text, tone))
            .send()
            .await
            .map_err(|e| VoiceError::Synthesis(format!("Cartesia request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VoiceError::Synthesis(format!(
                "Cartesia returned {}: {}",
                status, body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| VoiceError::Synthesis(format!("Failed to read Cartesia stream: {}", e)))?;

        let audio = collect_audio(&body)?;
        tracing::debug!(tone = %tone, bytes = audio.len(), "cartesia synthesis finished");

        if audio.is_empty() {
            Ok(None)
        } else {
            Ok(Some(audio))
        }
    }
}
