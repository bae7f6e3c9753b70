//! Recording downloads from the telephony gateway.

use crate::config::TelephonyConfig;
use advisor_call::{CallError, RecordingFetcher};
use async_trait::async_trait;
use std::time::Duration;

/// Maximum recording size accepted (10 MiB), matching the STT input limit.
const MAX_RECORDING_BYTES: usize = 10 * 1024 * 1024;

const AUDIO_EXTENSIONS: &[&str] = &[".wav", ".mp3"];

/// Fetches Twilio recordings as WAV using account basic auth.
#[derive(Debug, Clone)]
pub struct TwilioRecordingFetcher {
    client: reqwest::Client,
    account_sid: String,
    auth_token: String,
}

impl TwilioRecordingFetcher {
    pub fn new(config: &TelephonyConfig) -> Result<Self, CallError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| CallError::Recording(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
        })
    }
}

/// Twilio serves a recording in several formats; the bare URL is asked for
/// WAV by appending the extension.
fn wav_url(recording_url: &str) -> String {
    let lower = recording_url.to_ascii_lowercase();
    if AUDIO_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        recording_url.to_string()
    } else {
        format!("{}.wav", recording_url)
    }
}

#[async_trait]
impl RecordingFetcher for TwilioRecordingFetcher {
    async fn fetch(&self, recording_ref: &str) -> Result<Vec<u8>, CallError> {
        let mut request = self.client.get(wav_url(recording_ref));
        if !self.account_sid.is_empty() {
            request = request.basic_auth(&self.account_sid, Some(&self.auth_token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| CallError::Recording(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CallError::Recording(format!(
                "gateway returned {} for recording",
                status
            )));
        }
        if let Some(len) = response.content_length() {
            if len as usize > MAX_RECORDING_BYTES {
                return Err(CallError::Recording(format!(
                    "recording exceeds maximum size: {} bytes (limit: {} bytes)",
                    len, MAX_RECORDING_BYTES
                )));
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CallError::Recording(format!("failed to read recording: {}", e)))?;
        if body.len() > MAX_RECORDING_BYTES {
            return Err(CallError::Recording(format!(
                "recording exceeds maximum size: {} bytes (limit: {} bytes)",
                body.len(),
                MAX_RECORDING_BYTES
            )));
        }

        tracing::debug!(bytes = body.len(), "downloaded call recording");
        Ok(body.to_vec())
    }
}
