use advisor_types::BUSINESS_VOCABULARY;
use serde::{Deserialize, Serialize};
use std::fmt;

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_deepgram_base_url() -> String {
    "https://api.deepgram.com".to_string()
}

fn default_deepgram_model() -> String {
    "nova-2".to_string()
}

fn default_deepgram_language() -> String {
    "en-US".to_string()
}

fn default_keywords() -> Vec<String> {
    BUSINESS_VOCABULARY.iter().map(|k| k.to_string()).collect()
}

fn default_cartesia_base_url() -> String {
    "https://api.cartesia.ai".to_string()
}

fn default_cartesia_model() -> String {
    "sonic-english".to_string()
}

fn default_cartesia_voice() -> String {
    "a0e99841-438c-4a64-b679-ae501e7d6091".to_string()
}

fn default_sample_rate() -> u32 {
    8000
}

fn default_cartesia_version() -> String {
    "2024-06-10".to_string()
}

fn default_cartesia_language() -> String {
    "en".to_string()
}

/// Deepgram prerecorded transcription settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct DeepgramConfig {
    #[serde(default, skip_serializing)]
    pub api_key: String,
    #[serde(default = "default_deepgram_base_url")]
    pub base_url: String,
    #[serde(default = "default_deepgram_model")]
    pub model: String,
    #[serde(default = "default_deepgram_language")]
    pub language: String,
    /// Vocabulary boosted during recognition.
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for DeepgramConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_deepgram_base_url(),
            model: default_deepgram_model(),
            language: default_deepgram_language(),
            keywords: default_keywords(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl fmt::Debug for DeepgramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeepgramConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("language", &self.language)
            .field("keywords", &self.keywords.len())
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl DeepgramConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Cartesia streaming synthesis settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct CartesiaConfig {
    #[serde(default, skip_serializing)]
    pub api_key: String,
    #[serde(default = "default_cartesia_base_url")]
    pub base_url: String,
    #[serde(default = "default_cartesia_model")]
    pub model_id: String,
    #[serde(default = "default_cartesia_voice")]
    pub voice_id: String,
    /// Output sample rate. 8 kHz matches the phone network.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    #[serde(default = "default_cartesia_version")]
    pub api_version: String,
    #[serde(default = "default_cartesia_language")]
    pub language: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for CartesiaConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_cartesia_base_url(),
            model_id: default_cartesia_model(),
            voice_id: default_cartesia_voice(),
            sample_rate: default_sample_rate(),
            api_version: default_cartesia_version(),
            language: default_cartesia_language(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl fmt::Debug for CartesiaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartesiaConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model_id", &self.model_id)
            .field("voice_id", &self.voice_id)
            .field("sample_rate", &self.sample_rate)
            .field("api_version", &self.api_version)
            .field("language", &self.language)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl CartesiaConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
