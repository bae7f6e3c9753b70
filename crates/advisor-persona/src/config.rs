use serde::{Deserialize, Serialize};
use std::fmt;

fn default_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_model() -> String {
    "claude-3-haiku-20240307".to_string()
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

fn default_max_tokens() -> u32 {
    300
}

fn default_temperature() -> f32 {
    0.7
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_advisor_name() -> String {
    "Pepper".to_string()
}

/// Which backend produces the advisor's replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonaProvider {
    /// Anthropic Messages API.
    #[default]
    Anthropic,
    /// Offline challenge templates. No network access.
    Scripted,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct PersonaConfig {
    #[serde(default)]
    pub provider: PersonaProvider,
    #[serde(default, skip_serializing)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Name the advisor introduces itself with in the system prompt.
    #[serde(default = "default_advisor_name")]
    pub advisor_name: String,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            provider: PersonaProvider::default(),
            api_key: String::new(),
            base_url: default_base_url(),
            model: default_model(),
            api_version: default_api_version(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            request_timeout_secs: default_request_timeout_secs(),
            advisor_name: default_advisor_name(),
        }
    }
}

impl fmt::Debug for PersonaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersonaConfig")
            .field("provider", &self.provider)
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_version", &self.api_version)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("advisor_name", &self.advisor_name)
            .finish()
    }
}

impl PersonaConfig {
    pub fn anthropic(api_key: impl Into<String>) -> Self {
        Self {
            provider: PersonaProvider::Anthropic,
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
