//! Server configuration loading from file and environment variables.

use advisor_persona::PersonaConfig;
use advisor_types::CallPolicy;
use advisor_voice::{CartesiaConfig, DeepgramConfig};
use serde::Deserialize;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Turn limits, timeouts and fixed call wording.
    #[serde(default)]
    pub call: CallPolicy,

    /// Telephony gateway credentials and baseline voice.
    #[serde(default)]
    pub telephony: TelephonyConfig,

    /// Speech-to-text provider.
    #[serde(default)]
    pub deepgram: DeepgramConfig,

    /// Text-to-speech provider.
    #[serde(default)]
    pub cartesia: CartesiaConfig,

    /// Persona responder.
    #[serde(default)]
    pub persona: PersonaConfig,

    /// Demo API access.
    #[serde(default)]
    pub api: ApiConfig,

    /// Synthesized clip retention.
    #[serde(default)]
    pub audio: AudioConfig,

    /// Live session housekeeping.
    #[serde(default)]
    pub sessions: SessionsConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Externally reachable base URL. The gateway fetches audio clips and
    /// posts recordings back to addresses built from it.
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "advisor_call=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

/// Telephony gateway settings.
#[derive(Clone, Deserialize)]
pub struct TelephonyConfig {
    /// Account identifier used for recording downloads.
    #[serde(default)]
    pub account_sid: String,

    #[serde(default)]
    pub auth_token: String,

    /// Gateway voice used when synthesized audio is unavailable.
    #[serde(default = "default_say_voice")]
    pub say_voice: String,

    #[serde(default = "default_say_language")]
    pub language: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Access control for `/api/ask`.
#[derive(Clone, Default, Deserialize)]
pub struct ApiConfig {
    /// Bearer key. When unset the route is open.
    #[serde(default)]
    pub key: Option<String>,
}

/// Synthesized clip retention.
#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_clip_ttl_seconds")]
    pub clip_ttl_seconds: u64,

    #[serde(default = "default_max_clips")]
    pub max_clips: usize,
}

/// Live session housekeeping.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionsConfig {
    /// Sessions with no callback for this long are evicted.
    #[serde(default = "default_idle_timeout_seconds")]
    pub idle_timeout_seconds: u64,

    #[serde(default = "default_reaper_interval_seconds")]
    pub reaper_interval_seconds: u64,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    3000
}

fn default_public_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_say_voice() -> String {
    "Polly.Joanna-Neural".to_string()
}

fn default_say_language() -> String {
    "en-US".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_clip_ttl_seconds() -> u64 {
    600
}

fn default_max_clips() -> usize {
    1000
}

fn default_idle_timeout_seconds() -> u64 {
    1800
}

fn default_reaper_interval_seconds() -> u64 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_url: default_public_url(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for TelephonyConfig {
    fn default() -> Self {
        Self {
            account_sid: String::new(),
            auth_token: String::new(),
            say_voice: default_say_voice(),
            language: default_say_language(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl fmt::Debug for TelephonyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelephonyConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"[REDACTED]")
            .field("say_voice", &self.say_voice)
            .field("language", &self.language)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("key", &self.key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            clip_ttl_seconds: default_clip_ttl_seconds(),
            max_clips: default_max_clips(),
        }
    }
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            idle_timeout_seconds: default_idle_timeout_seconds(),
            reaper_interval_seconds: default_reaper_interval_seconds(),
        }
    }
}

impl Config {
    /// Checks limits that serde defaults cannot enforce.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.call.max_turns < 1 {
            return Err(ConfigError::Invalid(
                "call.max_turns must be at least 1".to_string(),
            ));
        }
        if self.call.max_response_chars < 40 {
            return Err(ConfigError::Invalid(
                "call.max_response_chars must be at least 40".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.call.min_confidence) {
            return Err(ConfigError::Invalid(format!(
                "call.min_confidence must be within [0, 1], got {}",
                self.call.min_confidence
            )));
        }
        if self.call.provider_timeout_ms == 0 || self.call.turn_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "call.provider_timeout_ms and call.turn_timeout_ms must be positive".to_string(),
            ));
        }
        if self.server.public_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "server.public_url must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration parsed but is unusable.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `ADVISOR_HOST` overrides `server.host`
/// - `ADVISOR_PORT` overrides `server.port`
/// - `ADVISOR_PUBLIC_URL` overrides `server.public_url`
/// - `ADVISOR_LOG_LEVEL` overrides `logging.level`
/// - `ADVISOR_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `ADVISOR_API_KEY` overrides `api.key`
/// - `ADVISOR_MAX_TURNS` overrides `call.max_turns`
/// - `DEEPGRAM_API_KEY`, `CARTESIA_API_KEY`, `ANTHROPIC_API_KEY` set the
///   provider keys
/// - `TWILIO_ACCOUNT_SID`, `TWILIO_AUTH_TOKEN` set the telephony credentials
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed,
/// or if the result fails validation.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    load_config_with_env(path, |name| std::env::var(name).ok())
}

/// [`load_config`] with an explicit environment lookup.
pub fn load_config_with_env(
    path: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    apply_env_overrides(&mut config, env);
    config.validate()?;
    Ok(config)
}

fn apply_env_overrides(config: &mut Config, env: impl Fn(&str) -> Option<String>) {
    if let Some(host) = env("ADVISOR_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Some(port) = env("ADVISOR_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Some(url) = env("ADVISOR_PUBLIC_URL") {
        config.server.public_url = url;
    }
    if let Some(level) = env("ADVISOR_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = env("ADVISOR_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    if let Some(key) = env("ADVISOR_API_KEY").filter(|k| !k.trim().is_empty()) {
        config.api.key = Some(key);
    }
    if let Some(turns) = env("ADVISOR_MAX_TURNS") {
        if let Ok(parsed) = turns.parse() {
            config.call.max_turns = parsed;
        }
    }
    if let Some(key) = env("DEEPGRAM_API_KEY") {
        config.deepgram.api_key = key;
    }
    if let Some(key) = env("CARTESIA_API_KEY") {
        config.cartesia.api_key = key;
    }
    if let Some(key) = env("ANTHROPIC_API_KEY") {
        config.persona.api_key = key;
    }
    if let Some(sid) = env("TWILIO_ACCOUNT_SID") {
        config.telephony.account_sid = sid;
    }
    if let Some(token) = env("TWILIO_AUTH_TOKEN") {
        config.telephony.auth_token = token;
    }
}
