//! The strategic advisor persona.
//!
//! A [`PersonaResponder`] turns one caller utterance, its intent signal and
//! the conversation so far into the advisor's reply text. The orchestrator
//! treats it as an opaque oracle; anything a responder does internally
//! (prompting a hosted model, applying analysis lenses) stays here.

pub mod anthropic;
pub mod config;
pub mod error;
pub mod lens;
pub mod prompt;
pub mod scripted;

pub use anthropic::AnthropicResponder;
pub use config::{PersonaConfig, PersonaProvider};
pub use error::PersonaError;
pub use lens::AnalysisLens;
pub use scripted::ScriptedResponder;

use advisor_types::{IntentSignal, TranscriptEntry};
use async_trait::async_trait;
use std::sync::Arc;

/// Produces the advisor's reply to a caller.
#[async_trait]
pub trait PersonaResponder: Send + Sync {
    /// `history` holds the turns before `input`, oldest first.
    async fn respond(
        &self,
        input: &str,
        intent: &IntentSignal,
        history: &[TranscriptEntry],
    ) -> Result<String, PersonaError>;
}

/// Builds the responder selected by `config`.
///
/// An Anthropic provider without an API key degrades to the scripted
/// responder so the service can still take calls.
pub fn build_responder(config: &PersonaConfig) -> Result<Arc<dyn PersonaResponder>, PersonaError> {
    match config.provider {
        PersonaProvider::Anthropic if config.api_key.trim().is_empty() => {
            tracing::warn!(
                "persona provider is anthropic but no API key is set; \
                 falling back to scripted responses"
            );
            Ok(Arc::new(ScriptedResponder::new()))
        }
        PersonaProvider::Anthropic => Ok(Arc::new(AnthropicResponder::new(config.clone())?)),
        PersonaProvider::Scripted => Ok(Arc::new(ScriptedResponder::new())),
    }
}
