//! Construction of the production provider clients.

use crate::config::Config;
use crate::telephony::TwilioRecordingFetcher;
use advisor_call::{CallError, CallServices};
use advisor_persona::{build_responder, PersonaError};
use advisor_voice::{CartesiaTts, DeepgramStt, VoiceError};
use std::sync::Arc;
use thiserror::Error;

/// Failure to construct a provider client at start-up.
#[derive(Debug, Error)]
pub enum ServiceInitError {
    #[error(transparent)]
    Voice(#[from] VoiceError),

    #[error(transparent)]
    Persona(#[from] PersonaError),

    #[error(transparent)]
    Telephony(#[from] CallError),
}

/// Builds the HTTP-backed collaborators described by `config`.
///
/// Missing speech credentials are not fatal: the clients report a
/// configuration error per call and the orchestrator falls back as it
/// would for any provider failure.
pub fn build_services(config: &Config) -> Result<CallServices, ServiceInitError> {
    let stt = DeepgramStt::new(config.deepgram.clone())?;
    if !stt.is_configured() {
        tracing::warn!("DEEPGRAM_API_KEY is not set; every transcription will fail");
    }

    let tts = CartesiaTts::new(config.cartesia.clone())?;
    if !tts.is_configured() {
        tracing::warn!("CARTESIA_API_KEY is not set; replies will use the gateway voice");
    }

    let recordings = TwilioRecordingFetcher::new(&config.telephony)?;
    if config.telephony.account_sid.is_empty() {
        tracing::warn!("TWILIO_ACCOUNT_SID is not set; recordings are fetched without auth");
    }

    Ok(CallServices {
        stt: Arc::new(stt),
        tts: Arc::new(tts),
        persona: build_responder(&config.persona)?,
        recordings: Arc::new(recordings),
    })
}
