//! Shared types for the strategic advisor call platform.
//!
//! This crate holds the data model that every other crate agrees on: the
//! call state machine vocabulary, transcript entries, the per-turn intent
//! signal, synthesis tones, the instruction set answered back to the
//! telephony gateway, and the call policy.
//!
//! Nothing in here performs I/O. Provider clients live in `advisor-voice`
//! and `advisor-persona`; the orchestration logic lives in `advisor-call`.

pub mod call;
pub mod instruction;
pub mod intent;
pub mod policy;
pub mod voice;

pub use call::{CallState, CallStatus, ParseCallStatusError, Speaker, TranscriptEntry};
pub use instruction::Instruction;
pub use intent::{ConfidenceLevel, IntentSignal, Urgency, BUSINESS_VOCABULARY};
pub use policy::{CallPolicy, CallScript};
pub use voice::{Tone, Utterance};

use serde::{Deserialize, Serialize};

/// Error-kind tag recorded on a call session for diagnosing the most
/// recent failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Speech-to-text failed, returned nothing, or was not confident enough.
    Transcription,
    /// Text-to-speech failed or produced no audio.
    Synthesis,
    /// The persona responder failed or returned malformed output.
    Responder,
    /// A gateway callback was malformed or arrived out of order.
    GatewayProtocol,
    /// The caller said nothing within the capture window.
    NoInput,
}

impl ErrorKind {
    /// Returns the canonical string label for this error kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transcription => "TRANSCRIPTION",
            Self::Synthesis => "SYNTHESIS",
            Self::Responder => "RESPONDER",
            Self::GatewayProtocol => "GATEWAY_PROTOCOL",
            Self::NoInput => "NO_INPUT",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
