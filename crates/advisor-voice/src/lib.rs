//! Speech services for the advisor call platform.
//!
//! Defines the two speech collaborators the call orchestrator depends on,
//! [`SpeechToText`] and [`TextToSpeech`], together with HTTP-backed
//! implementations: Deepgram prerecorded transcription and Cartesia
//! server-sent-event synthesis.
//!
//! Both traits are object safe so the orchestrator can hold them as
//! `Arc<dyn ...>` and tests can substitute in-process doubles.

pub mod config;
pub mod error;
pub mod stt;
pub mod tts;
pub mod wav;

pub use config::{CartesiaConfig, DeepgramConfig};
pub use error::VoiceError;
pub use stt::{DeepgramStt, SpeechToText, Transcription};
pub use tts::{CartesiaTts, TextToSpeech};
