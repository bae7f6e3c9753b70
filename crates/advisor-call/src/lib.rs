//! Call turn orchestration.
//!
//! The [`Orchestrator`] drives one [`CallSession`] through the call-turn
//! state machine in response to telephony gateway callbacks. Each callback
//! is answered with the ordered [`Instruction`](advisor_types::Instruction)s
//! the gateway should carry out next; the orchestrator never holds a
//! connection to the caller.
//!
//! Provider failures are absorbed here. Transcription gets one re-prompt,
//! persona and synthesis failures fall back to fixed or read-aloud speech,
//! and every provider call is bounded by the policy timeout.

pub mod error;
pub mod intent;
pub mod orchestrator;
pub mod recording;
pub mod session;
pub mod truncate;

pub use error::CallError;
pub use intent::IntentAnalyzer;
pub use orchestrator::{CallServices, Consultation, Orchestrator};
pub use recording::RecordingFetcher;
pub use session::CallSession;
pub use truncate::truncate_at_sentence;
