//! Instructions answered back to the telephony gateway.

use crate::voice::Utterance;

/// One step the gateway must carry out for the caller.
///
/// The orchestrator never holds a connection to the caller. Each callback
/// is answered with an ordered list of these, which the gateway adapter
/// renders into its own markup.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Say something, either as synthesized audio or read aloud.
    Speak(Utterance),
    /// Record the caller's next utterance.
    ///
    /// If nothing is captured within the window the gateway reads
    /// `no_input_prompt` and ends the call.
    Capture {
        max_duration_secs: u32,
        silence_timeout_secs: u32,
        no_input_prompt: String,
    },
    /// End the call.
    Hangup,
}

impl Instruction {
    /// Convenience for a read-aloud `Speak`.
    pub fn say(text: impl Into<String>) -> Self {
        Self::Speak(Utterance::plain(text))
    }

    pub fn is_hangup(&self) -> bool {
        matches!(self, Self::Hangup)
    }
}
