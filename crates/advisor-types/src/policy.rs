//! Call policy configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Operational limits and fixed wording for every call.
///
/// Read-only once the server is running; shared by all sessions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CallPolicy {
    /// Turn ceiling. Reaching it ends the call with a closing statement.
    pub max_turns: u32,
    /// Spoken replies longer than this are cut at a sentence boundary.
    pub max_response_chars: usize,
    /// Longest single recording, in seconds.
    pub capture_max_seconds: u32,
    /// Silence that ends a recording, in seconds.
    pub silence_timeout_seconds: u32,
    /// Upper bound on every external call (download, STT, persona, TTS).
    pub provider_timeout_ms: u64,
    /// Upper bound on all provider calls made while answering one gateway
    /// callback. Kept below the gateway's own webhook timeout.
    pub turn_timeout_ms: u64,
    /// Transcripts below this recognizer confidence count as failures.
    pub min_confidence: f32,
    /// Transcription failures tolerated per call before hanging up. Each
    /// tolerated failure is answered with one re-prompt.
    pub max_transcription_retries: u32,
    /// Fixed phrases spoken by the orchestrator.
    pub script: CallScript,
}

impl CallPolicy {
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }

    pub fn turn_timeout(&self) -> Duration {
        Duration::from_millis(self.turn_timeout_ms)
    }
}

impl Default for CallPolicy {
    fn default() -> Self {
        Self {
            max_turns: 10,
            max_response_chars: 400,
            capture_max_seconds: 60,
            silence_timeout_seconds: 5,
            provider_timeout_ms: 8_000,
            turn_timeout_ms: 12_000,
            min_confidence: 0.3,
            max_transcription_retries: 1,
            script: CallScript::default(),
        }
    }
}

/// Fixed wording for greetings, re-prompts, fallbacks and closings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CallScript {
    pub greeting: String,
    pub reprompt: String,
    pub no_input: String,
    pub transcription_closing: String,
    pub responder_fallback: String,
    pub followup_prompt: String,
    pub truncation_question: String,
    pub closing: String,
    pub apology: String,
}

impl Default for CallScript {
    fn default() -> Self {
        Self {
            greeting: "Hi, this is your strategic business advisor. Tell me the decision or \
                       challenge on your mind, and I'll give you a straight answer."
                .to_string(),
            reprompt: "I had trouble understanding you. Please try again.".to_string(),
            no_input: "Sorry, I didn't catch that. Call back any time you want to talk \
                       strategy. Goodbye."
                .to_string(),
            transcription_closing: "I'm sorry, I'm still having trouble hearing you. Please \
                                    call back from a clearer line. Goodbye."
                .to_string(),
            responder_fallback: "Give me a technical moment here. While I regroup, tell me \
                                 which outcome matters most to you in this decision."
                .to_string(),
            followup_prompt: "What else is on your mind?".to_string(),
            truncation_question: "Want me to go deeper on any of that?".to_string(),
            closing: "That's all the time we have for this call. Go make the call you know \
                      is right. Goodbye."
                .to_string(),
            apology: "We're sorry, something went wrong on our end. Please call back \
                      shortly. Goodbye."
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_values() {
        let policy = CallPolicy::default();
        assert_eq!(policy.max_turns, 10);
        assert_eq!(policy.max_response_chars, 400);
        assert_eq!(policy.capture_max_seconds, 60);
        assert_eq!(policy.silence_timeout_seconds, 5);
        assert_eq!(policy.provider_timeout(), Duration::from_secs(8));
        assert_eq!(policy.turn_timeout(), Duration::from_secs(12));
        assert_eq!(policy.max_transcription_retries, 1);
        assert!(policy.script.responder_fallback.contains("technical moment"));
    }

    #[test]
    fn partial_policy_fills_defaults() {
        let policy: CallPolicy =
            serde_json::from_str(r#"{"max_turns": 3, "script": {"greeting": "Hello"}}"#)
                .expect("should deserialize");
        assert_eq!(policy.max_turns, 3);
        assert_eq!(policy.script.greeting, "Hello");
        assert_eq!(policy.script.reprompt, CallScript::default().reprompt);
        assert_eq!(policy.min_confidence, 0.3);
    }
}
