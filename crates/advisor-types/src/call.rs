//! Call lifecycle vocabulary: states, speakers, transcript entries and the
//! status values the telephony gateway reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// States of the call-turn state machine.
///
/// A call starts in `Greeting` and ends in `Terminated`. The legal edges are
/// encoded in [`CallState::can_transition_to`]; every other move is a bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallState {
    /// The call has connected and the greeting has not been issued yet.
    Greeting,
    /// A capture instruction is outstanding; waiting for the caller's audio.
    AwaitingSpeech,
    /// Captured audio is being fetched and transcribed.
    Processing,
    /// The persona reply is being generated and synthesized.
    Responding,
    /// A reply was spoken; deciding between another turn and a closing.
    AwaitingFollowup,
    /// The call is over. No further callbacks are processed.
    Terminated,
}

impl CallState {
    /// Returns the canonical string label for this state.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Greeting => "GREETING",
            Self::AwaitingSpeech => "AWAITING_SPEECH",
            Self::Processing => "PROCESSING",
            Self::Responding => "RESPONDING",
            Self::AwaitingFollowup => "AWAITING_FOLLOWUP",
            Self::Terminated => "TERMINATED",
        }
    }

    /// Whether this is the terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Terminated)
    }

    /// Whether the state machine allows moving from `self` to `next`.
    ///
    /// Any live state may jump to `Terminated` (hang-up). Otherwise only the
    /// forward edges of a turn and the re-prompt edge
    /// `Processing -> AwaitingSpeech` are legal.
    pub fn can_transition_to(self, next: CallState) -> bool {
        use CallState::*;

        if self == Terminated {
            return false;
        }
        if next == Terminated {
            return true;
        }

        matches!(
            (self, next),
            (Greeting, AwaitingSpeech)
                | (AwaitingSpeech, Processing)
                | (Processing, AwaitingSpeech)
                | (Processing, Responding)
                | (Responding, AwaitingFollowup)
                | (AwaitingFollowup, AwaitingSpeech)
        )
    }
}

impl std::fmt::Display for CallState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who said a line in the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Caller,
    Assistant,
}

impl Speaker {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Caller => "caller",
            Self::Assistant => "assistant",
        }
    }
}

/// One line of conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl TranscriptEntry {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
            at: Utc::now(),
        }
    }

    pub fn caller(text: impl Into<String>) -> Self {
        Self::new(Speaker::Caller, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Speaker::Assistant, text)
    }
}

/// Call progress values reported by the telephony gateway's status callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CallStatus {
    Queued,
    Ringing,
    InProgress,
    Completed,
    Busy,
    Failed,
    NoAnswer,
    Canceled,
}

impl CallStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Ringing => "ringing",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Busy => "busy",
            Self::Failed => "failed",
            Self::NoAnswer => "no-answer",
            Self::Canceled => "canceled",
        }
    }

    /// Whether this status means the call has ended on the gateway side.
    pub fn is_final(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Busy | Self::Failed | Self::NoAnswer | Self::Canceled
        )
    }
}

impl std::fmt::Display for CallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CallStatus {
    type Err = ParseCallStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "queued" => Ok(Self::Queued),
            "ringing" => Ok(Self::Ringing),
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "busy" => Ok(Self::Busy),
            "failed" => Ok(Self::Failed),
            "no-answer" => Ok(Self::NoAnswer),
            "canceled" | "cancelled" => Ok(Self::Canceled),
            _ => Err(ParseCallStatusError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown call status string.
#[derive(Debug, Clone)]
pub struct ParseCallStatusError(pub String);

impl std::fmt::Display for ParseCallStatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown call status: {}", self.0)
    }
}

impl std::error::Error for ParseCallStatusError {}
