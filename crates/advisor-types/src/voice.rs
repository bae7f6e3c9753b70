//! Synthesis tone and spoken utterance definitions.

use crate::intent::{IntentSignal, Urgency};
use serde::{Deserialize, Serialize};

/// Expressive style passed to speech synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    /// Confident and neutral. Used for greetings and ordinary answers.
    #[default]
    Confident,
    /// Assertive and challenging. Used when the caller wants a verdict.
    Assertive,
    /// Analytical with a sense of urgency.
    Analytical,
}

impl Tone {
    /// Picks the tone for a reply. Decision requests win over urgency.
    pub fn for_intent(intent: &IntentSignal) -> Self {
        if intent.is_decision_request {
            Self::Assertive
        } else if intent.urgency == Urgency::High {
            Self::Analytical
        } else {
            Self::Confident
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Confident => "confident",
            Self::Assertive => "assertive",
            Self::Analytical => "analytical",
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something to say to the caller.
///
/// `audio` carries synthesized PCM when synthesis succeeded. When it is
/// `None` the gateway reads `text` aloud with its own baseline voice.
#[derive(Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub tone: Tone,
    pub audio: Option<Vec<u8>>,
}

impl Utterance {
    /// An utterance the gateway should read aloud itself.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::default(),
            audio: None,
        }
    }

    /// Text for the gateway to read aloud when synthesis was unavailable.
    /// The intended tone is kept for diagnostics.
    pub fn unsynthesized(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
            audio: None,
        }
    }

    pub fn synthesized(text: impl Into<String>, tone: Tone, audio: Vec<u8>) -> Self {
        Self {
            text: text.into(),
            tone,
            audio: Some(audio),
        }
    }
}

impl std::fmt::Debug for Utterance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Utterance")
            .field("text", &self.text)
            .field("tone", &self.tone)
            .field("audio_bytes", &self.audio.as_ref().map(Vec::len))
            .finish()
    }
}
