use crate::error::PersonaError;
use crate::PersonaResponder;
use advisor_types::{IntentSignal, Speaker, TranscriptEntry, Urgency};
use async_trait::async_trait;

/// Longest slice of the caller's words quoted back in a reply.
const MAX_QUOTE_CHARS: usize = 120;

const DECISION_TEMPLATES: &[&str] = &[
    "You asked: {input}. Before you decide, tell me what happens if you do nothing for ninety \
     days. If the answer is nothing much, you are not ready to commit yet.",
    "On {input}: pick the option you could reverse fastest, run it for two weeks, and let the \
     numbers decide. Which one is that?",
    "You're framing {input} as a yes or no. What's the third option you haven't said out loud?",
];

const URGENT_TEMPLATES: &[&str] = &[
    "Slow down for a second. On {input}, what is the one thing that has to be true by the end \
     of this week? Start there and ignore the rest.",
    "Pressure makes every problem look the same size. With {input}, which part is actually \
     costing you money today?",
];

const CHALLENGE_TEMPLATES: &[&str] = &[
    "Let me push on that. {input}. Who is your customer, and what would they pay to make this \
     problem go away?",
    "I hear {input}. You're thinking too small. What would this look like if it had to be ten \
     times bigger?",
    "{input}. Fine, but what's your evidence? Give me one number that proves it.",
];

/// Offline persona that answers from fixed challenge templates.
///
/// Replies are a pure function of the input, the intent and how many times
/// the advisor has already spoken, so a conversation replays identically.
#[derive(Debug, Clone, Default)]
pub struct ScriptedResponder;

impl ScriptedResponder {
    pub fn new() -> Self {
        Self
    }
}

fn quote(input: &str) -> String {
    let input = input.trim().trim_end_matches(['.', '?', '!']);
    match input.char_indices().nth(MAX_QUOTE_CHARS) {
        Some((cut, _)) => format!("{}...", &input[..cut]),
        None => input.to_string(),
    }
}

#[async_trait]
impl PersonaResponder for ScriptedResponder {
    async fn respond(
        &self,
        input: &str,
        intent: &IntentSignal,
        history: &[TranscriptEntry],
    ) -> Result<String, PersonaError> {
        let templates = if intent.is_decision_request {
            DECISION_TEMPLATES
        } else if intent.urgency == Urgency::High {
            URGENT_TEMPLATES
        } else {
            CHALLENGE_TEMPLATES
        };

        let spoken = history
            .iter()
            .filter(|entry| entry.speaker == Speaker::Assistant)
            .count();
        let template = templates[spoken % templates.len()];

        Ok(template.replace("{input}", &quote(input)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_are_trimmed_and_bounded() {
        assert_eq!(quote("  Should I hire?  "), "Should I hire");
        let long = "a".repeat(300);
        assert_eq!(quote(&long).len(), MAX_QUOTE_CHARS + 3);
    }
}
