//! System prompt assembly for the advisor persona.

use crate::lens::AnalysisLens;
use advisor_types::{ConfidenceLevel, IntentSignal, Urgency};

/// Persona template. `{name}` is replaced with the configured advisor name.
const PERSONA_TEMPLATE: &str = "\
You are {name}, a sharp strategic business advisor speaking with an entrepreneur on the phone.
You challenge weak thinking, disagree when the caller is thinking too small, and push toward
the decision that actually moves the business forward. You are direct, confident and warm,
never sycophantic.

You are speaking, not writing: answer in two to four short sentences of plain conversational
English. No lists, headings, markdown, emoji or stage directions.";

/// Builds the system prompt for one turn.
pub fn system_prompt(advisor_name: &str, intent: &IntentSignal) -> String {
    let mut prompt = PERSONA_TEMPLATE.replace("{name}", advisor_name);

    let lenses = AnalysisLens::select(intent);
    if !lenses.is_empty() {
        prompt.push_str("\n\n");
        let directives: Vec<&str> = lenses.iter().map(|lens| lens.directive()).collect();
        prompt.push_str(&directives.join("\n"));
    }

    let hints = intent_hints(intent);
    if !hints.is_empty() {
        prompt.push_str("\n\nAbout this turn:\n");
        prompt.push_str(&hints.join("\n"));
    }

    prompt
}

fn intent_hints(intent: &IntentSignal) -> Vec<String> {
    let mut hints = Vec::new();

    if intent.urgency == Urgency::High {
        hints.push(
            "- The caller sounds under pressure. Lead with the single most important action."
                .to_string(),
        );
    }
    if intent.confidence_level == ConfidenceLevel::Low {
        hints.push(
            "- The speech recognition was uncertain. If the request is ambiguous, briefly say \
             what you understood before answering."
                .to_string(),
        );
    }
    if !intent.domain_keywords.is_empty() {
        let topics: Vec<&str> = intent.domain_keywords.iter().map(String::as_str).collect();
        hints.push(format!("- Topics mentioned: {}.", topics.join(", ")));
    }

    hints
}
