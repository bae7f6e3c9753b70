//! Keyword heuristics that annotate a caller utterance.

use advisor_types::{ConfidenceLevel, IntentSignal, Urgency, BUSINESS_VOCABULARY};

const DECISION_INDICATORS: &[&str] = &[
    "should i",
    "thinking of",
    "planning to",
    "considering",
    "what do you think",
];

const URGENCY_INDICATORS: &[&str] = &["urgent", "asap", "immediately", "crisis", "problem", "issue"];

const BUSINESS_INDICATORS: &[&str] = &[
    "business",
    "strategy",
    "marketing",
    "pricing",
    "revenue",
    "growth",
    "decision",
];

/// Derives an [`IntentSignal`] from one transcript.
///
/// Matching is case-insensitive substring search. The analyzer holds only
/// read-only vocabulary and is shared by every call.
#[derive(Debug, Clone)]
pub struct IntentAnalyzer {
    vocabulary: Vec<String>,
}

impl Default for IntentAnalyzer {
    fn default() -> Self {
        Self::new(BUSINESS_VOCABULARY.iter().map(|term| term.to_string()))
    }
}

impl IntentAnalyzer {
    pub fn new(vocabulary: impl IntoIterator<Item = String>) -> Self {
        Self {
            vocabulary: vocabulary.into_iter().collect(),
        }
    }

    pub fn analyze(&self, transcript: &str, confidence: f32) -> IntentSignal {
        let lower = transcript.to_lowercase();
        let contains_any = |terms: &[&str]| terms.iter().any(|term| lower.contains(term));

        let mut signal = IntentSignal::neutral(ConfidenceLevel::from_score(confidence));
        signal.is_decision_request = contains_any(DECISION_INDICATORS);
        signal.is_business_question = contains_any(BUSINESS_INDICATORS);
        if contains_any(URGENCY_INDICATORS) {
            signal.urgency = Urgency::High;
        }
        signal.domain_keywords = self
            .vocabulary
            .iter()
            .filter(|term| lower.contains(&term.to_lowercase()))
            .cloned()
            .collect();

        signal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_question_is_a_decision() {
        let signal = IntentAnalyzer::default().analyze("Should I raise my prices?", 0.92);
        assert!(signal.is_decision_request);
        assert_eq!(signal.urgency, Urgency::Normal);
        assert_eq!(signal.confidence_level, ConfidenceLevel::High);
    }

    #[test]
    fn urgency_and_keywords_are_detected() {
        let signal = IntentAnalyzer::default()
            .analyze("Churn is a crisis and our Pricing strategy is broken", 0.6);
        assert!(!signal.is_decision_request);
        assert!(signal.is_business_question);
        assert_eq!(signal.urgency, Urgency::High);
        assert_eq!(signal.confidence_level, ConfidenceLevel::Medium);
        for term in ["churn", "pricing", "strategy"] {
            assert!(signal.domain_keywords.contains(term), "missing {}", term);
        }
    }

    #[test]
    fn plain_chatter_is_neutral() {
        let signal = IntentAnalyzer::default().analyze("hello there", 0.2);
        assert_eq!(signal, IntentSignal::neutral(ConfidenceLevel::Low));
    }
}
