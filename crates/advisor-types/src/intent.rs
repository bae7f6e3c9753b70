//! Per-turn intent annotation.
//!
//! An [`IntentSignal`] is derived fresh from each turn's transcript and
//! transcription confidence. It is never stored on the session or reused
//! across turns.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Business vocabulary used both as speech-recognition keyword boosts and as
/// the domain terms matched by intent analysis.
pub const BUSINESS_VOCABULARY: &[&str] = &[
    "strategy",
    "strategic",
    "business",
    "marketing",
    "pricing",
    "competition",
    "revenue",
    "growth",
    "decision",
    "planning",
    "consulting",
    "coaching",
    "ADHD",
    "entrepreneur",
    "solopreneur",
    "challenge",
    "opportunity",
    "risk",
    "analysis",
    "ROI",
    "KPI",
    "metrics",
    "conversion",
    "funnel",
    "acquisition",
    "retention",
    "churn",
    "pivot",
    "scale",
    "optimize",
    "monetize",
    "validate",
];

/// How pressing the caller's request sounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Urgency {
    #[default]
    Normal,
    High,
}

/// Bucketed transcription confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    /// Buckets a recognizer confidence score: above 0.8 is high, above 0.5
    /// is medium, anything else is low.
    pub fn from_score(score: f32) -> Self {
        if score > 0.8 {
            Self::High
        } else if score > 0.5 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

/// Transient annotation of one caller utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentSignal {
    /// The caller appears to be asking for a judgment on a pending decision.
    pub is_decision_request: bool,
    /// The caller is talking about their business at all.
    pub is_business_question: bool,
    pub urgency: Urgency,
    /// Vocabulary terms found in the utterance.
    pub domain_keywords: BTreeSet<String>,
    pub confidence_level: ConfidenceLevel,
}

impl IntentSignal {
    /// A neutral signal: no decision, normal urgency, nothing matched.
    pub fn neutral(confidence_level: ConfidenceLevel) -> Self {
        Self {
            is_decision_request: false,
            is_business_question: false,
            urgency: Urgency::Normal,
            domain_keywords: BTreeSet::new(),
            confidence_level,
        }
    }

    /// Whether any of `terms` was matched, compared case-insensitively.
    pub fn mentions_any(&self, terms: &[&str]) -> bool {
        self.domain_keywords
            .iter()
            .any(|k| terms.iter().any(|t| k.eq_ignore_ascii_case(t)))
    }
}
