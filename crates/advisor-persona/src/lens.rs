//! Analysis lenses: tool-style sub-queries folded into the persona prompt.
//!
//! A lens is chosen from the turn's intent signal and contributes a
//! directive block telling the model how to frame its answer.

use advisor_types::IntentSignal;

/// Vocabulary that triggers competitive research.
const COMPETITIVE_TERMS: &[&str] = &["competition", "pricing", "acquisition", "churn", "retention"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisLens {
    /// Weigh a pending decision: options, downside, opportunity cost, verdict.
    DecisionAnalysis,
    /// Position the caller against competitors and the market.
    CompetitiveResearch,
}

impl AnalysisLens {
    /// Lenses that apply to a turn, in the order their directives are emitted.
    pub fn select(intent: &IntentSignal) -> Vec<Self> {
        let mut lenses = Vec::new();
        if intent.is_decision_request {
            lenses.push(Self::DecisionAnalysis);
        }
        if intent.mentions_any(COMPETITIVE_TERMS) {
            lenses.push(Self::CompetitiveResearch);
        }
        lenses
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::DecisionAnalysis => "decision_analysis",
            Self::CompetitiveResearch => "competitive_research",
        }
    }

    pub fn directive(self) -> &'static str {
        match self {
            Self::DecisionAnalysis => {
                "DECISION ANALYSIS: The caller is weighing a decision. Name the real options \
                 (including the one they have not considered), the biggest downside of their \
                 current leaning, and the opportunity cost. End with a clear recommendation."
            }
            Self::CompetitiveResearch => {
                "COMPETITIVE RESEARCH: Frame the answer against the market. Consider how \
                 competitors price and position, where the caller can differentiate on value \
                 instead of price, and which niche they could dominate."
            }
        }
    }
}
