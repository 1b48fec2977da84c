use serde::{Deserialize, Serialize};

/// Summary shown for every answer when AI feedback is switched off.
pub const UNAVAILABLE_SUMMARY: &str = "AI feedback is not available.";
pub const UNAVAILABLE_GUIDANCE: &str = "Feedback generation is turned off for this session. \
Review your answer against the STAR method: describe the Situation, the Task, \
the Action you took, and the Result.";

/// Evaluation of a single answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedbackResult {
    /// The answer was not substantive or not relevant to the question.
    Invalid { summary: String, guidance: String },
    /// The answer was substantive.
    Valid {
        strengths: Vec<String>,
        improvements: Vec<String>,
    },
}

impl FeedbackResult {
    /// Placeholder used when feedback generation is disabled.
    #[must_use]
    pub fn unavailable() -> Self {
        Self::Invalid {
            summary: UNAVAILABLE_SUMMARY.to_string(),
            guidance: UNAVAILABLE_GUIDANCE.to_string(),
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}
