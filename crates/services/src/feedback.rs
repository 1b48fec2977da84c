//! Feedback Generator: one structured verdict per question/answer pair.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tracing::info;

use interview_core::model::{FeedbackResult, SessionId};
use storage::repository::AiUsagePurpose;

use crate::ai::CostTally;
use crate::error::GenerationError;
use crate::generation::{GenerationGateway, GenerationRequest};

const FEEDBACK_TEMPERATURE: f32 = 0.7;
const FEEDBACK_MAX_TOKENS: u32 = 600;

/// Strengths and improvements a valid verdict must list, each.
const VERDICT_ITEMS: std::ops::RangeInclusive<usize> = 2..=3;

const FEEDBACK_SYSTEM_PROMPT: &str = "You are an experienced interview coach. \
You evaluate one candidate answer at a time and reply only with the requested JSON.";

#[derive(Clone)]
pub enum FeedbackGenerator {
    /// Returns the "not available" placeholder for every pair after `delay`.
    Disabled { delay: Duration },
    Online(GenerationGateway),
}

impl FeedbackGenerator {
    #[must_use]
    pub fn disabled(delay: Duration) -> Self {
        Self::Disabled { delay }
    }

    #[must_use]
    pub fn is_online(&self) -> bool {
        matches!(self, Self::Online(_))
    }

    /// Evaluate every pair in order and return exactly one result per pair.
    ///
    /// Online, the first failing pair aborts the batch; costs of the pairs
    /// already evaluated stay recorded in `tally`.
    ///
    /// # Errors
    ///
    /// Returns `PairCountMismatch` before any work when the slices differ in
    /// length, otherwise `GenerationError` for transport failures or
    /// malformed verdicts.
    pub async fn generate_feedback(
        &self,
        session_id: SessionId,
        model: &str,
        questions: &[String],
        answers: &[String],
        tally: &mut CostTally,
    ) -> Result<Vec<FeedbackResult>, GenerationError> {
        if questions.len() != answers.len() {
            return Err(GenerationError::PairCountMismatch {
                questions: questions.len(),
                answers: answers.len(),
            });
        }

        match self {
            Self::Disabled { delay } => {
                if !delay.is_zero() {
                    tokio::time::sleep(*delay).await;
                }
                info!(%session_id, pairs = answers.len(), "serving placeholder feedback");
                Ok(answers.iter().map(|_| FeedbackResult::unavailable()).collect())
            }
            Self::Online(gateway) => {
                let mut results = Vec::with_capacity(answers.len());
                for (index, (question, answer)) in questions.iter().zip(answers).enumerate() {
                    let result = gateway
                        .call(
                            session_id,
                            AiUsagePurpose::Feedback,
                            feedback_request(model, question, answer),
                            parse_feedback,
                            tally,
                        )
                        .await?;
                    info!(%session_id, pair = index + 1, valid = result.is_valid(), "feedback ready");
                    results.push(result);
                }
                Ok(results)
            }
        }
    }
}

fn feedback_request(model: &str, question: &str, answer: &str) -> GenerationRequest {
    GenerationRequest {
        model: model.to_string(),
        system: FEEDBACK_SYSTEM_PROMPT.to_string(),
        user: feedback_prompt(question, answer),
        temperature: FEEDBACK_TEMPERATURE,
        top_p: None,
        max_output_tokens: FEEDBACK_MAX_TOKENS,
        schema_name: "answer_feedback",
        schema: json!({
            "type": "object",
            "properties": {
                "is_valid": { "type": "boolean" },
                "summary": { "type": "string" },
                "guidance": { "type": "string" },
                "strengths": { "type": "array", "items": { "type": "string" } },
                "improvements": { "type": "array", "items": { "type": "string" } }
            },
            "required": ["is_valid", "summary", "guidance", "strengths", "improvements"],
            "additionalProperties": false
        }),
    }
}

fn feedback_prompt(question: &str, answer: &str) -> String {
    format!(
        "Interview question:\n{question}\n\n\
         Candidate answer:\n{answer}\n\n\
         First decide whether the answer is substantive and relevant to the question.\n\
         If it is not, set is_valid to false, explain why in summary, and in guidance \
         describe what a good answer needs, recommending the STAR method \
         (Situation, Task, Action, Result). Leave strengths and improvements empty.\n\
         If it is, set is_valid to true and list 2-3 strengths and 2-3 concrete \
         improvements. Leave summary and guidance empty."
    )
}

/// Wire shape of one verdict; every field is required by the schema.
#[derive(Debug, Deserialize)]
struct FeedbackPayload {
    is_valid: bool,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    guidance: String,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    improvements: Vec<String>,
}

fn parse_feedback(content: &str) -> Result<FeedbackResult, GenerationError> {
    let payload: FeedbackPayload = serde_json::from_str(content)
        .map_err(|err| GenerationError::malformed(format!("feedback: {err}")))?;
    payload.into_result()
}

impl FeedbackPayload {
    fn into_result(self) -> Result<FeedbackResult, GenerationError> {
        if self.is_valid {
            let strengths = non_blank(self.strengths);
            let improvements = non_blank(self.improvements);
            if !VERDICT_ITEMS.contains(&strengths.len())
                || !VERDICT_ITEMS.contains(&improvements.len())
            {
                return Err(GenerationError::malformed(format!(
                    "valid verdict needs 2-3 strengths and improvements, got {} and {}",
                    strengths.len(),
                    improvements.len()
                )));
            }
            Ok(FeedbackResult::Valid {
                strengths,
                improvements,
            })
        } else {
            let summary = self.summary.trim().to_string();
            if summary.is_empty() {
                return Err(GenerationError::malformed("invalid verdict without summary"));
            }
            Ok(FeedbackResult::Invalid {
                summary,
                guidance: self.guidance.trim().to_string(),
            })
        }
    }
}

fn non_blank(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
