//! Question Source: canned questions offline, generated questions online.

use serde::Deserialize;
use serde_json::json;
use tracing::info;

use interview_core::model::{JobProfile, QuestionCount, SessionId};
use storage::repository::AiUsagePurpose;

use crate::ai::CostTally;
use crate::error::GenerationError;
use crate::generation::{GenerationGateway, GenerationRequest};

const QUESTION_TEMPERATURE: f32 = 1.0;
const QUESTION_TOP_P: f32 = 0.9;

/// Questions served when generation is switched off.
pub const CANNED_QUESTIONS: [&str; 5] = [
    "Tell me about yourself.",
    "Why do you want this job?",
    "Describe a challenging problem you solved.",
    "What are your strengths and weaknesses?",
    "Where do you see yourself in 3 years?",
];

// Rough per-question output budget, plus room for the JSON envelope.
const TOKENS_PER_QUESTION: u32 = 40;
const TOKEN_HEADROOM: u32 = 64;

#[derive(Clone)]
pub enum QuestionSource {
    Canned,
    Online(GenerationGateway),
}

impl QuestionSource {
    /// In canned mode the list length is fixed and overrides the requested count.
    #[must_use]
    pub fn fixed_count(&self) -> Option<QuestionCount> {
        match self {
            QuestionSource::Canned => QuestionCount::new(
                u32::try_from(CANNED_QUESTIONS.len()).unwrap_or(u32::MAX),
            )
            .ok(),
            QuestionSource::Online(_) => None,
        }
    }

    #[must_use]
    pub fn is_online(&self) -> bool {
        matches!(self, QuestionSource::Online(_))
    }

    /// Produce the ordered questions for a profile.
    ///
    /// Online, exactly `profile.question_count()` questions are requested and
    /// anything else is rejected as malformed.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` for transport failures or malformed output.
    pub async fn generate_questions(
        &self,
        session_id: SessionId,
        profile: &JobProfile,
        tally: &mut CostTally,
    ) -> Result<Vec<String>, GenerationError> {
        match self {
            QuestionSource::Canned => {
                info!(%session_id, "serving canned questions");
                Ok(CANNED_QUESTIONS.iter().map(ToString::to_string).collect())
            }
            QuestionSource::Online(gateway) => {
                let expected = profile.question_count().as_usize();
                gateway
                    .call(
                        session_id,
                        AiUsagePurpose::Questions,
                        question_request(profile),
                        |content| parse_questions(content, expected),
                        tally,
                    )
                    .await
            }
        }
    }
}

fn question_request(profile: &JobProfile) -> GenerationRequest {
    let count = profile.question_count();
    GenerationRequest {
        model: profile.model().to_string(),
        system: question_system_prompt(profile),
        user: question_user_prompt(profile),
        temperature: QUESTION_TEMPERATURE,
        top_p: Some(QUESTION_TOP_P),
        max_output_tokens: count
            .get()
            .saturating_mul(TOKENS_PER_QUESTION)
            .saturating_add(TOKEN_HEADROOM),
        schema_name: "interview_questions",
        schema: json!({
            "type": "object",
            "properties": {
                "questions": {
                    "type": "array",
                    "items": { "type": "string" }
                }
            },
            "required": ["questions"],
            "additionalProperties": false
        }),
    }
}

fn question_system_prompt(profile: &JobProfile) -> String {
    format!(
        "You are the hiring manager for the position {} at a tech company.",
        profile.title()
    )
}

fn question_user_prompt(profile: &JobProfile) -> String {
    let count = profile.question_count();
    let description = profile.description().map_or_else(String::new, |description| {
        format!("\nJob description:\n{description}\n")
    });

    format!(
        "Task: Produce EXACTLY {total} interview questions for this position.\n\
         - Behavioral: {behavioral}\n\
         - Technical: {technical}\n\
         Difficulty: {difficulty} ({phrase}).\n\
         {description}\n\
         Examples of the output:\n\
         Can you describe a challenging software project you worked on and how you handled the obstacles?\n\
         What programming languages are you most proficient in, and how have you applied them in previous projects?\n\n\
         Once you have the questions, refine each one to be more specific and challenging.\n\
         Return only the refined questions.",
        total = count.get(),
        behavioral = count.behavioral(),
        technical = count.technical(),
        difficulty = profile.difficulty(),
        phrase = profile.difficulty().prompt_phrase(),
    )
}

#[derive(Debug, Deserialize)]
struct QuestionList {
    questions: Vec<String>,
}

fn parse_questions(content: &str, expected: usize) -> Result<Vec<String>, GenerationError> {
    let list: QuestionList = serde_json::from_str(content)
        .map_err(|err| GenerationError::malformed(format!("question list: {err}")))?;

    let questions: Vec<String> = list
        .questions
        .into_iter()
        .map(|question| question.trim().to_string())
        .filter(|question| !question.is_empty())
        .collect();

    if questions.len() != expected {
        return Err(GenerationError::malformed(format!(
            "expected {expected} questions, got {}",
            questions.len()
        )));
    }

    Ok(questions)
}
