use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::validation::{ValidationError, check_content_safety, check_job_title};

/// Upper bound on questions per session.
pub const MAX_QUESTIONS: u32 = 20;

/// Question count used by a fresh session.
pub const DEFAULT_QUESTION_COUNT: u32 = 5;

/// Job title a fresh session starts with.
pub const DEFAULT_JOB_TITLE: &str = "Software Engineer";

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Seniority phrasing embedded in question-generation prompts.
    #[must_use]
    pub fn prompt_phrase(self) -> &'static str {
        match self {
            Difficulty::Easy => "entry-level questions covering basic concepts",
            Difficulty::Medium => "mid-level questions focused on practical experience",
            Difficulty::Hard => "senior-level questions that probe deep expertise",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(UnknownDifficulty(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty: {0}")]
pub struct UnknownDifficulty(pub String);

//
// ─── QUESTION COUNT ────────────────────────────────────────────────────────────
//

/// Number of questions in a session, always within `1..=MAX_QUESTIONS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestionCount(u32);

impl QuestionCount {
    /// # Errors
    ///
    /// Returns `ValidationError::QuestionCountOutOfRange` outside `1..=MAX_QUESTIONS`.
    pub fn new(count: u32) -> Result<Self, ValidationError> {
        if !(1..=MAX_QUESTIONS).contains(&count) {
            return Err(ValidationError::QuestionCountOutOfRange { max: MAX_QUESTIONS });
        }
        Ok(Self(count))
    }

    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn as_usize(self) -> usize {
        usize::try_from(self.0).unwrap_or(usize::MAX)
    }

    /// Behavioral share of the question mix: `floor(count * 0.4)`.
    #[must_use]
    pub fn behavioral(self) -> u32 {
        self.0 * 2 / 5
    }

    /// Technical share of the question mix: whatever behavioral leaves.
    #[must_use]
    pub fn technical(self) -> u32 {
        self.0 - self.behavioral()
    }
}

impl Default for QuestionCount {
    fn default() -> Self {
        Self(DEFAULT_QUESTION_COUNT)
    }
}

//
// ─── JOB PROFILE ───────────────────────────────────────────────────────────────
//

/// Validated inputs for starting an interview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobProfile {
    title: String,
    description: Option<String>,
    question_count: QuestionCount,
    difficulty: Difficulty,
    model: String,
}

/// Raw setup-screen inputs, as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct JobProfileDraft {
    pub title: String,
    pub description: Option<String>,
    pub question_count: u32,
    pub difficulty: Difficulty,
    pub model: String,
}

impl JobProfileDraft {
    /// Validate and normalize the draft.
    ///
    /// The title and description are trimmed; a blank description becomes `None`.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` hit, checking title, then description,
    /// then question count, then model.
    pub fn validate(self) -> Result<JobProfile, ValidationError> {
        let title = self.title.trim().to_string();
        check_job_title(&title)?;

        let description = self
            .description
            .map(|val| val.trim().to_string())
            .filter(|val| !val.is_empty());
        if let Some(description) = description.as_deref() {
            check_content_safety(description)?;
        }

        let question_count = QuestionCount::new(self.question_count)?;

        let model = self.model.trim().to_string();
        if model.is_empty() {
            return Err(ValidationError::MissingModel);
        }

        Ok(JobProfile {
            title,
            description,
            question_count,
            difficulty: self.difficulty,
            model,
        })
    }
}

impl JobProfile {
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn question_count(&self) -> QuestionCount {
        self.question_count
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Replace the question count (used when offline mode pins the canned list length).
    #[must_use]
    pub fn with_question_count(mut self, count: QuestionCount) -> Self {
        self.question_count = count;
        self
    }
}
