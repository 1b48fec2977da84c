use std::fmt;

use tracing::debug;

use interview_core::model::{
    DEFAULT_JOB_TITLE, Difficulty, FeedbackResult, JobProfile, QuestionCount, SessionId,
};
use interview_core::validation::{MAX_ANSWER_CHARS, ValidationError, check_answer};

use crate::ai::micro_usd_to_usd;
use crate::error::InterviewError;

/// Where the wizard is, derived from the session fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Step 0: collecting the job profile.
    Setup,
    /// Steps 1..=N: collecting answers.
    Answering,
    /// The last answer is committed; feedback has not been produced yet.
    AwaitingFeedback,
    /// Feedback is available and answers are frozen.
    Reviewing,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionPhase::Setup => "setting up",
            SessionPhase::Answering => "answering",
            SessionPhase::AwaitingFeedback => "awaiting feedback",
            SessionPhase::Reviewing => "reviewing",
        };
        f.write_str(label)
    }
}

/// Direction for moving through feedback in review mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDirection {
    Previous,
    Next,
}

/// The complete mutable state of one practice run.
///
/// Invariants held by every transition:
/// - `step <= question_count`
/// - once started, `questions`, `answers` (and `feedback`, when present) have
///   `question_count` entries each
/// - `show_results` implies `finished` and full feedback
#[derive(Debug, Clone, PartialEq)]
pub struct InterviewSession {
    id: SessionId,
    step: usize,
    job_title: String,
    job_description: Option<String>,
    question_count: QuestionCount,
    difficulty: Difficulty,
    model_id: String,
    questions: Vec<String>,
    answers: Vec<String>,
    feedback: Vec<FeedbackResult>,
    finished: bool,
    show_results: bool,
    total_cost_micro_usd: u64,
}

impl InterviewSession {
    /// Fresh session on the setup screen with default inputs.
    #[must_use]
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            id: SessionId::new(),
            step: 0,
            job_title: DEFAULT_JOB_TITLE.to_string(),
            job_description: None,
            question_count: QuestionCount::default(),
            difficulty: Difficulty::default(),
            model_id: model_id.into(),
            questions: Vec::new(),
            answers: Vec::new(),
            feedback: Vec::new(),
            finished: false,
            show_results: false,
            total_cost_micro_usd: 0,
        }
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.show_results {
            SessionPhase::Reviewing
        } else if self.finished {
            SessionPhase::AwaitingFeedback
        } else if self.step == 0 {
            SessionPhase::Setup
        } else {
            SessionPhase::Answering
        }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn step(&self) -> usize {
        self.step
    }

    #[must_use]
    pub fn question_count(&self) -> QuestionCount {
        self.question_count
    }

    #[must_use]
    pub fn job_title(&self) -> &str {
        &self.job_title
    }

    #[must_use]
    pub fn job_description(&self) -> Option<&str> {
        self.job_description.as_deref()
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    #[must_use]
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    #[must_use]
    pub fn feedback(&self) -> &[FeedbackResult] {
        &self.feedback
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub fn shows_results(&self) -> bool {
        self.show_results
    }

    #[must_use]
    pub fn total_cost_micro_usd(&self) -> u64 {
        self.total_cost_micro_usd
    }

    #[must_use]
    pub fn total_cost_usd(&self) -> f64 {
        micro_usd_to_usd(self.total_cost_micro_usd)
    }

    /// Question at the current step, if any.
    #[must_use]
    pub fn current_question(&self) -> Option<&str> {
        self.index().and_then(|i| self.questions.get(i)).map(String::as_str)
    }

    /// Saved answer at the current step, if any.
    #[must_use]
    pub fn current_answer(&self) -> Option<&str> {
        self.index().and_then(|i| self.answers.get(i)).map(String::as_str)
    }

    /// Feedback at the current step; only present in review mode.
    #[must_use]
    pub fn current_feedback(&self) -> Option<&FeedbackResult> {
        self.index().and_then(|i| self.feedback.get(i))
    }

    /// Commit the answer and move forward.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless answering with a following question;
    /// `Validation` when the answer is rejected. Nothing changes on error.
    pub fn next(&mut self, answer: String) -> Result<(), InterviewError> {
        self.ensure_answering("go to the next question", |step, count| step < count)?;
        self.commit(answer)?;
        self.step += 1;
        debug!(session_id = %self.id, step = self.step, "moved to next question");
        Ok(())
    }

    /// Commit the answer and move back.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` on the first question or outside answering;
    /// `Validation` when the answer is rejected. Nothing changes on error.
    pub fn previous(&mut self, answer: String) -> Result<(), InterviewError> {
        self.ensure_answering("go to the previous question", |step, _| step > 1)?;
        self.commit(answer)?;
        self.step -= 1;
        debug!(session_id = %self.id, step = self.step, "moved to previous question");
        Ok(())
    }

    /// Commit the last answer and close the answering phase.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless on the last question;
    /// `Validation` when the answer is rejected. Nothing changes on error.
    pub fn finish(&mut self, answer: String) -> Result<(), InterviewError> {
        self.ensure_answering("finish", |step, count| step == count)?;
        self.commit(answer)?;
        self.finished = true;
        debug!(session_id = %self.id, "answers complete");
        Ok(())
    }

    /// Move through feedback, clamped to the first and last question.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` outside review mode.
    pub fn review_navigate(&mut self, direction: ReviewDirection) -> Result<(), InterviewError> {
        let phase = self.phase();
        if phase != SessionPhase::Reviewing {
            return Err(InterviewError::InvalidTransition {
                action: "browse feedback",
                phase,
            });
        }
        let last = self.question_count.as_usize();
        self.step = match direction {
            ReviewDirection::Previous => self.step.saturating_sub(1).max(1),
            ReviewDirection::Next => (self.step + 1).min(last),
        };
        Ok(())
    }

    /// Install generated questions and enter the answering phase.
    pub(crate) fn begin(&mut self, profile: JobProfile, questions: Vec<String>) {
        debug_assert_eq!(questions.len(), profile.question_count().as_usize());
        self.job_title = profile.title().to_string();
        self.job_description = profile.description().map(str::to_string);
        self.question_count = profile.question_count();
        self.difficulty = profile.difficulty();
        self.model_id = profile.model().to_string();
        self.answers = vec![String::new(); questions.len()];
        self.questions = questions;
        self.feedback = Vec::new();
        self.finished = false;
        self.show_results = false;
        self.step = 1;
    }

    /// Install the full feedback batch and enter review mode at step 1.
    pub(crate) fn apply_feedback(&mut self, feedback: Vec<FeedbackResult>) {
        debug_assert_eq!(feedback.len(), self.answers.len());
        self.feedback = feedback;
        self.show_results = true;
        self.step = 1;
    }

    pub(crate) fn add_cost(&mut self, micro_usd: u64) {
        self.total_cost_micro_usd = self.total_cost_micro_usd.saturating_add(micro_usd);
    }

    pub(crate) fn ensure_phase(
        &self,
        expected: SessionPhase,
        action: &'static str,
    ) -> Result<(), InterviewError> {
        let phase = self.phase();
        if phase == expected {
            Ok(())
        } else {
            Err(InterviewError::InvalidTransition { action, phase })
        }
    }

    fn ensure_answering(
        &self,
        action: &'static str,
        allowed: impl FnOnce(usize, usize) -> bool,
    ) -> Result<(), InterviewError> {
        self.ensure_phase(SessionPhase::Answering, action)?;
        if allowed(self.step, self.question_count.as_usize()) {
            Ok(())
        } else {
            Err(InterviewError::InvalidTransition {
                action,
                phase: SessionPhase::Answering,
            })
        }
    }

    fn commit(&mut self, answer: String) -> Result<(), ValidationError> {
        check_committed_answer(&answer)?;
        if let Some(slot) = self.index().and_then(|i| self.answers.get_mut(i)) {
            *slot = answer;
        }
        Ok(())
    }

    fn index(&self) -> Option<usize> {
        self.step.checked_sub(1)
    }
}

/// Rules for an answer the user is navigating away from.
///
/// The answer is stored as typed; trimming only decides emptiness.
///
/// # Errors
///
/// `EmptyAnswer` for blank input, otherwise the first length or safety violation.
pub fn check_committed_answer(answer: &str) -> Result<(), ValidationError> {
    if answer.trim().is_empty() {
        return Err(ValidationError::EmptyAnswer);
    }
    check_answer(answer, MAX_ANSWER_CHARS)
}
