use tracing::{info, warn};

use interview_core::model::{Difficulty, JobProfileDraft};

use super::session::{InterviewSession, SessionPhase};
use crate::ai::CostTally;
use crate::error::InterviewError;
use crate::feedback::FeedbackGenerator;
use crate::questions::QuestionSource;

/// Raw setup-screen inputs for `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartRequest {
    pub title: String,
    pub description: String,
    pub question_count: u32,
    pub difficulty: Difficulty,
    pub model: String,
}

impl StartRequest {
    /// Pre-fill the form from the session's current inputs.
    #[must_use]
    pub fn from_session(session: &InterviewSession) -> Self {
        Self {
            title: session.job_title().to_string(),
            description: session.job_description().unwrap_or_default().to_string(),
            question_count: session.question_count().get(),
            difficulty: session.difficulty(),
            model: session.model_id().to_string(),
        }
    }

    fn into_draft(self) -> JobProfileDraft {
        JobProfileDraft {
            title: self.title,
            description: Some(self.description),
            question_count: self.question_count,
            difficulty: self.difficulty,
            model: self.model,
        }
    }
}

/// Outcome of `produce_feedback`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackStatus {
    Generated,
    /// Feedback was already present; nothing was called.
    AlreadyAvailable,
}

/// Runs the transitions that reach out to question and feedback generation.
#[derive(Clone)]
pub struct InterviewLoopService {
    questions: QuestionSource,
    feedback: FeedbackGenerator,
    default_model: String,
}

impl InterviewLoopService {
    #[must_use]
    pub fn new(
        questions: QuestionSource,
        feedback: FeedbackGenerator,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            questions,
            feedback,
            default_model: default_model.into(),
        }
    }

    #[must_use]
    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    #[must_use]
    pub fn questions_online(&self) -> bool {
        self.questions.is_online()
    }

    #[must_use]
    pub fn feedback_online(&self) -> bool {
        self.feedback.is_online()
    }

    /// A fresh setup-screen session.
    #[must_use]
    pub fn new_session(&self) -> InterviewSession {
        InterviewSession::new(self.default_model.clone())
    }

    /// Validate the profile, fetch questions and enter the answering phase.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` outside setup, `Validation` for rejected inputs and
    /// `Generation` when questions could not be produced. The session keeps
    /// its setup state on every error.
    pub async fn start(
        &self,
        session: &mut InterviewSession,
        request: StartRequest,
    ) -> Result<(), InterviewError> {
        session.ensure_phase(SessionPhase::Setup, "start")?;

        let mut profile = request.into_draft().validate()?;
        if let Some(fixed) = self.questions.fixed_count() {
            if fixed != profile.question_count() {
                info!(
                    session_id = %session.id(),
                    requested = profile.question_count().get(),
                    served = fixed.get(),
                    "offline questions use a fixed count"
                );
            }
            profile = profile.with_question_count(fixed);
        }

        let mut tally = CostTally::default();
        let result = self
            .questions
            .generate_questions(session.id(), &profile, &mut tally)
            .await;
        session.add_cost(tally.micro_usd());
        let questions = result?;

        info!(
            session_id = %session.id(),
            count = questions.len(),
            difficulty = %profile.difficulty(),
            "interview started"
        );
        session.begin(profile, questions);
        Ok(())
    }

    /// Produce feedback for every answer, once.
    ///
    /// Calling this again after success returns `AlreadyAvailable` without
    /// reaching the generator.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` before the answers are finished; `Generation` when
    /// the batch fails, leaving the session awaiting feedback.
    pub async fn produce_feedback(
        &self,
        session: &mut InterviewSession,
    ) -> Result<FeedbackStatus, InterviewError> {
        if session.phase() == SessionPhase::Reviewing {
            return Ok(FeedbackStatus::AlreadyAvailable);
        }
        session.ensure_phase(SessionPhase::AwaitingFeedback, "view feedback")?;

        let mut tally = CostTally::default();
        let result = self
            .feedback
            .generate_feedback(
                session.id(),
                session.model_id(),
                session.questions(),
                session.answers(),
                &mut tally,
            )
            .await;
        session.add_cost(tally.micro_usd());

        match result {
            Ok(feedback) => {
                info!(
                    session_id = %session.id(),
                    results = feedback.len(),
                    calls = tally.calls(),
                    "feedback ready"
                );
                session.apply_feedback(feedback);
                Ok(FeedbackStatus::Generated)
            }
            Err(err) => {
                if tally.calls() > 0 {
                    warn!(
                        session_id = %session.id(),
                        billed_calls = tally.calls(),
                        "feedback batch failed after partial progress"
                    );
                }
                Err(err.into())
            }
        }
    }

    /// Discard the session and replace it with a fresh one.
    pub fn restart(&self, session: &mut InterviewSession) {
        info!(session_id = %session.id(), "session discarded");
        *session = self.new_session();
    }
}
