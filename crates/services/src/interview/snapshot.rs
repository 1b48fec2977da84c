use interview_core::model::{Difficulty, FeedbackResult};
use interview_core::validation::exceeds_recommended_length;

use super::session::{InterviewSession, SessionPhase};

/// Everything a renderer needs to draw the current screen.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub step: usize,
    pub question_count: usize,
    pub job_title: String,
    pub job_description: String,
    pub difficulty: Difficulty,
    pub model_id: String,
    pub question: Option<String>,
    /// Saved answer at the current step.
    pub answer: String,
    pub feedback: Option<FeedbackResult>,
    pub progress_label: String,
    pub total_cost_usd: f64,
    /// User-facing message from the last rejected intent.
    pub error: Option<String>,
    pub retryable: bool,
    /// The draft is allowed but longer than recommended.
    pub long_answer_warning: bool,
    pub can_go_previous: bool,
    pub is_last_question: bool,
}

impl SessionSnapshot {
    /// Snapshot the session; `draft` is the unsaved answer text, if the renderer has one.
    #[must_use]
    pub fn capture(session: &InterviewSession, draft: Option<&str>) -> Self {
        let phase = session.phase();
        let step = session.step();
        let count = session.question_count().as_usize();
        let answer = session.current_answer().unwrap_or_default().to_string();
        let long_answer_warning = exceeds_recommended_length(draft.unwrap_or(&answer));

        Self {
            phase,
            step,
            question_count: count,
            job_title: session.job_title().to_string(),
            job_description: session.job_description().unwrap_or_default().to_string(),
            difficulty: session.difficulty(),
            model_id: session.model_id().to_string(),
            question: session.current_question().map(str::to_string),
            answer,
            feedback: session.current_feedback().cloned(),
            progress_label: progress_label(phase, step, count),
            total_cost_usd: session.total_cost_usd(),
            error: None,
            retryable: false,
            long_answer_warning,
            can_go_previous: step > 1,
            is_last_question: step == count,
        }
    }

    #[must_use]
    pub fn with_error(mut self, message: String, retryable: bool) -> Self {
        self.error = Some(message);
        self.retryable = retryable;
        self
    }
}

fn progress_label(phase: SessionPhase, step: usize, count: usize) -> String {
    match phase {
        SessionPhase::Setup => String::new(),
        SessionPhase::Answering => format!("Question {step} of {count}"),
        SessionPhase::AwaitingFeedback => format!("All {count} answers saved"),
        SessionPhase::Reviewing => format!("Feedback {step} of {count}"),
    }
}
