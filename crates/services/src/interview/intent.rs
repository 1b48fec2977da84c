use tracing::debug;

use super::session::{InterviewSession, ReviewDirection};
use super::snapshot::SessionSnapshot;
use super::workflow::{InterviewLoopService, StartRequest};
use crate::error::InterviewError;

/// Everything the renderer can ask the wizard to do.
///
/// Answer-carrying variants hold the text currently in the answer box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardIntent {
    Start(StartRequest),
    Previous(String),
    Next(String),
    Finish(String),
    ViewFeedback,
    ReviewPrevious,
    ReviewNext,
    StartOver,
    /// Plain redraw with the current draft; never rejected.
    Render(String),
}

impl WizardIntent {
    fn name(&self) -> &'static str {
        match self {
            WizardIntent::Start(_) => "start",
            WizardIntent::Previous(_) => "previous",
            WizardIntent::Next(_) => "next",
            WizardIntent::Finish(_) => "finish",
            WizardIntent::ViewFeedback => "view_feedback",
            WizardIntent::ReviewPrevious => "review_previous",
            WizardIntent::ReviewNext => "review_next",
            WizardIntent::StartOver => "start_over",
            WizardIntent::Render(_) => "render",
        }
    }
}

impl InterviewLoopService {
    /// Apply one intent to the session.
    ///
    /// # Errors
    ///
    /// Whatever the underlying transition returns; the session is unchanged
    /// on error apart from cost already billed.
    pub async fn apply(
        &self,
        session: &mut InterviewSession,
        intent: WizardIntent,
    ) -> Result<(), InterviewError> {
        debug!(session_id = %session.id(), intent = intent.name(), "dispatching intent");
        match intent {
            WizardIntent::Start(request) => self.start(session, request).await,
            WizardIntent::Previous(answer) => session.previous(answer),
            WizardIntent::Next(answer) => session.next(answer),
            WizardIntent::Finish(answer) => session.finish(answer),
            WizardIntent::ViewFeedback => self.produce_feedback(session).await.map(|_| ()),
            WizardIntent::ReviewPrevious => session.review_navigate(ReviewDirection::Previous),
            WizardIntent::ReviewNext => session.review_navigate(ReviewDirection::Next),
            WizardIntent::StartOver => {
                self.restart(session);
                Ok(())
            }
            WizardIntent::Render(_) => Ok(()),
        }
    }

    /// Apply an intent and return what the renderer should show next.
    ///
    /// Rejections are reported in `SessionSnapshot::error` rather than returned.
    pub async fn dispatch(
        &self,
        session: &mut InterviewSession,
        intent: WizardIntent,
    ) -> SessionSnapshot {
        let draft = match &intent {
            WizardIntent::Render(text) => Some(text.clone()),
            _ => None,
        };
        match self.apply(session, intent).await {
            Ok(()) => SessionSnapshot::capture(session, draft.as_deref()),
            Err(err) => SessionSnapshot::capture(session, draft.as_deref())
                .with_error(err.to_string(), err.is_retryable()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::feedback::FeedbackGenerator;
    use crate::interview::SessionPhase;
    use crate::questions::QuestionSource;
    use interview_core::model::Difficulty;

    fn service() -> InterviewLoopService {
        InterviewLoopService::new(
            QuestionSource::Canned,
            FeedbackGenerator::disabled(Duration::ZERO),
            "gpt-4o-mini",
        )
    }

    async fn answering(service: &InterviewLoopService) -> InterviewSession {
        let mut session = service.new_session();
        let request = StartRequest {
            title: "Software Engineer".into(),
            description: String::new(),
            question_count: 5,
            difficulty: Difficulty::Medium,
            model: "gpt-4o-mini".into(),
        };
        service
            .apply(&mut session, WizardIntent::Start(request))
            .await
            .unwrap();
        session
    }

    #[tokio::test]
    async fn render_with_empty_answer_is_not_an_error() {
        let service = service();
        let mut session = answering(&service).await;
        let snapshot = service
            .dispatch(&mut session, WizardIntent::Render(String::new()))
            .await;
        assert!(snapshot.error.is_none());
        assert_eq!(snapshot.phase, SessionPhase::Answering);
    }

    #[tokio::test]
    async fn empty_answer_on_next_is_reported_in_snapshot() {
        let service = service();
        let mut session = answering(&service).await;
        let snapshot = service
            .dispatch(&mut session, WizardIntent::Next(String::new()))
            .await;
        assert_eq!(
            snapshot.error.as_deref(),
            Some("Please enter an answer before continuing.")
        );
        assert!(!snapshot.retryable);
        assert_eq!(snapshot.step, 1);
    }

    #[tokio::test]
    async fn previous_on_first_step_reports_invalid_transition() {
        let service = service();
        let mut session = answering(&service).await;
        let snapshot = service
            .dispatch(&mut session, WizardIntent::Previous("answer".into()))
            .await;
        assert!(snapshot.error.is_some());
        assert_eq!(snapshot.step, 1);
        assert!(!snapshot.can_go_previous);
    }

    #[tokio::test]
    async fn start_over_returns_to_setup() {
        let service = service();
        let mut session = answering(&service).await;
        let snapshot = service.dispatch(&mut session, WizardIntent::StartOver).await;
        assert_eq!(snapshot.phase, SessionPhase::Setup);
        assert_eq!(snapshot.step, 0);
    }
}
