use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use interview_core::model::{AppSettingsDraft, Difficulty, FeedbackResult};
use interview_core::time::fixed_clock;
use services::generation::{GenerationOutput, GenerationRequest, TokenUsage};
use services::{
    AppServices, FeedbackStatus, GenerationError, GenerationService, InterviewError,
    SessionPhase, StartRequest,
};

/// Answers question requests with exactly the count asked for, and feedback
/// requests with a valid verdict. Failures can be queued up front.
#[derive(Default)]
struct FakeModel {
    calls: AtomicUsize,
    failures: Mutex<VecDeque<GenerationError>>,
}

impl FakeModel {
    fn failing_with(errors: Vec<GenerationError>) -> Arc<Self> {
        Arc::new(Self {
            failures: Mutex::new(errors.into()),
            ..Self::default()
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn requested_count(prompt: &str) -> usize {
    prompt
        .split("EXACTLY ")
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

#[async_trait]
impl GenerationService for FakeModel {
    fn provider(&self) -> &str {
        "openai"
    }

    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationOutput, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.failures.lock().unwrap().pop_front() {
            return Err(err);
        }
        let content = if request.schema_name == "interview_questions" {
            let questions: Vec<String> = (1..=requested_count(&request.user))
                .map(|i| format!("Generated question {i}?"))
                .collect();
            json!({ "questions": questions })
        } else {
            json!({
                "is_valid": true,
                "summary": "",
                "guidance": "",
                "strengths": ["Specific", "Structured"],
                "improvements": ["Add metrics", "Be concise"]
            })
        };
        Ok(GenerationOutput {
            content: content.to_string(),
            usage: TokenUsage {
                input: 1_000,
                output: 1_000,
            },
        })
    }
}

fn online_services(model: Arc<FakeModel>) -> AppServices {
    let settings = AppSettingsDraft {
        api_key: Some("sk-test".into()),
        ai_questions: true,
        ai_feedback: true,
        ..AppSettingsDraft::new()
    }
    .validate()
    .unwrap();
    AppServices::with_generation(settings, fixed_clock(), Some(model))
}

fn request(count: u32) -> StartRequest {
    StartRequest {
        title: "Platform Engineer".into(),
        description: "Own our Kubernetes clusters.".into(),
        question_count: count,
        difficulty: Difficulty::Hard,
        model: "gpt-4o-mini".into(),
    }
}

// gpt-4o-mini: 1k input at $0.15/1M plus 1k output at $0.60/1M.
const CALL_COST_MICRO_USD: u64 = 750;

#[tokio::test]
async fn every_count_yields_aligned_arrays() {
    let model = Arc::new(FakeModel::default());
    let services = online_services(model.clone());
    let interview = services.interview();

    for count in 1..=20 {
        let mut session = interview.new_session();
        interview.start(&mut session, request(count)).await.unwrap();
        let expected = usize::try_from(count).unwrap();
        assert_eq!(session.questions().len(), expected);
        assert_eq!(session.answers().len(), expected);
        assert!(session.step() <= expected);
    }
    assert_eq!(model.calls(), 20);
}

#[tokio::test]
async fn feedback_cost_is_charged_once() {
    let model = Arc::new(FakeModel::default());
    let services = online_services(model.clone());
    let interview = services.interview();
    let mut session = interview.new_session();

    interview.start(&mut session, request(3)).await.unwrap();
    session.next("I migrated our clusters.".into()).unwrap();
    session.next("I wrote the runbooks.".into()).unwrap();
    session.finish("I reduced on-call pages.".into()).unwrap();

    assert_eq!(
        interview.produce_feedback(&mut session).await.unwrap(),
        FeedbackStatus::Generated
    );
    let cost_after_first = session.total_cost_micro_usd();
    let calls_after_first = model.calls();

    assert_eq!(
        interview.produce_feedback(&mut session).await.unwrap(),
        FeedbackStatus::AlreadyAvailable
    );

    assert_eq!(cost_after_first, 4 * CALL_COST_MICRO_USD);
    assert_eq!(session.total_cost_micro_usd(), cost_after_first);
    assert_eq!(model.calls(), calls_after_first);
    assert!(session.feedback().iter().all(FeedbackResult::is_valid));
    assert_eq!(
        services.ledger_cost_micro_usd().await.unwrap(),
        cost_after_first
    );
}

#[tokio::test]
async fn failed_feedback_keeps_awaiting_and_can_be_retried() {
    let model = FakeModel::failing_with(vec![]);
    let services = online_services(model.clone());
    let interview = services.interview();
    let mut session = interview.new_session();
    interview.start(&mut session, request(2)).await.unwrap();
    session.next("First.".into()).unwrap();
    session.finish("Second.".into()).unwrap();

    model
        .failures
        .lock()
        .unwrap()
        .push_back(GenerationError::Timeout);
    let err = interview.produce_feedback(&mut session).await.unwrap_err();

    assert!(err.is_retryable());
    assert!(matches!(
        err,
        InterviewError::Generation(GenerationError::Timeout)
    ));
    assert_eq!(session.phase(), SessionPhase::AwaitingFeedback);
    assert!(session.feedback().is_empty());

    interview.produce_feedback(&mut session).await.unwrap();
    assert_eq!(session.phase(), SessionPhase::Reviewing);
    assert_eq!(session.feedback().len(), 2);
}

#[tokio::test]
async fn transport_failure_on_start_stays_in_setup() {
    let model = FakeModel::failing_with(vec![GenerationError::HttpStatus(
        reqwest::StatusCode::BAD_GATEWAY,
    )]);
    let services = online_services(model);
    let interview = services.interview();
    let mut session = interview.new_session();

    let err = interview.start(&mut session, request(4)).await.unwrap_err();

    assert!(err.is_retryable());
    assert_eq!(session.phase(), SessionPhase::Setup);
    assert!(session.questions().is_empty());
    assert!(session.answers().is_empty());
}
