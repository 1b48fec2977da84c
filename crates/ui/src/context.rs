use std::sync::Arc;

use services::InterviewLoopService;

pub trait UiApp: Send + Sync {
    fn interview(&self) -> Arc<InterviewLoopService>;

    /// Models offered on the setup screen.
    fn model_options(&self) -> Vec<String>;
}

#[derive(Clone)]
pub struct AppContext {
    interview: Arc<InterviewLoopService>,
    model_options: Arc<[String]>,
    ai_questions: bool,
    ai_feedback: bool,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        let interview = app.interview();
        Self {
            ai_questions: interview.questions_online(),
            ai_feedback: interview.feedback_online(),
            model_options: app.model_options().into(),
            interview,
        }
    }

    #[must_use]
    pub fn interview(&self) -> Arc<InterviewLoopService> {
        Arc::clone(&self.interview)
    }

    #[must_use]
    pub fn model_options(&self) -> Vec<String> {
        self.model_options.to_vec()
    }

    /// Short status line describing which features call the model.
    #[must_use]
    pub fn mode_label(&self) -> &'static str {
        match (self.ai_questions, self.ai_feedback) {
            (true, true) => "AI questions and feedback",
            (true, false) => "AI questions, offline feedback",
            (false, true) => "Practice questions, AI feedback",
            (false, false) => "Offline practice",
        }
    }
}

// Provided by the composition root in `crates/app`.

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
