use std::sync::Arc;
use std::time::Duration;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use services::{FeedbackGenerator, InterviewLoopService, QuestionSource};

use crate::context::{UiApp, build_app_context};
use crate::views::WizardView;

#[derive(Clone)]
struct TestApp {
    interview: Arc<InterviewLoopService>,
}

impl UiApp for TestApp {
    fn interview(&self) -> Arc<InterviewLoopService> {
        Arc::clone(&self.interview)
    }

    fn model_options(&self) -> Vec<String> {
        vec!["gpt-4o".to_string(), "gpt-4o-mini".to_string()]
    }
}

#[derive(Props, Clone)]
struct WizardHarnessProps {
    app: Arc<TestApp>,
}

impl PartialEq for WizardHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn WizardHarness(props: WizardHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    rsx! { WizardView {} }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        self.dom.process_events();
        self.dom.render_immediate(&mut NoOpMutations);
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn offline_interview() -> Arc<InterviewLoopService> {
    Arc::new(InterviewLoopService::new(
        QuestionSource::Canned,
        FeedbackGenerator::disabled(Duration::ZERO),
        "gpt-4o-mini",
    ))
}

pub fn setup_wizard_harness(interview: Arc<InterviewLoopService>) -> ViewHarness {
    let dom = VirtualDom::new_with_props(
        WizardHarness,
        WizardHarnessProps {
            app: Arc::new(TestApp { interview }),
        },
    );
    ViewHarness { dom }
}
