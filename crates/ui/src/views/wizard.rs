use std::sync::Arc;

use dioxus::prelude::*;
use tracing::debug;

use services::{InterviewLoopService, InterviewSession, SessionSnapshot, WizardIntent};

use crate::context::AppContext;
use crate::views::question::{AwaitingScreen, QuestionScreen};
use crate::views::review::ReviewScreen;
use crate::views::setup::SetupScreen;
use crate::vm::{WizardScreen, busy_label, map_wizard};

const DEFAULT_BUSY_LABEL: &str = "Saving...";

fn initial_state(interview: &Arc<InterviewLoopService>) -> (InterviewSession, SessionSnapshot) {
    let session = interview.new_session();
    let snapshot = SessionSnapshot::capture(&session, None);
    (session, snapshot)
}

#[component]
pub fn WizardView() -> Element {
    let ctx = use_context::<AppContext>();
    let interview = ctx.interview();
    let (initial_session, initial_snapshot) = use_hook(|| initial_state(&interview));

    let session = use_signal(move || Some(initial_session));
    let snapshot = use_signal(move || initial_snapshot);
    let busy = use_signal(|| None::<&'static str>);
    let draft = use_signal(String::new);

    let dispatch = use_callback(move |intent: WizardIntent| {
        let mut session = session;
        let mut snapshot = snapshot;
        let mut busy = busy;
        let mut draft = draft;

        // One transition at a time; the session is out of the signal while it runs.
        if busy.peek().is_some() {
            return;
        }
        busy.set(Some(busy_label(&intent).unwrap_or(DEFAULT_BUSY_LABEL)));

        let interview = interview.clone();
        spawn(async move {
            let taken = session.write().take();
            let Some(mut current) = taken else {
                debug!("intent dropped: no session available");
                busy.set(None);
                return;
            };
            let next = interview.dispatch(&mut current, intent).await;
            session.set(Some(current));
            if next.error.is_none() {
                draft.set(next.answer.clone());
            }
            snapshot.set(next);
            busy.set(None);
        });
    });

    let vm = map_wizard(&snapshot.read());
    let busy_text = busy();
    let is_busy = busy_text.is_some();
    let show_start_over = !matches!(vm.screen, WizardScreen::Setup(_));
    let cost_label = vm.cost_label;
    let error = vm.error;
    let retryable = vm.retryable;
    let screen = vm.screen;

    rsx! {
        div { class: "wizard",
            header { class: "wizard-header",
                h1 { "Interview Practice" }
                p { class: "mode", "{ctx.mode_label()}" }
                p { class: "cost", "{cost_label}" }
                if show_start_over {
                    button {
                        id: "wizard-start-over",
                        class: "secondary",
                        disabled: is_busy,
                        onclick: move |_| dispatch.call(WizardIntent::StartOver),
                        "Start over"
                    }
                }
            }

            if let Some(label) = busy_text {
                p { class: "busy", role: "status", "{label}" }
            }

            if let Some(message) = error {
                div { class: "error", role: "alert",
                    p { "{message}" }
                    if retryable {
                        p { class: "hint", "Please try again." }
                    }
                }
            }

            match screen {
                WizardScreen::Setup(setup) => rsx! {
                    SetupScreen {
                        vm: setup,
                        models: ctx.model_options(),
                        busy: is_busy,
                        on_intent: dispatch,
                    }
                },
                WizardScreen::Question(question) => rsx! {
                    QuestionScreen { vm: question, draft, busy: is_busy, on_intent: dispatch }
                },
                WizardScreen::Awaiting(awaiting) => rsx! {
                    AwaitingScreen { vm: awaiting, busy: is_busy, on_intent: dispatch }
                },
                WizardScreen::Review(review) => rsx! {
                    ReviewScreen { vm: review, busy: is_busy, on_intent: dispatch }
                },
            }
        }
    }
}
