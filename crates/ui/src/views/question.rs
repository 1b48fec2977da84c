use dioxus::prelude::*;

use services::WizardIntent;

use crate::vm::{AwaitingVm, QuestionVm, answer_hint, recommended_length_hint};

#[component]
pub fn QuestionScreen(
    vm: QuestionVm,
    draft: Signal<String>,
    busy: bool,
    on_intent: EventHandler<WizardIntent>,
) -> Element {
    let mut draft = draft;
    let hint = answer_hint(&draft.read());
    let guidance = recommended_length_hint();

    rsx! {
        section { class: "question",
            p { class: "progress-label", "{vm.progress_label}" }
            div { class: "progress",
                div { class: "progress-bar", style: "width: {vm.progress_percent}%" }
            }
            p { class: "role", "{vm.job_title}" }
            h2 { class: "prompt", "{vm.question}" }

            textarea {
                id: "answer",
                rows: "8",
                placeholder: "Type your answer here",
                value: "{draft}",
                oninput: move |evt| draft.set(evt.value()),
            }
            div { class: "answer-meta",
                span { class: if hint.too_long { "count over" } else { "count" }, "{hint.count_label}" }
                span { class: "hint", "{guidance}" }
            }
            if let Some(warning) = hint.warning {
                p { class: "warning", "{warning}" }
            }

            div { class: "actions",
                button {
                    id: "answer-previous",
                    class: "secondary",
                    disabled: busy || !vm.can_go_previous,
                    onclick: move |_| on_intent.call(WizardIntent::Previous(draft())),
                    "Previous"
                }
                if vm.is_last {
                    button {
                        id: "answer-finish",
                        class: "primary",
                        disabled: busy,
                        onclick: move |_| on_intent.call(WizardIntent::Finish(draft())),
                        "Finish"
                    }
                } else {
                    button {
                        id: "answer-next",
                        class: "primary",
                        disabled: busy,
                        onclick: move |_| on_intent.call(WizardIntent::Next(draft())),
                        "Next"
                    }
                }
            }
        }
    }
}

#[component]
pub fn AwaitingScreen(vm: AwaitingVm, busy: bool, on_intent: EventHandler<WizardIntent>) -> Element {
    rsx! {
        section { class: "awaiting",
            h2 { "Nice work!" }
            p { "{vm.progress_label}" }
            button {
                id: "view-feedback",
                class: "primary",
                disabled: busy,
                onclick: move |_| on_intent.call(WizardIntent::ViewFeedback),
                "View feedback"
            }
        }
    }
}
