use dioxus::prelude::*;

use services::WizardIntent;

use crate::vm::{FeedbackVm, ReviewVm};

#[component]
pub fn ReviewScreen(vm: ReviewVm, busy: bool, on_intent: EventHandler<WizardIntent>) -> Element {
    rsx! {
        section { class: "review",
            p { class: "progress-label", "{vm.progress_label}" }
            h2 { class: "prompt", "{vm.question}" }

            h3 { "Your answer" }
            blockquote { class: "answer", "{vm.answer}" }

            if let Some(feedback) = vm.feedback.clone() {
                FeedbackCard { feedback }
            }

            div { class: "actions",
                button {
                    id: "review-previous",
                    class: "secondary",
                    disabled: busy || !vm.can_go_previous,
                    onclick: move |_| on_intent.call(WizardIntent::ReviewPrevious),
                    "Previous"
                }
                button {
                    id: "review-next",
                    class: "secondary",
                    disabled: busy || !vm.can_go_next,
                    onclick: move |_| on_intent.call(WizardIntent::ReviewNext),
                    "Next"
                }
            }
        }
    }
}

#[component]
fn FeedbackCard(feedback: FeedbackVm) -> Element {
    match feedback {
        FeedbackVm::NeedsWork { summary, guidance } => rsx! {
            div { class: "feedback needs-work",
                h3 { "Feedback" }
                p { class: "summary", "{summary}" }
                h4 { "What a strong answer needs" }
                p { "{guidance}" }
            }
        },
        FeedbackVm::Strong {
            strengths,
            improvements,
        } => rsx! {
            div { class: "feedback strong",
                h3 { "Strengths" }
                ul {
                    for item in strengths.iter() {
                        li { "{item}" }
                    }
                }
                h3 { "Areas for improvement" }
                ul {
                    for item in improvements.iter() {
                        li { "{item}" }
                    }
                }
            }
        },
    }
}
