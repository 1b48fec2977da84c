use dioxus::prelude::*;

use interview_core::model::Difficulty;
use interview_core::validation::validate_job_title;
use services::{StartRequest, WizardIntent};

use crate::vm::SetupVm;

#[component]
pub fn SetupScreen(
    vm: SetupVm,
    models: Vec<String>,
    busy: bool,
    on_intent: EventHandler<WizardIntent>,
) -> Element {
    let mut title = use_signal(|| vm.title.clone());
    let mut description = use_signal(|| vm.description.clone());
    let mut count = use_signal(|| vm.question_count.to_string());
    let mut difficulty = use_signal(|| vm.difficulty);
    let mut model = use_signal(|| vm.model.clone());

    // Inline hint only; the start transition re-validates everything.
    let title_hint = validate_job_title(title.read().trim());

    let submit = move |_: MouseEvent| {
        on_intent.call(WizardIntent::Start(StartRequest {
            title: title(),
            description: description(),
            // Unparseable counts fall through to the range check.
            question_count: count().trim().parse().unwrap_or(0),
            difficulty: difficulty(),
            model: model(),
        }));
    };

    rsx! {
        section { class: "setup",
            h2 { "Set up your interview" }

            label { r#for: "setup-title", "Job title" }
            input {
                id: "setup-title",
                r#type: "text",
                value: "{title}",
                oninput: move |evt| title.set(evt.value()),
            }
            if !title_hint.is_empty() {
                p { class: "field-hint", "{title_hint}" }
            }

            label { r#for: "setup-description", "Job description (optional)" }
            textarea {
                id: "setup-description",
                rows: "4",
                value: "{description}",
                oninput: move |evt| description.set(evt.value()),
            }

            label { r#for: "setup-count", "Number of questions" }
            input {
                id: "setup-count",
                r#type: "number",
                min: "1",
                max: "{vm.max_questions}",
                value: "{count}",
                oninput: move |evt| count.set(evt.value()),
            }

            label { r#for: "setup-difficulty", "Difficulty" }
            select {
                id: "setup-difficulty",
                onchange: move |evt| {
                    if let Ok(level) = evt.value().parse::<Difficulty>() {
                        difficulty.set(level);
                    }
                },
                for opt in vm.difficulty_options.iter() {
                    option {
                        key: "{opt.label}",
                        value: "{opt.label}",
                        selected: opt.selected,
                        "{opt.label}"
                    }
                }
            }

            label { r#for: "setup-model", "Model" }
            select {
                id: "setup-model",
                onchange: move |evt| model.set(evt.value()),
                for name in models.iter() {
                    option {
                        key: "{name}",
                        value: "{name}",
                        selected: *name == model(),
                        "{name}"
                    }
                }
            }

            button {
                id: "setup-start",
                class: "primary",
                disabled: busy,
                onclick: submit,
                "Start interview"
            }
        }
    }
}
