use interview_core::model::{Difficulty, FeedbackResult, MAX_QUESTIONS};
use interview_core::validation::{
    MAX_ANSWER_CHARS, RECOMMENDED_ANSWER_CHARS, exceeds_recommended_length,
    validate_answer_length,
};
use services::{SessionPhase, SessionSnapshot, WizardIntent};

#[derive(Clone, Debug, PartialEq)]
pub struct WizardVm {
    pub screen: WizardScreen,
    pub error: Option<String>,
    pub retryable: bool,
    pub cost_label: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum WizardScreen {
    Setup(SetupVm),
    Question(QuestionVm),
    Awaiting(AwaitingVm),
    Review(ReviewVm),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SetupVm {
    pub title: String,
    pub description: String,
    pub question_count: u32,
    pub max_questions: u32,
    pub difficulty: Difficulty,
    pub difficulty_options: Vec<DifficultyOption>,
    pub model: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DifficultyOption {
    pub value: Difficulty,
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub job_title: String,
    pub progress_label: String,
    pub progress_percent: u32,
    pub question: String,
    pub saved_answer: String,
    pub can_go_previous: bool,
    pub is_last: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AwaitingVm {
    pub progress_label: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewVm {
    pub progress_label: String,
    pub question: String,
    pub answer: String,
    pub feedback: Option<FeedbackVm>,
    pub can_go_previous: bool,
    pub can_go_next: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedbackVm {
    NeedsWork { summary: String, guidance: String },
    Strong {
        strengths: Vec<String>,
        improvements: Vec<String>,
    },
}

impl From<&FeedbackResult> for FeedbackVm {
    fn from(result: &FeedbackResult) -> Self {
        match result {
            FeedbackResult::Invalid { summary, guidance } => FeedbackVm::NeedsWork {
                summary: summary.clone(),
                guidance: guidance.clone(),
            },
            FeedbackResult::Valid {
                strengths,
                improvements,
            } => FeedbackVm::Strong {
                strengths: strengths.clone(),
                improvements: improvements.clone(),
            },
        }
    }
}

/// Live feedback for the answer box, computed on every keystroke.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerHint {
    pub count_label: String,
    pub warning: Option<&'static str>,
    pub too_long: bool,
}

const LONG_ANSWER_WARNING: &str =
    "Your answer is getting long. Interviewers prefer focused answers.";

#[must_use]
pub fn answer_hint(draft: &str) -> AnswerHint {
    let count = draft.chars().count();
    AnswerHint {
        count_label: format!("{count} / {MAX_ANSWER_CHARS}"),
        warning: exceeds_recommended_length(draft).then_some(LONG_ANSWER_WARNING),
        too_long: !validate_answer_length(draft, MAX_ANSWER_CHARS),
    }
}

/// Label shown while an intent that calls out is in flight.
#[must_use]
pub fn busy_label(intent: &WizardIntent) -> Option<&'static str> {
    match intent {
        WizardIntent::Start(_) => Some("Preparing your questions..."),
        WizardIntent::ViewFeedback => Some("Generating feedback..."),
        _ => None,
    }
}

#[must_use]
pub fn map_wizard(snapshot: &SessionSnapshot) -> WizardVm {
    let screen = match snapshot.phase {
        SessionPhase::Setup => WizardScreen::Setup(map_setup(snapshot)),
        SessionPhase::Answering => WizardScreen::Question(QuestionVm {
            job_title: snapshot.job_title.clone(),
            progress_label: snapshot.progress_label.clone(),
            progress_percent: progress_percent(snapshot.step, snapshot.question_count),
            question: snapshot.question.clone().unwrap_or_default(),
            saved_answer: snapshot.answer.clone(),
            can_go_previous: snapshot.can_go_previous,
            is_last: snapshot.is_last_question,
        }),
        SessionPhase::AwaitingFeedback => WizardScreen::Awaiting(AwaitingVm {
            progress_label: snapshot.progress_label.clone(),
        }),
        SessionPhase::Reviewing => WizardScreen::Review(ReviewVm {
            progress_label: snapshot.progress_label.clone(),
            question: snapshot.question.clone().unwrap_or_default(),
            answer: snapshot.answer.clone(),
            feedback: snapshot.feedback.as_ref().map(FeedbackVm::from),
            can_go_previous: snapshot.can_go_previous,
            can_go_next: !snapshot.is_last_question,
        }),
    };

    WizardVm {
        screen,
        error: snapshot.error.clone(),
        retryable: snapshot.retryable,
        cost_label: format!("Total cost: ${:.4}", snapshot.total_cost_usd),
    }
}

fn map_setup(snapshot: &SessionSnapshot) -> SetupVm {
    SetupVm {
        title: snapshot.job_title.clone(),
        description: snapshot.job_description.clone(),
        question_count: u32::try_from(snapshot.question_count).unwrap_or(MAX_QUESTIONS),
        max_questions: MAX_QUESTIONS,
        difficulty: snapshot.difficulty,
        difficulty_options: Difficulty::ALL
            .iter()
            .map(|&value| DifficultyOption {
                value,
                label: value.label(),
                selected: value == snapshot.difficulty,
            })
            .collect(),
        model: snapshot.model_id.clone(),
    }
}

fn progress_percent(step: usize, count: usize) -> u32 {
    if count == 0 {
        return 0;
    }
    u32::try_from(step.min(count) * 100 / count).unwrap_or(100)
}

#[must_use]
pub fn recommended_length_hint() -> String {
    format!("Aim for under {RECOMMENDED_ANSWER_CHARS} characters.")
}
