mod wizard_vm;

pub use wizard_vm::{
    AnswerHint, AwaitingVm, DifficultyOption, FeedbackVm, QuestionVm, ReviewVm, SetupVm,
    WizardScreen, WizardVm, answer_hint, busy_label, map_wizard, recommended_length_hint,
};
