mod app_settings;
mod feedback;
mod ids;
mod profile;

pub use app_settings::{
    AppSettings, AppSettingsDraft, AppSettingsError, DEFAULT_API_BASE_URL, DEFAULT_API_MODEL,
};
pub use feedback::{FeedbackResult, UNAVAILABLE_GUIDANCE, UNAVAILABLE_SUMMARY};
pub use ids::SessionId;
pub use profile::{
    DEFAULT_JOB_TITLE, DEFAULT_QUESTION_COUNT, Difficulty, JobProfile, JobProfileDraft,
    MAX_QUESTIONS, QuestionCount, UnknownDifficulty,
};
