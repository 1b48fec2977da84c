#![forbid(unsafe_code)]

pub mod ai;
pub mod app_services;
pub mod error;
pub mod feedback;
pub mod generation;
pub mod interview;
pub mod questions;
pub mod settings;

pub use interview_core::Clock;

pub use app_services::AppServices;
pub use error::{AiUsageError, AppServicesError, ConfigError, GenerationError, InterviewError};
pub use feedback::FeedbackGenerator;
pub use generation::{GenerationGateway, GenerationService, OpenAiGenerationService};
pub use interview::{
    FeedbackStatus, InterviewLoopService, InterviewSession, SessionPhase, SessionSnapshot,
    StartRequest, WizardIntent,
};
pub use questions::{CANNED_QUESTIONS, QuestionSource};
