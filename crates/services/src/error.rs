//! Shared error types for the services crate.

use thiserror::Error;

use interview_core::ValidationError;
use interview_core::model::AppSettingsError;
use storage::StorageError;

use crate::interview::SessionPhase;

/// Errors emitted by the generation seam.
///
/// Two classes matter to callers: transport failures (the request never
/// produced a usable response) and malformed output (the service answered
/// but the structured payload could not be decoded).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("AI generation is not configured")]
    Disabled,
    #[error("the AI service did not respond in time")]
    Timeout,
    #[error("the AI service request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("the AI service request failed: {0}")]
    Http(#[source] reqwest::Error),
    #[error("the AI service returned an empty response")]
    EmptyResponse,
    #[error("the AI service returned malformed output: {reason}")]
    Malformed { reason: String },
    #[error("cannot evaluate {questions} questions against {answers} answers")]
    PairCountMismatch { questions: usize, answers: usize },
}

impl GenerationError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }

    /// True when the service answered but the payload could not be decoded.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. } | Self::EmptyResponse)
    }

    /// True when the request itself failed (network, status, timeout).
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Timeout | Self::HttpStatus(_) | Self::Http(_))
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

/// Errors emitted by `AiUsageService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AiUsageError {
    #[error("no price entry for {provider}/{model}")]
    MissingPriceEntry { provider: String, model: String },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by interview session transitions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InterviewError {
    /// Local, recoverable: the input was rejected and nothing changed.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Retryable: the session stays where it was before the call.
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("cannot {action} while {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: SessionPhase,
    },
}

impl InterviewError {
    /// True when re-triggering the same action may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Generation(GenerationError::PairCountMismatch { .. }) => false,
            Self::Generation(_) => true,
            _ => false,
        }
    }
}

/// Errors raised while reading startup configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid value for {var}: {raw}")]
    InvalidValue { var: &'static str, raw: String },
    #[error(transparent)]
    Settings(#[from] AppSettingsError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}
