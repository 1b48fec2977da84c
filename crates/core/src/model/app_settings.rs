use thiserror::Error;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_API_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TIMEOUT_SECS: u32 = 60;
pub const DEFAULT_OFFLINE_DELAY_MS: u64 = 1000;

/// Startup configuration for generation features.
#[derive(Clone, PartialEq, Eq)]
pub struct AppSettings {
    api_key: Option<String>,
    api_model: String,
    api_base_url: String,
    ai_questions: bool,
    ai_feedback: bool,
    timeout_secs: u32,
    offline_delay_ms: u64,
}

#[derive(Clone, Debug, Default)]
pub struct AppSettingsDraft {
    pub api_key: Option<String>,
    pub api_model: Option<String>,
    pub api_base_url: Option<String>,
    pub ai_questions: bool,
    pub ai_feedback: bool,
    pub timeout_secs: Option<u32>,
    pub offline_delay_ms: Option<u64>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AppSettingsError {
    #[error("invalid base URL")]
    InvalidBaseUrl,
    #[error("an API key is required when AI questions or feedback are enabled")]
    MissingApiKey,
    #[error("request timeout must be > 0")]
    InvalidTimeout,
}

impl AppSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and normalize the draft into settings.
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsError` if the base URL is invalid, the timeout is zero,
    /// or an AI feature is enabled without an API key.
    pub fn validate(self) -> Result<AppSettings, AppSettingsError> {
        let api_key = normalize_optional(self.api_key);
        let api_model =
            normalize_optional(self.api_model).unwrap_or_else(|| DEFAULT_API_MODEL.to_string());
        let api_base_url = normalize_optional(self.api_base_url)
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        if Url::parse(&api_base_url).is_err() {
            return Err(AppSettingsError::InvalidBaseUrl);
        }

        let timeout_secs = self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(AppSettingsError::InvalidTimeout);
        }

        if (self.ai_questions || self.ai_feedback) && api_key.is_none() {
            return Err(AppSettingsError::MissingApiKey);
        }

        Ok(AppSettings {
            api_key,
            api_model,
            api_base_url,
            ai_questions: self.ai_questions,
            ai_feedback: self.ai_feedback,
            timeout_secs,
            offline_delay_ms: self.offline_delay_ms.unwrap_or(DEFAULT_OFFLINE_DELAY_MS),
        })
    }
}

impl AppSettings {
    /// Fully offline settings: canned questions and placeholder feedback.
    #[must_use]
    pub fn offline() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    #[must_use]
    pub fn api_model(&self) -> &str {
        &self.api_model
    }

    #[must_use]
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    #[must_use]
    pub fn ai_questions(&self) -> bool {
        self.ai_questions
    }

    #[must_use]
    pub fn ai_feedback(&self) -> bool {
        self.ai_feedback
    }

    #[must_use]
    pub fn timeout_secs(&self) -> u32 {
        self.timeout_secs
    }

    #[must_use]
    pub fn offline_delay_ms(&self) -> u64 {
        self.offline_delay_ms
    }

    /// Override the offline feedback delay (tests set it to zero).
    #[must_use]
    pub fn with_offline_delay_ms(mut self, delay_ms: u64) -> Self {
        self.offline_delay_ms = delay_ms;
        self
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_model: DEFAULT_API_MODEL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            ai_questions: false,
            ai_feedback: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            offline_delay_ms: DEFAULT_OFFLINE_DELAY_MS,
        }
    }
}

// Hand-written so the API key never reaches logs.
impl std::fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_model", &self.api_model)
            .field("api_base_url", &self.api_base_url)
            .field("ai_questions", &self.ai_questions)
            .field("ai_feedback", &self.ai_feedback)
            .field("timeout_secs", &self.timeout_secs)
            .field("offline_delay_ms", &self.offline_delay_ms)
            .finish()
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}
