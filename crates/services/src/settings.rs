//! Startup configuration read from the environment.

use std::env;
use std::str::FromStr;

use interview_core::model::AppSettingsDraft;

use crate::error::ConfigError;

pub const ENV_API_KEY: &str = "INTERVIEW_AI_API_KEY";
pub const ENV_BASE_URL: &str = "INTERVIEW_AI_BASE_URL";
pub const ENV_MODEL: &str = "INTERVIEW_AI_MODEL";
pub const ENV_AI_QUESTIONS: &str = "INTERVIEW_AI_QUESTIONS";
pub const ENV_AI_FEEDBACK: &str = "INTERVIEW_AI_FEEDBACK";
pub const ENV_TIMEOUT_SECS: &str = "INTERVIEW_AI_TIMEOUT_SECS";
pub const ENV_OFFLINE_DELAY_MS: &str = "INTERVIEW_OFFLINE_DELAY_MS";

/// Read the settings draft from process environment variables.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` for unparseable flags or numbers.
pub fn draft_from_env() -> Result<AppSettingsDraft, ConfigError> {
    draft_from_lookup(|key| env::var(key).ok())
}

/// Build a draft from any key lookup; unset and blank values fall back to defaults.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` for unparseable flags or numbers.
pub fn draft_from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<AppSettingsDraft, ConfigError> {
    let get = |key: &str| lookup(key).filter(|val| !val.trim().is_empty());

    Ok(AppSettingsDraft {
        api_key: get(ENV_API_KEY),
        api_model: get(ENV_MODEL),
        api_base_url: get(ENV_BASE_URL),
        ai_questions: get(ENV_AI_QUESTIONS)
            .map(|raw| parse_flag(ENV_AI_QUESTIONS, &raw))
            .transpose()?
            .unwrap_or(false),
        ai_feedback: get(ENV_AI_FEEDBACK)
            .map(|raw| parse_flag(ENV_AI_FEEDBACK, &raw))
            .transpose()?
            .unwrap_or(false),
        timeout_secs: get(ENV_TIMEOUT_SECS)
            .map(|raw| parse_number(ENV_TIMEOUT_SECS, &raw))
            .transpose()?,
        offline_delay_ms: get(ENV_OFFLINE_DELAY_MS)
            .map(|raw| parse_number(ENV_OFFLINE_DELAY_MS, &raw))
            .transpose()?,
    })
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            raw: raw.to_string(),
        }),
    }
}

fn parse_number<T: FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        var,
        raw: raw.to_string(),
    })
}
