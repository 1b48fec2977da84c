use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use interview_core::model::AppSettings;
use storage::price_table::OPENAI_PROVIDER;

use super::{GenerationOutput, GenerationRequest, GenerationService, TokenUsage};
use crate::error::{AppServicesError, GenerationError};

/// Chat-completions adapter for OpenAI-compatible endpoints using JSON-schema output.
#[derive(Clone)]
pub struct OpenAiGenerationService {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenAiGenerationService {
    /// Build an adapter from validated settings.
    ///
    /// Returns `Ok(None)` when no API key is configured.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::HttpClient` if the HTTP client cannot be built.
    pub fn from_settings(settings: &AppSettings) -> Result<Option<Self>, AppServicesError> {
        let Some(api_key) = settings.api_key() else {
            return Ok(None);
        };
        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(settings.timeout_secs())))
            .build()
            .map_err(AppServicesError::HttpClient)?;
        Ok(Some(Self {
            client,
            base_url: settings.api_base_url().to_string(),
            api_key: api_key.to_string(),
        }))
    }
}

#[async_trait]
impl GenerationService for OpenAiGenerationService {
    fn provider(&self) -> &str {
        OPENAI_PROVIDER
    }

    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationOutput, GenerationError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let payload = ChatRequest {
            model: request.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system,
                },
                ChatMessage {
                    role: "user",
                    content: request.user,
                },
            ],
            temperature: request.temperature,
            top_p: request.top_p,
            max_tokens: request.max_output_tokens,
            response_format: ResponseFormat {
                format_type: "json_schema",
                json_schema: JsonSchema {
                    name: request.schema_name,
                    strict: true,
                    schema: request.schema,
                },
            },
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GenerationError::HttpStatus(response.status()));
        }

        let raw = response.text().await?;
        parse_chat_response(&raw)
    }
}

fn parse_chat_response(raw: &str) -> Result<GenerationOutput, GenerationError> {
    let body: ChatResponse = serde_json::from_str(raw)
        .map_err(|err| GenerationError::malformed(format!("response envelope: {err}")))?;

    let message = body
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or(GenerationError::EmptyResponse)?;

    if let Some(refusal) = message.refusal {
        return Err(GenerationError::malformed(format!("model refused: {refusal}")));
    }

    let content = message
        .content
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(GenerationError::EmptyResponse)?;

    let usage = body.usage.unwrap_or_default();
    Ok(GenerationOutput {
        content,
        usage: TokenUsage {
            input: usage.prompt_tokens,
            output: usage.completion_tokens,
        },
    })
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
    json_schema: JsonSchema,
}

#[derive(Debug, Serialize)]
struct JsonSchema {
    name: &'static str,
    strict: bool,
    schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use interview_core::model::AppSettingsDraft;

    #[test]
    fn parses_content_and_usage() {
        let raw = r#"{
            "choices": [{"message": {"content": "  {\"questions\": []}  "}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 34, "total_tokens": 46}
        }"#;
        let output = parse_chat_response(raw).unwrap();
        assert_eq!(output.content, r#"{"questions": []}"#);
        assert_eq!(output.usage, TokenUsage { input: 12, output: 34 });
    }

    #[test]
    fn missing_usage_counts_as_zero() {
        let raw = r#"{"choices": [{"message": {"content": "{}"}}]}"#;
        let output = parse_chat_response(raw).unwrap();
        assert_eq!(output.usage, TokenUsage::default());
    }

    #[test]
    fn no_choices_is_empty_response() {
        let err = parse_chat_response(r#"{"choices": []}"#).unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse));
    }

    #[test]
    fn refusal_is_malformed() {
        let raw = r#"{"choices": [{"message": {"content": null, "refusal": "no"}}]}"#;
        assert!(parse_chat_response(raw).unwrap_err().is_malformed());
    }

    #[test]
    fn broken_envelope_is_malformed() {
        assert!(parse_chat_response("<html>").unwrap_err().is_malformed());
    }

    #[test]
    fn no_key_means_no_adapter() {
        let settings = AppSettingsDraft::new().validate().unwrap();
        assert!(OpenAiGenerationService::from_settings(&settings).unwrap().is_none());
    }

    #[test]
    fn request_serializes_schema_format() {
        let payload = ChatRequest {
            model: "gpt-4o-mini".into(),
            messages: vec![],
            temperature: 1.0,
            top_p: Some(0.9),
            max_tokens: 10,
            response_format: ResponseFormat {
                format_type: "json_schema",
                json_schema: JsonSchema {
                    name: "questions",
                    strict: true,
                    schema: serde_json::json!({"type": "object"}),
                },
            },
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["response_format"]["type"], "json_schema");
        assert_eq!(value["response_format"]["json_schema"]["name"], "questions");
        assert_eq!(value["response_format"]["json_schema"]["strict"], true);
        assert!((value["top_p"].as_f64().unwrap() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn unset_top_p_is_omitted() {
        let payload = ChatRequest {
            model: "gpt-4o-mini".into(),
            messages: vec![],
            temperature: 0.7,
            top_p: None,
            max_tokens: 10,
            response_format: ResponseFormat {
                format_type: "json_schema",
                json_schema: JsonSchema {
                    name: "answer_feedback",
                    strict: true,
                    schema: serde_json::json!({"type": "object"}),
                },
            },
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("top_p").is_none());
    }
}
