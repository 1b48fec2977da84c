//! The generation seam: a text-in, structured-JSON-out service, plus the
//! metering gateway every caller goes through.

mod openai;

pub use openai::OpenAiGenerationService;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use interview_core::model::SessionId;
use storage::repository::AiUsagePurpose;

use crate::ai::{AiUsageHandle, AiUsageService, CostTally};
use crate::error::{AiUsageError, GenerationError};

/// Token counts reported by the generation service for one call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input: u32,
    pub output: u32,
}

impl TokenUsage {
    #[must_use]
    pub fn total(self) -> u32 {
        self.input.saturating_add(self.output)
    }
}

/// One structured-output request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f32,
    /// Nucleus sampling cutoff; the provider default applies when `None`.
    pub top_p: Option<f32>,
    pub max_output_tokens: u32,
    /// Name and JSON schema the response must conform to.
    pub schema_name: &'static str,
    pub schema: serde_json::Value,
}

/// Raw structured text plus usage, before any domain decoding.
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    pub content: String,
    pub usage: TokenUsage,
}

#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Provider key used for price lookups.
    fn provider(&self) -> &str;

    /// Send a request and return the raw structured content.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` for transport failures or empty responses.
    async fn generate(&self, request: GenerationRequest)
    -> Result<GenerationOutput, GenerationError>;
}

/// Wraps a `GenerationService` with a timeout and usage accounting.
///
/// Cost is computed only after `parse` succeeds, and recorded once per call.
#[derive(Clone)]
pub struct GenerationGateway {
    service: Arc<dyn GenerationService>,
    usage: Arc<AiUsageService>,
    timeout: Duration,
}

impl GenerationGateway {
    #[must_use]
    pub fn new(
        service: Arc<dyn GenerationService>,
        usage: Arc<AiUsageService>,
        timeout: Duration,
    ) -> Self {
        Self {
            service,
            usage,
            timeout,
        }
    }

    /// Issue one request, decode it with `parse`, and record its cost in `tally`.
    ///
    /// Ledger failures are logged and never fail the call.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Timeout` if the call exceeds the timeout, or
    /// whatever the service or `parse` returned.
    pub async fn call<T>(
        &self,
        session_id: SessionId,
        purpose: AiUsagePurpose,
        request: GenerationRequest,
        parse: impl FnOnce(&str) -> Result<T, GenerationError>,
        tally: &mut CostTally,
    ) -> Result<T, GenerationError> {
        let provider = self.service.provider().to_string();
        let model = request.model.clone();
        let handle = match self
            .usage
            .start_request(session_id, purpose, &provider, &model)
            .await
        {
            Ok(handle) => Some(handle),
            Err(err) => {
                warn!(%session_id, error = %err, "failed to open usage record");
                None
            }
        };

        debug!(%session_id, ?purpose, %model, "sending generation request");
        let outcome = match tokio::time::timeout(self.timeout, self.service.generate(request)).await
        {
            Ok(result) => result,
            Err(_) => Err(GenerationError::Timeout),
        };
        let parsed = outcome.and_then(|output| {
            let value = parse(&output.content)?;
            Ok((value, output.usage))
        });

        match parsed {
            Ok((value, usage)) => {
                let cost = self.finish_success(handle.as_ref(), usage).await;
                tally.record(cost);
                info!(
                    %session_id,
                    ?purpose,
                    %model,
                    input_tokens = usage.input,
                    output_tokens = usage.output,
                    cost_micro_usd = cost,
                    "generation request succeeded"
                );
                Ok(value)
            }
            Err(err) => {
                if let Some(handle) = handle.as_ref() {
                    if let Err(ledger_err) = self.usage.finish_failure(handle).await {
                        warn!(%session_id, error = %ledger_err, "failed to close usage record");
                    }
                }
                warn!(
                    %session_id,
                    ?purpose,
                    %model,
                    malformed = err.is_malformed(),
                    error = %err,
                    "generation request failed"
                );
                Err(err)
            }
        }
    }

    async fn finish_success(&self, handle: Option<&AiUsageHandle>, usage: TokenUsage) -> u64 {
        let Some(handle) = handle else {
            return 0;
        };
        match self.usage.finish_success(handle, usage).await {
            Ok(cost) => cost,
            Err(AiUsageError::MissingPriceEntry { provider, model }) => {
                warn!(%provider, %model, "no price entry; recording zero cost");
                0
            }
            Err(err) => {
                warn!(error = %err, "failed to close usage record");
                0
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted generation doubles shared by the unit tests in this crate.

    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    pub(crate) enum Scripted {
        Reply(String, TokenUsage),
        Fail(GenerationError),
    }

    /// Returns scripted replies in order; counts every call.
    #[derive(Default)]
    pub(crate) struct ScriptedService {
        replies: Mutex<VecDeque<Scripted>>,
        calls: AtomicUsize,
        requests: Mutex<Vec<GenerationRequest>>,
    }

    impl ScriptedService {
        pub(crate) fn with(replies: Vec<Scripted>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                ..Self::default()
            })
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub(crate) fn requests(&self) -> Vec<GenerationRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GenerationService for ScriptedService {
        fn provider(&self) -> &str {
            "openai"
        }

        async fn generate(
            &self,
            request: GenerationRequest,
        ) -> Result<GenerationOutput, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request);
            match self.replies.lock().unwrap().pop_front() {
                Some(Scripted::Reply(content, usage)) => Ok(GenerationOutput { content, usage }),
                Some(Scripted::Fail(err)) => Err(err),
                None => Err(GenerationError::EmptyResponse),
            }
        }
    }

    /// Never answers; used to exercise the gateway timeout.
    pub(crate) struct StalledService;

    #[async_trait]
    impl GenerationService for StalledService {
        fn provider(&self) -> &str {
            "openai"
        }

        async fn generate(
            &self,
            _request: GenerationRequest,
        ) -> Result<GenerationOutput, GenerationError> {
            std::future::pending().await
        }
    }

    pub(crate) fn usage_service(repo: &storage::InMemoryRepository) -> Arc<AiUsageService> {
        Arc::new(AiUsageService::new(
            interview_core::time::fixed_clock(),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
        ))
    }

    pub(crate) fn gateway(
        service: Arc<dyn GenerationService>,
        repo: &storage::InMemoryRepository,
    ) -> GenerationGateway {
        GenerationGateway::new(service, usage_service(repo), Duration::from_secs(5))
    }
}
