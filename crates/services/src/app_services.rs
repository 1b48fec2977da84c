use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use interview_core::model::AppSettings;
use storage::StorageError;
use storage::price_table::OPENAI_PROVIDER;
use storage::repository::Storage;

use crate::Clock;
use crate::ai::{AiUsageService, PriceBook};
use crate::error::AppServicesError;
use crate::feedback::FeedbackGenerator;
use crate::generation::{GenerationGateway, GenerationService, OpenAiGenerationService};
use crate::interview::InterviewLoopService;
use crate::questions::QuestionSource;

/// Assembles app-facing services from startup settings.
#[derive(Clone)]
pub struct AppServices {
    storage: Storage,
    interview: Arc<InterviewLoopService>,
}

impl AppServices {
    /// Build services backed by in-memory storage and the HTTP generation adapter.
    ///
    /// Features left off in `settings` never touch the network.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the HTTP client cannot be built.
    pub fn from_settings(settings: AppSettings, clock: Clock) -> Result<Self, AppServicesError> {
        let service: Option<Arc<dyn GenerationService>> =
            if settings.ai_questions() || settings.ai_feedback() {
                OpenAiGenerationService::from_settings(&settings)?
                    .map(|service| Arc::new(service) as Arc<dyn GenerationService>)
            } else {
                None
            };
        Ok(Self::with_generation(settings, clock, service))
    }

    /// Build services around an explicit generation backend.
    #[must_use]
    pub fn with_generation(
        settings: AppSettings,
        clock: Clock,
        service: Option<Arc<dyn GenerationService>>,
    ) -> Self {
        let storage = Storage::in_memory();
        let gateway = service.map(|service| {
            let usage = Arc::new(AiUsageService::new(
                clock,
                Arc::clone(&storage.ai_usage),
                Arc::clone(&storage.ai_price_book),
            ));
            GenerationGateway::new(
                service,
                usage,
                Duration::from_secs(u64::from(settings.timeout_secs())),
            )
        });

        let questions = match (&gateway, settings.ai_questions()) {
            (Some(gateway), true) => QuestionSource::Online(gateway.clone()),
            _ => QuestionSource::Canned,
        };
        let feedback = match (gateway, settings.ai_feedback()) {
            (Some(gateway), true) => FeedbackGenerator::Online(gateway),
            _ => FeedbackGenerator::disabled(Duration::from_millis(settings.offline_delay_ms())),
        };

        info!(
            model = settings.api_model(),
            ai_questions = questions.is_online(),
            ai_feedback = feedback.is_online(),
            "services ready"
        );

        let interview = Arc::new(InterviewLoopService::new(
            questions,
            feedback,
            settings.api_model(),
        ));

        Self { storage, interview }
    }

    #[must_use]
    pub fn interview(&self) -> Arc<InterviewLoopService> {
        Arc::clone(&self.interview)
    }

    /// Models the setup screen offers: every priced model, with the configured
    /// default first when the price book does not know it.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the price book cannot be read.
    pub async fn model_options(&self) -> Result<Vec<String>, StorageError> {
        let mut models = PriceBook::new(Arc::clone(&self.storage.ai_price_book))
            .offered_models(OPENAI_PROVIDER)
            .await?;
        let default_model = self.interview.default_model();
        if !models.iter().any(|model| model == default_model) {
            warn!(
                model = default_model,
                "default model has no price entry; its calls are recorded at zero cost"
            );
            models.insert(0, default_model.to_string());
        }
        Ok(models)
    }

    /// Total cost recorded in the usage ledger across all sessions of this run.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the ledger cannot be read.
    pub async fn ledger_cost_micro_usd(&self) -> Result<u64, StorageError> {
        self.storage.ai_usage.sum_cost().await
    }
}
