use std::sync::Arc;

use chrono::{DateTime, Utc};

use interview_core::Clock;
use interview_core::model::SessionId;
use storage::repository::{
    AiPriceBookRepository, AiUsageCompletion, AiUsagePurpose,
    AiUsageRepository, AiUsageStatus, NewAiUsageRecord,
};

use crate::ai::pricing::PriceBook;
use crate::error::AiUsageError;
use crate::generation::TokenUsage;

#[derive(Clone, Debug)]
pub struct AiUsageHandle {
    pub id: i64,
    pub provider: String,
    pub model: String,
    pub started_at: DateTime<Utc>,
}

/// Running cost of the generation calls made for one transition.
///
/// Only successful, fully parsed calls are recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CostTally {
    micro_usd: u64,
    calls: u32,
}

impl CostTally {
    pub fn record(&mut self, cost_micro_usd: u64) {
        self.micro_usd = self.micro_usd.saturating_add(cost_micro_usd);
        self.calls = self.calls.saturating_add(1);
    }

    #[must_use]
    pub fn micro_usd(&self) -> u64 {
        self.micro_usd
    }

    #[must_use]
    pub fn calls(&self) -> u32 {
        self.calls
    }
}

/// Ledger of generation calls, priced against the price book.
#[derive(Clone)]
pub struct AiUsageService {
    clock: Clock,
    usage_repo: Arc<dyn AiUsageRepository>,
    price_book: PriceBook,
}

impl AiUsageService {
    #[must_use]
    pub fn new(
        clock: Clock,
        usage_repo: Arc<dyn AiUsageRepository>,
        price_repo: Arc<dyn AiPriceBookRepository>,
    ) -> Self {
        Self {
            clock,
            usage_repo,
            price_book: PriceBook::new(price_repo),
        }
    }

    /// Open a ledger row for a request that is about to be sent.
    ///
    /// # Errors
    ///
    /// Returns `AiUsageError` if persistence fails.
    pub async fn start_request(
        &self,
        session_id: SessionId,
        purpose: AiUsagePurpose,
        provider: &str,
        model: &str,
    ) -> Result<AiUsageHandle, AiUsageError> {
        let now = self.clock.now();
        let id = self
            .usage_repo
            .insert_started(NewAiUsageRecord {
                session_id,
                purpose,
                provider: provider.to_string(),
                model: model.to_string(),
                created_at: now,
            })
            .await?;

        Ok(AiUsageHandle {
            id,
            provider: provider.to_string(),
            model: model.to_string(),
            started_at: now,
        })
    }

    /// Record a successful request and compute the cost.
    ///
    /// # Errors
    ///
    /// Returns `AiUsageError::MissingPriceEntry` if the model is not priced (the row is
    /// still closed as succeeded, without a cost), or a storage error.
    pub async fn finish_success(
        &self,
        handle: &AiUsageHandle,
        usage: TokenUsage,
    ) -> Result<u64, AiUsageError> {
        let cost = self
            .price_book
            .estimate_cost_micro_usd(&handle.provider, &handle.model, usage)
            .await?;

        self.usage_repo
            .update_completion(
                handle.id,
                AiUsageCompletion {
                    status: AiUsageStatus::Succeeded,
                    prompt_tokens: Some(usage.input),
                    completion_tokens: Some(usage.output),
                    total_tokens: Some(usage.total()),
                    cost_micro_usd: cost,
                },
            )
            .await?;

        cost.ok_or_else(|| AiUsageError::MissingPriceEntry {
            provider: handle.provider.clone(),
            model: handle.model.clone(),
        })
    }

    /// Record a failed request.
    ///
    /// # Errors
    ///
    /// Returns `AiUsageError` if persistence fails.
    pub async fn finish_failure(&self, handle: &AiUsageHandle) -> Result<(), AiUsageError> {
        self.usage_repo
            .update_completion(handle.id, AiUsageCompletion::failed())
            .await?;
        Ok(())
    }
}
