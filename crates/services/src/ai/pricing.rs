use std::sync::Arc;

use storage::StorageError;
use storage::repository::AiPriceBookRepository;

use crate::generation::TokenUsage;

#[derive(Clone)]
pub struct PriceBook {
    repo: Arc<dyn AiPriceBookRepository>,
}

impl PriceBook {
    #[must_use]
    pub fn new(repo: Arc<dyn AiPriceBookRepository>) -> Self {
        Self { repo }
    }

    /// Models of `provider` that can be offered for new sessions, in name order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on persistence failures.
    pub async fn offered_models(&self, provider: &str) -> Result<Vec<String>, StorageError> {
        Ok(self
            .repo
            .list_entries()
            .await?
            .into_iter()
            .filter(|entry| entry.provider == provider && !entry.deprecated)
            .map(|entry| entry.model)
            .collect())
    }

    /// Estimate the cost in micro-USD for the given token usage.
    ///
    /// Returns `None` when the model has no price entry.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on persistence failures.
    pub async fn estimate_cost_micro_usd(
        &self,
        provider: &str,
        model: &str,
        usage: TokenUsage,
    ) -> Result<Option<u64>, StorageError> {
        let Some(entry) = self.repo.get_entry(provider, model).await? else {
            return Ok(None);
        };

        Ok(Some(estimate_cost_micro_usd(
            entry.input_micro_usd_per_million,
            entry.output_micro_usd_per_million,
            usage,
        )))
    }
}

/// Convert an integer micro-USD amount to dollars for display.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn micro_usd_to_usd(micro_usd: u64) -> f64 {
    micro_usd as f64 / 1_000_000.0
}

fn estimate_cost_micro_usd(
    input_micro_usd_per_million: u64,
    output_micro_usd_per_million: u64,
    usage: TokenUsage,
) -> u64 {
    let prompt_cost =
        u64::from(usage.input).saturating_mul(input_micro_usd_per_million) / 1_000_000;
    let completion_cost =
        u64::from(usage.output).saturating_mul(output_micro_usd_per_million) / 1_000_000;
    prompt_cost.saturating_add(completion_cost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::AiPriceBookEntry;
    use storage::{InMemoryRepository, Storage};

    #[test]
    fn input_and_output_are_priced_separately() {
        // 1M input at $2.50 plus 500k output at $10.00 per 1M.
        let usage = TokenUsage {
            input: 1_000_000,
            output: 500_000,
        };
        assert_eq!(estimate_cost_micro_usd(2_500_000, 10_000_000, usage), 7_500_000);
    }

    #[test]
    fn micro_usd_converts_to_dollars() {
        assert!((micro_usd_to_usd(7_500_000) - 7.5).abs() < f64::EPSILON);
        assert!(micro_usd_to_usd(0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn unknown_model_has_no_estimate() {
        let book = PriceBook::new(Storage::in_memory().ai_price_book);
        let usage = TokenUsage { input: 10, output: 10 };
        assert_eq!(
            book.estimate_cost_micro_usd("openai", "mystery", usage)
                .await
                .unwrap(),
            None
        );
        assert!(
            book.estimate_cost_micro_usd("openai", "gpt-4o", usage)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn offered_models_skip_deprecated_and_other_providers() {
        let entry = |provider: &str, model: &str, deprecated: bool| AiPriceBookEntry {
            provider: provider.into(),
            model: model.into(),
            input_micro_usd_per_million: 1,
            output_micro_usd_per_million: 1,
            deprecated,
        };
        let repo = InMemoryRepository::with_prices(vec![
            entry("openai", "gpt-4o-mini", false),
            entry("openai", "gpt-3.5-turbo", true),
            entry("azure", "gpt-4o", false),
            entry("openai", "gpt-4o", false),
        ]);
        let book = PriceBook::new(Arc::new(repo));
        assert_eq!(
            book.offered_models("openai").await.unwrap(),
            ["gpt-4o", "gpt-4o-mini"]
        );
    }
}
