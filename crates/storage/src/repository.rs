use async_trait::async_trait;
use chrono::{DateTime, Utc};
use interview_core::model::SessionId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::price_table::default_price_book;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),
}

//
// ─── PRICE BOOK ────────────────────────────────────────────────────────────────
//

/// Price for one provider/model pair, in micro-USD per 1M tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiPriceBookEntry {
    pub provider: String,
    pub model: String,
    pub input_micro_usd_per_million: u64,
    pub output_micro_usd_per_million: u64,
    /// Still priced for old ledger rows, no longer offered for new sessions.
    pub deprecated: bool,
}

#[async_trait]
pub trait AiPriceBookRepository: Send + Sync {
    /// Fetch the price for a provider/model pair.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on adapter failures.
    async fn get_entry(
        &self,
        provider: &str,
        model: &str,
    ) -> Result<Option<AiPriceBookEntry>, StorageError>;

    /// List all entries, ordered by provider then model.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on adapter failures.
    async fn list_entries(&self) -> Result<Vec<AiPriceBookEntry>, StorageError>;
}

//
// ─── USAGE LEDGER ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiUsageStatus {
    Started,
    Succeeded,
    Failed,
}

/// What a generation call was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiUsagePurpose {
    Questions,
    Feedback,
}

#[derive(Debug, Clone)]
pub struct NewAiUsageRecord {
    pub session_id: SessionId,
    pub purpose: AiUsagePurpose,
    pub provider: String,
    pub model: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct AiUsageCompletion {
    pub status: AiUsageStatus,
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
    pub cost_micro_usd: Option<u64>,
}

impl AiUsageCompletion {
    #[must_use]
    pub fn failed() -> Self {
        Self {
            status: AiUsageStatus::Failed,
            prompt_tokens: None,
            completion_tokens: None,
            total_tokens: None,
            cost_micro_usd: None,
        }
    }
}

/// One row of the usage ledger.
#[derive(Debug, Clone)]
pub struct AiUsageRecord {
    pub id: i64,
    pub session_id: SessionId,
    pub purpose: AiUsagePurpose,
    pub provider: String,
    pub model: String,
    pub created_at: DateTime<Utc>,
    pub status: AiUsageStatus,
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
    pub cost_micro_usd: Option<u64>,
}

#[async_trait]
pub trait AiUsageRepository: Send + Sync {
    /// Open a ledger row for a request that is about to be sent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on adapter failures.
    async fn insert_started(&self, record: NewAiUsageRecord) -> Result<i64, StorageError>;

    /// Close a ledger row.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the row does not exist.
    async fn update_completion(
        &self,
        id: i64,
        completion: AiUsageCompletion,
    ) -> Result<(), StorageError>;

    /// All rows for one session, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on adapter failures.
    async fn list_for_session(&self, session_id: SessionId)
    -> Result<Vec<AiUsageRecord>, StorageError>;

    /// Sum of recorded costs across all sessions.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on adapter failures.
    async fn sum_cost(&self) -> Result<u64, StorageError>;
}

//
// ─── IN-MEMORY ADAPTER ─────────────────────────────────────────────────────────
//

/// Process-local repository; nothing outlives the run.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    prices: Arc<Mutex<HashMap<(String, String), AiPriceBookEntry>>>,
    usage: Arc<Mutex<Vec<AiUsageRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-loaded with the given price entries.
    #[must_use]
    pub fn with_prices(entries: Vec<AiPriceBookEntry>) -> Self {
        let prices = entries
            .into_iter()
            .map(|entry| ((entry.provider.clone(), entry.model.clone()), entry))
            .collect();
        Self {
            prices: Arc::new(Mutex::new(prices)),
            usage: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl AiPriceBookRepository for InMemoryRepository {
    async fn get_entry(
        &self,
        provider: &str,
        model: &str,
    ) -> Result<Option<AiPriceBookEntry>, StorageError> {
        let guard = self
            .prices
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .get(&(provider.to_string(), model.to_string()))
            .cloned())
    }

    async fn list_entries(&self) -> Result<Vec<AiPriceBookEntry>, StorageError> {
        let guard = self
            .prices
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut entries: Vec<_> = guard.values().cloned().collect();
        entries.sort_by(|left, right| {
            left.provider
                .cmp(&right.provider)
                .then_with(|| left.model.cmp(&right.model))
        });
        Ok(entries)
    }
}

#[async_trait]
impl AiUsageRepository for InMemoryRepository {
    async fn insert_started(&self, record: NewAiUsageRecord) -> Result<i64, StorageError> {
        let mut guard = self
            .usage
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let id = i64::try_from(guard.len()).unwrap_or(i64::MAX).saturating_add(1);
        guard.push(AiUsageRecord {
            id,
            session_id: record.session_id,
            purpose: record.purpose,
            provider: record.provider,
            model: record.model,
            created_at: record.created_at,
            status: AiUsageStatus::Started,
            prompt_tokens: None,
            completion_tokens: None,
            total_tokens: None,
            cost_micro_usd: None,
        });
        Ok(id)
    }

    async fn update_completion(
        &self,
        id: i64,
        completion: AiUsageCompletion,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .usage
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let row = guard
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(StorageError::NotFound)?;
        row.status = completion.status;
        row.prompt_tokens = completion.prompt_tokens;
        row.completion_tokens = completion.completion_tokens;
        row.total_tokens = completion.total_tokens;
        row.cost_micro_usd = completion.cost_micro_usd;
        Ok(())
    }

    async fn list_for_session(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<AiUsageRecord>, StorageError> {
        let guard = self
            .usage
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .filter(|row| row.session_id == session_id)
            .cloned()
            .collect())
    }

    async fn sum_cost(&self) -> Result<u64, StorageError> {
        let guard = self
            .usage
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .filter_map(|row| row.cost_micro_usd)
            .fold(0_u64, u64::saturating_add))
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub ai_price_book: Arc<dyn AiPriceBookRepository>,
    pub ai_usage: Arc<dyn AiUsageRepository>,
}

impl Storage {
    /// In-memory storage seeded with the default price table.
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::with_prices(default_price_book());
        let ai_price_book: Arc<dyn AiPriceBookRepository> = Arc::new(repo.clone());
        let ai_usage: Arc<dyn AiUsageRepository> = Arc::new(repo);
        Self {
            ai_price_book,
            ai_usage,
        }
    }
}
