//! Static per-model price table seeded into the in-memory price book.
//!
//! Prices are USD per 1M tokens, held as integer micro-USD.

use crate::repository::AiPriceBookEntry;

pub const OPENAI_PROVIDER: &str = "openai";

// (model, input micro-USD per 1M tokens, output micro-USD per 1M tokens)
const OPENAI_PRICES: &[(&str, u64, u64)] = &[
    ("gpt-4o", 2_500_000, 10_000_000),
    ("gpt-4o-mini", 150_000, 600_000),
    ("gpt-4.1", 2_000_000, 8_000_000),
    ("gpt-4.1-mini", 400_000, 1_600_000),
    ("gpt-4.1-nano", 100_000, 400_000),
];

/// Entries for every model the app knows how to price.
#[must_use]
pub fn default_price_book() -> Vec<AiPriceBookEntry> {
    OPENAI_PRICES
        .iter()
        .map(|(model, input, output)| AiPriceBookEntry {
            provider: OPENAI_PROVIDER.to_string(),
            model: (*model).to_string(),
            input_micro_usd_per_million: *input,
            output_micro_usd_per_million: *output,
            deprecated: false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_book_covers_default_model() {
        let book = default_price_book();
        let entry = book
            .iter()
            .find(|entry| entry.model == "gpt-4o-mini")
            .unwrap();
        assert_eq!(entry.provider, OPENAI_PROVIDER);
        assert!(entry.output_micro_usd_per_million > entry.input_micro_usd_per_million);
    }
}
