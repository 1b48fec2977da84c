pub mod pricing;
pub mod usage;

pub use pricing::{PriceBook, micro_usd_to_usd};
pub use usage::{AiUsageHandle, AiUsageService, CostTally};
