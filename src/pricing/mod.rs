//! Commission resolution and pricing.

pub mod calculator;
pub mod resolver;
pub mod store;

pub use calculator::{calculate, round_currency, CalculationError, CommissionBreakdown};
pub use resolver::{PriceQuote, RateResolver, RateSource, ResolvedRate, DEFAULT_COMMISSION_RATE};
pub use store::{CommissionStore, MemoryStore, StoreError};

use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    /// The category parent chain loops back on itself.
    #[error("category hierarchy contains a cycle at {0}")]
    CategoryCycle(Uuid),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Calculation(#[from] CalculationError),
}
