//! Marketplace Pricing
//!
//! Backend for a multi-vendor marketplace where sellers set their own price and
//! the platform adds a commission on top.
//!
//! ## Features
//! - Commission settings at global, category and product scope
//! - Rate resolution walking the category tree, with price bands and
//!   effectivity windows
//! - Decimal commission / customer price calculation
//! - Catalog pricing on product create, update and admin recalculation
//! - Order placement with price snapshots and stock decrement

use thiserror::Error;
use uuid::Uuid;

pub mod config;
pub mod domain;
pub mod http;
pub mod pricing;
pub mod publisher;
pub mod repository;
pub mod services;
pub mod state;

pub use pricing::{calculate, CommissionBreakdown, RateResolver, DEFAULT_COMMISSION_RATE};
pub use state::AppState;

use domain::aggregates::{CommissionSettingError, OrderError, ProductError};
use pricing::PricingError;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum MarketplaceError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Commission(#[from] CommissionSettingError),

    #[error(transparent)]
    Product(#[from] ProductError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl MarketplaceError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self { Self::NotFound { entity, id } }
}

impl From<validator::ValidationErrors> for MarketplaceError {
    fn from(e: validator::ValidationErrors) -> Self { Self::Validation(e.to_string()) }
}

pub type Result<T> = std::result::Result<T, MarketplaceError>;
