//! Commission rate resolution.
//!
//! Tiers are tried from most to least specific: product, then the category
//! and each of its ancestors, then global. When nothing matches the
//! resolver answers with [`DEFAULT_COMMISSION_RATE`] instead of failing, so
//! missing configuration never blocks pricing. Only store failures and a
//! corrupt (cyclic) category tree are errors.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;
use uuid::Uuid;

use super::calculator::{calculate, CommissionBreakdown};
use super::store::CommissionStore;
use super::PricingError;
use crate::domain::aggregates::{CommissionScope, CommissionSetting};

/// Rate used when no setting matches at any tier.
pub const DEFAULT_COMMISSION_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Where a resolved rate came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "tier", rename_all = "lowercase")]
pub enum RateSource {
    Product { product_id: Uuid, setting_id: Uuid },
    Category { category_id: Uuid, setting_id: Uuid },
    Global { setting_id: Uuid },
    Default,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedRate {
    pub rate: Decimal,
    pub source: RateSource,
}

impl ResolvedRate {
    fn default_rate() -> Self { Self { rate: DEFAULT_COMMISSION_RATE, source: RateSource::Default } }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PriceQuote {
    pub resolved: ResolvedRate,
    pub breakdown: CommissionBreakdown,
}

/// Picks the eligible setting among candidates of one tier/level.
///
/// Several matches at the same level are a configuration error the admin UI
/// does not allow, but when it happens the newest setting wins (`created_at`,
/// then the higher id).
fn pick(candidates: Vec<CommissionSetting>, seller_price: Decimal, as_of: DateTime<Utc>) -> Option<CommissionSetting> {
    candidates
        .into_iter()
        .filter(|s| s.applies_to(seller_price, as_of))
        .max_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)))
}

pub struct RateResolver<S> {
    store: S,
}

impl<S: CommissionStore> RateResolver<S> {
    pub fn new(store: S) -> Self { Self { store } }

    pub fn store(&self) -> &S { &self.store }

    #[tracing::instrument(skip(self), fields(rate))]
    pub async fn resolve_rate(
        &self,
        category_id: Uuid,
        product_id: Option<Uuid>,
        seller_price: Decimal,
        as_of: DateTime<Utc>,
    ) -> Result<ResolvedRate, PricingError> {
        let resolved = self.resolve_inner(category_id, product_id, seller_price, as_of).await?;
        tracing::Span::current().record("rate", tracing::field::display(resolved.rate));
        tracing::debug!(source = ?resolved.source, "commission rate resolved");
        Ok(resolved)
    }

    async fn resolve_inner(
        &self,
        category_id: Uuid,
        product_id: Option<Uuid>,
        seller_price: Decimal,
        as_of: DateTime<Utc>,
    ) -> Result<ResolvedRate, PricingError> {
        if let Some(product_id) = product_id {
            let candidates = self.store.active_settings(CommissionScope::Product, Some(product_id)).await?;
            if let Some(s) = pick(candidates, seller_price, as_of) {
                return Ok(ResolvedRate { rate: s.commission_rate, source: RateSource::Product { product_id, setting_id: s.id } });
            }
        }

        let mut visited = HashSet::new();
        let mut next = Some(category_id);
        while let Some(id) = next {
            if !visited.insert(id) {
                tracing::error!(category_id = %id, start = %category_id, "cycle in category parent chain");
                return Err(PricingError::CategoryCycle(id));
            }
            // Unknown or dangling category: stop walking and fall through to global.
            let Some(category) = self.store.category(id).await? else { break };
            let candidates = self.store.active_settings(CommissionScope::Category, Some(id)).await?;
            if let Some(s) = pick(candidates, seller_price, as_of) {
                return Ok(ResolvedRate { rate: s.commission_rate, source: RateSource::Category { category_id: id, setting_id: s.id } });
            }
            next = category.parent_id;
        }

        let candidates = self.store.active_settings(CommissionScope::Global, None).await?;
        if let Some(s) = pick(candidates, seller_price, as_of) {
            return Ok(ResolvedRate { rate: s.commission_rate, source: RateSource::Global { setting_id: s.id } });
        }

        Ok(ResolvedRate::default_rate())
    }

    /// Resolve then calculate.
    pub async fn quote(
        &self,
        category_id: Uuid,
        product_id: Option<Uuid>,
        seller_price: Decimal,
        as_of: DateTime<Utc>,
    ) -> Result<PriceQuote, PricingError> {
        let resolved = self.resolve_rate(category_id, product_id, seller_price, as_of).await?;
        Ok(PriceQuote { resolved, breakdown: calculate(seller_price, resolved.rate)? })
    }

    /// Newest active global rate, ignoring price bands and effectivity windows.
    pub async fn global_rate(&self) -> Result<Decimal, PricingError> {
        let newest = self
            .store
            .active_settings(CommissionScope::Global, None)
            .await?
            .into_iter()
            .max_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(newest.map_or(DEFAULT_COMMISSION_RATE, |s| s.commission_rate))
    }
}
