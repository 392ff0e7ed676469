//! Commission Setting Aggregate
//!
//! A rate applied to seller prices at one of three scopes. Settings are never
//! hard-deleted: historical order pricing refers back to them, so removal is a
//! soft delete that flips `is_active`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{CommissionRate, PriceBand, PriceBandError, RateError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "commission_scope", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CommissionScope {
    Global,
    Category,
    Product,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommissionSetting {
    pub id: Uuid,
    pub scope: CommissionScope,
    pub entity_id: Option<Uuid>,
    pub commission_rate: Decimal,
    pub min_seller_price: Decimal,
    pub max_seller_price: Option<Decimal>,
    pub is_active: bool,
    pub effective_from: DateTime<Utc>,
    pub effective_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Input for a new setting, as submitted by an administrator.
#[derive(Clone, Debug, Deserialize)]
pub struct NewCommissionSetting {
    pub scope: CommissionScope,
    pub entity_id: Option<Uuid>,
    pub commission_rate: Decimal,
    #[serde(default)]
    pub min_seller_price: Decimal,
    pub max_seller_price: Option<Decimal>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub effective_from: Option<DateTime<Utc>>,
    pub effective_until: Option<DateTime<Utc>>,
}

fn default_active() -> bool { true }

/// Partial update. Absent fields keep their current value. An explicit `null`
/// for `max_seller_price` or `effective_until` removes the bound.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CommissionSettingUpdate {
    pub commission_rate: Option<Decimal>,
    pub min_seller_price: Option<Decimal>,
    #[serde(default, deserialize_with = "nullable")]
    pub max_seller_price: Option<Option<Decimal>>,
    pub is_active: Option<bool>,
    pub effective_from: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "nullable")]
    pub effective_until: Option<Option<DateTime<Utc>>>,
}

/// Present fields become `Some`, so `null` reads as `Some(None)`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl CommissionSetting {
    pub fn create(input: NewCommissionSetting, now: DateTime<Utc>) -> Result<Self, CommissionSettingError> {
        let setting = Self {
            id: Uuid::now_v7(),
            scope: input.scope,
            entity_id: input.entity_id,
            commission_rate: input.commission_rate,
            min_seller_price: input.min_seller_price,
            max_seller_price: input.max_seller_price,
            is_active: input.is_active,
            effective_from: input.effective_from.unwrap_or(now),
            effective_until: input.effective_until,
            created_at: now,
        };
        setting.validate()?;
        Ok(setting)
    }

    pub fn apply_update(&mut self, patch: CommissionSettingUpdate) -> Result<(), CommissionSettingError> {
        let mut next = self.clone();
        if let Some(rate) = patch.commission_rate { next.commission_rate = rate; }
        if let Some(min) = patch.min_seller_price { next.min_seller_price = min; }
        if let Some(max) = patch.max_seller_price { next.max_seller_price = max; }
        if let Some(active) = patch.is_active { next.is_active = active; }
        if let Some(from) = patch.effective_from { next.effective_from = from; }
        if let Some(until) = patch.effective_until { next.effective_until = until; }
        next.validate()?;
        *self = next;
        Ok(())
    }

    pub fn deactivate(&mut self) { self.is_active = false; }

    pub fn rate(&self) -> Result<CommissionRate, CommissionSettingError> {
        Ok(CommissionRate::new(self.commission_rate)?)
    }

    pub fn band(&self) -> Result<PriceBand, CommissionSettingError> {
        Ok(PriceBand::new(self.min_seller_price, self.max_seller_price)?)
    }

    pub fn is_effective_at(&self, as_of: DateTime<Utc>) -> bool {
        self.effective_from <= as_of && self.effective_until.map_or(true, |until| until >= as_of)
    }

    /// Whether this setting is eligible for `seller_price` at `as_of`.
    pub fn applies_to(&self, seller_price: Decimal, as_of: DateTime<Utc>) -> bool {
        self.is_active
            && self.is_effective_at(as_of)
            && self.band().is_ok_and(|band| band.contains(seller_price))
    }

    fn validate(&self) -> Result<(), CommissionSettingError> {
        self.rate()?;
        self.band()?;
        match (self.scope, self.entity_id) {
            (CommissionScope::Global, Some(_)) => return Err(CommissionSettingError::UnexpectedTarget),
            (CommissionScope::Category | CommissionScope::Product, None) => {
                return Err(CommissionSettingError::MissingTarget(self.scope))
            }
            _ => {}
        }
        if let Some(until) = self.effective_until {
            if until < self.effective_from { return Err(CommissionSettingError::InvertedWindow); }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommissionSettingError {
    #[error("{0}")]
    Rate(#[from] RateError),
    #[error("{0}")]
    Band(#[from] PriceBandError),
    #[error("{0:?} commission requires an entity id")]
    MissingTarget(CommissionScope),
    #[error("global commission cannot target an entity")]
    UnexpectedTarget,
    #[error("effective_until cannot be before effective_from")]
    InvertedWindow,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn global(rate: i64) -> NewCommissionSetting {
        NewCommissionSetting {
            scope: CommissionScope::Global, entity_id: None, commission_rate: Decimal::new(rate, 0),
            min_seller_price: Decimal::ZERO, max_seller_price: None, is_active: true,
            effective_from: None, effective_until: None,
        }
    }

    #[test]
    fn test_create_defaults_effective_from_to_now() {
        let now = Utc::now();
        let s = CommissionSetting::create(global(8), now).unwrap();
        assert_eq!(s.effective_from, now);
        assert!(s.is_active);
        assert!(s.applies_to(Decimal::new(1, 0), now));
    }

    #[test]
    fn test_create_validates() {
        let now = Utc::now();
        assert!(matches!(CommissionSetting::create(global(101), now), Err(CommissionSettingError::Rate(_))));
        let mut input = global(5);
        input.entity_id = Some(Uuid::now_v7());
        assert_eq!(CommissionSetting::create(input, now), Err(CommissionSettingError::UnexpectedTarget));
        let mut input = global(5);
        input.scope = CommissionScope::Category;
        assert_eq!(CommissionSetting::create(input, now), Err(CommissionSettingError::MissingTarget(CommissionScope::Category)));
        let mut input = global(5);
        input.min_seller_price = Decimal::new(500, 0);
        input.max_seller_price = Some(Decimal::new(100, 0));
        assert_eq!(CommissionSetting::create(input, now), Err(CommissionSettingError::Band(PriceBandError::Inverted)));
        let mut input = global(5);
        input.effective_from = Some(now);
        input.effective_until = Some(now - Duration::days(1));
        assert_eq!(CommissionSetting::create(input, now), Err(CommissionSettingError::InvertedWindow));
    }

    #[test]
    fn test_window_and_band() {
        let now = Utc::now();
        let mut input = global(5);
        input.min_seller_price = Decimal::new(100, 0);
        input.max_seller_price = Some(Decimal::new(500, 0));
        input.effective_until = Some(now + Duration::days(1));
        let s = CommissionSetting::create(input, now).unwrap();
        assert!(!s.applies_to(Decimal::new(50, 0), now));
        assert!(s.applies_to(Decimal::new(500, 0), now));
        assert!(s.applies_to(Decimal::new(100, 0), now + Duration::days(1)));
        assert!(!s.applies_to(Decimal::new(100, 0), now + Duration::days(2)));
        assert!(!s.applies_to(Decimal::new(100, 0), now - Duration::seconds(1)));
    }

    #[test]
    fn test_update_is_atomic() {
        let now = Utc::now();
        let mut s = CommissionSetting::create(global(8), now).unwrap();
        let bad = CommissionSettingUpdate { commission_rate: Some(Decimal::new(12, 0)), min_seller_price: Some(Decimal::new(-1, 0)), ..Default::default() };
        assert!(s.apply_update(bad).is_err());
        assert_eq!(s.commission_rate, Decimal::new(8, 0));
        s.apply_update(CommissionSettingUpdate { commission_rate: Some(Decimal::new(12, 0)), ..Default::default() }).unwrap();
        assert_eq!(s.commission_rate, Decimal::new(12, 0));
        s.deactivate();
        assert!(!s.applies_to(Decimal::ONE, now));
    }

    #[test]
    fn test_update_can_clear_bounds() {
        let now = Utc::now();
        let mut input = global(5);
        input.max_seller_price = Some(Decimal::new(500, 0));
        input.effective_until = Some(now + Duration::days(1));
        let mut s = CommissionSetting::create(input, now).unwrap();

        let keep: CommissionSettingUpdate = serde_json::from_str(r#"{"commission_rate": "6"}"#).unwrap();
        s.apply_update(keep).unwrap();
        assert_eq!(s.max_seller_price, Some(Decimal::new(500, 0)));
        assert!(s.effective_until.is_some());

        let clear: CommissionSettingUpdate = serde_json::from_str(r#"{"max_seller_price": null, "effective_until": null}"#).unwrap();
        assert_eq!(clear.max_seller_price, Some(None));
        s.apply_update(clear).unwrap();
        assert_eq!(s.max_seller_price, None);
        assert_eq!(s.effective_until, None);
        assert!(s.applies_to(Decimal::new(1_000_000, 0), now + Duration::days(30)));

        let set: CommissionSettingUpdate = serde_json::from_str(r#"{"max_seller_price": "250"}"#).unwrap();
        s.apply_update(set).unwrap();
        assert_eq!(s.max_seller_price, Some(Decimal::new(250, 0)));
    }
}
