//! Commission setting administration and rate lookups.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::domain::aggregates::{CommissionScope, CommissionSetting, CommissionSettingUpdate, NewCommissionSetting};
use crate::domain::events::{CommissionEvent, DomainEvent};
use crate::pricing::PriceQuote;
use crate::repository::{CategoryRepo, CommissionSettingRepo, ProductRepo, SettingFilter};
use crate::{AppState, MarketplaceError, Result};

pub async fn create_setting(state: &AppState, input: NewCommissionSetting) -> Result<CommissionSetting> {
    let setting = CommissionSetting::create(input, Utc::now())?;
    if let Some(entity_id) = setting.entity_id {
        match setting.scope {
            CommissionScope::Category => {
                CategoryRepo::find_by_id(&state.db, entity_id).await?.ok_or_else(|| MarketplaceError::not_found("category", entity_id))?;
            }
            CommissionScope::Product => {
                let mut conn = state.db.acquire().await?;
                ProductRepo::find(&mut conn, entity_id, false).await?.ok_or_else(|| MarketplaceError::not_found("product", entity_id))?;
            }
            CommissionScope::Global => {}
        }
    }
    let setting = CommissionSettingRepo::insert(&state.db, &setting).await?;
    tracing::info!(setting_id = %setting.id, scope = ?setting.scope, rate = %setting.commission_rate, "commission setting created");
    state.events.publish(DomainEvent::Commission(CommissionEvent::Created {
        setting_id: setting.id, scope: setting.scope, entity_id: setting.entity_id, rate: setting.commission_rate,
    })).await;
    Ok(setting)
}

pub async fn get_setting(state: &AppState, id: Uuid) -> Result<CommissionSetting> {
    CommissionSettingRepo::find_by_id(&state.db, id).await?.ok_or_else(|| MarketplaceError::not_found("commission setting", id))
}

async fn locked_setting(conn: &mut PgConnection, id: Uuid) -> Result<CommissionSetting> {
    CommissionSettingRepo::find_for_update(conn, id).await?.ok_or_else(|| MarketplaceError::not_found("commission setting", id))
}

pub async fn list_settings(state: &AppState, filter: &SettingFilter) -> Result<Vec<CommissionSetting>> {
    Ok(CommissionSettingRepo::list(&state.db, filter).await?)
}

/// Read, change and write happen under one row lock.
pub async fn update_setting(state: &AppState, id: Uuid, patch: CommissionSettingUpdate) -> Result<CommissionSetting> {
    let mut tx = state.db.begin().await?;
    let mut setting = locked_setting(&mut tx, id).await?;
    setting.apply_update(patch)?;
    let setting = CommissionSettingRepo::save(&mut tx, &setting).await?.ok_or_else(|| MarketplaceError::not_found("commission setting", id))?;
    tx.commit().await?;
    tracing::info!(setting_id = %id, rate = %setting.commission_rate, is_active = setting.is_active, "commission setting updated");
    state.events.publish(DomainEvent::Commission(CommissionEvent::Updated {
        setting_id: id, rate: setting.commission_rate, is_active: setting.is_active,
    })).await;
    Ok(setting)
}

/// Soft delete.
pub async fn deactivate_setting(state: &AppState, id: Uuid) -> Result<()> {
    let mut tx = state.db.begin().await?;
    let mut setting = locked_setting(&mut tx, id).await?;
    setting.deactivate();
    CommissionSettingRepo::save(&mut tx, &setting).await?;
    tx.commit().await?;
    tracing::info!(setting_id = %id, "commission setting deactivated");
    state.events.publish(DomainEvent::Commission(CommissionEvent::Deactivated { setting_id: id })).await;
    Ok(())
}

pub async fn quote(state: &AppState, category_id: Uuid, product_id: Option<Uuid>, seller_price: Decimal, as_of: DateTime<Utc>) -> Result<PriceQuote> {
    Ok(state.resolver.quote(category_id, product_id, seller_price, as_of).await?)
}

pub async fn global_rate(state: &AppState) -> Result<Decimal> {
    Ok(state.resolver.global_rate().await?)
}
