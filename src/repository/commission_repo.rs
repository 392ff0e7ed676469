//! Repository for the `commission_settings` table.

use serde::Deserialize;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::domain::aggregates::{CommissionScope, CommissionSetting};

const COLUMNS: &str = "id, scope, entity_id, commission_rate, min_seller_price, max_seller_price, \
    is_active, effective_from, effective_until, created_at";

/// Upper bound on a single list page.
pub const MAX_LIST_LIMIT: i64 = 1000;

#[derive(Clone, Debug, Deserialize)]
pub struct SettingFilter {
    pub scope: Option<CommissionScope>,
    #[serde(default = "default_active_only")]
    pub active_only: bool,
    #[serde(default)]
    pub offset: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_active_only() -> bool { true }
fn default_limit() -> i64 { 100 }

impl Default for SettingFilter {
    fn default() -> Self { Self { scope: None, active_only: true, offset: 0, limit: default_limit() } }
}

pub struct CommissionSettingRepo;

impl CommissionSettingRepo {
    pub async fn insert(pool: &PgPool, s: &CommissionSetting) -> Result<CommissionSetting, sqlx::Error> {
        let query = format!(
            "INSERT INTO commission_settings ({COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CommissionSetting>(&query)
            .bind(s.id)
            .bind(s.scope)
            .bind(s.entity_id)
            .bind(s.commission_rate)
            .bind(s.min_seller_price)
            .bind(s.max_seller_price)
            .bind(s.is_active)
            .bind(s.effective_from)
            .bind(s.effective_until)
            .bind(s.created_at)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<CommissionSetting>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM commission_settings WHERE id = $1");
        sqlx::query_as::<_, CommissionSetting>(&query).bind(id).fetch_optional(pool).await
    }

    /// Load a setting and lock its row until the surrounding transaction ends.
    pub async fn find_for_update(conn: &mut PgConnection, id: Uuid) -> Result<Option<CommissionSetting>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM commission_settings WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, CommissionSetting>(&query).bind(id).fetch_optional(&mut *conn).await
    }

    /// Newest first.
    pub async fn list(pool: &PgPool, filter: &SettingFilter) -> Result<Vec<CommissionSetting>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM commission_settings
             WHERE ($1::commission_scope IS NULL OR scope = $1)
               AND (NOT $2 OR is_active)
             ORDER BY created_at DESC, id DESC
             OFFSET $3 LIMIT $4"
        );
        sqlx::query_as::<_, CommissionSetting>(&query)
            .bind(filter.scope)
            .bind(filter.active_only)
            .bind(filter.offset.max(0))
            .bind(filter.limit.clamp(1, MAX_LIST_LIMIT))
            .fetch_all(pool)
            .await
    }

    /// Active settings of a scope. `entity_id` is ignored for global settings.
    pub async fn active_for(pool: &PgPool, scope: CommissionScope, entity_id: Option<Uuid>) -> Result<Vec<CommissionSetting>, sqlx::Error> {
        let entity_id = if scope == CommissionScope::Global { None } else { entity_id };
        let query = format!(
            "SELECT {COLUMNS} FROM commission_settings
             WHERE scope = $1 AND is_active AND ($2::uuid IS NULL OR entity_id = $2)"
        );
        sqlx::query_as::<_, CommissionSetting>(&query)
            .bind(scope)
            .bind(entity_id)
            .fetch_all(pool)
            .await
    }

    /// Persist the mutable fields of an existing setting.
    pub async fn save(conn: &mut PgConnection, s: &CommissionSetting) -> Result<Option<CommissionSetting>, sqlx::Error> {
        let query = format!(
            "UPDATE commission_settings
             SET commission_rate = $2, min_seller_price = $3, max_seller_price = $4,
                 is_active = $5, effective_from = $6, effective_until = $7
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CommissionSetting>(&query)
            .bind(s.id)
            .bind(s.commission_rate)
            .bind(s.min_seller_price)
            .bind(s.max_seller_price)
            .bind(s.is_active)
            .bind(s.effective_from)
            .bind(s.effective_until)
            .fetch_optional(&mut *conn)
            .await
    }
}
