//! Postgres data access.

pub mod catalog_repo;
pub mod commission_repo;
pub mod order_repo;

pub use catalog_repo::{CategoryRepo, ProductRepo};
pub use commission_repo::{CommissionSettingRepo, SettingFilter};
pub use order_repo::OrderRepo;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::aggregates::{Category, CommissionScope, CommissionSetting};
use crate::pricing::{CommissionStore, StoreError};

/// [`CommissionStore`] backed by the live tables. Every call reads fresh rows;
/// nothing is cached between resolutions.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl CommissionStore for PgStore {
    async fn active_settings(&self, scope: CommissionScope, entity_id: Option<Uuid>) -> Result<Vec<CommissionSetting>, StoreError> {
        Ok(CommissionSettingRepo::active_for(&self.pool, scope, entity_id).await?)
    }

    async fn category(&self, id: Uuid) -> Result<Option<Category>, StoreError> {
        Ok(CategoryRepo::find_by_id(&self.pool, id).await?)
    }
}
