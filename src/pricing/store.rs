use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::aggregates::{Category, CommissionScope, CommissionSetting};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("commission store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self { Self::Unavailable(e.to_string()) }
}

/// Read side the rate resolver depends on.
#[async_trait]
pub trait CommissionStore: Send + Sync {
    /// Active settings of `scope`. `entity_id` narrows category/product scopes and
    /// is ignored for global. Time window and price band are filtered by the caller.
    async fn active_settings(&self, scope: CommissionScope, entity_id: Option<Uuid>) -> Result<Vec<CommissionSetting>, StoreError>;

    async fn category(&self, id: Uuid) -> Result<Option<Category>, StoreError>;
}

/// In-process store, used by tests and local tooling.
#[derive(Default)]
pub struct MemoryStore {
    settings: RwLock<Vec<CommissionSetting>>,
    categories: RwLock<HashMap<Uuid, Category>>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    pub async fn insert_setting(&self, setting: CommissionSetting) {
        self.settings.write().await.push(setting);
    }

    pub async fn insert_category(&self, category: Category) {
        self.categories.write().await.insert(category.id, category);
    }
}

#[async_trait]
impl CommissionStore for MemoryStore {
    async fn active_settings(&self, scope: CommissionScope, entity_id: Option<Uuid>) -> Result<Vec<CommissionSetting>, StoreError> {
        let settings = self.settings.read().await;
        Ok(settings
            .iter()
            .filter(|s| s.is_active && s.scope == scope)
            .filter(|s| scope == CommissionScope::Global || s.entity_id == entity_id)
            .cloned()
            .collect())
    }

    async fn category(&self, id: Uuid) -> Result<Option<Category>, StoreError> {
        Ok(self.categories.read().await.get(&id).cloned())
    }
}
