//! Category tree node

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Catalog category. Pricing only follows `parent_id` links upward.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: impl Into<String>, parent_id: Option<Uuid>) -> Self {
        Self { id: Uuid::now_v7(), parent_id, name: name.into(), created_at: Utc::now() }
    }

    pub fn child(&self, name: impl Into<String>) -> Self { Self::new(name, Some(self.id)) }
}
