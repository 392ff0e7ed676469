use sqlx::PgPool;
use std::sync::Arc;

use crate::pricing::RateResolver;
use crate::publisher::EventPublisher;
use crate::repository::PgStore;

/// Shared handles passed to every handler and service.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub resolver: Arc<RateResolver<PgStore>>,
    pub events: EventPublisher,
}

impl AppState {
    pub fn new(db: PgPool, nats: Option<async_nats::Client>) -> Self {
        let resolver = Arc::new(RateResolver::new(PgStore::new(db.clone())));
        Self { db, resolver, events: EventPublisher::new(nats) }
    }
}
