//! HTTP surface.

pub mod catalog;
pub mod commissions;
pub mod error;
pub mod orders;

use axum::routing::{get, post, put};
use axum::{Json, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "marketplace-pricing"})) }))
        .route("/api/v1/admin/commissions", get(commissions::list).post(commissions::create))
        .route("/api/v1/admin/commissions/calculate", post(commissions::calculate))
        .route("/api/v1/admin/commissions/rate", get(commissions::rate))
        .route("/api/v1/admin/commissions/global", get(commissions::global))
        .route("/api/v1/admin/commissions/:id", get(commissions::get).put(commissions::update).delete(commissions::delete))
        .route("/api/v1/admin/products/:id/approve", put(catalog::review_product))
        .route("/api/v1/admin/products/:id/recalculate-commission", post(catalog::recalculate_commission))
        .route("/api/v1/products", post(catalog::create_product))
        .route("/api/v1/products/:id", get(catalog::get_product).put(catalog::update_product))
        .route("/api/v1/orders", post(orders::create_order))
        .route("/api/v1/orders/:id", get(orders::get_order))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
