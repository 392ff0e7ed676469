use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::domain::aggregates::ProductError;
use crate::pricing::PricingError;
use crate::MarketplaceError;

/// Handler error. Renders as `{"error": ..., "code": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Marketplace(#[from] MarketplaceError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

fn internal() -> (StatusCode, &'static str, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", "An internal error occurred".to_string())
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Marketplace(err) => match err {
                MarketplaceError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
                MarketplaceError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
                MarketplaceError::Commission(e) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string()),
                MarketplaceError::Order(e) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string()),
                MarketplaceError::Product(e @ (ProductError::InvalidSellerPrice(_) | ProductError::Pricing(_))) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string())
                }
                MarketplaceError::Product(e @ ProductError::VariantNotFound(_)) => (StatusCode::NOT_FOUND, "NOT_FOUND", e.to_string()),
                MarketplaceError::Product(e) => (StatusCode::CONFLICT, "CONFLICT", e.to_string()),
                MarketplaceError::Pricing(PricingError::CategoryCycle(id)) => {
                    tracing::error!(category_id = %id, "category data integrity error");
                    internal()
                }
                MarketplaceError::Pricing(e @ PricingError::Calculation(_)) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string()),
                MarketplaceError::Pricing(PricingError::Store(e)) => {
                    tracing::error!(error = %e, "commission store error");
                    internal()
                }
                MarketplaceError::Storage(sqlx::Error::RowNotFound) => (StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found".to_string()),
                MarketplaceError::Storage(e) => {
                    tracing::error!(error = %e, "database error");
                    internal()
                }
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        (status, Json(json!({ "error": message, "code": code }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::{CommissionSettingError, ProductStatus};
    use crate::domain::value_objects::SellerPriceError;
    use crate::pricing::CalculationError;
    use uuid::Uuid;

    fn status(e: MarketplaceError) -> StatusCode { AppError::from(e).parts().0 }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status(MarketplaceError::not_found("product", Uuid::nil())), StatusCode::NOT_FOUND);
        assert_eq!(status(CommissionSettingError::UnexpectedTarget.into()), StatusCode::BAD_REQUEST);
        assert_eq!(status(ProductError::InsufficientStock { available: 1, requested: 2 }.into()), StatusCode::CONFLICT);
        assert_eq!(status(ProductError::NotPending(ProductStatus::Approved).into()), StatusCode::CONFLICT);
        assert_eq!(status(ProductError::InvalidSellerPrice(SellerPriceError::TooLarge).into()), StatusCode::BAD_REQUEST);
        assert_eq!(status(PricingError::Calculation(CalculationError::Overflow).into()), StatusCode::BAD_REQUEST);
        assert_eq!(status(PricingError::CategoryCycle(Uuid::nil()).into()), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status(MarketplaceError::Storage(sqlx::Error::PoolTimedOut)), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_errors_are_sanitised() {
        let (_, code, msg) = AppError::from(MarketplaceError::Storage(sqlx::Error::PoolTimedOut)).parts();
        assert_eq!(code, "INTERNAL_ERROR");
        assert!(!msg.contains("pool"));
    }
}
