use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use super::error::AppResult;
use crate::domain::aggregates::{NewProduct, Product, ProductReview, ProductUpdate};
use crate::services::catalog;
use crate::AppState;

pub async fn create_product(State(s): State<AppState>, Json(r): Json<NewProduct>) -> AppResult<(StatusCode, Json<Product>)> {
    Ok((StatusCode::CREATED, Json(catalog::create_product(&s, r).await?)))
}

pub async fn get_product(State(s): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<Product>> {
    Ok(Json(catalog::get_product(&s, id).await?))
}

pub async fn update_product(State(s): State<AppState>, Path(id): Path<Uuid>, Json(r): Json<ProductUpdate>) -> AppResult<Json<Product>> {
    Ok(Json(catalog::update_product(&s, id, r).await?))
}

pub async fn recalculate_commission(State(s): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<Product>> {
    Ok(Json(catalog::recalculate_commission(&s, id).await?))
}

pub async fn review_product(State(s): State<AppState>, Path(id): Path<Uuid>, Json(r): Json<ProductReview>) -> AppResult<Json<Product>> {
    Ok(Json(catalog::review_product(&s, id, r).await?))
}
