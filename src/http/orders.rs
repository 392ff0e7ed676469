use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use super::error::AppResult;
use crate::domain::aggregates::Order;
use crate::services::orders::{self, PlaceOrder};
use crate::AppState;

pub async fn create_order(State(s): State<AppState>, Json(r): Json<PlaceOrder>) -> AppResult<(StatusCode, Json<Order>)> {
    Ok((StatusCode::CREATED, Json(orders::place_order(&s, r).await?)))
}

pub async fn get_order(State(s): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<Order>> {
    Ok(Json(orders::get_order(&s, id).await?))
}
