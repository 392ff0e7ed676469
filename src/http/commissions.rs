//! Admin commission endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use super::error::{AppError, AppResult};
use crate::domain::aggregates::{CommissionSetting, CommissionSettingUpdate, NewCommissionSetting};
use crate::domain::value_objects::{CommissionRate, SellerPrice};
use crate::pricing::{calculate as calculate_breakdown, CommissionBreakdown, PriceQuote};
use crate::repository::SettingFilter;
use crate::services::commissions;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CalculateRequest { pub seller_price: Decimal, pub commission_rate: Decimal }

#[derive(Debug, Deserialize)]
pub struct RateParams { pub category_id: Uuid, pub product_id: Option<Uuid>, pub seller_price: Decimal }

fn seller_price(price: Decimal) -> AppResult<Decimal> {
    SellerPrice::new(price).map(|p| p.value()).map_err(|e| AppError::BadRequest(e.to_string()))
}

pub async fn create(State(s): State<AppState>, Json(r): Json<NewCommissionSetting>) -> AppResult<(StatusCode, Json<CommissionSetting>)> {
    Ok((StatusCode::CREATED, Json(commissions::create_setting(&s, r).await?)))
}

pub async fn list(State(s): State<AppState>, Query(f): Query<SettingFilter>) -> AppResult<Json<Vec<CommissionSetting>>> {
    Ok(Json(commissions::list_settings(&s, &f).await?))
}

pub async fn get(State(s): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<CommissionSetting>> {
    Ok(Json(commissions::get_setting(&s, id).await?))
}

pub async fn update(State(s): State<AppState>, Path(id): Path<Uuid>, Json(r): Json<CommissionSettingUpdate>) -> AppResult<Json<CommissionSetting>> {
    Ok(Json(commissions::update_setting(&s, id, r).await?))
}

pub async fn delete(State(s): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<Value>> {
    commissions::deactivate_setting(&s, id).await?;
    Ok(Json(json!({ "message": "Commission setting deleted successfully" })))
}

/// Pure calculation for a given price and rate; no lookup.
pub async fn calculate(Json(r): Json<CalculateRequest>) -> AppResult<Json<CommissionBreakdown>> {
    let price = seller_price(r.seller_price)?;
    let rate = CommissionRate::new(r.commission_rate).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let breakdown = calculate_breakdown(price, rate.value()).map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok(Json(breakdown))
}

pub async fn rate(State(s): State<AppState>, Query(p): Query<RateParams>) -> AppResult<Json<PriceQuote>> {
    let price = seller_price(p.seller_price)?;
    Ok(Json(commissions::quote(&s, p.category_id, p.product_id, price, Utc::now()).await?))
}

pub async fn global(State(s): State<AppState>) -> AppResult<Json<Value>> {
    let rate = commissions::global_rate(&s).await?;
    Ok(Json(json!({ "global_commission_rate": rate })))
}
