//! Order Aggregate
//!
//! Lines freeze the unit prices of the product or variant at the moment of
//! purchase; later repricing never touches an existing order.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::aggregates::product::UnitPricing;
use crate::domain::events::{DomainEvent, OrderEvent};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus { #[default] Pending, Confirmed, Collected, OutForDelivery, Delivered, Cancelled }

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub customer_id: Uuid,
    pub customer_email: String,
    pub status: OrderStatus,
    pub total_customer_amount: Decimal,
    pub total_seller_amount: Decimal,
    pub total_commission_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(default)]
    pub items: Vec<LineItem>,
}

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct LineItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub variant_id: Option<Uuid>,
    pub product_name: String,
    pub quantity: i32,
    pub seller_unit_price: Decimal,
    pub customer_unit_price: Decimal,
    pub commission_unit_rate: Decimal,
    pub commission_unit_amount: Decimal,
    pub total_seller_amount: Decimal,
    pub total_customer_amount: Decimal,
    pub total_commission_amount: Decimal,
}

impl Order {
    pub fn create(customer_id: Uuid, customer_email: impl Into<String>, now: DateTime<Utc>) -> Self {
        let id = Uuid::now_v7();
        // v7 ids are time-ordered, the tail keeps numbers unique within a millisecond.
        let simple = id.simple().to_string();
        Self {
            id, order_number: format!("ORD-{}", simple[simple.len() - 10..].to_uppercase()),
            customer_id, customer_email: customer_email.into(), status: OrderStatus::Pending,
            total_customer_amount: Decimal::ZERO, total_seller_amount: Decimal::ZERO, total_commission_amount: Decimal::ZERO,
            created_at: now, updated_at: now, items: vec![],
        }
    }

    pub fn add_line(&mut self, product_id: Uuid, variant_id: Option<Uuid>, product_name: impl Into<String>, quantity: u32, unit: UnitPricing) -> Result<(), OrderError> {
        if quantity == 0 { return Err(OrderError::InvalidQuantity); }
        let qty = Decimal::from(quantity);
        self.items.push(LineItem {
            id: Uuid::now_v7(), order_id: self.id, product_id, variant_id, product_name: product_name.into(),
            quantity: quantity as i32,
            seller_unit_price: unit.seller_unit_price,
            customer_unit_price: unit.customer_unit_price,
            commission_unit_rate: unit.commission_unit_rate,
            commission_unit_amount: unit.commission_unit_amount,
            total_seller_amount: unit.seller_unit_price * qty,
            total_customer_amount: unit.customer_unit_price * qty,
            total_commission_amount: unit.commission_unit_amount * qty,
        });
        self.recalculate();
        Ok(())
    }

    /// Validates the order is placeable and returns the `OrderPlaced` event.
    pub fn place(&self) -> Result<DomainEvent, OrderError> {
        if self.items.is_empty() { return Err(OrderError::NoItems); }
        Ok(DomainEvent::Order(OrderEvent::Placed {
            order_id: self.id, customer_id: self.customer_id,
            total_customer_amount: self.total_customer_amount,
            total_commission_amount: self.total_commission_amount,
        }))
    }

    fn recalculate(&mut self) {
        self.total_seller_amount = self.items.iter().map(|i| i.total_seller_amount).sum();
        self.total_customer_amount = self.items.iter().map(|i| i.total_customer_amount).sum();
        self.total_commission_amount = self.items.iter().map(|i| i.total_commission_amount).sum();
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    #[error("order has no items")]
    NoItems,
    #[error("quantity must be at least 1")]
    InvalidQuantity,
}
