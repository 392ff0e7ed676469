//! Order placement.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use uuid::Uuid;
use validator::Validate;

use crate::domain::aggregates::{Order, OrderError, Product};
use crate::repository::{OrderRepo, ProductRepo};
use crate::{AppState, MarketplaceError, Result};

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct PlaceOrder {
    pub customer_id: Uuid,
    #[validate(email)]
    pub customer_email: String,
    #[validate(length(min = 1))]
    pub items: Vec<OrderLineRequest>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderLineRequest {
    pub product_id: Uuid,
    pub variant_id: Option<Uuid>,
    pub quantity: u32,
}

/// Snapshots current product/variant prices into the order and takes the
/// ordered quantities out of stock. Product rows stay locked until commit.
pub async fn place_order(state: &AppState, req: PlaceOrder) -> Result<Order> {
    req.validate()?;
    let mut tx = state.db.begin().await?;
    let mut order = Order::create(req.customer_id, req.customer_email, Utc::now());
    let mut products: HashMap<Uuid, Product> = HashMap::new();

    for line in &req.items {
        if line.quantity == 0 { return Err(OrderError::InvalidQuantity.into()); }
        let product = match products.entry(line.product_id) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                let product = ProductRepo::find(&mut tx, line.product_id, true)
                    .await?
                    .ok_or_else(|| MarketplaceError::not_found("product", line.product_id))?;
                e.insert(product)
            }
        };
        let unit = product.reserve(line.variant_id, line.quantity)?;
        order.add_line(product.id, line.variant_id, product.name.clone(), line.quantity, unit)?;
    }

    let event = order.place()?;
    for product in products.values() {
        ProductRepo::save(&mut tx, product).await?;
    }
    OrderRepo::insert(&mut tx, &order).await?;
    tx.commit().await?;

    tracing::info!(order_id = %order.id, order_number = %order.order_number, total = %order.total_customer_amount, "order placed");
    state.events.publish(event).await;
    Ok(order)
}

pub async fn get_order(state: &AppState, id: Uuid) -> Result<Order> {
    OrderRepo::find(&state.db, id).await?.ok_or_else(|| MarketplaceError::not_found("order", id))
}
