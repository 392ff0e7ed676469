//! Product pricing use-cases. Each runs in one transaction.

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::domain::aggregates::{NewProduct, Product, ProductReview, ProductUpdate};
use crate::domain::events::{DomainEvent, ProductEvent};
use crate::repository::{CategoryRepo, ProductRepo};
use crate::{AppState, MarketplaceError, Result};

fn repriced(p: &Product) -> DomainEvent {
    DomainEvent::Product(ProductEvent::Repriced {
        product_id: p.id, commission_rate: p.commission_rate, customer_price: p.customer_price, variants: p.variants.len(),
    })
}

async fn ensure_category(state: &AppState, id: Uuid) -> Result<()> {
    CategoryRepo::find_by_id(&state.db, id).await?.ok_or_else(|| MarketplaceError::not_found("category", id))?;
    Ok(())
}

/// New products are priced from their category (no product-scoped setting can
/// exist yet); variants share the product's rate.
pub async fn create_product(state: &AppState, input: NewProduct) -> Result<Product> {
    input.validate()?;
    ensure_category(state, input.category_id).await?;
    let now = Utc::now();
    let resolved = state.resolver.resolve_rate(input.category_id, None, input.seller_price, now).await?;
    let product = Product::create(input, resolved.rate, now)?;

    let mut tx = state.db.begin().await?;
    ProductRepo::insert(&mut tx, &product).await?;
    tx.commit().await?;

    tracing::info!(product_id = %product.id, rate = %product.commission_rate, customer_price = %product.customer_price, "product created");
    Ok(product)
}

pub async fn get_product(state: &AppState, id: Uuid) -> Result<Product> {
    let mut conn = state.db.acquire().await?;
    ProductRepo::find(&mut conn, id, false).await?.ok_or_else(|| MarketplaceError::not_found("product", id))
}

/// Re-resolves the rate when the seller price or category changes. Only the
/// product is repriced here; variants follow on an explicit recalculation.
pub async fn update_product(state: &AppState, id: Uuid, patch: ProductUpdate) -> Result<Product> {
    patch.validate()?;
    if let Some(category_id) = patch.category_id {
        ensure_category(state, category_id).await?;
    }
    let mut tx = state.db.begin().await?;
    let mut product = ProductRepo::find(&mut tx, id, true).await?.ok_or_else(|| MarketplaceError::not_found("product", id))?;
    let reprice = product.apply_update(patch)?;
    if reprice {
        let resolved = state.resolver.resolve_rate(product.category_id, Some(id), product.seller_price, Utc::now()).await?;
        product.reprice(resolved.rate)?;
    }
    ProductRepo::save(&mut tx, &product).await?;
    tx.commit().await?;

    if reprice {
        tracing::info!(product_id = %id, rate = %product.commission_rate, "product repriced on update");
        state.events.publish(repriced(&product)).await;
    }
    Ok(product)
}

/// Admin action: re-run resolution for the product and overwrite the stored
/// prices of the product and all its variants.
pub async fn recalculate_commission(state: &AppState, id: Uuid) -> Result<Product> {
    let mut tx = state.db.begin().await?;
    let mut product = ProductRepo::find(&mut tx, id, true).await?.ok_or_else(|| MarketplaceError::not_found("product", id))?;
    let resolved = state.resolver.resolve_rate(product.category_id, Some(id), product.seller_price, Utc::now()).await?;
    product.reprice_all(resolved.rate)?;
    ProductRepo::save(&mut tx, &product).await?;
    tx.commit().await?;

    tracing::info!(product_id = %id, source = ?resolved.source, rate = %resolved.rate, "commission recalculated");
    state.events.publish(repriced(&product)).await;
    Ok(product)
}

/// Admin approval or rejection of a pending product. Only approved products
/// can be ordered.
pub async fn review_product(state: &AppState, id: Uuid, review: ProductReview) -> Result<Product> {
    review.validate()?;
    let mut tx = state.db.begin().await?;
    let mut product = ProductRepo::find(&mut tx, id, true).await?.ok_or_else(|| MarketplaceError::not_found("product", id))?;
    product.review(review)?;
    ProductRepo::save(&mut tx, &product).await?;
    tx.commit().await?;

    tracing::info!(product_id = %id, status = ?product.status, "product reviewed");
    state.events.publish(DomainEvent::Product(ProductEvent::Reviewed { product_id: id, status: product.status })).await;
    Ok(product)
}
