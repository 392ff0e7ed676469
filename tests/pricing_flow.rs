use chrono::{Duration, Utc};
use marketplace_pricing::domain::aggregates::{
    Category, CommissionScope, CommissionSetting, NewCommissionSetting, NewProduct, NewVariant, Order, Product, ProductReview, ReviewDecision,
};
use marketplace_pricing::pricing::{MemoryStore, RateResolver, RateSource};
use rust_decimal::Decimal;
use uuid::Uuid;

fn dec(s: &str) -> Decimal { s.parse().unwrap() }

fn setting(scope: CommissionScope, entity_id: Option<Uuid>, rate: &str) -> CommissionSetting {
    CommissionSetting::create(
        NewCommissionSetting {
            scope, entity_id, commission_rate: dec(rate), min_seller_price: Decimal::ZERO, max_seller_price: None,
            is_active: true, effective_from: Some(Utc::now() - Duration::minutes(5)), effective_until: None,
        },
        Utc::now(),
    )
    .unwrap()
}

#[tokio::test]
async fn order_keeps_prices_after_product_is_repriced() {
    let store = MemoryStore::new();
    let electronics = Category::new("Electronics", None);
    let phones = electronics.child("Phones");
    store.insert_category(electronics.clone()).await;
    store.insert_category(phones.clone()).await;
    store.insert_setting(setting(CommissionScope::Global, None, "8")).await;
    store.insert_setting(setting(CommissionScope::Category, Some(electronics.id), "5")).await;
    let resolver = RateResolver::new(store);

    // Create: only the category chain applies, phones inherits from electronics.
    let input = NewProduct {
        seller_id: Uuid::now_v7(), category_id: phones.id, name: "Phone X".into(), description: None,
        seller_price: dec("1000.00"), stock_quantity: 5,
        variants: vec![NewVariant { variant_name: Some("128GB".into()), sku: Some("PX-128".into()), seller_price: dec("1200.00"), stock_quantity: 2 }],
    };
    let resolved = resolver.resolve_rate(phones.id, None, input.seller_price, Utc::now()).await.unwrap();
    assert!(matches!(resolved.source, RateSource::Category { category_id, .. } if category_id == electronics.id));
    let mut product = Product::create(input, resolved.rate, Utc::now()).unwrap();
    assert_eq!(product.customer_price, dec("1050.00"));
    assert_eq!(product.variants[0].customer_price, dec("1260.00"));
    product.review(ProductReview { status: ReviewDecision::Approved, admin_notes: None }).unwrap();

    let mut order = Order::create(Uuid::now_v7(), "buyer@example.com", Utc::now());
    let variant_id = product.variants[0].id;
    let unit = product.reserve(Some(variant_id), 2).unwrap();
    order.add_line(product.id, Some(variant_id), product.name.clone(), 2, unit).unwrap();
    order.place().unwrap();
    assert_eq!(order.total_customer_amount, dec("2520.00"));
    assert_eq!(order.total_commission_amount, dec("120.00"));

    // Admin adds a product-specific rate and recalculates.
    resolver.store().insert_setting(setting(CommissionScope::Product, Some(product.id), "10")).await;
    let resolved = resolver.resolve_rate(product.category_id, Some(product.id), product.seller_price, Utc::now()).await.unwrap();
    assert_eq!(resolved.rate, dec("10"));
    product.reprice_all(resolved.rate).unwrap();
    assert_eq!(product.customer_price, dec("1100.00"));
    assert_eq!(product.variants[0].customer_price, dec("1320.00"));

    assert_eq!(order.items[0].customer_unit_price, dec("1260.00"));
    assert_eq!(order.total_customer_amount, dec("2520.00"));
}
