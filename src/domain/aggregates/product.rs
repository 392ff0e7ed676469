//! Product Aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::value_objects::{Quantity, SellerPrice, SellerPriceError};
use crate::pricing::{calculate, CalculationError, CommissionBreakdown};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "product_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus { Draft, #[default] Pending, Approved, Rejected, Hidden }

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub seller_price: Decimal,
    pub commission_rate: Decimal,
    pub commission_amount: Decimal,
    pub customer_price: Decimal,
    pub stock_quantity: i32,
    pub status: ProductStatus,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
}

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductVariant {
    pub id: Uuid,
    pub product_id: Uuid,
    pub variant_name: Option<String>,
    pub sku: Option<String>,
    pub seller_price: Decimal,
    pub commission_rate: Decimal,
    pub commission_amount: Decimal,
    pub customer_price: Decimal,
    pub stock_quantity: i32,
    pub is_active: bool,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct NewProduct {
    pub seller_id: Uuid,
    pub category_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    pub seller_price: Decimal,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub stock_quantity: i32,
    #[validate]
    #[serde(default)]
    pub variants: Vec<NewVariant>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct NewVariant {
    #[validate(length(max = 255))]
    pub variant_name: Option<String>,
    #[validate(length(max = 100))]
    pub sku: Option<String>,
    pub seller_price: Decimal,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub stock_quantity: i32,
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct ProductUpdate {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub seller_price: Option<Decimal>,
    #[validate(range(min = 0))]
    pub stock_quantity: Option<i32>,
}

/// Outcome of an admin review of a pending product.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision { Approved, Rejected }

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct ProductReview {
    pub status: ReviewDecision,
    #[validate(length(max = 2000))]
    pub admin_notes: Option<String>,
}

/// Per-unit prices frozen into an order line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitPricing {
    pub seller_unit_price: Decimal,
    pub customer_unit_price: Decimal,
    pub commission_unit_rate: Decimal,
    pub commission_unit_amount: Decimal,
}

impl ProductVariant {
    fn apply(&mut self, b: &CommissionBreakdown) {
        self.commission_rate = b.commission_rate;
        self.commission_amount = b.commission_amount;
        self.customer_price = b.customer_price;
    }

    fn unit_pricing(&self) -> UnitPricing {
        UnitPricing {
            seller_unit_price: self.seller_price,
            customer_unit_price: self.customer_price,
            commission_unit_rate: self.commission_rate,
            commission_unit_amount: self.commission_amount,
        }
    }
}

fn seller_price(price: Decimal) -> Result<Decimal, ProductError> {
    Ok(SellerPrice::new(price)?.value())
}

fn take_stock(stock: &mut i32, wanted: u32) -> Result<(), ProductError> {
    let available = Quantity::new((*stock).max(0) as u32);
    let left = available.subtract(wanted).ok_or(ProductError::InsufficientStock { available: available.value(), requested: wanted })?;
    *stock = left.value() as i32;
    Ok(())
}

impl Product {
    /// New products are priced with `rate` (product and every variant) and wait for approval.
    pub fn create(input: NewProduct, rate: Decimal, now: DateTime<Utc>) -> Result<Self, ProductError> {
        let id = Uuid::now_v7();
        let b = calculate(seller_price(input.seller_price)?, rate)?;
        let variants = input.variants.into_iter().map(|v| -> Result<ProductVariant, ProductError> {
            let vb = calculate(seller_price(v.seller_price)?, rate)?;
            Ok(ProductVariant {
                id: Uuid::now_v7(), product_id: id, variant_name: v.variant_name, sku: v.sku,
                seller_price: vb.seller_price, commission_rate: vb.commission_rate,
                commission_amount: vb.commission_amount, customer_price: vb.customer_price,
                stock_quantity: v.stock_quantity, is_active: true,
            })
        }).collect::<Result<Vec<_>, ProductError>>()?;
        Ok(Self {
            id, seller_id: input.seller_id, category_id: input.category_id, name: input.name,
            description: input.description, seller_price: b.seller_price,
            commission_rate: b.commission_rate, commission_amount: b.commission_amount, customer_price: b.customer_price,
            stock_quantity: input.stock_quantity, status: ProductStatus::Pending, admin_notes: None,
            created_at: now, updated_at: now, variants,
        })
    }

    /// Applies `patch`; returns true when the seller price or category changed and
    /// the product must be repriced.
    pub fn apply_update(&mut self, patch: ProductUpdate) -> Result<bool, ProductError> {
        let mut reprice = false;
        if let Some(price) = patch.seller_price {
            let price = seller_price(price)?;
            reprice |= price != self.seller_price;
            self.seller_price = price;
        }
        if let Some(category_id) = patch.category_id {
            reprice |= category_id != self.category_id;
            self.category_id = category_id;
        }
        if let Some(name) = patch.name { self.name = name; }
        if let Some(description) = patch.description { self.description = Some(description); }
        if let Some(stock) = patch.stock_quantity { self.stock_quantity = stock; }
        self.touch();
        Ok(reprice)
    }

    /// Reprice the product only, leaving variants untouched.
    pub fn reprice(&mut self, rate: Decimal) -> Result<(), ProductError> {
        let b = calculate(self.seller_price, rate)?;
        self.commission_rate = b.commission_rate;
        self.commission_amount = b.commission_amount;
        self.customer_price = b.customer_price;
        self.touch();
        Ok(())
    }

    /// Reprice the product and all of its variants with one rate. Nothing is
    /// changed when any of the prices fails to calculate.
    pub fn reprice_all(&mut self, rate: Decimal) -> Result<(), ProductError> {
        let variant_prices = self.variants.iter().map(|v| calculate(v.seller_price, rate)).collect::<Result<Vec<_>, _>>()?;
        self.reprice(rate)?;
        for (v, b) in self.variants.iter_mut().zip(&variant_prices) {
            v.apply(b);
        }
        Ok(())
    }

    /// Admin review. Only pending products can be reviewed.
    pub fn review(&mut self, review: ProductReview) -> Result<(), ProductError> {
        if self.status != ProductStatus::Pending {
            return Err(ProductError::NotPending(self.status));
        }
        self.status = match review.status {
            ReviewDecision::Approved => ProductStatus::Approved,
            ReviewDecision::Rejected => ProductStatus::Rejected,
        };
        self.admin_notes = review.admin_notes;
        self.touch();
        Ok(())
    }

    pub fn can_be_purchased(&self) -> bool { self.status == ProductStatus::Approved }

    /// Takes `quantity` units out of stock (of the variant when given) and returns
    /// the unit prices to snapshot into the order line.
    pub fn reserve(&mut self, variant_id: Option<Uuid>, quantity: u32) -> Result<UnitPricing, ProductError> {
        if !self.can_be_purchased() { return Err(ProductError::NotAvailable(self.name.clone())); }
        let pricing = match variant_id {
            Some(vid) => {
                let variant = self.variants.iter_mut().find(|v| v.id == vid && v.is_active).ok_or(ProductError::VariantNotFound(vid))?;
                take_stock(&mut variant.stock_quantity, quantity)?;
                variant.unit_pricing()
            }
            None => {
                take_stock(&mut self.stock_quantity, quantity)?;
                UnitPricing {
                    seller_unit_price: self.seller_price,
                    customer_unit_price: self.customer_price,
                    commission_unit_rate: self.commission_rate,
                    commission_unit_amount: self.commission_amount,
                }
            }
        };
        self.touch();
        Ok(pricing)
    }

    fn touch(&mut self) { self.updated_at = Utc::now(); }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProductError {
    #[error("{0}")]
    InvalidSellerPrice(#[from] SellerPriceError),
    #[error(transparent)]
    Pricing(#[from] CalculationError),
    #[error("product is {0:?}, only pending products can be reviewed")]
    NotPending(ProductStatus),
    #[error("product {0} is not available for purchase")]
    NotAvailable(String),
    #[error("variant {0} not found")]
    VariantNotFound(Uuid),
    #[error("insufficient stock: {available} available, {requested} requested")]
    InsufficientStock { available: u32, requested: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal { s.parse().unwrap() }

    fn new_product(price: &str, variants: &[&str]) -> NewProduct {
        NewProduct {
            seller_id: Uuid::now_v7(), category_id: Uuid::now_v7(), name: "Desk Lamp".into(), description: None,
            seller_price: dec(price), stock_quantity: 10,
            variants: variants.iter().map(|p| NewVariant { variant_name: Some("Black".into()), sku: None, seller_price: dec(p), stock_quantity: 3 }).collect(),
        }
    }

    #[test]
    fn test_create_prices_product_and_variants() {
        let p = Product::create(new_product("1000.00", &["249.99"]), dec("8"), Utc::now()).unwrap();
        assert_eq!(p.status, ProductStatus::Pending);
        assert_eq!(p.customer_price, dec("1080.00"));
        assert_eq!(p.variants[0].commission_amount, dec("20.00"));
        assert_eq!(p.variants[0].customer_price, dec("269.99"));
        assert_eq!(p.variants[0].product_id, p.id);
    }

    #[test]
    fn test_rejects_non_positive_price() {
        assert_eq!(Product::create(new_product("0", &[]), dec("8"), Utc::now()).unwrap_err(), ProductError::InvalidSellerPrice(SellerPriceError::NotPositive));
        assert_eq!(Product::create(new_product("10", &["-1"]), dec("8"), Utc::now()).unwrap_err(), ProductError::InvalidSellerPrice(SellerPriceError::NotPositive));
    }

    #[test]
    fn test_rejects_unstorable_price() {
        let err = Product::create(new_product("79228162514264337593543950335", &[]), dec("8"), Utc::now()).unwrap_err();
        assert_eq!(err, ProductError::InvalidSellerPrice(SellerPriceError::TooLarge));
        let err = Product::create(new_product("10.005", &[]), dec("8"), Utc::now()).unwrap_err();
        assert_eq!(err, ProductError::InvalidSellerPrice(SellerPriceError::FractionalCents));
        let mut p = Product::create(new_product("10", &[]), dec("8"), Utc::now()).unwrap();
        let too_big = ProductUpdate { seller_price: Some(dec("50000000")), ..Default::default() };
        assert_eq!(p.apply_update(too_big).unwrap_err(), ProductError::InvalidSellerPrice(SellerPriceError::TooLarge));
        assert_eq!(p.seller_price, dec("10"));
    }

    #[test]
    fn test_returned_prices_are_in_cents() {
        let p = Product::create(new_product("10", &["4.5"]), dec("12.5"), Utc::now()).unwrap();
        assert_eq!(p.seller_price.to_string(), "10.00");
        assert_eq!(p.customer_price, p.seller_price + p.commission_amount);
        assert_eq!(p.variants[0].seller_price.to_string(), "4.50");
        assert_eq!(p.variants[0].customer_price, p.variants[0].seller_price + p.variants[0].commission_amount);
    }

    #[test]
    fn test_update_flags_reprice() {
        let mut p = Product::create(new_product("10", &[]), dec("8"), Utc::now()).unwrap();
        assert!(!p.apply_update(ProductUpdate { name: Some("Floor Lamp".into()), ..Default::default() }).unwrap());
        assert!(!p.apply_update(ProductUpdate { seller_price: Some(dec("10.00")), ..Default::default() }).unwrap());
        assert!(p.apply_update(ProductUpdate { seller_price: Some(dec("20")), ..Default::default() }).unwrap());
        assert!(p.apply_update(ProductUpdate { category_id: Some(Uuid::now_v7()), ..Default::default() }).unwrap());
    }

    #[test]
    fn test_reprice_overwrites_variants() {
        let mut p = Product::create(new_product("100", &["50"]), dec("8"), Utc::now()).unwrap();
        p.reprice(dec("9")).unwrap();
        assert_eq!(p.customer_price, dec("109"));
        assert_eq!(p.variants[0].commission_rate, dec("8"));
        p.reprice_all(dec("10")).unwrap();
        assert_eq!(p.customer_price, dec("110"));
        assert_eq!(p.variants[0].commission_rate, dec("10"));
        assert_eq!(p.variants[0].customer_price, dec("55"));
    }

    #[test]
    fn test_reserve() {
        let mut p = Product::create(new_product("100", &["50"]), dec("8"), Utc::now()).unwrap();
        assert!(matches!(p.reserve(None, 1), Err(ProductError::NotAvailable(_))));
        p.review(ProductReview { status: ReviewDecision::Approved, admin_notes: None }).unwrap();
        let unit = p.reserve(None, 4).unwrap();
        assert_eq!(unit.customer_unit_price, dec("108"));
        assert_eq!(p.stock_quantity, 6);
        let vid = p.variants[0].id;
        assert_eq!(p.reserve(Some(vid), 5), Err(ProductError::InsufficientStock { available: 3, requested: 5 }));
        let unit = p.reserve(Some(vid), 3).unwrap();
        assert_eq!(unit.commission_unit_amount, dec("4"));
        assert_eq!(p.variants[0].stock_quantity, 0);
        let missing = Uuid::now_v7();
        assert_eq!(p.reserve(Some(missing), 1), Err(ProductError::VariantNotFound(missing)));
    }

    #[test]
    fn test_review() {
        let mut p = Product::create(new_product("100", &[]), dec("8"), Utc::now()).unwrap();
        p.review(ProductReview { status: ReviewDecision::Rejected, admin_notes: Some("blurry photos".into()) }).unwrap();
        assert_eq!(p.status, ProductStatus::Rejected);
        assert_eq!(p.admin_notes.as_deref(), Some("blurry photos"));
        assert!(matches!(p.reserve(None, 1), Err(ProductError::NotAvailable(_))));
        let again = ProductReview { status: ReviewDecision::Approved, admin_notes: None };
        assert_eq!(p.review(again).unwrap_err(), ProductError::NotPending(ProductStatus::Rejected));

        let mut p = Product::create(new_product("100", &[]), dec("8"), Utc::now()).unwrap();
        p.review(ProductReview { status: ReviewDecision::Approved, admin_notes: None }).unwrap();
        assert!(p.can_be_purchased());
        assert_eq!(p.reserve(None, 2).unwrap().seller_unit_price, dec("100"));
    }
}
