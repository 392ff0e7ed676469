//! Aggregates module
pub mod category;
pub mod commission_setting;
pub mod product;
pub mod order;

pub use category::Category;
pub use commission_setting::{CommissionScope, CommissionSetting, CommissionSettingError, CommissionSettingUpdate, NewCommissionSetting};
pub use product::{
    NewProduct, NewVariant, Product, ProductError, ProductReview, ProductStatus, ProductUpdate, ProductVariant, ReviewDecision, UnitPricing,
};
pub use order::{LineItem, Order, OrderError, OrderStatus};
