//! Domain events
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::aggregates::{CommissionScope, ProductStatus};

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "aggregate", content = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    Commission(CommissionEvent),
    Product(ProductEvent),
    Order(OrderEvent),
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommissionEvent {
    Created { setting_id: Uuid, scope: CommissionScope, entity_id: Option<Uuid>, rate: Decimal },
    Updated { setting_id: Uuid, rate: Decimal, is_active: bool },
    Deactivated { setting_id: Uuid },
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProductEvent {
    Repriced { product_id: Uuid, commission_rate: Decimal, customer_price: Decimal, variants: usize },
    Reviewed { product_id: Uuid, status: ProductStatus },
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderEvent {
    Placed { order_id: Uuid, customer_id: Uuid, total_customer_amount: Decimal, total_commission_amount: Decimal },
}

impl DomainEvent {
    /// NATS subject, `marketplace.<aggregate>.<event>`.
    pub fn subject(&self) -> String {
        let (aggregate, event) = match self {
            Self::Commission(CommissionEvent::Created { .. }) => ("commission", "created"),
            Self::Commission(CommissionEvent::Updated { .. }) => ("commission", "updated"),
            Self::Commission(CommissionEvent::Deactivated { .. }) => ("commission", "deactivated"),
            Self::Product(ProductEvent::Repriced { .. }) => ("product", "repriced"),
            Self::Product(ProductEvent::Reviewed { .. }) => ("product", "reviewed"),
            Self::Order(OrderEvent::Placed { .. }) => ("order", "placed"),
        };
        format!("marketplace.{aggregate}.{event}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_and_payload() {
        let id = Uuid::nil();
        let event = DomainEvent::Commission(CommissionEvent::Deactivated { setting_id: id });
        assert_eq!(event.subject(), "marketplace.commission.deactivated");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["aggregate"], "commission");
        assert_eq!(json["event"]["type"], "deactivated");

        let event = DomainEvent::Product(ProductEvent::Reviewed { product_id: id, status: ProductStatus::Approved });
        assert_eq!(event.subject(), "marketplace.product.reviewed");
        assert_eq!(serde_json::to_value(&event).unwrap()["event"]["status"], "approved");
    }
}
