//! Repository for `orders` and `order_items`.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::domain::aggregates::{LineItem, Order};

const ORDER_COLUMNS: &str = "id, order_number, customer_id, customer_email, status, total_customer_amount, \
    total_seller_amount, total_commission_amount, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, order_id, product_id, variant_id, product_name, quantity, seller_unit_price, \
    customer_unit_price, commission_unit_rate, commission_unit_amount, total_seller_amount, \
    total_customer_amount, total_commission_amount";

pub struct OrderRepo;

impl OrderRepo {
    pub async fn insert(conn: &mut PgConnection, o: &Order) -> Result<(), sqlx::Error> {
        let query = format!(
            "INSERT INTO orders ({ORDER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"
        );
        sqlx::query(&query)
            .bind(o.id)
            .bind(&o.order_number)
            .bind(o.customer_id)
            .bind(&o.customer_email)
            .bind(o.status)
            .bind(o.total_customer_amount)
            .bind(o.total_seller_amount)
            .bind(o.total_commission_amount)
            .bind(o.created_at)
            .bind(o.updated_at)
            .execute(&mut *conn)
            .await?;

        let query = format!(
            "INSERT INTO order_items ({ITEM_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)"
        );
        for i in &o.items {
            sqlx::query(&query)
                .bind(i.id)
                .bind(i.order_id)
                .bind(i.product_id)
                .bind(i.variant_id)
                .bind(&i.product_name)
                .bind(i.quantity)
                .bind(i.seller_unit_price)
                .bind(i.customer_unit_price)
                .bind(i.commission_unit_rate)
                .bind(i.commission_unit_amount)
                .bind(i.total_seller_amount)
                .bind(i.total_customer_amount)
                .bind(i.total_commission_amount)
                .execute(&mut *conn)
                .await?;
        }
        Ok(())
    }

    pub async fn find(pool: &PgPool, id: Uuid) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
        let Some(mut order) = sqlx::query_as::<_, Order>(&query).bind(id).fetch_optional(pool).await? else {
            return Ok(None);
        };
        let query = format!("SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id");
        order.items = sqlx::query_as::<_, LineItem>(&query).bind(id).fetch_all(pool).await?;
        Ok(Some(order))
    }
}
