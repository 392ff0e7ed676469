//! Repositories for `categories`, `products` and `product_variants`.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::domain::aggregates::{Category, Product, ProductVariant};

const CATEGORY_COLUMNS: &str = "id, parent_id, name, created_at";

const PRODUCT_COLUMNS: &str = "id, seller_id, category_id, name, description, seller_price, \
    commission_rate, commission_amount, customer_price, stock_quantity, status, admin_notes, created_at, updated_at";

const VARIANT_COLUMNS: &str = "id, product_id, variant_name, sku, seller_price, commission_rate, \
    commission_amount, customer_price, stock_quantity, is_active";

pub struct CategoryRepo;

impl CategoryRepo {
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query).bind(id).fetch_optional(pool).await
    }
}

pub struct ProductRepo;

impl ProductRepo {
    /// Insert a product together with its variants.
    pub async fn insert(conn: &mut PgConnection, p: &Product) -> Result<(), sqlx::Error> {
        let query = format!(
            "INSERT INTO products ({PRODUCT_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)"
        );
        sqlx::query(&query)
            .bind(p.id)
            .bind(p.seller_id)
            .bind(p.category_id)
            .bind(&p.name)
            .bind(&p.description)
            .bind(p.seller_price)
            .bind(p.commission_rate)
            .bind(p.commission_amount)
            .bind(p.customer_price)
            .bind(p.stock_quantity)
            .bind(p.status)
            .bind(&p.admin_notes)
            .bind(p.created_at)
            .bind(p.updated_at)
            .execute(&mut *conn)
            .await?;

        let query = format!(
            "INSERT INTO product_variants ({VARIANT_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"
        );
        for v in &p.variants {
            sqlx::query(&query)
                .bind(v.id)
                .bind(v.product_id)
                .bind(&v.variant_name)
                .bind(&v.sku)
                .bind(v.seller_price)
                .bind(v.commission_rate)
                .bind(v.commission_amount)
                .bind(v.customer_price)
                .bind(v.stock_quantity)
                .bind(v.is_active)
                .execute(&mut *conn)
                .await?;
        }
        Ok(())
    }

    /// Load a product and its variants. With `lock`, rows are locked until the
    /// surrounding transaction ends.
    pub async fn find(conn: &mut PgConnection, id: Uuid, lock: bool) -> Result<Option<Product>, sqlx::Error> {
        let suffix = if lock { " FOR UPDATE" } else { "" };
        let query = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1{suffix}");
        let Some(mut product) = sqlx::query_as::<_, Product>(&query).bind(id).fetch_optional(&mut *conn).await? else {
            return Ok(None);
        };
        let query = format!("SELECT {VARIANT_COLUMNS} FROM product_variants WHERE product_id = $1 ORDER BY id{suffix}");
        product.variants = sqlx::query_as::<_, ProductVariant>(&query).bind(id).fetch_all(&mut *conn).await?;
        Ok(Some(product))
    }

    /// Persist name, category, prices, stock and review state of the product
    /// and its variants.
    pub async fn save(conn: &mut PgConnection, p: &Product) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE products
             SET category_id = $2, name = $3, description = $4, seller_price = $5, commission_rate = $6,
                 commission_amount = $7, customer_price = $8, stock_quantity = $9, status = $10, admin_notes = $11,
                 updated_at = $12
             WHERE id = $1",
        )
        .bind(p.id)
        .bind(p.category_id)
        .bind(&p.name)
        .bind(&p.description)
        .bind(p.seller_price)
        .bind(p.commission_rate)
        .bind(p.commission_amount)
        .bind(p.customer_price)
        .bind(p.stock_quantity)
        .bind(p.status)
        .bind(&p.admin_notes)
        .bind(p.updated_at)
        .execute(&mut *conn)
        .await?;

        for v in &p.variants {
            sqlx::query(
                "UPDATE product_variants
                 SET seller_price = $2, commission_rate = $3, commission_amount = $4,
                     customer_price = $5, stock_quantity = $6
                 WHERE id = $1",
            )
            .bind(v.id)
            .bind(v.seller_price)
            .bind(v.commission_rate)
            .bind(v.commission_amount)
            .bind(v.customer_price)
            .bind(v.stock_quantity)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }
}
