//! Product catalog repository

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Product category enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "product_category", rename_all = "lowercase")]
pub enum ProductCategory {
    Electronics,
    Appliances,
    Furniture,
    Automotive,
    Other,
}

/// Database row for product
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub product_id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub description: String,
    pub category: ProductCategory,
    pub warranty_months: i32,
    pub serial_format: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const PRODUCT_COLUMNS: &str = "product_id, business_id, name, description, category, \
     warranty_months, serial_format, created_at, updated_at";

/// Repository for the product catalog
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a product
    pub async fn insert(&self, row: &ProductRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO products (
                product_id, business_id, name, description, category,
                warranty_months, serial_format, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(row.product_id)
        .bind(row.business_id)
        .bind(&row.name)
        .bind(&row.description)
        .bind(row.category)
        .bind(row.warranty_months)
        .bind(&row.serial_format)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Retrieves a product by its identifier
    pub async fn get_by_id(&self, product_id: Uuid) -> Result<ProductRow, DatabaseError> {
        let sql = format!("SELECT {} FROM products WHERE product_id = $1", PRODUCT_COLUMNS);
        sqlx::query_as::<_, ProductRow>(&sql)
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Product", product_id))
    }

    /// Lists a business's products, newest first
    pub async fn find_by_business(&self, business_id: Uuid) -> Result<Vec<ProductRow>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM products WHERE business_id = $1 ORDER BY created_at DESC, product_id DESC",
            PRODUCT_COLUMNS
        );
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(business_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Finds the oldest product whose serial format contains `prefix`
    pub async fn find_by_serial_prefix(&self, prefix: &str) -> Result<Option<ProductRow>, DatabaseError> {
        debug!(prefix, "Looking up product by serial prefix");
        let sql = format!(
            "SELECT {} FROM products WHERE strpos(serial_format, $1) > 0 \
             ORDER BY created_at, product_id LIMIT 1",
            PRODUCT_COLUMNS
        );
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(prefix)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}
