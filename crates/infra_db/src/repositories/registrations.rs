//! Product registration repository
//!
//! Registrations and the extension purchases that move their expiry date.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Extension plan enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "extension_plan", rename_all = "lowercase")]
pub enum ExtensionPlan {
    Basic,
    Premium,
    Ultimate,
}

/// Database row for product registration
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RegistrationRow {
    pub registration_id: Uuid,
    pub product_id: Uuid,
    pub customer_id: Uuid,
    pub serial_number: String,
    pub purchase_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub retailer: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Database row for warranty extension
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExtensionRow {
    pub extension_id: Uuid,
    pub registration_id: Uuid,
    pub plan: ExtensionPlan,
    pub months: i32,
    pub price: Decimal,
    pub currency: String,
    pub previous_expiry: NaiveDate,
    pub new_expiry: NaiveDate,
    pub purchased_at: DateTime<Utc>,
}

const REGISTRATION_COLUMNS: &str = "registration_id, product_id, customer_id, serial_number, \
     purchase_date, expiry_date, retailer, created_at";

/// Repository for registrations and extensions
#[derive(Debug, Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a registration.
    ///
    /// A taken serial number fails with `DatabaseError::DuplicateEntry` from
    /// the unique index.
    pub async fn insert(&self, row: &RegistrationRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO product_registrations (
                registration_id, product_id, customer_id, serial_number,
                purchase_date, expiry_date, retailer, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(row.registration_id)
        .bind(row.product_id)
        .bind(row.customer_id)
        .bind(&row.serial_number)
        .bind(row.purchase_date)
        .bind(row.expiry_date)
        .bind(&row.retailer)
        .bind(row.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_by_id(&self, registration_id: Uuid) -> Result<RegistrationRow, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM product_registrations WHERE registration_id = $1",
            REGISTRATION_COLUMNS
        );
        sqlx::query_as::<_, RegistrationRow>(&sql)
            .bind(registration_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("ProductRegistration", registration_id))
    }

    /// The customer's registration of a product with the latest expiry
    pub async fn find_for_customer_product(
        &self,
        customer_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<RegistrationRow>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM product_registrations \
             WHERE customer_id = $1 AND product_id = $2 \
             ORDER BY expiry_date DESC, created_at DESC LIMIT 1",
            REGISTRATION_COLUMNS
        );
        let row = sqlx::query_as::<_, RegistrationRow>(&sql)
            .bind(customer_id)
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn find_by_serial(&self, serial_number: &str) -> Result<Option<RegistrationRow>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM product_registrations WHERE serial_number = $1",
            REGISTRATION_COLUMNS
        );
        let row = sqlx::query_as::<_, RegistrationRow>(&sql)
            .bind(serial_number)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// A customer's registrations, newest first
    pub async fn find_by_customer(&self, customer_id: Uuid) -> Result<Vec<RegistrationRow>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM product_registrations WHERE customer_id = $1 \
             ORDER BY created_at DESC, registration_id DESC",
            REGISTRATION_COLUMNS
        );
        let rows = sqlx::query_as::<_, RegistrationRow>(&sql)
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Registrations of any of the given products, newest first
    pub async fn find_by_products(&self, product_ids: &[Uuid]) -> Result<Vec<RegistrationRow>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM product_registrations WHERE product_id = ANY($1) \
             ORDER BY created_at DESC, registration_id DESC",
            REGISTRATION_COLUMNS
        );
        let rows = sqlx::query_as::<_, RegistrationRow>(&sql)
            .bind(product_ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Moves the registration's expiry date and records the purchase in one
    /// transaction.
    ///
    /// The update is guarded on the previous expiry date; if another
    /// extension landed first nothing is written.
    pub async fn apply_extension(&self, extension: &ExtensionRow) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE product_registrations
            SET expiry_date = $1
            WHERE registration_id = $2 AND expiry_date = $3
            "#,
        )
        .bind(extension.new_expiry)
        .bind(extension.registration_id)
        .bind(extension.previous_expiry)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            debug!(registration_id = %extension.registration_id, "Extension guard matched no row");
            tx.rollback().await?;
            return Err(DatabaseError::StaleWrite(format!(
                "Registration {} expiry changed",
                extension.registration_id
            )));
        }

        sqlx::query(
            r#"
            INSERT INTO warranty_extensions (
                extension_id, registration_id, plan, months, price, currency,
                previous_expiry, new_expiry, purchased_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(extension.extension_id)
        .bind(extension.registration_id)
        .bind(extension.plan)
        .bind(extension.months)
        .bind(extension.price)
        .bind(&extension.currency)
        .bind(extension.previous_expiry)
        .bind(extension.new_expiry)
        .bind(extension.purchased_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Extension purchases for a registration, oldest first
    pub async fn find_extensions(&self, registration_id: Uuid) -> Result<Vec<ExtensionRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, ExtensionRow>(
            r#"
            SELECT extension_id, registration_id, plan, months, price, currency,
                   previous_expiry, new_expiry, purchased_at
            FROM warranty_extensions
            WHERE registration_id = $1
            ORDER BY purchased_at
            "#,
        )
        .bind(registration_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
