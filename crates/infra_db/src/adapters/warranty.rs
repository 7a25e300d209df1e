//! PostgreSQL Warranty Adapter
//!
//! Implements `WarrantyPort` over `ProductRepository` and
//! `RegistrationRepository`, translating rows to domain models and database
//! errors to port errors.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use infra_db::adapters::PostgresWarrantyAdapter;
//! use domain_warranty::WarrantyPort;
//!
//! let port: Arc<dyn WarrantyPort> = Arc::new(PostgresWarrantyAdapter::new(pool));
//! let product = port.get_product(product_id).await?;
//! ```

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use core_kernel::{
    BusinessId, CustomerId, DomainPort, HealthCheckResult, HealthCheckable,
    PortError, ProductId, RegistrationId,
};
use domain_warranty::{
    ExtensionPlan, Product, ProductCategory, ProductRegistration, WarrantyExtension, WarrantyPort,
};

use crate::adapters::db_to_port_error;
use crate::repositories::products::{ProductCategory as DbProductCategory, ProductRow};
use crate::repositories::registrations::{
    ExtensionPlan as DbExtensionPlan, ExtensionRow, RegistrationRow,
};
use crate::repositories::{ProductRepository, RegistrationRepository};

/// PostgreSQL-backed implementation of the WarrantyPort trait
#[derive(Debug, Clone)]
pub struct PostgresWarrantyAdapter {
    products: ProductRepository,
    registrations: RegistrationRepository,
    pool: PgPool,
}

impl PostgresWarrantyAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            products: ProductRepository::new(pool.clone()),
            registrations: RegistrationRepository::new(pool.clone()),
            pool,
        }
    }

    /// Direct access to the registration repository, e.g. for extension history
    pub fn registrations(&self) -> &RegistrationRepository {
        &self.registrations
    }
}

impl DomainPort for PostgresWarrantyAdapter {}

#[async_trait]
impl HealthCheckable for PostgresWarrantyAdapter {
    /// Runs `SELECT 1` against the pool
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, "postgres-warranty-adapter").await
    }
}

#[async_trait]
impl WarrantyPort for PostgresWarrantyAdapter {
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    async fn insert_product(&self, product: &Product) -> Result<(), PortError> {
        debug!("Inserting product");
        self.products
            .insert(&product_to_row(product)?)
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_product(&self, id: ProductId) -> Result<Product, PortError> {
        let row = self
            .products
            .get_by_id(id.into())
            .await
            .map_err(db_to_port_error)?;
        row_to_product(row)
    }

    #[instrument(skip(self), fields(business_id = %business_id))]
    async fn list_products(&self, business_id: BusinessId) -> Result<Vec<Product>, PortError> {
        self.products
            .find_by_business(business_id.into())
            .await
            .map_err(db_to_port_error)?
            .into_iter()
            .map(row_to_product)
            .collect()
    }

    #[instrument(skip(self))]
    async fn find_product_by_serial_prefix(&self, prefix: &str) -> Result<Option<Product>, PortError> {
        self.products
            .find_by_serial_prefix(prefix)
            .await
            .map_err(db_to_port_error)?
            .map(row_to_product)
            .transpose()
    }

    #[instrument(skip(self, registration), fields(registration_id = %registration.id))]
    async fn insert_registration(&self, registration: &ProductRegistration) -> Result<(), PortError> {
        debug!("Inserting registration");
        self.registrations
            .insert(&registration_to_row(registration))
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self), fields(registration_id = %id))]
    async fn get_registration(&self, id: RegistrationId) -> Result<ProductRegistration, PortError> {
        let row = self
            .registrations
            .get_by_id(id.into())
            .await
            .map_err(db_to_port_error)?;
        Ok(row_to_registration(row))
    }

    #[instrument(skip(self), fields(customer_id = %customer_id, product_id = %product_id))]
    async fn find_registration(
        &self,
        customer_id: CustomerId,
        product_id: ProductId,
    ) -> Result<Option<ProductRegistration>, PortError> {
        Ok(self
            .registrations
            .find_for_customer_product(customer_id.into(), product_id.into())
            .await
            .map_err(db_to_port_error)?
            .map(row_to_registration))
    }

    #[instrument(skip(self))]
    async fn find_registration_by_serial(
        &self,
        serial_number: &str,
    ) -> Result<Option<ProductRegistration>, PortError> {
        Ok(self
            .registrations
            .find_by_serial(serial_number)
            .await
            .map_err(db_to_port_error)?
            .map(row_to_registration))
    }

    #[instrument(skip(self), fields(customer_id = %customer_id))]
    async fn list_customer_registrations(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<ProductRegistration>, PortError> {
        Ok(self
            .registrations
            .find_by_customer(customer_id.into())
            .await
            .map_err(db_to_port_error)?
            .into_iter()
            .map(row_to_registration)
            .collect())
    }

    #[instrument(skip(self, product_ids), fields(count = product_ids.len()))]
    async fn list_product_registrations(
        &self,
        product_ids: &[ProductId],
    ) -> Result<Vec<ProductRegistration>, PortError> {
        let ids: Vec<Uuid> = product_ids.iter().map(|id| Uuid::from(*id)).collect();
        Ok(self
            .registrations
            .find_by_products(&ids)
            .await
            .map_err(db_to_port_error)?
            .into_iter()
            .map(row_to_registration)
            .collect())
    }

    #[instrument(skip(self, registration, extension), fields(registration_id = %registration.id, plan = %extension.plan))]
    async fn record_extension(
        &self,
        registration: &ProductRegistration,
        extension: &WarrantyExtension,
    ) -> Result<(), PortError> {
        debug!(new_expiry = %extension.new_expiry, "Recording extension");
        self.registrations
            .apply_extension(&extension_to_row(extension)?)
            .await
            .map_err(db_to_port_error)
    }
}

// =============================================================================
// Conversion Functions
// =============================================================================

fn product_to_row(product: &Product) -> Result<ProductRow, PortError> {
    let warranty_months = i32::try_from(product.warranty_months)
        .map_err(|_| PortError::transformation("warranty_months out of range"))?;

    Ok(ProductRow {
        product_id: product.id.into(),
        business_id: product.business_id.into(),
        name: product.name.clone(),
        description: product.description.clone(),
        category: match product.category {
            ProductCategory::Electronics => DbProductCategory::Electronics,
            ProductCategory::Appliances => DbProductCategory::Appliances,
            ProductCategory::Furniture => DbProductCategory::Furniture,
            ProductCategory::Automotive => DbProductCategory::Automotive,
            ProductCategory::Other => DbProductCategory::Other,
        },
        warranty_months,
        serial_format: product.serial_format.clone(),
        created_at: product.created_at,
        updated_at: product.updated_at,
    })
}

fn row_to_product(row: ProductRow) -> Result<Product, PortError> {
    let warranty_months = u32::try_from(row.warranty_months).map_err(|_| {
        PortError::transformation(format!(
            "product {} has negative warranty_months",
            row.product_id
        ))
    })?;

    Ok(Product {
        id: ProductId::from(row.product_id),
        business_id: BusinessId::from(row.business_id),
        name: row.name,
        description: row.description,
        category: match row.category {
            DbProductCategory::Electronics => ProductCategory::Electronics,
            DbProductCategory::Appliances => ProductCategory::Appliances,
            DbProductCategory::Furniture => ProductCategory::Furniture,
            DbProductCategory::Automotive => ProductCategory::Automotive,
            DbProductCategory::Other => ProductCategory::Other,
        },
        warranty_months,
        serial_format: row.serial_format,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn registration_to_row(registration: &ProductRegistration) -> RegistrationRow {
    RegistrationRow {
        registration_id: registration.id.into(),
        product_id: registration.product_id.into(),
        customer_id: registration.customer_id.into(),
        serial_number: registration.serial_number.clone(),
        purchase_date: registration.purchase_date,
        expiry_date: registration.expiry_date,
        retailer: registration.retailer.clone(),
        created_at: registration.created_at,
    }
}

fn row_to_registration(row: RegistrationRow) -> ProductRegistration {
    ProductRegistration {
        id: RegistrationId::from(row.registration_id),
        product_id: ProductId::from(row.product_id),
        customer_id: CustomerId::from(row.customer_id),
        serial_number: row.serial_number,
        purchase_date: row.purchase_date,
        expiry_date: row.expiry_date,
        retailer: row.retailer,
        created_at: row.created_at,
    }
}

fn extension_to_row(extension: &WarrantyExtension) -> Result<ExtensionRow, PortError> {
    let months = i32::try_from(extension.months)
        .map_err(|_| PortError::transformation("extension months out of range"))?;

    Ok(ExtensionRow {
        extension_id: extension.id.into(),
        registration_id: extension.registration_id.into(),
        plan: match extension.plan {
            ExtensionPlan::Basic => DbExtensionPlan::Basic,
            ExtensionPlan::Premium => DbExtensionPlan::Premium,
            ExtensionPlan::Ultimate => DbExtensionPlan::Ultimate,
        },
        months,
        price: extension.price.amount(),
        currency: extension.price.currency().code().to_string(),
        previous_expiry: extension.previous_expiry,
        new_expiry: extension.new_expiry,
        purchased_at: extension.purchased_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn test_product_row_round_trip() {
        let product = Product {
            id: ProductId::new(),
            business_id: BusinessId::new(),
            name: "Blender".to_string(),
            description: "High speed countertop blender".to_string(),
            category: ProductCategory::Appliances,
            warranty_months: 18,
            serial_format: "BLD-####".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let row = product_to_row(&product).unwrap();
        assert_eq!(row.category, DbProductCategory::Appliances);
        assert_eq!(row_to_product(row).unwrap(), product);
    }

    #[test]
    fn test_negative_months_is_transformation_error() {
        let row = ProductRow {
            product_id: Uuid::new_v4(),
            business_id: Uuid::new_v4(),
            name: "Broken".to_string(),
            description: "Row written by hand".to_string(),
            category: DbProductCategory::Other,
            warranty_months: -1,
            serial_format: "BRK-#".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(matches!(row_to_product(row), Err(PortError::Transformation { .. })));
    }

    #[test]
    fn test_registration_row_keeps_dates() {
        let registration = ProductRegistration {
            id: RegistrationId::new(),
            product_id: ProductId::new(),
            customer_id: CustomerId::new(),
            serial_number: "BLD-0001".to_string(),
            purchase_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            expiry_date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            retailer: Some("Kitchen Co".to_string()),
            created_at: Utc::now(),
        };
        assert_eq!(row_to_registration(registration_to_row(&registration)), registration);
    }
}
