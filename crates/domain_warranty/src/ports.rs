//! Warranty Domain Ports
//!
//! `WarrantyPort` is everything the warranty and claims services need from
//! storage for products and registrations. The PostgreSQL adapter lives in
//! `infra_db`; an in-memory implementation is available behind the `mock`
//! feature for tests and demos.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use domain_warranty::{WarrantyPort, WarrantyService};
//!
//! let port: Arc<dyn WarrantyPort> = Arc::new(PostgresWarrantyAdapter::new(pool));
//! let service = WarrantyService::new(port);
//! ```

use async_trait::async_trait;

use core_kernel::{
    BusinessId, CustomerId, DomainPort, HealthCheckable, PortError, ProductId, RegistrationId,
};

use crate::extension::WarrantyExtension;
use crate::product::Product;
use crate::registration::ProductRegistration;

/// Storage operations for products and registrations
///
/// List operations return newest records first.
#[async_trait]
pub trait WarrantyPort: DomainPort + HealthCheckable {
    // ========================================================================
    // Products
    // ========================================================================

    /// Stores a new product
    async fn insert_product(&self, product: &Product) -> Result<(), PortError>;

    /// Retrieves a product by ID, or `PortError::NotFound`
    async fn get_product(&self, id: ProductId) -> Result<Product, PortError>;

    /// Lists the products of one business
    async fn list_products(&self, business_id: BusinessId) -> Result<Vec<Product>, PortError>;

    /// Finds the first product whose serial format contains `prefix`
    async fn find_product_by_serial_prefix(&self, prefix: &str) -> Result<Option<Product>, PortError>;

    // ========================================================================
    // Registrations
    // ========================================================================

    /// Stores a new registration; a taken serial number yields `PortError::Conflict`
    async fn insert_registration(&self, registration: &ProductRegistration) -> Result<(), PortError>;

    /// Retrieves a registration by ID, or `PortError::NotFound`
    async fn get_registration(&self, id: RegistrationId) -> Result<ProductRegistration, PortError>;

    /// Finds the customer's registration of a product.
    ///
    /// When the customer registered several units of the same product the one
    /// with the latest expiry date is returned.
    async fn find_registration(
        &self,
        customer_id: CustomerId,
        product_id: ProductId,
    ) -> Result<Option<ProductRegistration>, PortError>;

    /// Finds a registration by serial number
    async fn find_registration_by_serial(
        &self,
        serial_number: &str,
    ) -> Result<Option<ProductRegistration>, PortError>;

    /// Lists a customer's registrations
    async fn list_customer_registrations(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<ProductRegistration>, PortError>;

    /// Lists registrations of any of the given products
    async fn list_product_registrations(
        &self,
        product_ids: &[ProductId],
    ) -> Result<Vec<ProductRegistration>, PortError>;

    /// Atomically stores the new expiry date and the extension purchase
    async fn record_extension(
        &self,
        registration: &ProductRegistration,
        extension: &WarrantyExtension,
    ) -> Result<(), PortError>;
}

/// Mock implementation of WarrantyPort for testing
///
/// Stores everything in memory; useful for unit tests and local demos without
/// a database.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::{AdapterHealth, ExtensionId, HealthCheckResult};

    #[derive(Debug, Default)]
    struct Store {
        products: HashMap<ProductId, Product>,
        registrations: HashMap<RegistrationId, ProductRegistration>,
        extensions: HashMap<ExtensionId, WarrantyExtension>,
    }

    /// In-memory mock implementation of WarrantyPort
    #[derive(Debug, Default, Clone)]
    pub struct MockWarrantyPort {
        store: Arc<RwLock<Store>>,
    }

    impl MockWarrantyPort {
        /// Creates a new empty mock port
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with products
        pub async fn with_products(products: Vec<Product>) -> Self {
            let port = Self::new();
            {
                let mut store = port.store.write().await;
                for product in products {
                    store.products.insert(product.id, product);
                }
            }
            port
        }

        /// Inserts a registration directly, bypassing the uniqueness check
        pub async fn seed_registration(&self, registration: ProductRegistration) {
            self.store
                .write()
                .await
                .registrations
                .insert(registration.id, registration);
        }

        /// Extensions recorded for a registration
        pub async fn extensions_for(&self, registration_id: RegistrationId) -> Vec<WarrantyExtension> {
            self.store
                .read()
                .await
                .extensions
                .values()
                .filter(|e| e.registration_id == registration_id)
                .cloned()
                .collect()
        }
    }

    fn newest_first<T, K: Ord>(mut items: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
        items.sort_by(|a, b| key(b).cmp(&key(a)));
        items
    }

    impl DomainPort for MockWarrantyPort {}

    #[async_trait]
    impl HealthCheckable for MockWarrantyPort {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "mock-warranty-port".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("Mock adapter always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl WarrantyPort for MockWarrantyPort {
        async fn insert_product(&self, product: &Product) -> Result<(), PortError> {
            let mut store = self.store.write().await;
            if store.products.contains_key(&product.id) {
                return Err(PortError::conflict(format!("Product {} already exists", product.id)));
            }
            store.products.insert(product.id, product.clone());
            Ok(())
        }

        async fn get_product(&self, id: ProductId) -> Result<Product, PortError> {
            self.store
                .read()
                .await
                .products
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Product", id))
        }

        async fn list_products(&self, business_id: BusinessId) -> Result<Vec<Product>, PortError> {
            let store = self.store.read().await;
            let products = store
                .products
                .values()
                .filter(|p| p.business_id == business_id)
                .cloned()
                .collect();
            Ok(newest_first(products, |p: &Product| (p.created_at, p.id)))
        }

        async fn find_product_by_serial_prefix(&self, prefix: &str) -> Result<Option<Product>, PortError> {
            let store = self.store.read().await;
            let mut candidates: Vec<&Product> = store
                .products
                .values()
                .filter(|p| p.serial_format.contains(prefix))
                .collect();
            candidates.sort_by_key(|p| (p.created_at, p.id));
            Ok(candidates.first().map(|p| (*p).clone()))
        }

        async fn insert_registration(&self, registration: &ProductRegistration) -> Result<(), PortError> {
            let mut store = self.store.write().await;
            if store
                .registrations
                .values()
                .any(|r| r.serial_number == registration.serial_number)
            {
                return Err(PortError::conflict(format!(
                    "Serial number {} already registered",
                    registration.serial_number
                )));
            }
            store.registrations.insert(registration.id, registration.clone());
            Ok(())
        }

        async fn get_registration(&self, id: RegistrationId) -> Result<ProductRegistration, PortError> {
            self.store
                .read()
                .await
                .registrations
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("ProductRegistration", id))
        }

        async fn find_registration(
            &self,
            customer_id: CustomerId,
            product_id: ProductId,
        ) -> Result<Option<ProductRegistration>, PortError> {
            let store = self.store.read().await;
            Ok(store
                .registrations
                .values()
                .filter(|r| r.customer_id == customer_id && r.product_id == product_id)
                .max_by_key(|r| (r.expiry_date, r.created_at))
                .cloned())
        }

        async fn find_registration_by_serial(
            &self,
            serial_number: &str,
        ) -> Result<Option<ProductRegistration>, PortError> {
            let store = self.store.read().await;
            Ok(store
                .registrations
                .values()
                .find(|r| r.serial_number == serial_number)
                .cloned())
        }

        async fn list_customer_registrations(
            &self,
            customer_id: CustomerId,
        ) -> Result<Vec<ProductRegistration>, PortError> {
            let store = self.store.read().await;
            let registrations = store
                .registrations
                .values()
                .filter(|r| r.customer_id == customer_id)
                .cloned()
                .collect();
            Ok(newest_first(registrations, |r: &ProductRegistration| (r.created_at, r.id)))
        }

        async fn list_product_registrations(
            &self,
            product_ids: &[ProductId],
        ) -> Result<Vec<ProductRegistration>, PortError> {
            let store = self.store.read().await;
            let registrations = store
                .registrations
                .values()
                .filter(|r| product_ids.contains(&r.product_id))
                .cloned()
                .collect();
            Ok(newest_first(registrations, |r: &ProductRegistration| (r.created_at, r.id)))
        }

        async fn record_extension(
            &self,
            registration: &ProductRegistration,
            extension: &WarrantyExtension,
        ) -> Result<(), PortError> {
            let mut store = self.store.write().await;
            let stored = store
                .registrations
                .get_mut(&registration.id)
                .ok_or_else(|| PortError::not_found("ProductRegistration", registration.id))?;
            if stored.expiry_date != extension.previous_expiry {
                return Err(PortError::conflict("Registration expiry changed concurrently"));
            }
            stored.expiry_date = extension.new_expiry;
            store.extensions.insert(extension.id, extension.clone());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockWarrantyPort;
    use super::*;
    use chrono::{Duration, NaiveDate, Utc};

    use crate::product::{NewProduct, ProductCategory};
    use crate::registration::NewRegistration;

    fn product(business_id: BusinessId, serial_format: &str) -> Product {
        Product::create(
            business_id,
            NewProduct {
                name: "Soundbar".to_string(),
                description: "Wireless soundbar with subwoofer".to_string(),
                category: ProductCategory::Electronics,
                warranty_months: 12,
                serial_format: serial_format.to_string(),
            },
            Utc::now(),
        )
        .unwrap()
    }

    fn registration(product: &Product, customer_id: CustomerId, serial: &str) -> ProductRegistration {
        ProductRegistration::register(
            product,
            customer_id,
            NewRegistration {
                serial_number: serial.to_string(),
                purchase_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                retailer: None,
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_mock_port_product_round_trip() {
        let port = MockWarrantyPort::new();
        let business_id = BusinessId::new();
        let p = product(business_id, "SBR-####");

        port.insert_product(&p).await.unwrap();

        assert_eq!(port.get_product(p.id).await.unwrap(), p);
        assert_eq!(port.list_products(business_id).await.unwrap().len(), 1);
        assert!(port.list_products(BusinessId::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mock_port_not_found() {
        let port = MockWarrantyPort::new();
        let result = port.get_product(ProductId::new()).await;
        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_mock_port_duplicate_serial_conflicts() {
        let p = product(BusinessId::new(), "SBR-####");
        let port = MockWarrantyPort::with_products(vec![p.clone()]).await;

        port.insert_registration(&registration(&p, CustomerId::new(), "SBR-0001"))
            .await
            .unwrap();
        let result = port
            .insert_registration(&registration(&p, CustomerId::new(), "SBR-0001"))
            .await;

        assert!(result.unwrap_err().is_conflict());
    }

    #[tokio::test]
    async fn test_mock_port_find_registration_prefers_latest_expiry() {
        let p = product(BusinessId::new(), "SBR-####");
        let port = MockWarrantyPort::with_products(vec![p.clone()]).await;
        let customer_id = CustomerId::new();

        let older = registration(&p, customer_id, "SBR-0001");
        let mut newer = registration(&p, customer_id, "SBR-0002");
        newer.expiry_date = older.expiry_date + Duration::days(90);
        port.seed_registration(older).await;
        port.seed_registration(newer.clone()).await;

        let found = port.find_registration(customer_id, p.id).await.unwrap();
        assert_eq!(found.map(|r| r.id), Some(newer.id));
    }
}
