//! Warranty application service
//!
//! Thin orchestration over `WarrantyPort`: authorization by actor role and
//! ownership, input validation, and the status resolver applied to every
//! listing.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use core_kernel::{Actor, BusinessId, CustomerId, PortError, ProductId, RegistrationId};

use crate::error::WarrantyError;
use crate::extension::{ExtensionPlan, WarrantyExtension};
use crate::ports::WarrantyPort;
use crate::product::{serial_prefix, NewProduct, Product};
use crate::registration::{NewRegistration, ProductRegistration};
use crate::view::{RegistrationView, WarrantyListing};

/// Result of a successful extension purchase
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ExtensionReceipt {
    pub extension: WarrantyExtension,
    pub warranty: RegistrationView,
}

/// Service for products, registrations and extensions
#[derive(Clone)]
pub struct WarrantyService {
    port: Arc<dyn WarrantyPort>,
}

impl WarrantyService {
    pub fn new(port: Arc<dyn WarrantyPort>) -> Self {
        Self { port }
    }

    fn require_business(actor: &Actor) -> Result<BusinessId, WarrantyError> {
        actor.business_id().ok_or_else(|| {
            warn!(user_id = %actor.user_id(), "business operation attempted by non-business actor");
            WarrantyError::Unauthorized
        })
    }

    fn require_customer(actor: &Actor) -> Result<CustomerId, WarrantyError> {
        actor.customer_id().ok_or_else(|| {
            warn!(user_id = %actor.user_id(), "customer operation attempted by non-customer actor");
            WarrantyError::Unauthorized
        })
    }

    // ========================================================================
    // Products
    // ========================================================================

    /// Adds a product to the acting business's catalog
    #[instrument(skip(self, input), fields(user_id = %actor.user_id()))]
    pub async fn create_product(
        &self,
        actor: &Actor,
        input: NewProduct,
        now: DateTime<Utc>,
    ) -> Result<Product, WarrantyError> {
        let business_id = Self::require_business(actor)?;
        let product = Product::create(business_id, input, now)?;

        self.port.insert_product(&product).await?;
        info!(product_id = %product.id, %business_id, "product created");

        Ok(product)
    }

    /// Lists the acting business's products, newest first
    #[instrument(skip(self), fields(user_id = %actor.user_id()))]
    pub async fn list_products(&self, actor: &Actor) -> Result<Vec<Product>, WarrantyError> {
        let business_id = Self::require_business(actor)?;
        Ok(self.port.list_products(business_id).await?)
    }

    /// Retrieves a product.
    ///
    /// Businesses only see their own products; customers may view any.
    #[instrument(skip(self), fields(user_id = %actor.user_id(), product_id = %id))]
    pub async fn get_product(&self, actor: &Actor, id: ProductId) -> Result<Product, WarrantyError> {
        let product = self.load_product(id).await?;

        if let Some(business_id) = actor.business_id() {
            if !product.is_owned_by(business_id) {
                warn!(%business_id, "product access by non-owning business");
                return Err(WarrantyError::Unauthorized);
            }
        }

        Ok(product)
    }

    async fn load_product(&self, id: ProductId) -> Result<Product, WarrantyError> {
        self.port.get_product(id).await.map_err(|e| match e {
            PortError::NotFound { id, .. } => WarrantyError::ProductNotFound(id),
            other => WarrantyError::Port(other),
        })
    }

    // ========================================================================
    // Registrations
    // ========================================================================

    /// Registers a purchased unit to the acting customer.
    ///
    /// The product is found through the serial number's prefix; the expiry
    /// date is derived from the purchase date and the product's term.
    #[instrument(skip(self, input), fields(user_id = %actor.user_id(), serial = %input.serial_number))]
    pub async fn register_product(
        &self,
        actor: &Actor,
        input: NewRegistration,
        now: DateTime<Utc>,
    ) -> Result<RegistrationView, WarrantyError> {
        let customer_id = Self::require_customer(actor)?;
        let input = input.trimmed();
        input.check(now.date_naive())?;

        let serial_number = input.serial_number.as_str();
        let prefix = serial_prefix(serial_number);
        if prefix.is_empty() {
            return Err(WarrantyError::SerialNotRecognized);
        }
        let product = self
            .port
            .find_product_by_serial_prefix(prefix)
            .await?
            .filter(|p| p.matches_serial(serial_number))
            .ok_or(WarrantyError::SerialNotRecognized)?;

        if self
            .port
            .find_registration_by_serial(serial_number)
            .await?
            .is_some()
        {
            return Err(WarrantyError::DuplicateSerial);
        }

        let registration = ProductRegistration::register(&product, customer_id, input, now)?;
        self.port
            .insert_registration(&registration)
            .await
            .map_err(|e| match e {
                PortError::Conflict { .. } => WarrantyError::DuplicateSerial,
                other => WarrantyError::Port(other),
            })?;

        info!(
            registration_id = %registration.id,
            product_id = %product.id,
            expiry_date = %registration.expiry_date,
            "product registered"
        );

        Ok(RegistrationView::new(registration, product, now))
    }

    /// The acting customer's registrations with resolved standing
    #[instrument(skip(self), fields(user_id = %actor.user_id()))]
    pub async fn customer_warranties(
        &self,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Result<WarrantyListing, WarrantyError> {
        let customer_id = Self::require_customer(actor)?;
        let registrations = self.port.list_customer_registrations(customer_id).await?;

        let mut products: HashMap<ProductId, Product> = HashMap::new();
        let mut views = Vec::with_capacity(registrations.len());
        for registration in registrations {
            let product = match products.get(&registration.product_id) {
                Some(product) => product.clone(),
                None => {
                    let product = self.load_product(registration.product_id).await?;
                    products.insert(product.id, product.clone());
                    product
                }
            };
            views.push(RegistrationView::new(registration, product, now));
        }

        Ok(views.into())
    }

    /// Registrations of the acting business's products with resolved standing
    #[instrument(skip(self), fields(user_id = %actor.user_id()))]
    pub async fn business_warranties(
        &self,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Result<WarrantyListing, WarrantyError> {
        let business_id = Self::require_business(actor)?;
        let products: HashMap<ProductId, Product> = self
            .port
            .list_products(business_id)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        if products.is_empty() {
            return Ok(WarrantyListing::from(Vec::new()));
        }

        let ids: Vec<ProductId> = products.keys().copied().collect();
        let views = self
            .port
            .list_product_registrations(&ids)
            .await?
            .into_iter()
            .filter_map(|registration| {
                let product = products.get(&registration.product_id)?.clone();
                Some(RegistrationView::new(registration, product, now))
            })
            .collect::<Vec<_>>();

        Ok(views.into())
    }

    // ========================================================================
    // Extensions
    // ========================================================================

    /// Buys an extension plan for one of the acting customer's registrations
    #[instrument(skip(self), fields(user_id = %actor.user_id(), registration_id = %registration_id, plan = %plan))]
    pub async fn extend_warranty(
        &self,
        actor: &Actor,
        registration_id: RegistrationId,
        plan: ExtensionPlan,
        now: DateTime<Utc>,
    ) -> Result<ExtensionReceipt, WarrantyError> {
        let customer_id = Self::require_customer(actor)?;

        let mut registration = self
            .port
            .get_registration(registration_id)
            .await
            .map_err(|e| match e {
                PortError::NotFound { id, .. } => WarrantyError::RegistrationNotFound(id),
                other => WarrantyError::Port(other),
            })?;
        if !registration.is_owned_by(customer_id) {
            warn!(%customer_id, "extension attempted on another customer's registration");
            return Err(WarrantyError::Unauthorized);
        }

        let extension = WarrantyExtension::apply(&mut registration, plan, now)?;
        self.port.record_extension(&registration, &extension).await?;
        let product = self.load_product(registration.product_id).await?;

        info!(
            extension_id = %extension.id,
            new_expiry = %extension.new_expiry,
            price = %extension.price,
            "warranty extended"
        );

        Ok(ExtensionReceipt {
            extension,
            warranty: RegistrationView::new(registration, product, now),
        })
    }
}
