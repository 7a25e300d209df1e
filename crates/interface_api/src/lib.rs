//! HTTP API Layer
//!
//! REST API for the warranty system using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for products, warranties and claims
//! - **Middleware**: Bearer authentication and audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent JSON error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(AppState::postgres(pool, config));
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod auth;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use core_kernel::HealthCheckable;
use domain_claims::{ClaimService, ClaimsPort};
use domain_warranty::{WarrantyPort, WarrantyService};
use infra_db::{DatabasePool, PostgresClaimsAdapter, PostgresWarrantyAdapter};

use crate::config::ApiConfig;
use crate::handlers::{claims, health, products, warranties};
use crate::middleware::{audit_middleware, auth_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub warranty: WarrantyService,
    pub claims: ClaimService,
    /// Storage adapters polled by the readiness check
    pub probes: Vec<Arc<dyn HealthCheckable>>,
    pub config: ApiConfig,
}

impl AppState {
    /// Wires both services over the given ports
    pub fn new<W, C>(warranty: Arc<W>, claims: Arc<C>, config: ApiConfig) -> Self
    where
        W: WarrantyPort,
        C: ClaimsPort,
    {
        let warranty_probe: Arc<dyn HealthCheckable> = warranty.clone();
        let claims_probe: Arc<dyn HealthCheckable> = claims.clone();
        Self {
            warranty: WarrantyService::new(warranty.clone()),
            claims: ClaimService::new(warranty, claims),
            probes: vec![warranty_probe, claims_probe],
            config,
        }
    }

    /// State backed by PostgreSQL
    pub fn postgres(pool: DatabasePool, config: ApiConfig) -> Self {
        Self::new(
            Arc::new(PostgresWarrantyAdapter::new(pool.clone())),
            Arc::new(PostgresClaimsAdapter::new(pool)),
            config,
        )
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let product_routes = Router::new()
        .route("/", post(products::create_product).get(products::list_products))
        .route("/:id", get(products::get_product));

    let registration_routes = Router::new()
        .route("/", post(warranties::register_product))
        .route("/:id/extensions", post(warranties::extend_warranty));

    let claims_routes = Router::new()
        .route("/", post(claims::create_claim).get(claims::list_claims))
        .route("/:id", get(claims::get_claim))
        .route("/:id/status", put(claims::update_status))
        .route("/:id/messages", post(claims::add_message));

    // Protected API routes; audit runs inside auth so it sees the actor
    let api_routes = Router::new()
        .nest("/products", product_routes)
        .nest("/registrations", registration_routes)
        .route("/warranties", get(warranties::list_warranties))
        .route("/extension-plans", get(warranties::list_plans))
        .nest("/claims", claims_routes)
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
