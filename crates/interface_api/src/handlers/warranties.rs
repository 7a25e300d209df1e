//! Registration, warranty listing and extension handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;

use core_kernel::{Actor, RegistrationId};
use domain_warranty::{ExtensionPlan, NewRegistration};

use crate::dto::warranty::{
    ExtendWarrantyRequest, ExtensionResponse, PlanResponse, WarrantyListResponse, WarrantyResponse,
};
use crate::{error::ApiError, AppState};

/// Registers a purchased product to the acting customer
pub async fn register_product(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<NewRegistration>,
) -> Result<(StatusCode, Json<WarrantyResponse>), ApiError> {
    let view = state.warranty.register_product(&actor, request, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(view.into())))
}

/// Lists warranties visible to the actor.
///
/// Customers see their own registrations, businesses see registrations of
/// their products.
pub async fn list_warranties(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<WarrantyListResponse>, ApiError> {
    let now = Utc::now();
    let listing = match actor {
        Actor::Customer { .. } => state.warranty.customer_warranties(&actor, now).await?,
        Actor::Business { .. } => state.warranty.business_warranties(&actor, now).await?,
    };
    Ok(Json(listing.into()))
}

/// The extension plans on offer
pub async fn list_plans() -> Json<Vec<PlanResponse>> {
    Json(ExtensionPlan::ALL.into_iter().map(Into::into).collect())
}

/// Buys an extension plan for a registration
pub async fn extend_warranty(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<RegistrationId>,
    Json(request): Json<ExtendWarrantyRequest>,
) -> Result<(StatusCode, Json<ExtensionResponse>), ApiError> {
    let receipt = state
        .warranty
        .extend_warranty(&actor, id, request.plan, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(receipt.into())))
}
