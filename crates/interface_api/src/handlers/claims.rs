//! Claims handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;

use core_kernel::{Actor, ClaimId};
use domain_claims::{NewClaim, NewMessage};

use crate::dto::claims::{ClaimResponse, TimelineEntryResponse, UpdateStatusRequest};
use crate::{error::ApiError, AppState};

/// Files a claim against one of the customer's registered products
pub async fn create_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<NewClaim>,
) -> Result<(StatusCode, Json<ClaimResponse>), ApiError> {
    let detail = state.claims.create_claim(&actor, request, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(detail.into())))
}

/// Lists claims filed by the customer, or against the business's products
pub async fn list_claims(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<ClaimResponse>>, ApiError> {
    let details = match actor {
        Actor::Customer { .. } => state.claims.customer_claims(&actor).await?,
        Actor::Business { .. } => state.claims.business_claims(&actor).await?,
    };
    Ok(Json(details.into_iter().map(Into::into).collect()))
}

/// Gets a claim by ID
pub async fn get_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<ClaimId>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let detail = state.claims.get_claim(&actor, id).await?;
    Ok(Json(detail.into()))
}

/// Moves a claim to a new status
pub async fn update_status(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<ClaimId>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let detail = state
        .claims
        .update_claim_status(&actor, id, request.status, Utc::now())
        .await?;
    Ok(Json(detail.into()))
}

/// Appends a message to the claim's timeline
pub async fn add_message(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<ClaimId>,
    Json(request): Json<NewMessage>,
) -> Result<(StatusCode, Json<TimelineEntryResponse>), ApiError> {
    let entry = state.claims.add_message(&actor, id, request, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(entry.into())))
}
