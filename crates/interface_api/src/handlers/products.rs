//! Product catalog handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;

use core_kernel::{Actor, ProductId};
use domain_warranty::NewProduct;

use crate::dto::warranty::ProductResponse;
use crate::{error::ApiError, AppState};

/// Adds a product to the acting business's catalog
pub async fn create_product(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<NewProduct>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let product = state.warranty.create_product(&actor, request, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

/// Lists the acting business's products
pub async fn list_products(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products = state.warranty.list_products(&actor).await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// Gets a product by ID
pub async fn get_product(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state.warranty.get_product(&actor, id).await?;
    Ok(Json(product.into()))
}
