//! Admin product CRUD handlers.
//!
//! Every handler requires the administrator claim via [`RequireAdmin`]; the
//! catalog service itself performs no authorization checks.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use debandi_core::ProductId;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::product::{NewProduct, UpdateProduct};
use crate::state::AppState;

/// Full catalog listing for the admin panel.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_claims): RequireAdmin,
) -> Result<Json<serde_json::Value>> {
    let products = state.catalog().list()?;
    Ok(Json(json!({ "products": products })))
}

/// Create a product. Returns 201 with the stored record.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(claims): RequireAdmin,
    payload: std::result::Result<Json<NewProduct>, JsonRejection>,
) -> Result<Response> {
    let Json(data) = payload.map_err(bad_json)?;

    let product = state.catalog().create(data)?;
    tracing::info!(user_id = claims.user_id, product_id = %product.id, "admin created product");

    Ok((StatusCode::CREATED, Json(json!({ "product": product }))).into_response())
}

/// Apply a partial update to a product.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(claims): RequireAdmin,
    Path(id): Path<i32>,
    payload: std::result::Result<Json<UpdateProduct>, JsonRejection>,
) -> Result<Json<serde_json::Value>> {
    let Json(patch) = payload.map_err(bad_json)?;

    let product = state.catalog().update(ProductId::new(id), patch)?;
    tracing::info!(user_id = claims.user_id, product_id = %product.id, "admin updated product");

    Ok(Json(json!({ "product": product })))
}

/// Delete a product.
pub async fn destroy(
    State(state): State<AppState>,
    RequireAdmin(claims): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>> {
    state.catalog().delete(ProductId::new(id))?;
    tracing::info!(user_id = claims.user_id, product_id = id, "admin deleted product");

    Ok(Json(json!({ "message": "Product deleted" })))
}

fn bad_json(rejection: JsonRejection) -> AppError {
    AppError::Validation(rejection.body_text())
}
