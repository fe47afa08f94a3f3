/// Provider endpoints
///
/// # Endpoints
///
/// - `GET    /v1/providers`     - List providers
/// - `POST   /v1/providers`     - Create a provider
/// - `GET    /v1/providers/:id` - Fetch one provider
/// - `PUT    /v1/providers/:id` - Rename a provider
/// - `DELETE /v1/providers/:id` - Delete (409 while referenced by a ticket)
///
/// Any authenticated user may manage providers; only deletion is guarded, by
/// the reference check in the store.
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use validator::Validate;

use servitrack_shared::models::provider::Provider;
use servitrack_shared::models::DeleteOutcome;

use crate::{
    app::AppState,
    error::{validation_errors, ApiError, ApiResult},
};

use super::tickets::DeleteResponse;

/// Create/rename provider request
#[derive(Debug, Deserialize, Validate)]
pub struct ProviderRequest {
    /// Provider name (unique)
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

/// List all providers
pub async fn list_providers(State(state): State<AppState>) -> ApiResult<Json<Vec<Provider>>> {
    let providers = Provider::list(&state.db).await?;
    Ok(Json(providers))
}

/// Create a provider
///
/// # Errors
///
/// - `409 Conflict`: name already in use
pub async fn create_provider(
    State(state): State<AppState>,
    Json(req): Json<ProviderRequest>,
) -> ApiResult<Json<Provider>> {
    req.validate().map_err(validation_errors)?;

    let provider = Provider::create(&state.db, &req.name).await?;
    Ok(Json(provider))
}

/// Fetch one provider
pub async fn get_provider(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Provider>> {
    let provider = Provider::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Provider not found".to_string()))?;
    Ok(Json(provider))
}

/// Rename a provider
pub async fn update_provider(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<ProviderRequest>,
) -> ApiResult<Json<Provider>> {
    req.validate().map_err(validation_errors)?;

    let provider = Provider::update(&state.db, id, &req.name)
        .await?
        .ok_or_else(|| ApiError::NotFound("Provider not found".to_string()))?;
    Ok(Json(provider))
}

/// Delete a provider
///
/// # Errors
///
/// - `409 Conflict`: at least one ticket still references the provider
pub async fn delete_provider(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeleteResponse>> {
    match Provider::delete(&state.db, id).await? {
        DeleteOutcome::Deleted => Ok(Json(DeleteResponse { deleted: true })),
        DeleteOutcome::NotFound => Err(ApiError::NotFound("Provider not found".to_string())),
        DeleteOutcome::InUse => Err(ApiError::Conflict(
            "Provider is referenced by existing tickets".to_string(),
        )),
    }
}
