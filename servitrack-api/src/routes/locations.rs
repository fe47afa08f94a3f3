/// Location endpoints
///
/// # Endpoints
///
/// - `GET    /v1/locations`     - List locations
/// - `POST   /v1/locations`     - Create a location
/// - `GET    /v1/locations/:id` - Fetch one location
/// - `PUT    /v1/locations/:id` - Rename a location
/// - `DELETE /v1/locations/:id` - Delete (409 while referenced by a ticket)
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use validator::Validate;

use servitrack_shared::models::location::Location;
use servitrack_shared::models::DeleteOutcome;

use crate::{
    app::AppState,
    error::{validation_errors, ApiError, ApiResult},
};

use super::tickets::DeleteResponse;

/// Create/rename location request
#[derive(Debug, Deserialize, Validate)]
pub struct LocationRequest {
    /// Location name (unique)
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

/// List all locations
pub async fn list_locations(State(state): State<AppState>) -> ApiResult<Json<Vec<Location>>> {
    let locations = Location::list(&state.db).await?;
    Ok(Json(locations))
}

/// Create a location
///
/// # Errors
///
/// - `409 Conflict`: name already in use
pub async fn create_location(
    State(state): State<AppState>,
    Json(req): Json<LocationRequest>,
) -> ApiResult<Json<Location>> {
    req.validate().map_err(validation_errors)?;

    let location = Location::create(&state.db, &req.name).await?;
    Ok(Json(location))
}

/// Fetch one location
pub async fn get_location(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Location>> {
    let location = Location::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Location not found".to_string()))?;
    Ok(Json(location))
}

/// Rename a location
pub async fn update_location(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<LocationRequest>,
) -> ApiResult<Json<Location>> {
    req.validate().map_err(validation_errors)?;

    let location = Location::update(&state.db, id, &req.name)
        .await?
        .ok_or_else(|| ApiError::NotFound("Location not found".to_string()))?;
    Ok(Json(location))
}

/// Delete a location
///
/// # Errors
///
/// - `409 Conflict`: at least one ticket still references the location
pub async fn delete_location(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeleteResponse>> {
    match Location::delete(&state.db, id).await? {
        DeleteOutcome::Deleted => Ok(Json(DeleteResponse { deleted: true })),
        DeleteOutcome::NotFound => Err(ApiError::NotFound("Location not found".to_string())),
        DeleteOutcome::InUse => Err(ApiError::Conflict(
            "Location is referenced by existing tickets".to_string(),
        )),
    }
}
