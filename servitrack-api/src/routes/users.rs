/// User administration endpoints
///
/// # Endpoints
///
/// - `GET    /v1/users`     - List users
/// - `POST   /v1/users`     - Create a user
/// - `GET    /v1/users/:id` - Fetch one user
/// - `PUT    /v1/users/:id` - Update a user
/// - `DELETE /v1/users/:id` - Delete a user
///
/// Every handler here is admin-only, and the admin check runs against the
/// actor the middleware loaded from the database, never against a role the
/// client asserts. Plaintext passwords are hashed in this layer; the store
/// only ever sees Argon2id hashes, and only [`UserPublic`] is serialized
/// back out.
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use validator::Validate;

use servitrack_shared::auth::authorization::{self, Actor};
use servitrack_shared::auth::password::hash_password;
use servitrack_shared::models::user::{CreateUser, UpdateUser, User, UserPublic};

use crate::{
    app::AppState,
    error::{validation_errors, ApiError, ApiResult},
};

use super::tickets::DeleteResponse;

/// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Email address
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// Plaintext password, hashed before storage
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Role flag
    #[serde(default)]
    pub is_admin: bool,
}

/// Update user request; only present fields are written
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
    pub is_admin: Option<bool>,
}

/// List all users
pub async fn list_users(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<UserPublic>>> {
    authorization::require_admin(&actor)?;

    let users = User::list(&state.db).await?;
    Ok(Json(users.iter().map(UserPublic::from).collect()))
}

/// Create a user
///
/// # Errors
///
/// - `403 Forbidden`: actor is not an admin
/// - `409 Conflict`: email already registered
/// - `422`: malformed email or short password
pub async fn create_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<Json<UserPublic>> {
    authorization::require_admin(&actor)?;
    req.validate().map_err(validation_errors)?;

    let password_hash = hash_password(&req.password)?;
    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email,
            name: req.name,
            password_hash,
            is_admin: req.is_admin,
        },
    )
    .await?;

    Ok(Json(UserPublic::from(user)))
}

/// Fetch one user
pub async fn get_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
) -> ApiResult<Json<UserPublic>> {
    authorization::require_admin(&actor)?;

    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    Ok(Json(UserPublic::from(user)))
}

/// Partially update a user
///
/// Changing the email does not rewrite the `user_email` snapshot on existing
/// tickets.
pub async fn update_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserPublic>> {
    authorization::require_admin(&actor)?;
    req.validate().map_err(validation_errors)?;

    let password_hash = match req.password {
        Some(ref password) => Some(hash_password(password)?),
        None => None,
    };

    let user = User::update(
        &state.db,
        id,
        UpdateUser {
            email: req.email,
            name: req.name,
            password_hash,
            is_admin: req.is_admin,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserPublic::from(user)))
}

/// Delete a user
///
/// The user's tickets survive with their denormalized `user_email` snapshot
/// intact.
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeleteResponse>> {
    authorization::require_admin(&actor)?;

    let deleted = User::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    Ok(Json(DeleteResponse { deleted }))
}
