/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /v1/auth/login` - Authenticate and receive an access token
/// - `GET  /v1/auth/me`    - Current actor's public user record
///
/// Login failures are always answered with the same 401 message so the
/// response does not reveal whether an email is registered.
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use servitrack_shared::auth::{authorization::Actor, jwt};
use servitrack_shared::db::schema::seed_bootstrap_admin;
use servitrack_shared::models::user::{User, UserPublic};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

/// Login request
///
/// No email-shape validation here: the bootstrap admin address ("admin") is
/// not a regular email.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address
    pub email: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Access token (24h)
    pub token: String,

    /// Public fields of the authenticated user
    pub user: UserPublic,
}

/// Login endpoint
///
/// Authenticates against the stored Argon2id hash. If that fails and the
/// break-glass bootstrap credential is enabled and matches, the admin row is
/// re-seeded if necessary and the login proceeds; this branch logs a warning
/// every time it is taken.
///
/// # Errors
///
/// - `401 Unauthorized`: invalid credentials (identical message for unknown
///   email and wrong password)
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = match User::authenticate(&state.db, &req.email, &req.password).await? {
        Some(user) => user,
        None => bootstrap_login(&state, &req).await?,
    };

    let claims = jwt::Claims::new(user.id);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(LoginResponse {
        token,
        user: UserPublic::from(user),
    }))
}

/// Break-glass path for the fixed bootstrap admin credential
///
/// Only reachable after normal authentication failed. Recovers access even
/// when the admin row was deleted or its password changed, by re-seeding the
/// row. Isolated here so the liability is explicit and observable.
async fn bootstrap_login(state: &AppState, req: &LoginRequest) -> Result<User, ApiError> {
    let bootstrap = &state.config.bootstrap;

    let matches = bootstrap.enabled
        && req.email.eq_ignore_ascii_case(&bootstrap.email)
        && req.password == bootstrap.password;
    if !matches {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    warn!(email = %bootstrap.email, "Break-glass bootstrap admin login used");

    seed_bootstrap_admin(&state.db, &bootstrap.email, &bootstrap.password)
        .await
        .map_err(|e| ApiError::InternalError(format!("Bootstrap seeding failed: {}", e)))?;

    User::find_by_email(&state.db, &bootstrap.email)
        .await?
        .ok_or_else(|| ApiError::InternalError("Bootstrap admin row missing".to_string()))
}

/// Current-actor endpoint
///
/// Lets a client re-derive its identity after a reload instead of trusting
/// anything it cached.
pub async fn me(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<UserPublic>> {
    let user = User::find_by_id(&state.db, actor.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserPublic::from(user)))
}
