/// Application state and router builder
///
/// Defines the shared application state and builds the Axum router with all
/// routes and middleware.
///
/// # Router layout
///
/// ```text
/// /
/// ├── /health                     # Health check (public)
/// └── /v1/                        # API v1
///     ├── /auth/
///     │   ├── POST /login         # Authenticate (public)
///     │   └── GET  /me            # Current actor (authenticated)
///     ├── /tickets[/:id]          # Ticket CRUD (authenticated, ownership-scoped)
///     ├── /providers[/:id]        # Provider CRUD (authenticated)
///     ├── /locations[/:id]        # Location CRUD (authenticated)
///     └── /users[/:id]            # User management (admin only)
/// ```
///
/// # Identity derivation
///
/// The auth middleware validates the Bearer token and then re-loads the user
/// row it names. The [`Actor`] placed in request extensions therefore carries
/// the stored role, never a client-asserted one; deleting a user immediately
/// invalidates their outstanding tokens.
use axum::{
    extract::Request,
    http::{header, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use servitrack_shared::auth::{authorization::Actor, jwt};
use servitrack_shared::models::user::User;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::Config;
use crate::error::ApiError;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: SqlitePool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Public routes: health check and login
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_public = Router::new().route("/login", post(routes::auth::login));

    // Everything else requires a valid token
    let authed = Router::new()
        .route("/auth/me", get(routes::auth::me))
        .route(
            "/tickets",
            get(routes::tickets::list_tickets).post(routes::tickets::create_ticket),
        )
        .route(
            "/tickets/:id",
            get(routes::tickets::get_ticket)
                .put(routes::tickets::update_ticket)
                .delete(routes::tickets::delete_ticket),
        )
        .route(
            "/providers",
            get(routes::providers::list_providers).post(routes::providers::create_provider),
        )
        .route(
            "/providers/:id",
            get(routes::providers::get_provider)
                .put(routes::providers::update_provider)
                .delete(routes::providers::delete_provider),
        )
        .route(
            "/locations",
            get(routes::locations::list_locations).post(routes::locations::create_location),
        )
        .route(
            "/locations/:id",
            get(routes::locations::get_location)
                .put(routes::locations::update_location)
                .delete(routes::locations::delete_location),
        )
        .route(
            "/users",
            get(routes::users::list_users).post(routes::users::create_user),
        )
        .route(
            "/users/:id",
            get(routes::users::get_user)
                .put(routes::users::update_user)
                .delete(routes::users::delete_user),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_layer,
        ));

    let v1_routes = Router::new().nest("/auth", auth_public).merge(authed);

    // The frontend is served from another origin and polls the list
    // endpoints, so CORS stays permissive unless origins are pinned.
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Authentication middleware
///
/// Extracts and validates the Bearer token, then re-derives the actor from
/// the stored user record and injects it into request extensions. The token
/// only names a user id; role and email always come from the database.
async fn auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::BadRequest("Expected Bearer token".to_string()))?;

    let claims = jwt::validate_token(token, state.jwt_secret())?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Unknown user".to_string()))?;

    req.extensions_mut().insert(Actor::from(&user));

    Ok(next.run(req).await)
}
