/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - In-memory test database setup
/// - Test user creation
/// - JWT token generation
/// - Request/response helpers
use axum::body::Body;
use axum::http::{Request, StatusCode};
use servitrack_api::app::{build_router, AppState};
use servitrack_api::config::{ApiConfig, BootstrapAdminConfig, Config, DatabaseConfig, JwtConfig};
use servitrack_shared::auth::jwt::{create_token, Claims};
use servitrack_shared::auth::password::hash_password;
use servitrack_shared::db::pool;
use servitrack_shared::db::schema::{init_schema, seed_bootstrap_admin};
use servitrack_shared::models::user::{CreateUser, User};
use sqlx::SqlitePool;
use tower::Service as _;

const TEST_JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: SqlitePool,
    pub app: axum::Router,
    pub config: Config,
}

impl TestContext {
    /// Creates a new test context with a fresh in-memory database
    ///
    /// The store is seeded with the bootstrap admin only; tests create
    /// whatever users they need.
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
            jwt: JwtConfig {
                secret: TEST_JWT_SECRET.to_string(),
            },
            bootstrap: BootstrapAdminConfig {
                enabled: true,
                email: "admin".to_string(),
                password: "mastuerzo".to_string(),
            },
        };

        // One connection keeps every query on the same in-memory database.
        let db = pool::create_pool(&pool::DatabaseConfig {
            url: config.database.url.clone(),
            max_connections: 1,
            ..Default::default()
        })
        .await?;
        init_schema(&db).await?;
        seed_bootstrap_admin(&db, &config.bootstrap.email, &config.bootstrap.password).await?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext { db, app, config })
    }

    /// Creates a user directly in the store and returns it with a valid token
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        is_admin: bool,
    ) -> anyhow::Result<(User, String)> {
        let user = User::create(
            &self.db,
            CreateUser {
                email: email.to_string(),
                name: "Test User".to_string(),
                password_hash: hash_password(password)?,
                is_admin,
            },
        )
        .await?;

        let token = self.token_for(&user)?;
        Ok((user, token))
    }

    /// Issues an access token for an existing user
    pub fn token_for(&self, user: &User) -> anyhow::Result<String> {
        let claims = Claims::new(user.id);
        Ok(create_token(&claims, &self.config.jwt.secret)?)
    }

    /// Returns a token for the seeded bootstrap admin
    pub async fn admin_token(&self) -> anyhow::Result<String> {
        let admin = User::find_by_email(&self.db, &self.config.bootstrap.email)
            .await?
            .ok_or_else(|| anyhow::anyhow!("bootstrap admin not seeded"))?;
        self.token_for(&admin)
    }

    /// Sends a JSON request through the router and returns status and body
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }
}

/// Creates a provider and a location, returning their ids
pub async fn seed_catalog(ctx: &TestContext, token: &str) -> anyhow::Result<(i64, i64)> {
    let (status, provider) = ctx
        .request(
            "POST",
            "/v1/providers",
            Some(token),
            Some(serde_json::json!({"name": "Acme Networks"})),
        )
        .await;
    anyhow::ensure!(status == StatusCode::OK, "provider create failed: {status}");

    let (status, location) = ctx
        .request(
            "POST",
            "/v1/locations",
            Some(token),
            Some(serde_json::json!({"name": "Main Office"})),
        )
        .await;
    anyhow::ensure!(status == StatusCode::OK, "location create failed: {status}");

    Ok((
        provider["id"].as_i64().unwrap(),
        location["id"].as_i64().unwrap(),
    ))
}

/// A well-formed ticket payload against the given provider and location
pub fn ticket_payload(provider_id: i64, location_id: i64) -> serde_json::Value {
    serde_json::json!({
        "idc": "IDC-042",
        "provider_id": provider_id,
        "case_number": "CASE-1234",
        "client": "Globex",
        "location_id": location_id,
        "service_date": "2026-08-15",
        "start_time": "09:00:00",
        "end_time": "11:30:00"
    })
}
