//! # Servitrack API Server
//!
//! HTTP API for tracking field-service tickets: users, providers, locations,
//! and the tickets that tie them together.
//!
//! ## Architecture
//!
//! Built with Axum on SQLite:
//! - Email/password login issuing 24h JWTs
//! - Per-request actor derivation from the database (roles never come from
//!   the client)
//! - Ticket visibility scoped to creator-or-admin
//!
//! ## Usage
//!
//! ```bash
//! JWT_SECRET=<at least 32 chars> cargo run -p servitrack-api
//! ```

use servitrack_api::{app, config::Config};
use servitrack_shared::db::{pool, schema};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "servitrack_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Servitrack API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let db_config = pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    };
    let db = pool::create_pool(&db_config).await?;
    schema::init_schema(&db).await?;

    if config.bootstrap.enabled {
        schema::seed_bootstrap_admin(&db, &config.bootstrap.email, &config.bootstrap.password)
            .await?;
    }

    let bind_address = config.bind_address();
    let router = app::build_router(app::AppState::new(db, config));

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, router).await?;

    Ok(())
}
