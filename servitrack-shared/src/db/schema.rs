/// Schema initialization and bootstrap seeding
///
/// Servitrack keeps its schema small enough to manage with idempotent
/// `CREATE TABLE IF NOT EXISTS` statements executed at startup. The four
/// relations mirror the data model: users, providers, locations, tickets,
/// with foreign keys from tickets to providers and locations. The creator
/// columns on tickets (`user_id`, `user_email`) are a snapshot, deliberately
/// not FK-enforced, so tickets outlive their creator's account.
///
/// Uniqueness rules enforced here:
/// - `users.email` is unique case-insensitively (NOCASE collation); emails
///   are additionally lowercased before storage by the model layer.
/// - `providers.name` and `locations.name` are unique.
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::auth::password::hash_password;
use crate::models::user::User;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    email         TEXT NOT NULL UNIQUE COLLATE NOCASE,
    name          TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    is_admin      INTEGER NOT NULL DEFAULT 0,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS providers (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS locations (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS tickets (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    idc          TEXT NOT NULL,
    provider_id  INTEGER NOT NULL,
    case_number  TEXT NOT NULL,
    client       TEXT NOT NULL,
    location_id  INTEGER NOT NULL,
    service_date TEXT NOT NULL,
    start_time   TEXT NOT NULL,
    end_time     TEXT NOT NULL,
    created_at   TEXT NOT NULL,
    user_id      INTEGER NOT NULL,
    user_email   TEXT NOT NULL,
    FOREIGN KEY (provider_id) REFERENCES providers (id),
    FOREIGN KEY (location_id) REFERENCES locations (id)
);
"#;

/// Creates all tables if they do not exist yet
///
/// Safe to call on every startup.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    info!("Initializing database schema");

    for statement in SCHEMA.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        sqlx::query(statement).execute(pool).await?;
    }

    Ok(())
}

/// Seeds the bootstrap administrator account if it is missing
///
/// The password is hashed with Argon2id before storage; the bootstrap
/// credential is never persisted in plaintext. Returns `true` when a new
/// admin row was created.
///
/// This inserts directly instead of going through `User::create` because the
/// bootstrap address ("admin") is exempt from the email format rule applied
/// to regular accounts. It is the only such exemption, and it logs loudly
/// when it runs.
pub async fn seed_bootstrap_admin(
    pool: &SqlitePool,
    email: &str,
    password: &str,
) -> Result<bool, SeedError> {
    if User::find_by_email(pool, email).await?.is_some() {
        return Ok(false);
    }

    warn!(email = %email, "Bootstrap admin missing, seeding it");

    let password_hash = hash_password(password)?;
    sqlx::query(
        r#"
        INSERT INTO users (email, name, password_hash, is_admin, created_at)
        VALUES (?, 'Administrator', ?, 1, ?)
        "#,
    )
    .bind(email)
    .bind(password_hash)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(true)
}

/// Error type for schema seeding
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// Database failure while checking or inserting the admin row
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Hashing the bootstrap password failed
    #[error(transparent)]
    Password(#[from] crate::auth::password::PasswordError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::{create_pool, DatabaseConfig};

    async fn test_pool() -> SqlitePool {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            ..Default::default()
        };
        create_pool(&config).await.expect("pool should open")
    }

    #[tokio::test]
    async fn test_init_schema_is_idempotent() {
        let pool = test_pool().await;
        init_schema(&pool).await.expect("first init should succeed");
        init_schema(&pool).await.expect("second init should succeed");
    }

    #[tokio::test]
    async fn test_seed_bootstrap_admin_once() {
        let pool = test_pool().await;
        init_schema(&pool).await.unwrap();

        let created = seed_bootstrap_admin(&pool, "admin", "mastuerzo")
            .await
            .unwrap();
        assert!(created, "fresh store should get an admin row");

        let created_again = seed_bootstrap_admin(&pool, "admin", "mastuerzo")
            .await
            .unwrap();
        assert!(!created_again, "second seed must be a no-op");

        let admin = User::find_by_email(&pool, "admin")
            .await
            .unwrap()
            .expect("admin row should exist");
        assert!(admin.is_admin);
        assert_ne!(admin.password_hash, "mastuerzo", "password must be hashed");
    }
}
