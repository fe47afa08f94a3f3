/// Configuration management for the API server
///
/// Loads configuration from environment variables into a typed struct.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: SQLite connection string (default: "sqlite://servitrack.db")
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 3001)
/// - `JWT_SECRET`: Secret key for JWT signing (required, at least 32 bytes)
/// - `BOOTSTRAP_ADMIN_ENABLED`: Whether the break-glass admin credential is
///   honored (default: true)
/// - `BOOTSTRAP_ADMIN_EMAIL`: Bootstrap admin email (default: "admin")
/// - `BOOTSTRAP_ADMIN_PASSWORD`: Bootstrap admin password (default: "mastuerzo")
/// - `RUST_LOG`: Log filter (default: info)
use serde::{Deserialize, Serialize};
use std::env;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// Bootstrap admin configuration
    pub bootstrap: BootstrapAdminConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for JWT signing
    ///
    /// Must be at least 32 bytes. Generate with: `openssl rand -hex 32`
    pub secret: String,
}

/// Break-glass bootstrap admin credential
///
/// A fixed admin login that works even on an empty store, kept for
/// operational recovery. It is isolated to one explicit, logged branch of
/// the login handler and can be disabled outright.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapAdminConfig {
    /// Whether the break-glass credential is honored at login
    pub enabled: bool,

    /// Bootstrap admin email (not required to look like an email)
    pub email: String,

    /// Bootstrap admin password
    pub password: String,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `JWT_SECRET` is missing or too short, or if a
    /// numeric variable fails to parse.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse::<u16>()?;

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://servitrack.db".to_string());

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let bootstrap_enabled = env::var("BOOTSTRAP_ADMIN_ENABLED")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);
        let bootstrap_email =
            env::var("BOOTSTRAP_ADMIN_EMAIL").unwrap_or_else(|_| "admin".to_string());
        let bootstrap_password =
            env::var("BOOTSTRAP_ADMIN_PASSWORD").unwrap_or_else(|_| "mastuerzo".to_string());

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig { secret: jwt_secret },
            bootstrap: BootstrapAdminConfig {
                enabled: bootstrap_enabled,
                email: bootstrap_email,
                password: bootstrap_password,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Config usable by tests without touching the environment
    pub fn test_config() -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 3001,
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
            jwt: JwtConfig {
                secret: "test-secret-key-at-least-32-bytes-long!".to_string(),
            },
            bootstrap: BootstrapAdminConfig {
                enabled: true,
                email: "admin".to_string(),
                password: "mastuerzo".to_string(),
            },
        }
    }

    #[test]
    fn test_bind_address() {
        let config = test_config();
        assert_eq!(config.bind_address(), "127.0.0.1:3001");
    }
}
