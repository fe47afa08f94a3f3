//! # Servitrack Shared Library
//!
//! This crate contains the data layer and authentication utilities shared by
//! the Servitrack API server and its tests.
//!
//! ## Module Organization
//!
//! - `models`: Database models and CRUD operations (users, providers,
//!   locations, tickets)
//! - `db`: Connection pool and schema management
//! - `auth`: Password hashing, JWT tokens, and authorization rules

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Servitrack shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
