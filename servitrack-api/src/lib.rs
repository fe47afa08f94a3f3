//! # Servitrack API Server Library
//!
//! Core functionality for the Servitrack HTTP API: a small service-ticket
//! tracker with email/password login and role-scoped visibility.
//!
//! ## Modules
//!
//! - `app`: Application state, router builder, and auth middleware
//! - `config`: Environment-driven configuration
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
