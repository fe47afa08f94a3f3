/// API route handlers
///
/// Routes are organized by resource; the router wiring lives in `crate::app`.

pub mod auth;
pub mod health;
pub mod locations;
pub mod providers;
pub mod tickets;
pub mod users;
