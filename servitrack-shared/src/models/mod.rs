/// Database models for Servitrack
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: user accounts, email normalization, authentication
/// - `provider`: service vendors referenced by tickets
/// - `location`: service sites referenced by tickets
/// - `ticket`: service tickets with ownership-scoped queries

pub mod location;
pub mod provider;
pub mod ticket;
pub mod user;

/// Outcome of deleting a row that other rows may reference
///
/// Providers and locations cannot be removed while a ticket points at them;
/// the store checks the reference count explicitly before deleting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Row existed and was removed
    Deleted,

    /// No row with that id
    NotFound,

    /// Row is still referenced by at least one ticket
    InUse,
}
