/// Authorization rules
///
/// Pure `(actor, resource) -> allow | deny` checks. The [`Actor`] is built by
/// the API's auth middleware from the stored user row, so the admin flag here
/// is authoritative; handlers only need to call these helpers.
///
/// # Rules
///
/// - Ticket visibility: admins see every ticket, everyone else only their own.
/// - Ticket update/delete: creator or admin, the same rule as visibility.
/// - User management: admin only.
use serde::{Deserialize, Serialize};

use crate::models::ticket::Ticket;
use crate::models::user::User;

/// The authenticated identity performing an operation
///
/// Always derived server-side from the user record matched by the request's
/// token; never populated from caller-supplied fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// User id
    pub id: i64,

    /// Normalized (lowercase) email
    pub email: String,

    /// Stored role flag
    pub is_admin: bool,
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            is_admin: user.is_admin,
        }
    }
}

/// Error type for authorization checks
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthzError {
    /// Operation is restricted to administrators
    #[error("Administrator role required")]
    AdminRequired,

    /// Actor is neither the resource creator nor an admin
    #[error("Not authorized to access this resource")]
    NotOwner,
}

/// Requires the actor to be an administrator
///
/// Gate for the user-management endpoints.
pub fn require_admin(actor: &Actor) -> Result<(), AuthzError> {
    if actor.is_admin {
        Ok(())
    } else {
        Err(AuthzError::AdminRequired)
    }
}

/// Whether the actor may view or modify a specific ticket
///
/// Creator-or-admin. Ownership is keyed on `user_id`; the denormalized
/// `user_email` is display-only and never consulted here.
pub fn can_access_ticket(actor: &Actor, ticket: &Ticket) -> bool {
    actor.is_admin || ticket.user_id == actor.id
}

/// Requires creator-or-admin access to a ticket
pub fn require_ticket_access(actor: &Actor, ticket: &Ticket) -> Result<(), AuthzError> {
    if can_access_ticket(actor, ticket) {
        Ok(())
    } else {
        Err(AuthzError::NotOwner)
    }
}
