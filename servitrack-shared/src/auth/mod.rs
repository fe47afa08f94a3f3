/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: JWT access-token generation and validation
/// - [`authorization`]: pure role/ownership checks over a server-derived
///   [`authorization::Actor`]
///
/// The role carried by an [`authorization::Actor`] is always derived from the
/// stored user record; nothing in this crate accepts a client-asserted admin
/// flag.

pub mod authorization;
pub mod jwt;
pub mod password;
