/// User model and database operations
///
/// Emails are the human-facing identity: they are validated against a basic
/// `local@domain.tld` shape, lowercased before storage, and unique
/// case-insensitively. Passwords are stored as Argon2id hashes only.
///
/// The model struct deliberately does not implement `Serialize`; responses go
/// through [`UserPublic`] so a password hash can never leak into a payload.
///
/// # Example
///
/// ```no_run
/// use servitrack_shared::models::user::{CreateUser, User};
/// # use sqlx::SqlitePool;
/// # async fn example(pool: SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
/// let user = User::create(
///     &pool,
///     CreateUser {
///         email: "Tech@Example.com".to_string(),
///         name: "Field Tech".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///         is_admin: false,
///     },
/// )
/// .await?;
/// assert_eq!(user.email, "tech@example.com");
/// # Ok(())
/// # }
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::auth::password::{verify_password, PasswordError};

/// User account row
///
/// Not `Serialize` on purpose; convert to [`UserPublic`] before returning it
/// to a caller.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user id
    pub id: i64,

    /// Normalized (lowercase) email, unique case-insensitively
    pub email: String,

    /// Display name
    pub name: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Whether the user is an administrator
    pub is_admin: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Public view of a user, safe to serialize into responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserPublic {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserPublic {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        (&user).into()
    }
}

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Email address (normalized to lowercase before storage)
    pub email: String,

    /// Display name
    pub name: String,

    /// Argon2id password hash (NOT a plaintext password)
    pub password_hash: String,

    /// Role flag
    pub is_admin: bool,
}

/// Input for updating a user; only `Some` fields are written
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password_hash: Option<String>,
    pub is_admin: Option<bool>,
}

/// Error type for user store operations
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// Email does not look like `local@domain.tld`
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// Another account already uses this email (case-insensitive)
    #[error("email already registered")]
    DuplicateEmail,

    /// Stored hash could not be processed
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Database failure
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for UserError {
    fn from(err: sqlx::Error) -> Self {
        // The explicit duplicate pre-check can race with a concurrent insert;
        // the UNIQUE constraint is the backstop.
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.message().contains("UNIQUE constraint failed: users.email") {
                return UserError::DuplicateEmail;
            }
        }
        UserError::Database(err)
    }
}

/// Basic `local@domain.tld` email shape check
///
/// Intentionally loose beyond that shape; real deliverability is not this
/// layer's problem.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.splitn(2, '@');
    let (Some(local), Some(domain)) = (parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

impl User {
    /// Creates a new user
    ///
    /// Validates and lowercases the email, checks for duplicates, and stamps
    /// `created_at` server-side.
    ///
    /// # Errors
    ///
    /// - [`UserError::InvalidEmail`] if the email fails the shape check
    /// - [`UserError::DuplicateEmail`] if the email is already taken
    pub async fn create(pool: &SqlitePool, data: CreateUser) -> Result<Self, UserError> {
        if !is_valid_email(&data.email) {
            return Err(UserError::InvalidEmail(data.email));
        }
        let email = data.email.to_lowercase();

        if Self::find_by_email(pool, &email).await?.is_some() {
            return Err(UserError::DuplicateEmail);
        }

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, password_hash, is_admin, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, email, name, password_hash, is_admin, created_at
            "#,
        )
        .bind(email)
        .bind(data.name)
        .bind(data.password_hash)
        .bind(data.is_admin)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by id
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, is_admin, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Finds a user by email, case-insensitively
    pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, is_admin, created_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email.to_lowercase())
        .fetch_optional(pool)
        .await
    }

    /// Lists all users, oldest first
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password_hash, is_admin, created_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Partially updates a user
    ///
    /// A changed email is re-validated, lowercased, and checked against other
    /// accounts. Returns the updated row, or `None` if the id is unknown.
    ///
    /// Existing tickets keep their `user_email` snapshot even when the email
    /// changes here; that drift is documented behavior.
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: UpdateUser,
    ) -> Result<Option<Self>, UserError> {
        let email = match data.email {
            Some(raw) => {
                if !is_valid_email(&raw) {
                    return Err(UserError::InvalidEmail(raw));
                }
                let normalized = raw.to_lowercase();
                if let Some(other) = Self::find_by_email(pool, &normalized).await? {
                    if other.id != id {
                        return Err(UserError::DuplicateEmail);
                    }
                }
                Some(normalized)
            }
            None => None,
        };

        let mut query = String::from("UPDATE users SET id = id");
        if email.is_some() {
            query.push_str(", email = ?");
        }
        if data.name.is_some() {
            query.push_str(", name = ?");
        }
        if data.password_hash.is_some() {
            query.push_str(", password_hash = ?");
        }
        if data.is_admin.is_some() {
            query.push_str(", is_admin = ?");
        }
        query.push_str(
            " WHERE id = ? RETURNING id, email, name, password_hash, is_admin, created_at",
        );

        let mut q = sqlx::query_as::<_, User>(&query);
        if let Some(email) = email {
            q = q.bind(email);
        }
        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(password_hash) = data.password_hash {
            q = q.bind(password_hash);
        }
        if let Some(is_admin) = data.is_admin {
            q = q.bind(is_admin);
        }

        let user = q.bind(id).fetch_optional(pool).await?;
        Ok(user)
    }

    /// Deletes a user by id; returns whether a row was removed
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Authenticates by email and password
    ///
    /// Email matching is case-insensitive; the password is verified against
    /// the stored Argon2id hash. Returns `None` for both unknown email and
    /// wrong password so callers cannot distinguish the two.
    pub async fn authenticate(
        pool: &SqlitePool,
        email: &str,
        password: &str,
    ) -> Result<Option<Self>, UserError> {
        let Some(user) = Self::find_by_email(pool, email).await? else {
            return Ok(None);
        };

        if verify_password(password, &user.password_hash)? {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }
}
