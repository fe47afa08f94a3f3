/// Provider model and database operations
///
/// A provider is a service vendor referenced by tickets. Names are unique.
/// Deleting a provider that any ticket still references is refused with
/// [`DeleteOutcome::InUse`]; the reference count is checked explicitly rather
/// than relying on the foreign-key error text.
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::DeleteOutcome;

/// Service vendor row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct Provider {
    /// Unique provider id
    pub id: i64,

    /// Unique display name
    pub name: String,
}

impl Provider {
    /// Creates a new provider
    ///
    /// A duplicate name surfaces as a UNIQUE constraint violation from the
    /// database.
    pub async fn create(pool: &SqlitePool, name: &str) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Provider>(
            "INSERT INTO providers (name) VALUES (?) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(pool)
        .await
    }

    /// Finds a provider by id
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Provider>("SELECT id, name FROM providers WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists all providers ordered by name
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Provider>("SELECT id, name FROM providers ORDER BY name")
            .fetch_all(pool)
            .await
    }

    /// Renames a provider; returns the updated row if the id exists
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Provider>(
            "UPDATE providers SET name = ? WHERE id = ? RETURNING id, name",
        )
        .bind(name)
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a provider unless a ticket still references it
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<DeleteOutcome, sqlx::Error> {
        let (references,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM tickets WHERE provider_id = ?")
                .bind(id)
                .fetch_one(pool)
                .await?;

        if references > 0 {
            return Ok(DeleteOutcome::InUse);
        }

        let result = sqlx::query("DELETE FROM providers WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() > 0 {
            Ok(DeleteOutcome::Deleted)
        } else {
            Ok(DeleteOutcome::NotFound)
        }
    }
}
