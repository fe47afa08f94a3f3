/// Location model and database operations
///
/// A location is a site/locality referenced by tickets. Same shape and
/// lifecycle as a provider: unique name, deletion refused while referenced.
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::DeleteOutcome;

/// Service site row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct Location {
    /// Unique location id
    pub id: i64,

    /// Unique display name
    pub name: String,
}

impl Location {
    /// Creates a new location
    pub async fn create(pool: &SqlitePool, name: &str) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Location>(
            "INSERT INTO locations (name) VALUES (?) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(pool)
        .await
    }

    /// Finds a location by id
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Location>("SELECT id, name FROM locations WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists all locations ordered by name
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Location>("SELECT id, name FROM locations ORDER BY name")
            .fetch_all(pool)
            .await
    }

    /// Renames a location; returns the updated row if the id exists
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Location>(
            "UPDATE locations SET name = ? WHERE id = ? RETURNING id, name",
        )
        .bind(name)
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a location unless a ticket still references it
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<DeleteOutcome, sqlx::Error> {
        let (references,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM tickets WHERE location_id = ?")
                .bind(id)
                .fetch_one(pool)
                .await?;

        if references > 0 {
            return Ok(DeleteOutcome::InUse);
        }

        let result = sqlx::query("DELETE FROM locations WHERE id = ?")
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
