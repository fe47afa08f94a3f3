/// Ticket model and database operations
///
/// A ticket records a service visit: who reported it (idc), which provider
/// handled it, the client and case number, where, and the service window.
///
/// Ownership is stamped at creation from the acting user and never updated:
/// `user_id` is the identity key for visibility scoping, and `user_email` is
/// a display snapshot of the creator's email at that moment. If the user's
/// email changes later, existing tickets keep the old value.
///
/// # Example
///
/// ```no_run
/// use servitrack_shared::auth::authorization::Actor;
/// use servitrack_shared::models::ticket::{CreateTicket, Ticket};
/// # use sqlx::SqlitePool;
/// # async fn example(pool: SqlitePool, actor: Actor, data: CreateTicket)
/// #     -> Result<(), Box<dyn std::error::Error>> {
/// let ticket = Ticket::create(&pool, data, &actor).await?;
/// assert_eq!(ticket.user_id, actor.id);
///
/// // Admins see everything, other actors only their own tickets.
/// let visible = Ticket::list_for(&pool, &actor).await?;
/// # Ok(())
/// # }
/// ```
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::auth::authorization::Actor;

const TICKET_COLUMNS: &str = "id, idc, provider_id, case_number, client, location_id, \
     service_date, start_time, end_time, created_at, user_id, user_email";

/// Service ticket row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Ticket {
    /// Unique ticket id; also the newest-first ordering key
    pub id: i64,

    /// Free-text identifier of the reporting technician/contact
    pub idc: String,

    /// Provider handling the ticket
    pub provider_id: i64,

    /// External case number
    pub case_number: String,

    /// Client the service was performed for
    pub client: String,

    /// Site where the service happened
    pub location_id: i64,

    /// Day of service
    pub service_date: NaiveDate,

    /// Service window start
    pub start_time: NaiveTime,

    /// Service window end
    pub end_time: NaiveTime,

    /// Stamped server-side at creation
    pub created_at: DateTime<Utc>,

    /// Creator's user id (identity key for visibility)
    pub user_id: i64,

    /// Creator's email at creation time (display snapshot, may drift)
    pub user_email: String,
}

/// Input for creating a ticket
///
/// Ownership fields are not part of the payload; they are stamped from the
/// acting user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTicket {
    pub idc: String,
    pub provider_id: i64,
    pub case_number: String,
    pub client: String,
    pub location_id: i64,
    pub service_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Input for updating a ticket; only `Some` fields are written
///
/// `user_id`, `user_email`, and `created_at` are immutable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTicket {
    pub idc: Option<String>,
    pub provider_id: Option<i64>,
    pub case_number: Option<String>,
    pub client: Option<String>,
    pub location_id: Option<i64>,
    pub service_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

/// Error type for ticket store operations
#[derive(Debug, thiserror::Error)]
pub enum TicketError {
    /// `provider_id` does not reference an existing provider
    #[error("unknown provider id {0}")]
    UnknownProvider(i64),

    /// `location_id` does not reference an existing location
    #[error("unknown location id {0}")]
    UnknownLocation(i64),

    /// Database failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

async fn check_references(
    pool: &SqlitePool,
    provider_id: Option<i64>,
    location_id: Option<i64>,
) -> Result<(), TicketError> {
    if let Some(provider_id) = provider_id {
        let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM providers WHERE id = ?")
            .bind(provider_id)
            .fetch_optional(pool)
            .await?;
        if exists.is_none() {
            return Err(TicketError::UnknownProvider(provider_id));
        }
    }
    if let Some(location_id) = location_id {
        let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM locations WHERE id = ?")
            .bind(location_id)
            .fetch_optional(pool)
            .await?;
        if exists.is_none() {
            return Err(TicketError::UnknownLocation(location_id));
        }
    }
    Ok(())
}

impl Ticket {
    /// Creates a ticket on behalf of `actor`
    ///
    /// Verifies that provider and location exist, stamps ownership from the
    /// actor, and stamps `created_at` from the server clock.
    pub async fn create(
        pool: &SqlitePool,
        data: CreateTicket,
        actor: &Actor,
    ) -> Result<Self, TicketError> {
        check_references(pool, Some(data.provider_id), Some(data.location_id)).await?;

        let query = format!(
            r#"
            INSERT INTO tickets (
                idc, provider_id, case_number, client, location_id,
                service_date, start_time, end_time, created_at, user_id, user_email
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {TICKET_COLUMNS}
            "#
        );

        let ticket = sqlx::query_as::<_, Ticket>(&query)
            .bind(data.idc)
            .bind(data.provider_id)
            .bind(data.case_number)
            .bind(data.client)
            .bind(data.location_id)
            .bind(data.service_date)
            .bind(data.start_time)
            .bind(data.end_time)
            .bind(Utc::now())
            .bind(actor.id)
            .bind(&actor.email)
            .fetch_one(pool)
            .await?;

        Ok(ticket)
    }

    /// Lists tickets visible to `actor`, newest first
    ///
    /// Admins get every ticket; everyone else only rows where they are the
    /// creator. Scoping is keyed on `user_id`.
    pub async fn list_for(pool: &SqlitePool, actor: &Actor) -> Result<Vec<Self>, sqlx::Error> {
        if actor.is_admin {
            let query = format!("SELECT {TICKET_COLUMNS} FROM tickets ORDER BY id DESC");
            sqlx::query_as::<_, Ticket>(&query).fetch_all(pool).await
        } else {
            let query = format!(
                "SELECT {TICKET_COLUMNS} FROM tickets WHERE user_id = ? ORDER BY id DESC"
            );
            sqlx::query_as::<_, Ticket>(&query)
                .bind(actor.id)
                .fetch_all(pool)
                .await
        }
    }

    /// Finds a ticket by id
    ///
    /// Visibility is the caller's concern; route handlers pair this with
    /// `require_ticket_access`.
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE id = ?");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Partially updates a ticket
    ///
    /// A changed provider or location id is re-validated against its table.
    /// Returns the updated row, or `None` if the id is unknown.
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: UpdateTicket,
    ) -> Result<Option<Self>, TicketError> {
        check_references(pool, data.provider_id, data.location_id).await?;

        let mut query = String::from("UPDATE tickets SET id = id");
        if data.idc.is_some() {
            query.push_str(", idc = ?");
        }
        if data.provider_id.is_some() {
            query.push_str(", provider_id = ?");
        }
        if data.case_number.is_some() {
            query.push_str(", case_number = ?");
        }
        if data.client.is_some() {
            query.push_str(", client = ?");
        }
        if data.location_id.is_some() {
            query.push_str(", location_id = ?");
        }
        if data.service_date.is_some() {
            query.push_str(", service_date = ?");
        }
        if data.start_time.is_some() {
            query.push_str(", start_time = ?");
        }
        if data.end_time.is_some() {
            query.push_str(", end_time = ?");
        }
        query.push_str(&format!(" WHERE id = ? RETURNING {TICKET_COLUMNS}"));

        let mut q = sqlx::query_as::<_, Ticket>(&query);
        if let Some(idc) = data.idc {
            q = q.bind(idc);
        }
        if let Some(provider_id) = data.provider_id {
            q = q.bind(provider_id);
        }
        if let Some(case_number) = data.case_number {
            q = q.bind(case_number);
        }
        if let Some(client) = data.client {
            q = q.bind(client);
        }
        if let Some(location_id) = data.location_id {
            q = q.bind(location_id);
        }
        if let Some(service_date) = data.service_date {
            q = q.bind(service_date);
        }
        if let Some(start_time) = data.start_time {
            q = q.bind(start_time);
        }
        if let Some(end_time) = data.end_time {
            q = q.bind(end_time);
        }

        let ticket = q.bind(id).fetch_optional(pool).await?;
        Ok(ticket)
    }

    /// Deletes a ticket by id; returns whether a row was removed
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tickets WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
