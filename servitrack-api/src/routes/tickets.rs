/// Ticket endpoints
///
/// # Endpoints
///
/// - `GET    /v1/tickets`     - List tickets visible to the actor
/// - `POST   /v1/tickets`     - Create a ticket owned by the actor
/// - `GET    /v1/tickets/:id` - Fetch one ticket (creator or admin)
/// - `PUT    /v1/tickets/:id` - Partially update (creator or admin)
/// - `DELETE /v1/tickets/:id` - Delete (creator or admin)
///
/// Visibility and ownership never come from the request payload; the actor
/// injected by the auth middleware is the only identity source.
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

use servitrack_shared::auth::authorization::{self, Actor};
use servitrack_shared::models::ticket::{CreateTicket, Ticket, UpdateTicket};

use crate::{
    app::AppState,
    error::{validation_errors, ApiError, ApiResult},
};

/// Create ticket request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTicketRequest {
    /// Reporting technician/contact
    #[validate(length(min = 1, message = "IDC is required"))]
    pub idc: String,

    /// Provider handling the ticket
    pub provider_id: i64,

    /// External case number
    #[validate(length(min = 1, message = "Case number is required"))]
    pub case_number: String,

    /// Client the service was performed for
    #[validate(length(min = 1, message = "Client is required"))]
    pub client: String,

    /// Site where the service happened
    pub location_id: i64,

    /// Day of service
    pub service_date: NaiveDate,

    /// Service window start
    pub start_time: NaiveTime,

    /// Service window end
    pub end_time: NaiveTime,
}

/// Update ticket request; only present fields are written
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTicketRequest {
    #[validate(length(min = 1, message = "IDC cannot be empty"))]
    pub idc: Option<String>,
    pub provider_id: Option<i64>,
    #[validate(length(min = 1, message = "Case number cannot be empty"))]
    pub case_number: Option<String>,
    #[validate(length(min = 1, message = "Client cannot be empty"))]
    pub client: Option<String>,
    pub location_id: Option<i64>,
    pub service_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

/// Delete response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Whether the row was removed
    pub deleted: bool,
}

/// List tickets visible to the actor, newest first
///
/// Admins see every ticket; everyone else only their own. The scope is
/// derived from the stored role, not from anything the client sends.
pub async fn list_tickets(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<Ticket>>> {
    let tickets = Ticket::list_for(&state.db, &actor).await?;
    Ok(Json(tickets))
}

/// Create a ticket owned by the actor
///
/// # Errors
///
/// - `422`: empty required field, or provider/location id that does not exist
pub async fn create_ticket(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<CreateTicketRequest>,
) -> ApiResult<Json<Ticket>> {
    req.validate().map_err(validation_errors)?;

    let ticket = Ticket::create(
        &state.db,
        CreateTicket {
            idc: req.idc,
            provider_id: req.provider_id,
            case_number: req.case_number,
            client: req.client,
            location_id: req.location_id,
            service_date: req.service_date,
            start_time: req.start_time,
            end_time: req.end_time,
        },
        &actor,
    )
    .await?;

    Ok(Json(ticket))
}

/// Fetch one ticket; creator or admin only
pub async fn get_ticket(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Ticket>> {
    let ticket = Ticket::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ticket not found".to_string()))?;

    authorization::require_ticket_access(&actor, &ticket)?;

    Ok(Json(ticket))
}

/// Partially update a ticket; creator or admin only
///
/// Ownership and creation stamps are immutable.
pub async fn update_ticket(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTicketRequest>,
) -> ApiResult<Json<Ticket>> {
    req.validate().map_err(validation_errors)?;

    let ticket = Ticket::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ticket not found".to_string()))?;
    authorization::require_ticket_access(&actor, &ticket)?;

    let updated = Ticket::update(
        &state.db,
        id,
        UpdateTicket {
            idc: req.idc,
            provider_id: req.provider_id,
            case_number: req.case_number,
            client: req.client,
            location_id: req.location_id,
            service_date: req.service_date,
            start_time: req.start_time,
            end_time: req.end_time,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Ticket not found".to_string()))?;

    Ok(Json(updated))
}

/// Delete a ticket; creator or admin only
pub async fn delete_ticket(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeleteResponse>> {
    let ticket = Ticket::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ticket not found".to_string()))?;
    authorization::require_ticket_access(&actor, &ticket)?;

    let deleted = Ticket::delete(&state.db, id).await?;

    Ok(Json(DeleteResponse { deleted }))
}
