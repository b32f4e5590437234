//! Appointment endpoints.
//!
//! - `POST /appointments`: book for a patient by `idNumber`
//! - `GET /appointments`: all appointments with patient names
//! - `GET /appointments/:id`: one appointment
//! - `PUT /appointments/:id`: allow-listed partial update
//! - `DELETE /appointments/:id`: remove

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{created, message, ok, ApiContext, Envelope, MessageBody};
use crate::db;
use crate::models::{Appointment, AppointmentDetail, AppointmentPatch, NewAppointment};

/// Ids that don't parse can't name a stored appointment.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound("Appointment not found".into()))
}

pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<NewAppointment>, JsonRejection>,
) -> Result<(StatusCode, Envelope<Appointment>), ApiError> {
    let Json(mut new) = payload?;
    new.validate()?;

    let conn = ctx.core.open_db()?;
    let appointment = db::create_appointment(&conn, &new)?;

    Ok(created(appointment))
}

pub async fn list(
    State(ctx): State<ApiContext>,
) -> Result<Envelope<Vec<AppointmentDetail>>, ApiError> {
    let conn = ctx.core.open_db()?;
    Ok(ok(db::list_appointments(&conn)?))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Envelope<AppointmentDetail>, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.core.open_db()?;
    db::get_appointment(&conn, &id)?
        .map(ok)
        .ok_or_else(|| ApiError::NotFound("Appointment not found".into()))
}

pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    payload: Result<Json<AppointmentPatch>, JsonRejection>,
) -> Result<Envelope<AppointmentDetail>, ApiError> {
    let id = parse_id(&id)?;
    let Json(patch) = payload?;
    let changes = patch.into_changes()?;

    let conn = ctx.core.open_db()?;
    let updated = db::update_appointment(&conn, &id, &changes)?;

    Ok(ok(updated))
}

pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Envelope<MessageBody>, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.core.open_db()?;
    db::delete_appointment(&conn, &id)?;

    Ok(message("Appointment deleted successfully"))
}
