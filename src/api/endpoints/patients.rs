//! Patient registry endpoints.
//!
//! - `POST /patients`
//! - `GET /patients?search=`
//! - `GET /patients/:idNumber`
//! - `DELETE /patients/:idNumber`: also removes appointments and visit notes

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{created, message, ok, ApiContext, Envelope, MessageBody};
use crate::db;
use crate::models::{NewPatient, Patient};

#[derive(Debug, Deserialize)]
pub struct PatientSearchQuery {
    pub search: Option<String>,
}

pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<NewPatient>, JsonRejection>,
) -> Result<(StatusCode, Envelope<Patient>), ApiError> {
    let Json(new) = payload?;
    new.validate(ctx.core.today())?;

    let conn = ctx.core.open_db()?;
    let patient = db::insert_patient(&conn, &new)?;

    Ok(created(patient))
}

pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<PatientSearchQuery>,
) -> Result<Envelope<Vec<Patient>>, ApiError> {
    let conn = ctx.core.open_db()?;
    Ok(ok(db::list_patients(&conn, query.search.as_deref())?))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id_number): Path<String>,
) -> Result<Envelope<Patient>, ApiError> {
    let conn = ctx.core.open_db()?;
    db::get_patient_by_id_number(&conn, &id_number)?
        .map(ok)
        .ok_or_else(|| ApiError::NotFound("Patient not found".into()))
}

pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(id_number): Path<String>,
) -> Result<Envelope<MessageBody>, ApiError> {
    let conn = ctx.core.open_db()?;
    db::delete_patient(&conn, &id_number)?;

    Ok(message("Patient deleted successfully"))
}
