//! Patient file endpoints, keyed by `patientId` rather than the file's id.
//!
//! - `POST /patient-files`
//! - `GET /patient-files`
//! - `GET /patient-files/:patientId`
//! - `PUT /patient-files/:patientId`
//! - `DELETE /patient-files/:patientId`

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{created, message, ok, ApiContext, Envelope, MessageBody};
use crate::db;
use crate::models::{NewPatientFile, PatientFile, PatientFilePatch};

pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<NewPatientFile>, JsonRejection>,
) -> Result<(StatusCode, Envelope<PatientFile>), ApiError> {
    let Json(new) = payload?;
    new.validate(ctx.core.today())?;

    let conn = ctx.core.open_db()?;
    let file = db::insert_patient_file(&conn, &new)?;

    Ok(created(file))
}

pub async fn list(State(ctx): State<ApiContext>) -> Result<Envelope<Vec<PatientFile>>, ApiError> {
    let conn = ctx.core.open_db()?;
    Ok(ok(db::list_patient_files(&conn)?))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Envelope<PatientFile>, ApiError> {
    let conn = ctx.core.open_db()?;
    db::get_patient_file(&conn, &patient_id)?
        .map(ok)
        .ok_or_else(|| ApiError::NotFound("Patient file not found".into()))
}

pub async fn update(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
    payload: Result<Json<PatientFilePatch>, JsonRejection>,
) -> Result<Envelope<PatientFile>, ApiError> {
    let Json(patch) = payload?;
    let changes = patch.into_changes(ctx.core.today())?;

    let conn = ctx.core.open_db()?;
    let file = db::update_patient_file(&conn, &patient_id, &changes)?;

    Ok(ok(file))
}

pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Result<Envelope<MessageBody>, ApiError> {
    let conn = ctx.core.open_db()?;
    db::delete_patient_file(&conn, &patient_id)?;

    Ok(message("Patient file deleted successfully"))
}
