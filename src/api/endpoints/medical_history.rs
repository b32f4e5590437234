//! Visit notes nested under a patient.
//!
//! - `POST /patients/:idNumber/medical-history`
//! - `GET /patients/:idNumber/medical-history`

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{created, ok, ApiContext, Envelope};
use crate::db;
use crate::models::{MedicalHistory, NewMedicalHistory};

pub async fn create(
    State(ctx): State<ApiContext>,
    Path(id_number): Path<String>,
    payload: Result<Json<NewMedicalHistory>, JsonRejection>,
) -> Result<(StatusCode, Envelope<MedicalHistory>), ApiError> {
    let Json(new) = payload?;
    new.validate()?;

    let conn = ctx.core.open_db()?;
    let entry = db::insert_medical_history(&conn, &id_number, &new, ctx.core.today())?;

    Ok(created(entry))
}

pub async fn list(
    State(ctx): State<ApiContext>,
    Path(id_number): Path<String>,
) -> Result<Envelope<Vec<MedicalHistory>>, ApiError> {
    let conn = ctx.core.open_db()?;
    Ok(ok(db::list_medical_history(&conn, &id_number)?))
}
