use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{column_json, column_timestamp, column_uuid, format_timestamp, timestamp_now};
use crate::db::{write_transaction, DatabaseError};
use crate::models::{NewPatientFile, PatientFile, PatientFileChange};

/// Create the file for `new.patient_id`. At most one file exists per
/// patient; a second insert fails with `Duplicate`.
pub fn insert_patient_file(
    conn: &Connection,
    new: &NewPatientFile,
) -> Result<PatientFile, DatabaseError> {
    let now = timestamp_now();
    let file = PatientFile {
        id: Uuid::new_v4(),
        patient_id: new.patient_id.trim().to_string(),
        record: new.record.clone(),
        created_at: now,
        updated_at: now,
    };
    let record_json = serde_json::to_string(&file.record)?;

    conn.execute(
        "INSERT INTO patient_files (id, patient_id, record, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            file.id.to_string(),
            file.patient_id,
            record_json,
            format_timestamp(&file.created_at),
            format_timestamp(&file.updated_at),
        ],
    )
    .map_err(|e| DatabaseError::from_insert(e, "patient_file", &file.patient_id))?;

    tracing::info!(file_id = %file.id, "Patient file created");
    Ok(file)
}

pub fn get_patient_file(
    conn: &Connection,
    patient_id: &str,
) -> Result<Option<PatientFile>, DatabaseError> {
    conn.query_row(
        "SELECT id, patient_id, record, created_at, updated_at
         FROM patient_files WHERE patient_id = ?1",
        params![patient_id],
        row_to_patient_file,
    )
    .optional()
    .map_err(DatabaseError::from)
}

pub fn list_patient_files(conn: &Connection) -> Result<Vec<PatientFile>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, record, created_at, updated_at
         FROM patient_files ORDER BY patient_id",
    )?;
    let rows = stmt.query_map([], row_to_patient_file)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Replace the sections named in `changes` and bump `updated_at`.
pub fn update_patient_file(
    conn: &Connection,
    patient_id: &str,
    changes: &[PatientFileChange],
) -> Result<PatientFile, DatabaseError> {
    let tx = write_transaction(conn)?;

    let mut file = get_patient_file(&tx, patient_id)?
        .ok_or_else(|| DatabaseError::not_found("patient_file", patient_id))?;

    if !changes.is_empty() {
        for change in changes {
            change.apply(&mut file.record);
        }
        file.updated_at = timestamp_now();
        tx.execute(
            "UPDATE patient_files SET record = ?2, updated_at = ?3 WHERE id = ?1",
            params![
                file.id.to_string(),
                serde_json::to_string(&file.record)?,
                format_timestamp(&file.updated_at),
            ],
        )?;
    }
    tx.commit()?;

    tracing::info!(file_id = %file.id, changes = changes.len(), "Patient file updated");
    Ok(file)
}

pub fn delete_patient_file(conn: &Connection, patient_id: &str) -> Result<(), DatabaseError> {
    let affected = conn.execute(
        "DELETE FROM patient_files WHERE patient_id = ?1",
        params![patient_id],
    )?;
    if affected == 0 {
        return Err(DatabaseError::not_found("patient_file", patient_id));
    }
    tracing::info!(patient_id, "Patient file deleted");
    Ok(())
}

fn row_to_patient_file(row: &rusqlite::Row) -> Result<PatientFile, rusqlite::Error> {
    Ok(PatientFile {
        id: column_uuid(row, 0)?,
        patient_id: row.get(1)?,
        record: column_json(row, 2)?,
        created_at: column_timestamp(row, 3)?,
        updated_at: column_timestamp(row, 4)?,
    })
}
