use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{column_date, column_uuid, find_patient_id};
use crate::db::{write_transaction, DatabaseError};
use crate::models::{
    Appointment, AppointmentChange, AppointmentDetail, NewAppointment, PatientName,
};

const DETAIL_SELECT: &str = "SELECT a.id, a.patient_id, a.date, a.time, a.doctor, a.reason,
                                    p.first_name, p.last_name
                             FROM appointments a
                             JOIN patients p ON a.patient_id = p.id";

/// Book an appointment for the patient registered under `new.id_number`.
///
/// The patient lookup and the insert share one transaction, so the
/// appointment can never reference a patient that was removed in between.
pub fn create_appointment(
    conn: &Connection,
    new: &NewAppointment,
) -> Result<Appointment, DatabaseError> {
    let tx = write_transaction(conn)?;

    let id_number = new.id_number.trim();
    let patient_id = find_patient_id(&tx, id_number)?
        .ok_or_else(|| DatabaseError::not_found("patient", id_number))?;

    let appointment = Appointment {
        id: Uuid::new_v4(),
        patient_id,
        date: new.date,
        time: new.time.trim().to_string(),
        doctor: new.doctor.clone(),
        reason: new.reason.clone(),
    };

    tx.execute(
        "INSERT INTO appointments (id, patient_id, date, time, doctor, reason)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            appointment.id.to_string(),
            appointment.patient_id.to_string(),
            appointment.date.to_string(),
            appointment.time,
            appointment.doctor,
            appointment.reason,
        ],
    )?;
    tx.commit()?;

    tracing::info!(appointment_id = %appointment.id, "Appointment created");
    Ok(appointment)
}

/// Every appointment with its patient's name, ordered by date then time.
pub fn list_appointments(conn: &Connection) -> Result<Vec<AppointmentDetail>, DatabaseError> {
    let sql = format!("{DETAIL_SELECT} ORDER BY a.date, a.time, p.last_name");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], row_to_detail)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

pub fn get_appointment(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<AppointmentDetail>, DatabaseError> {
    let sql = format!("{DETAIL_SELECT} WHERE a.id = ?1");
    conn.query_row(&sql, params![id.to_string()], row_to_detail)
        .optional()
        .map_err(DatabaseError::from)
}

/// Apply allow-listed changes and return the updated appointment.
/// Fails with `NotFound` (and writes nothing) if `id` does not exist.
pub fn update_appointment(
    conn: &Connection,
    id: &Uuid,
    changes: &[AppointmentChange],
) -> Result<AppointmentDetail, DatabaseError> {
    let tx = write_transaction(conn)?;

    let mut detail =
        get_appointment(&tx, id)?.ok_or_else(|| DatabaseError::not_found("appointment", id))?;

    if !changes.is_empty() {
        for change in changes {
            change.apply(&mut detail.appointment);
        }
        let a = &detail.appointment;
        tx.execute(
            "UPDATE appointments SET date = ?2, time = ?3, doctor = ?4, reason = ?5
             WHERE id = ?1",
            params![
                a.id.to_string(),
                a.date.to_string(),
                a.time,
                a.doctor,
                a.reason,
            ],
        )?;
    }
    tx.commit()?;

    tracing::info!(appointment_id = %id, changes = changes.len(), "Appointment updated");
    Ok(detail)
}

pub fn delete_appointment(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let affected = conn.execute(
        "DELETE FROM appointments WHERE id = ?1",
        params![id.to_string()],
    )?;
    if affected == 0 {
        return Err(DatabaseError::not_found("appointment", id));
    }
    tracing::info!(appointment_id = %id, "Appointment deleted");
    Ok(())
}

fn row_to_detail(row: &rusqlite::Row) -> Result<AppointmentDetail, rusqlite::Error> {
    Ok(AppointmentDetail {
        appointment: Appointment {
            id: column_uuid(row, 0)?,
            patient_id: column_uuid(row, 1)?,
            date: column_date(row, 2)?,
            time: row.get(3)?,
            doctor: row.get(4)?,
            reason: row.get(5)?,
        },
        patient: PatientName {
            first_name: row.get(6)?,
            last_name: row.get(7)?,
        },
    })
}
