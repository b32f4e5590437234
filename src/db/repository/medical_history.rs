use chrono::NaiveDate;
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{
    column_date, column_timestamp, column_uuid, find_patient_id, format_timestamp, timestamp_now,
};
use crate::db::{write_transaction, DatabaseError};
use crate::models::{MedicalHistory, NewMedicalHistory};

/// Record a visit note for the patient registered under `id_number`.
/// A missing `visit_date` falls back to `today`.
pub fn insert_medical_history(
    conn: &Connection,
    id_number: &str,
    new: &NewMedicalHistory,
    today: NaiveDate,
) -> Result<MedicalHistory, DatabaseError> {
    let id_number = id_number.trim();
    let tx = write_transaction(conn)?;

    let patient_id = find_patient_id(&tx, id_number)?
        .ok_or_else(|| DatabaseError::not_found("patient", id_number))?;

    let entry = MedicalHistory {
        id: Uuid::new_v4(),
        patient_id,
        doctor_id: new.doctor_id.trim().to_string(),
        visit_date: new.visit_date.unwrap_or(today),
        notes: new.notes.clone(),
        created_at: timestamp_now(),
    };

    tx.execute(
        "INSERT INTO medical_history (id, patient_id, doctor_id, visit_date, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            entry.id.to_string(),
            entry.patient_id.to_string(),
            entry.doctor_id,
            entry.visit_date.to_string(),
            entry.notes,
            format_timestamp(&entry.created_at),
        ],
    )?;
    tx.commit()?;

    tracing::info!(entry_id = %entry.id, "Medical history entry recorded");
    Ok(entry)
}

/// Visit notes for a patient, most recent visit first.
pub fn list_medical_history(
    conn: &Connection,
    id_number: &str,
) -> Result<Vec<MedicalHistory>, DatabaseError> {
    let id_number = id_number.trim();
    let patient_id = find_patient_id(conn, id_number)?
        .ok_or_else(|| DatabaseError::not_found("patient", id_number))?;

    let mut stmt = conn.prepare(
        "SELECT id, patient_id, doctor_id, visit_date, notes, created_at
         FROM medical_history
         WHERE patient_id = ?1
         ORDER BY visit_date DESC, created_at DESC",
    )?;
    let rows = stmt.query_map(params![patient_id.to_string()], |row| {
        Ok(MedicalHistory {
            id: column_uuid(row, 0)?,
            patient_id: column_uuid(row, 1)?,
            doctor_id: row.get(2)?,
            visit_date: column_date(row, 3)?,
            notes: row.get(4)?,
            created_at: column_timestamp(row, 5)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::patient::tests::new_patient;
    use crate::db::repository::{delete_patient, insert_patient};
    use crate::db::sqlite::open_memory_database;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn note(doctor: &str, visit: Option<NaiveDate>) -> NewMedicalHistory {
        NewMedicalHistory {
            doctor_id: doctor.into(),
            visit_date: visit,
            notes: Some("Stable".into()),
        }
    }

    #[test]
    fn entries_listed_newest_visit_first() {
        let conn = open_memory_database().unwrap();
        let patient = insert_patient(&conn, &new_patient("P1", "Ana", "Mensah")).unwrap();

        insert_medical_history(&conn, "P1", &note("D1", Some(date(1, 5))), date(6, 1)).unwrap();
        insert_medical_history(&conn, "P1", &note("D2", None), date(6, 1)).unwrap();

        let entries = list_medical_history(&conn, "P1").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].doctor_id, "D2");
        assert_eq!(entries[0].visit_date, date(6, 1));
        assert!(entries.iter().all(|e| e.patient_id == patient.id));
    }

    #[test]
    fn id_number_is_trimmed_like_appointments() {
        let conn = open_memory_database().unwrap();
        insert_patient(&conn, &new_patient("P1", "Ana", "Mensah")).unwrap();

        insert_medical_history(&conn, " P1 ", &note("D1", None), date(6, 1)).unwrap();
        assert_eq!(list_medical_history(&conn, "P1 ").unwrap().len(), 1);

        match insert_medical_history(&conn, " ghost ", &note("D1", None), date(6, 1)) {
            Err(DatabaseError::NotFound { id, .. }) => assert_eq!(id, "ghost"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn unknown_patient_is_not_found() {
        let conn = open_memory_database().unwrap();
        assert!(matches!(
            insert_medical_history(&conn, "ghost", &note("D1", None), date(6, 1)),
            Err(DatabaseError::NotFound { .. })
        ));
        assert!(matches!(
            list_medical_history(&conn, "ghost"),
            Err(DatabaseError::NotFound { .. })
        ));
    }

    #[test]
    fn entries_removed_with_patient() {
        let conn = open_memory_database().unwrap();
        insert_patient(&conn, &new_patient("P1", "Ana", "Mensah")).unwrap();
        insert_medical_history(&conn, "P1", &note("D1", None), date(6, 1)).unwrap();
        delete_patient(&conn, "P1").unwrap();
        let remaining: i64 = conn
            .query_row("SELECT COUNT(*) FROM medical_history", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 0);
    }
}
