use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{column_opt_date, column_timestamp, column_uuid, format_timestamp, timestamp_now};
use crate::db::DatabaseError;
use crate::models::{NewPatient, Patient};

const PATIENT_COLUMNS: &str =
    "id, id_number, first_name, last_name, date_of_birth, phone_number, created_at, updated_at";

/// Register a patient. Fails with `Duplicate` when `id_number` is taken.
pub fn insert_patient(conn: &Connection, new: &NewPatient) -> Result<Patient, DatabaseError> {
    let now = timestamp_now();
    let patient = Patient {
        id: Uuid::new_v4(),
        id_number: new.id_number.trim().to_string(),
        first_name: new.first_name.trim().to_string(),
        last_name: new.last_name.trim().to_string(),
        date_of_birth: new.date_of_birth,
        phone_number: new.phone_number.clone(),
        created_at: now,
        updated_at: now,
    };

    conn.execute(
        "INSERT INTO patients (id, id_number, first_name, last_name, date_of_birth, phone_number, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            patient.id.to_string(),
            patient.id_number,
            patient.first_name,
            patient.last_name,
            patient.date_of_birth.map(|d| d.to_string()),
            patient.phone_number,
            format_timestamp(&patient.created_at),
            format_timestamp(&patient.updated_at),
        ],
    )
    .map_err(|e| DatabaseError::from_insert(e, "patient", &patient.id_number))?;

    tracing::info!(patient_id = %patient.id, "Patient registered");
    Ok(patient)
}

pub fn get_patient_by_id_number(
    conn: &Connection,
    id_number: &str,
) -> Result<Option<Patient>, DatabaseError> {
    let sql = format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id_number = ?1");
    conn.query_row(&sql, params![id_number.trim()], row_to_patient)
        .optional()
        .map_err(DatabaseError::from)
}

/// Resolve a clinic `id_number` to the internal patient key.
/// Id numbers are stored trimmed, so every lookup trims too.
pub fn find_patient_id(conn: &Connection, id_number: &str) -> Result<Option<Uuid>, DatabaseError> {
    conn.query_row(
        "SELECT id FROM patients WHERE id_number = ?1",
        params![id_number.trim()],
        |row| column_uuid(row, 0),
    )
    .optional()
    .map_err(DatabaseError::from)
}

/// All patients ordered by name. `search` matches a substring of the first
/// name, last name or id number, case-insensitively for ASCII.
pub fn list_patients(
    conn: &Connection,
    search: Option<&str>,
) -> Result<Vec<Patient>, DatabaseError> {
    let pattern = search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", escape_like(s)));

    let sql = format!(
        "SELECT {PATIENT_COLUMNS} FROM patients
         WHERE ?1 IS NULL
            OR first_name LIKE ?1 ESCAPE '\\'
            OR last_name LIKE ?1 ESCAPE '\\'
            OR id_number LIKE ?1 ESCAPE '\\'
         ORDER BY last_name, first_name, id_number"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![pattern], row_to_patient)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Delete a patient. Their appointments and visit notes go with them.
pub fn delete_patient(conn: &Connection, id_number: &str) -> Result<(), DatabaseError> {
    let id_number = id_number.trim();
    let affected = conn.execute(
        "DELETE FROM patients WHERE id_number = ?1",
        params![id_number],
    )?;
    if affected == 0 {
        return Err(DatabaseError::not_found("patient", id_number));
    }
    tracing::info!(id_number, "Patient deleted");
    Ok(())
}

fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn row_to_patient(row: &rusqlite::Row) -> Result<Patient, rusqlite::Error> {
    Ok(Patient {
        id: column_uuid(row, 0)?,
        id_number: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        date_of_birth: column_opt_date(row, 4)?,
        phone_number: row.get(5)?,
        created_at: column_timestamp(row, 6)?,
        updated_at: column_timestamp(row, 7)?,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    pub(crate) fn new_patient(id_number: &str, first: &str, last: &str) -> NewPatient {
        NewPatient {
            id_number: id_number.into(),
            first_name: first.into(),
            last_name: last.into(),
            date_of_birth: None,
            phone_number: None,
        }
    }

    #[test]
    fn insert_and_lookup_by_id_number() {
        let conn = open_memory_database().unwrap();
        let created = insert_patient(&conn, &new_patient("P123", "Ana", "Mensah")).unwrap();

        let found = get_patient_by_id_number(&conn, "P123").unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(find_patient_id(&conn, "P123").unwrap(), Some(created.id));
        assert!(get_patient_by_id_number(&conn, "nope").unwrap().is_none());
    }

    #[test]
    fn duplicate_id_number_rejected() {
        let conn = open_memory_database().unwrap();
        insert_patient(&conn, &new_patient("P1", "Ana", "Mensah")).unwrap();
        let err = insert_patient(&conn, &new_patient("P1", "Kofi", "Boateng")).unwrap_err();
        assert!(matches!(err, DatabaseError::Duplicate { .. }));
    }

    #[test]
    fn list_orders_by_name_and_filters() {
        let conn = open_memory_database().unwrap();
        insert_patient(&conn, &new_patient("P1", "Kofi", "Boateng")).unwrap();
        insert_patient(&conn, &new_patient("P2", "Ana", "Mensah")).unwrap();
        insert_patient(&conn, &new_patient("X_3", "Ama", "Asante")).unwrap();

        let all = list_patients(&conn, None).unwrap();
        let names: Vec<_> = all.iter().map(|p| p.last_name.as_str()).collect();
        assert_eq!(names, vec!["Asante", "Boateng", "Mensah"]);

        let hits = list_patients(&conn, Some("mens")).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id_number, "P2");

        // `_` is literal, not a wildcard
        let hits = list_patients(&conn, Some("X_")).unwrap();
        assert_eq!(hits.len(), 1);
        assert!(list_patients(&conn, Some("P_")).unwrap().is_empty());

        assert_eq!(list_patients(&conn, Some("  ")).unwrap().len(), 3);
    }

    #[test]
    fn delete_nonexistent_fails() {
        let conn = open_memory_database().unwrap();
        let result = delete_patient(&conn, "ghost");
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }
}
