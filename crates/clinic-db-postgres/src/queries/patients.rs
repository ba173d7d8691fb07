//! Queries against the `patients` table.
//!
//! `fee` is a `numeric(10,2)` column. It is bound as text and cast in SQL,
//! and read back with `fee::text`, so amounts never pass through a float.

use clinic_core::{Gender, NewPatient, Patient, PatientPatch};
use clinic_storage::StorageError;
use sqlx_core::query::query;
use sqlx_core::query_scalar::query_scalar;
use sqlx_core::row::Row;
use sqlx_postgres::{PgPool, PgRow};
use uuid::Uuid;

use crate::error::query_failed;

macro_rules! patient_columns {
    () => {
        "id, name, age, gender, contact_number, visit_date, followup_date, \
         disease_symptoms, prescription_treatment, dose, fee::text AS fee"
    };
}

const SELECT_BY_ID: &str = concat!(
    "SELECT ",
    patient_columns!(),
    " FROM patients WHERE id = $1"
);

const SELECT_BY_ID_FOR_UPDATE: &str = concat!(
    "SELECT ",
    patient_columns!(),
    " FROM patients WHERE id = $1 FOR UPDATE"
);

const SELECT_ALL: &str = concat!(
    "SELECT ",
    patient_columns!(),
    " FROM patients ORDER BY created_seq"
);

const SEARCH: &str = concat!(
    "SELECT ",
    patient_columns!(),
    " FROM patients \
     WHERE strpos(lower(name), lower($1)) > 0 \
        OR strpos(lower(coalesce(contact_number, '')), lower($1)) > 0 \
        OR strpos(lower(disease_symptoms), lower($1)) > 0 \
     ORDER BY created_seq"
);

const INSERT: &str = concat!(
    "INSERT INTO patients (name, age, gender, contact_number, visit_date, followup_date, \
     disease_symptoms, prescription_treatment, dose, fee) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, CAST($10 AS numeric(10, 2))) \
     RETURNING ",
    patient_columns!()
);

const UPDATE: &str = concat!(
    "UPDATE patients SET name = $2, age = $3, gender = $4, contact_number = $5, \
     visit_date = $6, followup_date = $7, disease_symptoms = $8, \
     prescription_treatment = $9, dose = $10, fee = CAST($11 AS numeric(10, 2)) \
     WHERE id = $1 RETURNING ",
    patient_columns!()
);

fn patient_from_row(row: &PgRow) -> Result<Patient, StorageError> {
    let decode = |e: sqlx_core::error::Error| query_failed("Failed to decode patient row", e);

    let id: Uuid = row.try_get("id").map_err(decode)?;
    let gender: String = row.try_get("gender").map_err(decode)?;
    let gender: Gender = gender
        .parse()
        .map_err(|e: String| StorageError::invalid_record(format!("patient {id}: {e}")))?;

    Ok(Patient {
        id,
        name: row.try_get("name").map_err(decode)?,
        age: row.try_get("age").map_err(decode)?,
        gender,
        contact_number: row.try_get("contact_number").map_err(decode)?,
        visit_date: row.try_get("visit_date").map_err(decode)?,
        followup_date: row.try_get("followup_date").map_err(decode)?,
        disease_symptoms: row.try_get("disease_symptoms").map_err(decode)?,
        prescription_treatment: row.try_get("prescription_treatment").map_err(decode)?,
        dose: row.try_get("dose").map_err(decode)?,
        fee: row.try_get("fee").map_err(decode)?,
    })
}

fn patients_from_rows(rows: &[PgRow]) -> Result<Vec<Patient>, StorageError> {
    rows.iter().map(patient_from_row).collect()
}

/// Reads one patient by id.
pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Patient>, StorageError> {
    let row = query(SELECT_BY_ID)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| query_failed("Failed to read patient", e))?;

    row.as_ref().map(patient_from_row).transpose()
}

/// Reads every patient in insertion order.
pub async fn list(pool: &PgPool) -> Result<Vec<Patient>, StorageError> {
    let rows = query(SELECT_ALL)
        .fetch_all(pool)
        .await
        .map_err(|e| query_failed("Failed to list patients", e))?;

    patients_from_rows(&rows)
}

/// Case-insensitive substring search, in insertion order.
pub async fn search(pool: &PgPool, needle: &str) -> Result<Vec<Patient>, StorageError> {
    let rows = query(SEARCH)
        .bind(needle)
        .fetch_all(pool)
        .await
        .map_err(|e| query_failed("Failed to search patients", e))?;

    patients_from_rows(&rows)
}

/// Inserts a patient; the database assigns the id.
pub async fn insert(pool: &PgPool, input: &NewPatient) -> Result<Patient, StorageError> {
    let row = query(INSERT)
        .bind(&input.name)
        .bind(input.age)
        .bind(input.gender.as_str())
        .bind(&input.contact_number)
        .bind(&input.visit_date)
        .bind(&input.followup_date)
        .bind(&input.disease_symptoms)
        .bind(&input.prescription_treatment)
        .bind(&input.dose)
        .bind(&input.fee)
        .fetch_one(pool)
        .await
        .map_err(|e| query_failed("Failed to create patient", e))?;

    patient_from_row(&row)
}

/// Merges `patch` into the stored row under a row lock.
///
/// Returns `None` without writing when no row has this id.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    patch: PatientPatch,
) -> Result<Option<Patient>, StorageError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| query_failed("Failed to begin transaction", e))?;

    let row = query(SELECT_BY_ID_FOR_UPDATE)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| query_failed("Failed to lock patient", e))?;

    let Some(row) = row else {
        return Ok(None);
    };
    let mut patient = patient_from_row(&row)?;

    if !patch.is_empty() {
        patch.apply_to(&mut patient);
        let row = query(UPDATE)
            .bind(id)
            .bind(&patient.name)
            .bind(patient.age)
            .bind(patient.gender.as_str())
            .bind(&patient.contact_number)
            .bind(&patient.visit_date)
            .bind(&patient.followup_date)
            .bind(&patient.disease_symptoms)
            .bind(&patient.prescription_treatment)
            .bind(&patient.dose)
            .bind(&patient.fee)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| query_failed("Failed to update patient", e))?;
        patient = patient_from_row(&row)?;
    }

    tx.commit()
        .await
        .map_err(|e| query_failed("Failed to commit update", e))?;

    Ok(Some(patient))
}

/// Deletes a patient. Returns `true` if a row was removed.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, StorageError> {
    let result = query("DELETE FROM patients WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| query_failed("Failed to delete patient", e))?;

    Ok(result.rows_affected() > 0)
}

pub async fn count(pool: &PgPool) -> Result<usize, StorageError> {
    let count: i64 = query_scalar("SELECT count(*) FROM patients")
        .fetch_one(pool)
        .await
        .map_err(|e| query_failed("Failed to count patients", e))?;

    usize::try_from(count).map_err(|e| StorageError::internal(format!("Invalid count: {e}")))
}
