use anyhow::Result;
use clinic_core::{validate_new_patient, validate_patient_patch};
use clinic_storage::ClinicStorage;
use colored::Colorize;

use super::{lookup_id, read_body};
use crate::cli::OutputFormat;
use crate::output::{print_patient, print_patients, print_success};

pub async fn add(
    storage: &dyn ClinicStorage,
    file: &Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let body = read_body(file)?;
    let input = validate_new_patient(&body)?;
    let created = storage.create_patient(input).await?;
    print_success(&format!("Registered patient {}", created.id.to_string().cyan()));
    print_patient(&created, format)
}

pub async fn get(storage: &dyn ClinicStorage, id: &str, format: OutputFormat) -> Result<()> {
    let found = match lookup_id(id) {
        Some(uuid) => storage.get_patient(uuid).await?,
        None => None,
    };
    match found {
        Some(patient) => print_patient(&patient, format),
        None => anyhow::bail!("Patient not found: {id}"),
    }
}

pub async fn list(storage: &dyn ClinicStorage, format: OutputFormat) -> Result<()> {
    let patients = storage.get_all_patients().await?;
    print_patients(&patients, format)?;
    if format == OutputFormat::Table {
        println!("Total: {}", storage.count_patients().await?);
    }
    Ok(())
}

pub async fn search(storage: &dyn ClinicStorage, query: &str, format: OutputFormat) -> Result<()> {
    let patients = storage.search_patients(query).await?;
    print_patients(&patients, format)
}

pub async fn update(
    storage: &dyn ClinicStorage,
    id: &str,
    file: &Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let body = read_body(file)?;
    let patch = validate_patient_patch(&body)?;
    let updated = match lookup_id(id) {
        Some(uuid) => storage.update_patient(uuid, patch).await?,
        None => None,
    };
    let Some(patient) = updated else {
        anyhow::bail!("Patient not found: {id}");
    };
    print_success(&format!("Updated patient {}", id.cyan()));
    print_patient(&patient, format)
}

pub async fn delete(storage: &dyn ClinicStorage, id: &str) -> Result<()> {
    let removed = match lookup_id(id) {
        Some(uuid) => storage.delete_patient(uuid).await?,
        None => false,
    };
    if !removed {
        anyhow::bail!("Patient not found: {id}");
    }
    print_success(&format!("Deleted patient {}", id.cyan()));
    Ok(())
}
