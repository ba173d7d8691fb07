use anyhow::Result;
use clinic_core::{Patient, User};
use colored::Colorize;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::OutputFormat;

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

pub fn print_patient(patient: &Patient, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(patient),
        OutputFormat::Table => {
            let mut builder = Builder::default();
            let id = patient.id.to_string();
            let age = patient.age.to_string();
            builder.push_record(["ID", id.as_str()]);
            builder.push_record(["Name", patient.name.as_str()]);
            builder.push_record(["Age", age.as_str()]);
            builder.push_record(["Gender", patient.gender.as_str()]);
            builder.push_record(["Contact", or_dash(patient.contact_number.as_deref())]);
            builder.push_record(["Visit", or_dash(patient.visit_date.as_deref())]);
            builder.push_record(["Follow-up", or_dash(patient.followup_date.as_deref())]);
            builder.push_record(["Disease/Symptoms", patient.disease_symptoms.as_str()]);
            builder.push_record([
                "Prescription",
                or_dash(patient.prescription_treatment.as_deref()),
            ]);
            builder.push_record(["Dose", or_dash(patient.dose.as_deref())]);
            builder.push_record(["Fee", or_dash(patient.fee.as_deref())]);
            println!("{}", builder.build().with(Style::rounded()));
            Ok(())
        }
    }
}

pub fn print_patients(patients: &[Patient], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(patients),
        OutputFormat::Table => {
            if patients.is_empty() {
                println!("No patients found.");
                return Ok(());
            }
            let mut builder = Builder::default();
            builder.push_record(["ID", "Name", "Age", "Gender", "Visit", "Disease/Symptoms"]);
            for p in patients {
                builder.push_record([
                    p.id.to_string(),
                    p.name.clone(),
                    p.age.to_string(),
                    p.gender.to_string(),
                    or_dash(p.visit_date.as_deref()).to_string(),
                    p.disease_symptoms.clone(),
                ]);
            }
            println!("{}", builder.build().with(Style::rounded()));
            Ok(())
        }
    }
}

pub fn print_user(user: &User, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(user),
        OutputFormat::Table => {
            let mut builder = Builder::default();
            builder.push_record(["ID", "Username"]);
            builder.push_record([user.id.to_string(), user.username.clone()]);
            println!("{}", builder.build().with(Style::rounded()));
            Ok(())
        }
    }
}
