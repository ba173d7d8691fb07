use anyhow::Result;
use clinic_core::validate_new_user;
use clinic_storage::ClinicStorage;
use colored::Colorize;
use serde_json::json;

use super::lookup_id;
use crate::cli::OutputFormat;
use crate::output::{print_success, print_user};

pub async fn add(
    storage: &dyn ClinicStorage,
    username: &str,
    password: &str,
    format: OutputFormat,
) -> Result<()> {
    let input = validate_new_user(&json!({ "username": username, "password": password }))?;
    let user = storage.create_user(input).await?;
    print_success(&format!("Created user {}", user.username.cyan()));
    print_user(&user, format)
}

pub async fn get(storage: &dyn ClinicStorage, id: &str, format: OutputFormat) -> Result<()> {
    let found = match lookup_id(id) {
        Some(uuid) => storage.get_user(uuid).await?,
        None => None,
    };
    match found {
        Some(user) => print_user(&user, format),
        None => anyhow::bail!("User not found: {id}"),
    }
}

pub async fn find(storage: &dyn ClinicStorage, username: &str, format: OutputFormat) -> Result<()> {
    match storage.get_user_by_username(username).await? {
        Some(user) => print_user(&user, format),
        None => anyhow::bail!("User not found: {username}"),
    }
}

pub async fn verify(storage: &dyn ClinicStorage, username: &str, password: &str) -> Result<()> {
    if storage
        .verify_user_password(username, password)
        .await?
        .is_none()
    {
        anyhow::bail!("Invalid username or password");
    }
    print_success(&format!("Credentials accepted for {}", username.cyan()));
    Ok(())
}
