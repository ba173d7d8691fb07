//! Command-line front end for clinic records.
//!
//! The binary (`clinic`) is a thin wrapper around [`run`]: it loads `.env`,
//! parses arguments and reports errors. Everything else lives here so it can
//! be tested without spawning a process.

pub mod cli;
pub mod commands;
pub mod config;
pub mod factory;
pub mod observability;
pub mod output;

use anyhow::{Result, anyhow};

use cli::{Cli, Commands, PatientCommands, UserCommands};
use config::loader::load_config;

/// Executes one parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    observability::init_tracing_with_level("warn");

    let mut cfg = load_config(cli.config.as_deref()).map_err(|e| anyhow!(e))?;
    if let Some(backend) = cli.backend {
        cfg.storage.backend = backend;
        cfg.validate().map_err(|e| anyhow!(e))?;
    }
    observability::apply_logging_level(&cfg.logging.level);
    tracing::debug!(backend = ?cfg.storage.backend, "Configuration loaded");

    let format = cli.format.unwrap_or_default();

    match cli.command {
        Commands::Config => {
            print!("{}", cfg.to_masked_toml().map_err(|e| anyhow!(e))?);
        }
        Commands::Migrate => {
            factory::run_migrations(&cfg.storage).await?;
            output::print_success("Migrations applied");
        }
        Commands::Patient(args) => {
            let storage = factory::create_storage(&cfg.storage).await?;
            let storage = storage.as_ref();
            match args.command {
                PatientCommands::Add(a) => commands::patient::add(storage, &a.file, format).await?,
                PatientCommands::Get(a) => commands::patient::get(storage, &a.id, format).await?,
                PatientCommands::List => commands::patient::list(storage, format).await?,
                PatientCommands::Search(a) => {
                    commands::patient::search(storage, &a.query, format).await?
                }
                PatientCommands::Update(a) => {
                    commands::patient::update(storage, &a.id, &a.file, format).await?
                }
                PatientCommands::Delete(a) => commands::patient::delete(storage, &a.id).await?,
            }
        }
        Commands::User(args) => {
            let storage = factory::create_storage(&cfg.storage).await?;
            let storage = storage.as_ref();
            match args.command {
                UserCommands::Add(a) => {
                    commands::user::add(storage, &a.username, &a.password, format).await?
                }
                UserCommands::Get(a) => commands::user::get(storage, &a.id, format).await?,
                UserCommands::Find(a) => commands::user::find(storage, &a.username, format).await?,
                UserCommands::Verify(a) => {
                    commands::user::verify(storage, &a.username, &a.password).await?
                }
            }
        }
    }

    Ok(())
}
