use clap::{Parser, Subcommand, ValueEnum};

use crate::config::StorageBackend;

#[derive(Parser)]
#[command(name = "clinic")]
#[command(about = "Clinic records: register, list and search patients")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to clinic.toml in the working directory)
    #[arg(short, long, global = true, env = "CLINIC_CONFIG")]
    pub config: Option<String>,

    /// Storage backend (overrides configuration)
    #[arg(short, long, global = true)]
    pub backend: Option<StorageBackend>,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage patient records
    Patient(PatientArgs),
    /// Manage user accounts
    User(UserArgs),
    /// Run PostgreSQL migrations
    Migrate,
    /// Print the resolved configuration
    Config,
}

#[derive(clap::Args)]
pub struct PatientArgs {
    #[command(subcommand)]
    pub command: PatientCommands,
}

#[derive(Subcommand)]
pub enum PatientCommands {
    /// Register a patient from a JSON document
    Add(BodyArgs),
    /// Show one patient
    Get(IdArgs),
    /// List all patients, most recent visit first
    List,
    /// Search name, contact number and symptoms
    Search(SearchArgs),
    /// Change some fields of a patient from a partial JSON document
    Update(UpdateArgs),
    /// Delete a patient
    Delete(IdArgs),
}

#[derive(clap::Args)]
pub struct BodyArgs {
    /// Path to JSON file (reads from stdin if omitted)
    #[arg(long)]
    pub file: Option<String>,
}

#[derive(clap::Args)]
pub struct IdArgs {
    /// Record id
    pub id: String,
}

#[derive(clap::Args)]
pub struct SearchArgs {
    /// Case-insensitive text to look for (empty matches everything)
    #[arg(default_value = "")]
    pub query: String,
}

#[derive(clap::Args)]
pub struct UpdateArgs {
    /// Patient id
    pub id: String,
    /// Path to JSON file (reads from stdin if omitted)
    #[arg(long)]
    pub file: Option<String>,
}

#[derive(clap::Args)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommands,
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a user account
    Add(CredentialArgs),
    /// Show a user by id
    Get(IdArgs),
    /// Show a user by username
    Find(FindArgs),
    /// Check a username/password pair
    Verify(CredentialArgs),
}

#[derive(clap::Args)]
pub struct CredentialArgs {
    /// Username
    #[arg(short, long)]
    pub username: String,
    /// Password
    #[arg(long, env = "CLINIC_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(clap::Args)]
pub struct FindArgs {
    /// Exact username
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "clinic", "patient", "search", "smith", "--backend", "memory", "--format", "table",
        ])
        .unwrap();
        assert_eq!(cli.backend, Some(StorageBackend::Memory));
        assert_eq!(cli.format, Some(OutputFormat::Table));
        let Commands::Patient(PatientArgs {
            command: PatientCommands::Search(args),
        }) = cli.command
        else {
            panic!("expected patient search");
        };
        assert_eq!(args.query, "smith");
    }

    #[test]
    fn test_search_query_defaults_to_empty() {
        let cli = Cli::try_parse_from(["clinic", "patient", "search"]).unwrap();
        let Commands::Patient(PatientArgs {
            command: PatientCommands::Search(args),
        }) = cli.command
        else {
            panic!("expected patient search");
        };
        assert_eq!(args.query, "");
    }
}
