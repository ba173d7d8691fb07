//! Application configuration: `clinic.toml` plus `CLINIC__*` environment
//! overrides.

use clap::ValueEnum;
use clinic_db_postgres::PostgresConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        // Logging validation
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        // Storage validation
        if self.storage.backend == StorageBackend::Postgres {
            let Some(ref pg) = self.storage.postgres else {
                return Err("storage.backend = \"postgres\" requires [storage.postgres]".into());
            };
            if pg.url.trim().is_empty() {
                return Err("storage.postgres.url must not be empty".into());
            }
            if pg.pool_size == 0 {
                return Err("storage.postgres.pool_size must be > 0".into());
            }
        }
        Ok(())
    }

    /// Renders the configuration as TOML with the database password masked.
    pub fn to_masked_toml(&self) -> Result<String, String> {
        let mut shown = self.clone();
        if let Some(pg) = shown.storage.postgres.as_mut() {
            pg.url = clinic_db_postgres::mask_password(&pg.url);
        }
        toml::to_string_pretty(&shown).map_err(|e| format!("config render error: {e}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Records live in process memory and vanish on exit
    #[default]
    Memory,
    /// Records live in PostgreSQL
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default)]
    pub postgres: Option<PostgresConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".into()
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    /// Default configuration file, looked up in the working directory.
    pub const DEFAULT_CONFIG_FILE: &str = "clinic.toml";

    /// Loads `path` (or `clinic.toml` when `None`), applies `CLINIC__*`
    /// environment overrides and validates the result. A missing file is not
    /// an error: defaults and environment still apply.
    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        let pathbuf = PathBuf::from(path.unwrap_or(DEFAULT_CONFIG_FILE));
        if pathbuf.exists() {
            builder = builder.add_source(File::from(pathbuf));
        } else if path.is_some() {
            return Err(format!("config file not found: {}", pathbuf.display()));
        }
        // Environment variable overrides, e.g., CLINIC__STORAGE__BACKEND=postgres
        builder = builder.add_source(
            Environment::with_prefix("CLINIC")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.storage.backend, StorageBackend::Memory);
        assert_eq!(cfg.logging.level, "warn");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let mut cfg = AppConfig::default();
        cfg.logging.level = "loud".into();
        assert!(cfg.validate().unwrap_err().contains("logging.level"));
    }

    #[test]
    fn test_postgres_backend_requires_settings() {
        let mut cfg = AppConfig::default();
        cfg.storage.backend = StorageBackend::Postgres;
        assert!(cfg.validate().is_err());

        cfg.storage.postgres = Some(PostgresConfig::new("postgres://localhost/clinic"));
        assert!(cfg.validate().is_ok());

        cfg.storage.postgres =
            Some(PostgresConfig::new("postgres://localhost/clinic").with_pool_size(0));
        assert!(cfg.validate().unwrap_err().contains("pool_size"));
    }

    #[test]
    fn test_masked_toml_hides_password() {
        let mut cfg = AppConfig::default();
        cfg.storage.postgres = Some(PostgresConfig::new("postgres://clinic:secret@db/clinic"));
        let rendered = cfg.to_masked_toml().unwrap();
        assert!(rendered.contains("postgres://clinic:****@db/clinic"));
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("backend = \"memory\""));
    }
}
