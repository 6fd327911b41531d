//! Configuration loader with layered sources.

use crate::{AppConfig, ConfigValidator};
use config::{Config, ConfigError, Environment, File};
use roster_core::{RosterError, RosterResult};
use std::path::PathBuf;
use tracing::{debug, info};

/// Environment variable selecting the `{environment}.toml` overlay.
pub const ENVIRONMENT_VAR: &str = "ROSTER_ENVIRONMENT";

/// Prefix for environment variable overrides, e.g. `ROSTER__SERVER__PORT`.
pub const ENV_PREFIX: &str = "ROSTER";

/// Loads [`AppConfig`] from a configuration directory.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_dir: PathBuf,
}

impl ConfigLoader {
    /// Creates a loader reading from `config_dir`.
    ///
    /// Sources are merged in order, later ones winning:
    /// 1. `{config_dir}/default.toml`
    /// 2. `{config_dir}/{environment}.toml`
    /// 3. `{config_dir}/local.toml` (not committed to version control)
    /// 4. Environment variables with the `ROSTER__` prefix
    ///
    /// Missing files are skipped. Built-in defaults fill anything left unset.
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Loader for the default location (`./config`).
    #[must_use]
    pub fn from_default_location() -> Self {
        Self::new("./config")
    }

    /// Loads and validates the configuration.
    pub fn load(&self) -> RosterResult<AppConfig> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file loaded: {}", e);
        }

        let environment =
            std::env::var(ENVIRONMENT_VAR).unwrap_or_else(|_| "development".to_string());

        self.load_for(&environment)
    }

    /// Loads and validates the configuration for an explicit environment name.
    pub fn load_for(&self, environment: &str) -> RosterResult<AppConfig> {
        info!(
            "Loading configuration from {} for environment: {}",
            self.config_dir.display(),
            environment
        );

        let mut builder = Config::builder();

        for name in ["default", environment, "local"] {
            let path = self.config_dir.join(format!("{}.toml", name));
            if path.exists() {
                debug!("Loading config file: {}", path.display());
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("server.cors_origins"),
        );

        let mut app_config: AppConfig = builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_error_to_roster_error)?;

        app_config.app.environment = environment.to_string();

        ConfigValidator::validate(&app_config).map_err(|errors| {
            let message = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            RosterError::Configuration(message)
        })?;

        Ok(app_config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::from_default_location()
    }
}

fn config_error_to_roster_error(err: ConfigError) -> RosterError {
    RosterError::Configuration(err.to_string())
}
