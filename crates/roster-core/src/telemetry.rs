//! Logging initialisation.
//!
//! Builds the global `tracing` subscriber from [`TelemetryConfig`]. The
//! `RUST_LOG` environment variable, when set, takes precedence over the
//! configured filter.

#[cfg(feature = "telemetry")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use serde::{Deserialize, Serialize};

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, one event per line.
    #[default]
    Pretty,
    /// Structured JSON, one object per line.
    Json,
}

/// Telemetry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// `EnvFilter` directives, e.g. `info,roster_service=debug`.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log line format.
    #[serde(default)]
    pub log_format: LogFormat,

    /// Include the event target (module path) in each line.
    #[serde(default = "default_with_target")]
    pub with_target: bool,
}

fn default_log_level() -> String {
    "info,roster=debug,tower_http=debug".to_string()
}

fn default_with_target() -> bool {
    true
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            with_target: default_with_target(),
        }
    }
}

/// Installs the global subscriber.
///
/// Fails if a global subscriber has already been set.
#[cfg(feature = "telemetry")]
pub fn init_telemetry(config: &TelemetryConfig) -> crate::RosterResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| crate::RosterError::Configuration(format!("Invalid log filter: {}", e)))?;

    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(config.with_target))
            .try_init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(config.with_target))
            .try_init(),
    };

    result.map_err(|e| crate::RosterError::Internal(format!("Failed to initialise logging: {}", e)))?;

    tracing::debug!(format = ?config.log_format, "Logging initialised");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TelemetryConfig::default();
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.log_level.starts_with("info"));
        assert!(config.with_target);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: TelemetryConfig = serde_json::from_str(r#"{"log_format":"json"}"#).unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_level, default_log_level());
    }
}
