//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Leave engine policy switches.
    #[serde(default)]
    pub leave: LeaveSettings,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Policy switches for the leave request lifecycle.
///
/// Both switches settle behavior the request lifecycle leaves open:
/// what happens to a debited balance when an approved request is
/// cancelled, and whether approval needs a balance row at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LeaveSettings {
    /// Approve requests even when the employee has no balance row for the
    /// leave type and year. The balance side is then left untouched.
    #[serde(default = "default_true")]
    pub approve_without_balance: bool,
    /// Credit the balance back when an approved request is cancelled.
    #[serde(default = "default_true")]
    pub restore_balance_on_cancel: bool,
}

impl Default for LeaveSettings {
    fn default() -> Self {
        Self {
            approve_without_balance: true,
            restore_balance_on_cancel: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "leavewise=info,sea_orm=warn".to_string()
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("LEAVEWISE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leave_settings_default() {
        let settings = LeaveSettings::default();
        assert!(settings.approve_without_balance);
        assert!(settings.restore_balance_on_cancel);
    }

    fn from_toml(source: &str) -> Result<AppConfig, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn test_sections_fall_back_to_defaults() {
        let config = from_toml(
            r#"
            [database]
            url = "postgres://localhost/leavewise_test"

            [leave]
            approve_without_balance = false
            "#,
        )
        .expect("config should load");

        assert_eq!(config.database.url, "postgres://localhost/leavewise_test");
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.database.min_connections, 1);
        assert!(!config.leave.approve_without_balance);
        assert!(config.leave.restore_balance_on_cancel);
        assert_eq!(config.logging.filter, "leavewise=info,sea_orm=warn");
    }

    #[test]
    fn test_logging_filter_override() {
        let config = from_toml(
            r#"
            [database]
            url = "postgres://localhost/leavewise_test"

            [logging]
            filter = "leavewise=debug"
            "#,
        )
        .expect("config should load");

        assert_eq!(config.logging.filter, "leavewise=debug");
        assert_eq!(config.leave, LeaveSettings::default());
    }

    #[test]
    fn test_missing_database_url_fails() {
        assert!(from_toml("[leave]\nrestore_balance_on_cancel = false\n").is_err());
    }
}
