//! Configuration management for todolist.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "todolist";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "todo.db";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "TODOLIST_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables prefixed with `TODOLIST_`, `__` separating
///    sections (e.g. `TODOLIST_SERVER__PORT`)
/// 2. The bare `PORT` environment variable, for `server.port`
/// 3. TOML config file at `~/.config/todolist/config.toml`
/// 4. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Due-date reminder configuration.
    pub reminders: ReminderConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to listen on.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/todolist/todo.db`
    pub database_path: Option<PathBuf>,
}

/// Due-date reminder configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    /// How many days after today still count as "due soon".
    pub soon_window_days: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            soon_window_days: 1,
        }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);
        Self::from_figment(Self::figment(&config_file))
    }

    /// The layered provider stack for a given config file.
    #[must_use]
    pub fn figment(config_file: &std::path::Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::raw().only(&["PORT"]).map(|_| "server.port".into()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Extract and validate a configuration from a provider stack.
    ///
    /// # Errors
    ///
    /// Returns an error if extraction or validation fails.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "server.host cannot be empty".to_string(),
            });
        }

        if self.server.port == 0 {
            return Err(Error::ConfigValidation {
                message: "server.port must be greater than 0".to_string(),
            });
        }

        if self.reminders.soon_window_days == 0 {
            return Err(Error::ConfigValidation {
                message: "reminders.soon_window_days must be at least 1".to_string(),
            });
        }

        self.bind_addr()?;
        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// The socket address the server listens on.
    ///
    /// # Errors
    ///
    /// Returns an error if `server.host` is not an IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse().map_err(|_| Error::ConfigValidation {
            message: format!("server.host is not a valid IP address: {}", self.server.host),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert!(config.storage.database_path.is_none());
        assert_eq!(config.reminders.soon_window_days, 1);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("server.port"));
    }

    #[test]
    fn test_validate_empty_host() {
        let mut config = Config::default();
        config.server.host = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("server.host"));
    }

    #[test]
    fn test_validate_bad_host() {
        let mut config = Config::default();
        config.server.host = "not an ip".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("not a valid IP address"));
    }

    #[test]
    fn test_validate_zero_soon_window() {
        let mut config = Config::default();
        config.reminders.soon_window_days = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("soon_window_days"));
    }

    #[test]
    fn test_bind_addr() {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 8080;

        assert_eq!(config.bind_addr().unwrap().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_database_path_default() {
        let config = Config::default();
        let path = config.database_path();

        assert!(path.to_string_lossy().contains("todolist"));
        assert!(path.to_string_lossy().ends_with("todo.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/todo.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/todo.sqlite")
        );
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("todolist"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        Jail::expect_with(|_jail| {
            let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")))
                .expect("defaults should load");
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_load_from_toml_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "todolist.toml",
                r#"
                [server]
                port = 8080

                [storage]
                database_path = "/tmp/tasks.db"

                [reminders]
                soon_window_days = 3
                "#,
            )?;

            let config = Config::load_from(Some(PathBuf::from("todolist.toml")))
                .expect("config should load");
            assert_eq!(config.server.port, 8080);
            assert_eq!(config.server.host, "0.0.0.0");
            assert_eq!(config.database_path(), PathBuf::from("/tmp/tasks.db"));
            assert_eq!(config.reminders.soon_window_days, 3);
            Ok(())
        });
    }

    #[test]
    fn test_port_env_var_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("todolist.toml", "[server]\nport = 8080\n")?;
            jail.set_env("PORT", "9090");

            let config = Config::load_from(Some(PathBuf::from("todolist.toml")))
                .expect("config should load");
            assert_eq!(config.server.port, 9090);
            Ok(())
        });
    }

    #[test]
    fn test_prefixed_env_var_wins() {
        Jail::expect_with(|jail| {
            jail.set_env("PORT", "9090");
            jail.set_env("TODOLIST_SERVER__PORT", "7070");
            jail.set_env("TODOLIST_STORAGE__DATABASE_PATH", "/var/lib/todo.db");

            let config = Config::load_from(Some(PathBuf::from("missing.toml")))
                .expect("config should load");
            assert_eq!(config.server.port, 7070);
            assert_eq!(config.database_path(), PathBuf::from("/var/lib/todo.db"));
            Ok(())
        });
    }

    #[test]
    fn test_invalid_file_value_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("todolist.toml", "[reminders]\nsoon_window_days = 0\n")?;

            let result = Config::load_from(Some(PathBuf::from("todolist.toml")));
            assert!(matches!(result, Err(Error::ConfigValidation { .. })));
            Ok(())
        });
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("soon_window_days"));
        assert!(json.contains("database_path"));
    }

    #[test]
    fn test_config_clone() {
        let config = Config::default();
        assert_eq!(config, config.clone());
    }
}
