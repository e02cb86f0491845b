//! Runtime configuration.
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults
//! 2. `diveclub.toml` in the working directory, or the file given with
//!    `--config`
//! 3. `DATABASE_URL`
//! 4. `DIVECLUB_` environment variables; the first `_` after the prefix
//!    separates section from key, so `DIVECLUB_DATABASE_MAX_CONNECTIONS`
//!    sets `database.max_connections`

use std::net::SocketAddr;
use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::pagination::DEFAULT_PER_PAGE;

/// Configuration file read when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "diveclub.toml";

const ENV_PREFIX: &str = "DIVECLUB_";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub pagination: PaginationConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the HTTP server listens on.
    pub bind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Sea-ORM connection URL.
    pub url: String,
    /// Pool size. In-memory SQLite always uses a single connection.
    pub max_connections: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Rows per page in the HTML lists.
    pub per_page: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".to_string(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://diveclub.db?mode=rwc".to_string(),
            max_connections: 10,
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Config {
    /// Load configuration from [`CONFIG_FILE_NAME`] and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed or the result is invalid.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, reading `config_path` instead of the default file.
    ///
    /// # Errors
    ///
    /// Returns an error if `config_path` does not exist, a source cannot be
    /// parsed or the result is invalid.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_path.filter(|path| !path.is_file()) {
            return Err(Error::ConfigValidation {
                message: format!("configuration file not found: {}", path.display()),
            });
        }
        let config: Self = Self::figment(config_path).extract()?;
        config.validate()?;
        Ok(config)
    }

    fn figment(config_path: Option<&Path>) -> Figment {
        let file = config_path.unwrap_or_else(|| Path::new(CONFIG_FILE_NAME));

        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(file))
            .merge(Env::raw().only(&["DATABASE_URL"]).map(|_| "database.url".into()))
            .merge(Env::prefixed(ENV_PREFIX).map(|key| key.as_str().replacen('_', ".", 1).into()))
    }

    /// # Errors
    ///
    /// Returns a validation error for an empty database URL, a zero pool or
    /// page size, or a bind address that is not `host:port`.
    pub fn validate(&self) -> Result<()> {
        if self.database.url.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "database.url must not be empty".to_string(),
            });
        }

        if self.database.max_connections == 0 {
            return Err(Error::ConfigValidation {
                message: "database.max_connections must be greater than 0".to_string(),
            });
        }

        if self.pagination.per_page == 0 {
            return Err(Error::ConfigValidation {
                message: "pagination.per_page must be greater than 0".to_string(),
            });
        }

        self.bind_addr()?;
        Ok(())
    }

    /// The parsed `server.bind` address.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the value is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server.bind.parse().map_err(|_| Error::ConfigValidation {
            message: format!("server.bind is not a socket address: {}", self.server.bind),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pagination.per_page, 10);
        assert_eq!(config.bind_addr().unwrap().port(), 8000);
    }

    #[test]
    fn test_validate_empty_url() {
        let mut config = Config::default();
        config.database.url = "  ".to_string();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("database.url"));
    }

    #[test]
    fn test_validate_zero_values() {
        let mut config = Config::default();
        config.database.max_connections = 0;
        assert!(config.validate().unwrap_err().to_string().contains("max_connections"));

        let mut config = Config::default();
        config.pagination.per_page = 0;
        assert!(config.validate().unwrap_err().to_string().contains("per_page"));
    }

    #[test]
    fn test_validate_bind() {
        let mut config = Config::default();
        config.server.bind = "localhost".to_string();
        assert!(config.validate().unwrap_err().to_string().contains("server.bind"));
    }

    #[test]
    fn test_file_then_environment() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE_NAME,
                r#"
                [server]
                bind = "0.0.0.0:9000"

                [database]
                url = "sqlite://from-file.db"
                max_connections = 3
                "#,
            )?;
            jail.set_env("DIVECLUB_DATABASE_MAX_CONNECTIONS", "7");
            jail.set_env("DIVECLUB_PAGINATION_PER_PAGE", "25");

            let config = Config::load().map_err(|e| e.to_string())?;
            assert_eq!(config.server.bind, "0.0.0.0:9000");
            assert_eq!(config.database.url, "sqlite://from-file.db");
            assert_eq!(config.database.max_connections, 7);
            assert_eq!(config.pagination.per_page, 25);
            Ok(())
        });
    }

    #[test]
    fn test_database_url_variable() {
        Jail::expect_with(|jail| {
            jail.set_env("DATABASE_URL", "sqlite::memory:");
            let config = Config::load().map_err(|e| e.to_string())?;
            assert_eq!(config.database.url, "sqlite::memory:");

            jail.set_env("DIVECLUB_DATABASE_URL", "sqlite://prefixed.db");
            let config = Config::load().map_err(|e| e.to_string())?;
            assert_eq!(config.database.url, "sqlite://prefixed.db");
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[pagination]\nper_page = 50\n")?;
            let config = Config::load_from(Some(Path::new("custom.toml"))).map_err(|e| e.to_string())?;
            assert_eq!(config.pagination.per_page, 50);
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file_is_rejected() {
        Jail::expect_with(|_jail| {
            let err = Config::load_from(Some(Path::new("typo.toml"))).unwrap_err();
            assert!(matches!(err, Error::ConfigValidation { .. }), "{err}");
            assert!(err.to_string().contains("typo.toml"));
            // Without --config a missing default file just means defaults.
            assert!(Config::load().is_ok());
            Ok(())
        });
    }

    #[test]
    fn test_invalid_environment_is_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("DIVECLUB_PAGINATION_PER_PAGE", "0");
            assert!(Config::load().is_err());
            Ok(())
        });
    }
}
