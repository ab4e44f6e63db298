//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults suitable for local development.

use std::env;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port.
    pub port: u16,

    /// Path to the SQLite database file.
    pub database_path: String,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// ## Variables
    /// - `TALLY_PORT` - listen port (default: 8080)
    /// - `TALLY_DATABASE_PATH` - SQLite file path (default: ./tally.db)
    pub fn load() -> Result<Self, ConfigError> {
        let config = ServerConfig {
            port: env::var("TALLY_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("TALLY_PORT".to_string()))?,

            database_path: env::var("TALLY_DATABASE_PATH")
                .unwrap_or_else(|_| "./tally.db".to_string()),
        };

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // Only assert defaults when the variables are unset in the test env
        if env::var("TALLY_PORT").is_err() && env::var("TALLY_DATABASE_PATH").is_err() {
            let config = ServerConfig::load().unwrap();
            assert_eq!(config.port, 8080);
            assert_eq!(config.database_path, "./tally.db");
        }
    }
}
