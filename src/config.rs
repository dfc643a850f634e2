//! Configuration management for the sync server
//!
//! Built once at startup from an optional `config.toml` plus environment
//! overrides, then passed explicitly to the server. Nothing reads process
//! state after that.

use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Prefix for environment overrides, e.g. `FANREN_SYNC_PASSWORD`.
pub const ENV_PREFIX: &str = "FANREN_SYNC";

/// Environment variable naming an extra config file to load.
pub const CONFIG_PATH_ENV: &str = "FANREN_SYNC_CONFIG";

/// Default cap on request bodies, in bytes.
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Complete server configuration
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
    /// IP address to bind the HTTP listener
    pub bind_address: String,

    /// Port for the HTTP listener
    pub port: u16,

    /// Directory holding the `<name>.json` archives
    pub data_dir: String,

    /// Shared access password, the first path segment of every API route
    #[serde(default)]
    pub password: String,

    /// Largest accepted request body; bigger saves answer 413
    pub max_body_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Self::defaults()?
            .add_source(File::with_name("config").required(false));

        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            builder = builder.add_source(File::with_name(&path));
        }

        Self::build(builder.add_source(Environment::with_prefix(ENV_PREFIX)))
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("bind_address", "0.0.0.0")?
            .set_default("port", 8000)?
            .set_default("data_dir", "data")?
            .set_default("max_body_bytes", DEFAULT_MAX_BODY_BYTES as u64)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: ServerConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        if self.password.is_empty() {
            return Err(ConfigError::Message(format!(
                "password is not set; set {ENV_PREFIX}_PASSWORD or `password` in config.toml"
            )));
        }

        if self.port == 0 {
            return Err(ConfigError::Message("port cannot be 0".into()));
        }

        if self.data_dir.is_empty() {
            return Err(ConfigError::Message("data_dir cannot be empty".into()));
        }

        if self.max_body_bytes == 0 {
            return Err(ConfigError::Message("max_body_bytes cannot be 0".into()));
        }

        self.socket_addr()?;
        Ok(())
    }

    /// Bind address and port as a socket address
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_address, self.port)
            .parse()
            .map_err(|e| ConfigError::Message(format!("invalid bind address: {e}")))
    }

    /// Get data directory as PathBuf
    pub fn data_dir_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_address", &self.bind_address)
            .field("port", &self.port)
            .field("data_dir", &self.data_dir)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::config::FileFormat;

    fn from_toml(toml: &str) -> Result<ServerConfig, ConfigError> {
        ServerConfig::build(
            ServerConfig::defaults()
                .unwrap()
                .add_source(File::from_str(toml, FileFormat::Toml)),
        )
    }

    #[test]
    fn defaults_fill_missing_keys() {
        let config = from_toml(r#"password = "pw""#).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert_eq!(config.data_dir_path(), PathBuf::from("data"));
        assert_eq!(config.socket_addr().unwrap().port(), 8000);
        assert_eq!(config.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
    }

    #[test]
    fn file_values_override_defaults() {
        let config = from_toml(
            r#"
            bind_address = "127.0.0.1"
            port = 9100
            data_dir = "/var/lib/fanren-sync"
            password = "pw"
            max_body_bytes = 65536
            "#,
        )
        .unwrap();
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:9100");
        assert_eq!(config.data_dir, "/var/lib/fanren-sync");
        assert_eq!(config.max_body_bytes, 65536);
    }

    #[test]
    fn missing_password_is_rejected() {
        let err = from_toml("port = 9000").unwrap_err();
        assert!(err.to_string().contains("password"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(from_toml("password = \"pw\"\nport = 0").is_err());
        assert!(from_toml("password = \"pw\"\ndata_dir = \"\"").is_err());
        assert!(from_toml("password = \"pw\"\nmax_body_bytes = 0").is_err());
        assert!(from_toml("password = \"pw\"\nbind_address = \"not an ip\"").is_err());
    }

    #[test]
    fn debug_redacts_password() {
        let config = from_toml(r#"password = "hunter2""#).unwrap();
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
