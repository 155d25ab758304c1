//! Configuration management for tiny-ftpd
//!
//! Settings are read from an optional `config.toml` and then from
//! `TINY_FTPD_*` environment variables. Any key left out keeps its default.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Complete server configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ServerConfig {
    #[serde(flatten)]
    pub network: NetworkConfig,

    #[serde(flatten)]
    pub auth: AuthConfig,
}

/// Listener, data channel and command line limits
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct NetworkConfig {
    /// IP address to bind the control connection
    pub bind_address: String,

    /// Port for the control connection
    pub control_port: u16,

    /// Directory that LIST paths are resolved against
    pub server_root: String,

    /// Upper bound for opening an active-mode data connection
    pub data_connect_timeout_secs: u64,

    /// Maximum accepted command line length, CRLF included
    pub max_command_length: usize,
}

/// Credential policy settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AuthConfig {
    pub default_username: String,
    pub default_password: String,

    /// Failed PASS attempts before the session is closed, 0 means unlimited
    pub max_login_attempts: u32,

    /// Pause applied before answering a failed PASS
    pub login_failure_delay_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            control_port: 8080,
            server_root: ".".to_string(),
            data_connect_timeout_secs: 10,
            max_command_length: 512,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            default_username: "user".to_string(),
            default_password: "pass".to_string(),
            max_login_attempts: 0,
            login_failure_delay_ms: 0,
        }
    }
}

impl ServerConfig {
    /// Load configuration from the given file (or `./config.toml` when it
    /// exists) with environment overrides applied on top.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => File::with_name(path).required(true),
            None => File::with_name("config").required(false),
        };

        let settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("TINY_FTPD").try_parsing(true))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.network.control_port == 0 {
            return Err(config::ConfigError::Message(
                "Control port cannot be 0".into(),
            ));
        }

        if self.network.data_connect_timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "data_connect_timeout_secs must be greater than 0".into(),
            ));
        }

        // "PORT 255,255,255,255,255,255\r\n" is 30 bytes
        if self.network.max_command_length < 32 {
            return Err(config::ConfigError::Message(
                "max_command_length must be at least 32".into(),
            ));
        }

        if self.network.server_root.is_empty() {
            return Err(config::ConfigError::Message(
                "server_root cannot be empty".into(),
            ));
        }

        if self.auth.default_username.is_empty() {
            return Err(config::ConfigError::Message(
                "default_username cannot be empty".into(),
            ));
        }

        Ok(())
    }
}

impl NetworkConfig {
    /// Bind address and control port as a socket address string
    pub fn control_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.control_port)
    }

    pub fn server_root_path(&self) -> PathBuf {
        PathBuf::from(&self.server_root)
    }

    pub fn data_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.data_connect_timeout_secs)
    }
}

impl AuthConfig {
    pub fn login_failure_delay(&self) -> Duration {
        Duration::from_millis(self.login_failure_delay_ms)
    }
}
