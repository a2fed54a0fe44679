/// CLI configuration
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use streamflow_client::{ServerConfig, DEFAULT_SERVER_URL};
use streamflow_playback::PlayerConfig;

/// Config file read from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "streamflow.toml";

/// Prefix for environment overrides (`STREAMFLOW_SERVER__URL`, ...)
pub const ENV_PREFIX: &str = "STREAMFLOW";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub auth: AuthSettings,

    #[serde(default)]
    pub player: PlayerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthSettings {
    /// Token from an earlier `streamflow login`
    pub access_token: Option<String>,

    pub email: Option<String>,

    pub password: Option<String>,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `streamflow.toml` is read if
    /// present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        settings = match path {
            Some(path) => settings.add_source(config::File::from(path)),
            None => settings.add_source(config::File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        // Override with environment variables (prefixed with STREAMFLOW_)
        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document, without environment overrides
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(contents, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.url.trim().is_empty() {
            return Err(CliError::Config("server.url is required".to_string()));
        }

        if self.player.volume > 100 {
            return Err(CliError::Config(format!(
                "player.volume must be 0-100, got {}",
                self.player.volume
            )));
        }

        if self.server.timeout_secs == 0 {
            return Err(CliError::Config(
                "server.timeout_secs must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Client configuration for the backend
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            url: self.server.url.clone(),
            access_token: self.auth.access_token.clone(),
            timeout_secs: self.server.timeout_secs,
            connect_timeout_secs: self.server.connect_timeout_secs,
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

// Default values
fn default_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}
