/// CLI error types
use streamflow_client::ClientError;
use streamflow_playback::PlaybackError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not logged in: {0}")]
    NotLoggedIn(String),

    #[error("Unknown command: {0}")]
    InvalidCommand(String),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Playback(#[from] PlaybackError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        CliError::Config(err.to_string())
    }
}
