//! StreamFlow terminal player
//!
//! Headless controller for a StreamFlow backend: logs in, resolves songs or
//! a playlist, and drives a `PlayerFacade` from typed commands.
//!
//! This library exposes the components for testing purposes.

pub mod app;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

// Re-export commonly used types for convenience
pub use app::{PlayRequest, PlayerApp};
pub use commands::Command;
pub use config::AppConfig;
pub use error::{CliError, Result};
pub use output::SimulatedOutput;
