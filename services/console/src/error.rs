//! services/console/src/error.rs
//!
//! Defines the primary error type for the entire console service.

use crate::config::ConfigError;
use school_console_core::ports::GatewayError;

/// The primary error type for the `console` service.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents a normalized failure from the remote gateway.
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// The binary was asked to log in but no credentials were configured.
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),
}
