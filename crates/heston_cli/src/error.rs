//! CLI error types.

use thiserror::Error;

/// Errors surfaced to the command line.
#[derive(Error, Debug)]
pub enum CliError {
    /// Engine configuration rejected.
    #[error("configuration error: {0}")]
    Config(#[from] heston_engine::ConfigError),

    /// Model parameters rejected.
    #[error("model error: {0}")]
    Model(#[from] heston_models::HestonError),

    /// Contract parameters rejected.
    #[error("contract error: {0}")]
    Contract(#[from] heston_models::ContractError),

    /// JSON serialisation failed.
    #[error("serialisation error: {0}")]
    Serialisation(#[from] serde_json::Error),

    /// A kernel requires an argument that was not supplied.
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
}

/// Convenience alias for CLI results.
pub type Result<T> = std::result::Result<T, CliError>;
