//! Error types shared across Recipe Gateway services

use thiserror::Error;

/// Top-level error type for the Recipe Gateway platform
#[derive(Debug, Error)]
pub enum RecipeGatewayError {
    /// Graph store I/O failure; recoverable at the service boundary,
    /// never retried inside the engine
    #[error("graph store error: {0}")]
    Store(String),

    /// Configuration loading or validation failure
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid client request
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
