//! Engine error types.

use thiserror::Error;
use tradeguard_domain::DomainError;

/// Errors raised around the evaluator (construction and configuration).
///
/// Evaluation itself never fails; a degenerate trade simply yields no actions.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Domain validation error
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
