//! Configuration errors raised before any model invocation happens.

use thiserror::Error;

/// A request or configuration value that cannot be used.
///
/// Always fatal to the single call and always surfaced before network I/O.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Provider name is unknown, or known but not registered.
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("unknown analysis type: {0}")]
    UnknownAnalysisType(String),

    #[error("unknown reasoning effort: {0}")]
    UnknownReasoningEffort(String),
}
