//! Error types for model invocation and dispatch.

use sage_core::{ConfigError, ProviderId};
use thiserror::Error;

/// Failure raised by a [`ModelInvoker`](crate::traits::ModelInvoker).
///
/// The dispatcher never interprets or retries these.
#[derive(Error, Debug)]
pub enum InvokeError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("no choices in response")]
    EmptyResponse,

    #[error("no API key configured for {0}")]
    NotConfigured(ProviderId),
}

/// Error returned by [`Dispatcher::invoke`](crate::Dispatcher::invoke).
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Raised before any model invocation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Raised by the model invoker, passed through as-is.
    #[error(transparent)]
    Upstream(#[from] InvokeError),
}

impl DispatchError {
    pub fn is_unsupported_provider(&self) -> bool {
        matches!(self, DispatchError::Config(ConfigError::UnsupportedProvider(_)))
    }
}
