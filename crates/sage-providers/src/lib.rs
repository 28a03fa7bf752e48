//! Model provider layer for Sage.
//!
//! # Architecture
//!
//! - [`traits::ModelInvoker`] — trait every model backend client implements
//! - [`registry`] — static specs for the supported providers + per-request strategies
//! - [`http_provider::HttpInvoker`] — OpenAI-compatible HTTP client covering xAI and OpenAI
//! - [`token_format`] — human-readable usage annotation
//! - [`dispatcher::Dispatcher`] — validate provider → build prompt → invoke once → annotate

pub mod dispatcher;
pub mod error;
pub mod http_provider;
pub mod registry;
pub mod token_format;
pub mod traits;

// Re-export main types for convenience
pub use dispatcher::Dispatcher;
pub use error::{DispatchError, InvokeError};
pub use http_provider::HttpInvoker;
pub use registry::{ProviderRegistry, ProviderSpec, ProviderStrategy, PROVIDERS};
pub use token_format::format_token_info;
pub use traits::{Generation, ModelHandle, ModelInvoker, ProviderOptions};
