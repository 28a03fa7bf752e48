//! Sage core — shared types, prompt construction, and configuration.
//!
//! - [`types`] — analysis/provider enums, [`types::CallConfig`], chat messages
//! - [`prompt`] — deterministic base system and user prompts
//! - [`config`] — `~/.sage/config.json` schema and env overrides
//! - [`error`] — [`error::ConfigError`]

pub mod config;
pub mod error;
pub mod prompt;
pub mod types;
pub mod utils;

pub use error::ConfigError;
pub use types::{AnalysisType, CallConfig, Message, ProviderId, ReasoningEffort, UsageInfo};
