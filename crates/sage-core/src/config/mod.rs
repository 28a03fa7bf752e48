//! Configuration system — schema, loading, and env var overrides.
//!
//! # Usage
//! ```no_run
//! use sage_core::config;
//!
//! let cfg = config::load_config(None);
//! println!("Persona: {}", cfg.defaults.persona);
//! ```

pub mod loader;
pub mod schema;

// Re-export key types
pub use loader::{get_config_path, load_config};
pub use schema::{Config, DefaultsConfig, ProviderConfig, ProvidersConfig};
