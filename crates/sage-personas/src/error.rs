//! Persona lookup and consultation errors.

use sage_providers::DispatchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersonaError {
    #[error("Unknown persona: {0}")]
    UnknownPersona(String),

    #[error("Persona already registered: {0}")]
    DuplicatePersona(String),

    /// Configuration or upstream failure from the dispatcher, unchanged.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}
