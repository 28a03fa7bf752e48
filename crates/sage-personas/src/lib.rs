//! Sage Personas — personality profiles layered over model dispatch.
//!
//! This crate contains:
//! - **persona**: the `Persona` trait and its static traits data
//! - **context**: request-scoped options (`PersonaContext`)
//! - **charles**: the built-in Charles persona
//! - **registry**: the explicit persona catalog
//! - **consult**: the end-to-end consultation pipeline

pub mod charles;
pub mod consult;
pub mod context;
pub mod error;
pub mod persona;
pub mod registry;

pub use charles::CharlesPersona;
pub use consult::{consult, ConsultRequest};
pub use context::{AudienceLevel, OutputFormat, PersonaContext, ToneStyle, UnknownOption};
pub use error::PersonaError;
pub use persona::{CatchphraseMoment, Persona, PersonaTraits};
pub use registry::PersonaRegistry;
