//! Persona registry — explicit catalog of the personas a process serves.
//!
//! Built once at startup (see [`PersonaRegistry::with_builtin`]) and only
//! read afterwards, so it can be shared across concurrent consultations.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::charles::CharlesPersona;
use crate::error::PersonaError;
use crate::persona::Persona;

/// Personas keyed by id, remembering registration order for listings.
#[derive(Default)]
pub struct PersonaRegistry {
    personas: HashMap<String, Arc<dyn Persona>>,
    order: Vec<String>,
}

impl PersonaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in persona.
    pub fn with_builtin() -> Result<Self, PersonaError> {
        let mut registry = Self::new();
        registry.register(Arc::new(CharlesPersona::new()))?;
        Ok(registry)
    }

    /// Add a persona. A second persona with the same id is rejected.
    pub fn register(&mut self, persona: Arc<dyn Persona>) -> Result<(), PersonaError> {
        let id = persona.id().to_string();
        if self.personas.contains_key(&id) {
            return Err(PersonaError::DuplicatePersona(id));
        }
        info!(persona = %id, name = persona.name(), "registered persona");
        self.order.push(id.clone());
        self.personas.insert(id, persona);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn Persona>> {
        self.personas.get(id)
    }

    /// Like [`get`](Self::get), but an unknown id is an error.
    pub fn require(&self, id: &str) -> Result<&Arc<dyn Persona>, PersonaError> {
        self.get(id).ok_or_else(|| {
            debug!(persona = id, "persona not registered");
            PersonaError::UnknownPersona(id.to_string())
        })
    }

    /// All personas, in registration order.
    pub fn list(&self) -> Vec<&Arc<dyn Persona>> {
        self.order
            .iter()
            .filter_map(|id| self.personas.get(id))
            .collect()
    }

    pub fn ids(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
