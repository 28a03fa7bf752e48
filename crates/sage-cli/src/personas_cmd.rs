//! `sage personas` — list the persona catalog.

use anyhow::{Context, Result};
use colored::Colorize;

use sage_core::utils::truncate_string;
use sage_personas::{Persona, PersonaRegistry};

/// Run the personas command.
pub fn run() -> Result<()> {
    let registry = PersonaRegistry::with_builtin().context("failed to load personas")?;

    println!();
    println!("{}", "🧠 Sage Personas".cyan().bold());
    println!();

    if registry.is_empty() {
        println!("  {}", "(no personas registered)".dimmed());
    }
    for persona in registry.list() {
        println!("{}", describe(persona.as_ref()));
    }
    println!();

    Ok(())
}

/// One listing line: id, name, preferences, and a truncated description.
fn describe(persona: &dyn Persona) -> String {
    format!(
        "  {:<12} {:<10} {} {}",
        persona.id().bold(),
        persona.name(),
        format!(
            "[{} · {}]",
            persona.preferred_provider(),
            persona.preferred_effort()
        )
        .dimmed(),
        truncate_string(persona.description(), 60)
    )
}
