//! `sage status` — show configuration and provider status.
//!
//! - Shows config path and request defaults
//! - Shows API key status, model, and API base for each provider

use anyhow::Result;
use colored::Colorize;

use sage_core::config::{get_config_path, load_config};
use sage_providers::ProviderRegistry;

use crate::helpers::status_mark;

/// Run the status command.
pub fn run() -> Result<()> {
    let config = load_config(None);
    let config_path = get_config_path();

    println!();
    println!("{}", "🧠 Sage Status".cyan().bold());
    println!();

    // Config
    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_path.exists() {
            "✓".green().to_string()
        } else {
            "(not found, using defaults)".red().to_string()
        }
    );

    // Defaults
    let defaults = &config.defaults;
    println!("  {:<18} {}", "Persona:".bold(), defaults.persona);
    println!(
        "  {:<18} {}",
        "Provider:".bold(),
        defaults
            .provider
            .as_deref()
            .unwrap_or("(persona preference)")
    );
    println!(
        "  {:<18} {}",
        "Reasoning:".bold(),
        defaults
            .reasoning_effort
            .as_deref()
            .unwrap_or("(persona preference)")
    );

    // Providers
    println!();
    println!("  {}", "Providers:".bold());
    let registry = ProviderRegistry::from_config(&config.providers);
    for id in registry.ids() {
        let strategy = registry.get(id)?;
        let provider_config = config.providers.get(id);
        println!(
            "    {:<10} {:<14} {}",
            strategy.spec().display_name,
            strategy.model().model,
            status_mark(provider_config.is_configured(), "key set")
        );
        if let Some(api_base) = provider_config.api_base.as_deref() {
            println!("    {:<10} {}", "", format!("api base: {api_base}").dimmed());
        }
    }
    println!();

    Ok(())
}
