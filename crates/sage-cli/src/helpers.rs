//! Shared CLI helpers — path expansion and response printing.

use std::path::PathBuf;

use colored::Colorize;

/// Expand `~` at the start of a path to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_next::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs_next::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

/// Print a persona's answer to stdout.
pub fn print_response(persona_name: &str, response: &str) {
    println!();
    println!("{}", format!("🧠 {persona_name}").cyan().bold());
    if response.trim().is_empty() {
        println!("{}", "(no response)".dimmed());
    } else {
        println!("{response}");
    }
    println!();
}

/// `✓ label` in green, or a dimmed placeholder.
pub fn status_mark(ok: bool, label: &str) -> String {
    if ok {
        format!("{} {}", "✓".green(), label)
    } else {
        format!("{}", "· not configured".dimmed())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
