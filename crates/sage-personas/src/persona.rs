//! Persona trait — the interface every personality profile implements.
//!
//! A persona is a stateless strategy: it rewrites the system and user
//! prompts before dispatch and post-processes the model's text afterwards.

use std::fmt::Write;

use sage_core::types::{ProviderId, ReasoningEffort};

use crate::context::PersonaContext;

// ─────────────────────────────────────────────
// Traits data
// ─────────────────────────────────────────────

/// How a persona talks.
#[derive(Clone, Debug, PartialEq)]
pub struct CommunicationStyle {
    pub formality: &'static str,
    pub humor: &'static str,
    pub tone: &'static [&'static str],
}

/// Generation settings a persona prefers when the caller does not choose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProviderPreferences {
    pub reasoning: ReasoningEffort,
    pub temperature: f64,
}

/// Moments in an answer where a signature phrase fits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CatchphraseMoment {
    Greeting,
    Approval,
    Concern,
    Suggestion,
    Conclusion,
}

impl CatchphraseMoment {
    pub const ALL: [CatchphraseMoment; 5] = [
        CatchphraseMoment::Greeting,
        CatchphraseMoment::Approval,
        CatchphraseMoment::Concern,
        CatchphraseMoment::Suggestion,
        CatchphraseMoment::Conclusion,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CatchphraseMoment::Greeting => "Greeting",
            CatchphraseMoment::Approval => "Approval",
            CatchphraseMoment::Concern => "Concern",
            CatchphraseMoment::Suggestion => "Suggestion",
            CatchphraseMoment::Conclusion => "Conclusion",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Catchphrases {
    pub greeting: &'static [&'static str],
    pub approval: &'static [&'static str],
    pub concern: &'static [&'static str],
    pub suggestion: &'static [&'static str],
    pub conclusion: &'static [&'static str],
}

impl Catchphrases {
    pub fn get(&self, moment: CatchphraseMoment) -> &'static [&'static str] {
        match moment {
            CatchphraseMoment::Greeting => self.greeting,
            CatchphraseMoment::Approval => self.approval,
            CatchphraseMoment::Concern => self.concern,
            CatchphraseMoment::Suggestion => self.suggestion,
            CatchphraseMoment::Conclusion => self.conclusion,
        }
    }
}

/// Static personality profile. Built-in personas keep theirs in a `static`.
#[derive(Clone, Debug, PartialEq)]
pub struct PersonaTraits {
    pub personality: &'static str,
    pub communication_style: CommunicationStyle,
    pub expertise: &'static [&'static str],
    pub quirks: &'static [&'static str],
    pub preferred_provider: ProviderId,
    pub provider_preferences: ProviderPreferences,
    pub catchphrases: Catchphrases,
}

// ─────────────────────────────────────────────
// Persona trait
// ─────────────────────────────────────────────

/// Every persona implements this trait.
///
/// All four transformations are pure: same input and context, same output.
pub trait Persona: Send + Sync {
    /// Unique lookup key (e.g. `"charles"`).
    fn id(&self) -> &str;

    /// Display name used in prompts and listings.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn traits(&self) -> &PersonaTraits;

    /// Append persona instruction blocks to the base system prompt.
    fn enhance_system_prompt(&self, base: &str, context: &PersonaContext) -> String;

    /// Add an opener and a closing to the generic user prompt.
    fn enhance_user_prompt(&self, prompt: &str, context: &PersonaContext) -> String;

    /// Normalize raw model text.
    fn process_response(&self, response: &str, context: &PersonaContext) -> String;

    /// Reshape processed text for the requested output format.
    fn format_output(&self, response: &str, context: &PersonaContext) -> String;

    /// Provider used when the caller does not pick one.
    fn preferred_provider(&self) -> ProviderId {
        self.traits().preferred_provider
    }

    /// Effort used when the context does not carry one.
    fn preferred_effort(&self) -> ReasoningEffort {
        self.traits().provider_preferences.reasoning
    }

    /// Render the traits as a system prompt section.
    ///
    /// Default implementation — rarely needs overriding.
    fn personality_instructions(&self) -> String {
        render_personality(self.name(), self.traits())
    }
}

/// Markdown rendering of a traits profile, headed by the persona's name.
pub fn render_personality(name: &str, traits: &PersonaTraits) -> String {
    let mut out = String::new();
    let _ = write!(out, "\n\n## Persona: {name}\n{}\n", traits.personality);

    let style = &traits.communication_style;
    out.push_str("\n### Communication Style:\n");
    let _ = writeln!(out, "- Formality: {}", style.formality);
    let _ = writeln!(out, "- Humor: {}", style.humor);
    let _ = writeln!(out, "- Tone: {}", style.tone.join(", "));

    push_list(&mut out, "Expertise", traits.expertise);
    push_list(&mut out, "Quirks", traits.quirks);

    out.push_str("\n### Signature Phrases:\n");
    for moment in CatchphraseMoment::ALL {
        let phrases = traits.catchphrases.get(moment);
        if phrases.is_empty() {
            continue;
        }
        let quoted: Vec<String> = phrases.iter().map(|p| format!("\"{p}\"")).collect();
        let _ = writeln!(out, "- {}: {}", moment.label(), quoted.join(", "));
    }
    out
}

fn push_list(out: &mut String, heading: &str, items: &[&str]) {
    if items.is_empty() {
        return;
    }
    let _ = write!(out, "\n### {heading}:\n");
    for item in items {
        let _ = writeln!(out, "- {item}");
    }
}
