//! Prompt builder — base system prompts and the generic user prompt.
//!
//! Both functions are pure: identical inputs give identical output, with no
//! timestamps or randomness, and the task and code are embedded verbatim.

use crate::types::AnalysisType;

/// Base system prompt for an analysis type, before any persona layering.
pub fn base_system_prompt(analysis_type: AnalysisType) -> &'static str {
    match analysis_type {
        AnalysisType::Comprehensive => {
            "You are a senior software engineer performing a comprehensive analysis of the provided code. \
             Identify bugs, design problems, performance issues, and maintainability risks, and rank them by impact."
        }
        AnalysisType::Advice => {
            "You are a senior software engineer giving practical advice about the provided code. \
             Answer the question directly and recommend concrete next steps."
        }
        AnalysisType::Research => {
            "You are a senior software engineer researching approaches, libraries, and prior art relevant to the task. \
             Compare the options and recommend one with clear reasoning."
        }
        AnalysisType::Review => {
            "You are a senior software engineer reviewing the provided code. \
             Point out correctness issues first, then risky or unclear code, and suggest specific fixes."
        }
    }
}

/// Framing line placed at the top of the user prompt.
fn framing(analysis_type: AnalysisType) -> &'static str {
    match analysis_type {
        AnalysisType::Comprehensive => "Please perform a comprehensive analysis of the following code.",
        AnalysisType::Advice => "I need your advice on the following.",
        AnalysisType::Research => "Please research the following topic in the context of this code.",
        AnalysisType::Review => "Please review the following code.",
    }
}

/// Build the user prompt from a task, the subject code, and the analysis type.
pub fn build_user_prompt(task: &str, code: &str, analysis_type: AnalysisType) -> String {
    let code_section = if code.trim().is_empty() {
        "(no code provided)".to_string()
    } else {
        let fence = fence_for(code);
        format!("{fence}\n{code}\n{fence}")
    };

    format!(
        "{framing}\n\n## Task\n{task}\n\n## Code\n{code_section}",
        framing = framing(analysis_type),
    )
}

/// Backtick fence longer than any backtick run inside `code`, at least three.
fn fence_for(code: &str) -> String {
    let longest_run = code.split(|c: char| c != '`').map(str::len).max().unwrap_or(0);
    "`".repeat(longest_run.max(2) + 1)
}
