//! Token usage annotation appended to every model answer.

use sage_core::types::{ProviderId, ReasoningEffort, UsageInfo};

use crate::registry::spec_for;

/// Human-readable usage line, separated from the answer by a rule.
///
/// Pure: the same inputs always give the same string.
pub fn format_token_info(provider: ProviderId, usage: &UsageInfo, effort: ReasoningEffort) -> String {
    let mut info = format!(
        "\n\n---\n*{provider} · reasoning: {effort} · tokens: {prompt} in / {completion} out / {total} total",
        provider = spec_for(provider).display_name,
        effort = effort,
        prompt = usage.prompt_tokens,
        completion = usage.completion_tokens,
        total = usage.total(),
    );
    if let Some(reasoning) = usage.reasoning_tokens() {
        info.push_str(&format!(" ({reasoning} reasoning)"));
    }
    info.push('*');
    info
}

#[cfg(test)]
mod tests {
    use super::*;
    use sage_core::types::CompletionTokensDetails;

    #[test]
    fn test_format_basic() {
        let info = format_token_info(ProviderId::Xai, &UsageInfo::new(10, 5), ReasoningEffort::High);
        assert_eq!(
            info,
            "\n\n---\n*xAI · reasoning: high · tokens: 10 in / 5 out / 15 total*"
        );
    }

    #[test]
    fn test_format_with_reasoning_tokens() {
        let usage = UsageInfo {
            prompt_tokens: 100,
            completion_tokens: 400,
            total_tokens: 500,
            completion_tokens_details: Some(CompletionTokensDetails {
                reasoning_tokens: 320,
            }),
        };
        let info = format_token_info(ProviderId::OpenAi, &usage, ReasoningEffort::Medium);
        assert!(info.starts_with("\n\n---\n*OpenAI · reasoning: medium"));
        assert!(info.ends_with("500 total (320 reasoning)*"));
    }

    #[test]
    fn test_format_zero_usage() {
        let info = format_token_info(ProviderId::OpenAi, &UsageInfo::default(), ReasoningEffort::Low);
        assert!(info.contains("0 in / 0 out / 0 total"));
    }
}
