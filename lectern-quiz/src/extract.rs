//! JSON extraction from loosely structured model replies, plus prompt
//! truncation helpers.
//!
//! Models asked for JSON frequently wrap it in prose or code fences, or
//! quote it with single quotes. [`extract_json`] runs a fixed sequence of
//! recovery strategies and reports the outcome as a sum type instead of
//! nested error handling.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// Character budget for system prompts.
pub const SYSTEM_PROMPT_BUDGET: usize = 2_000;

/// Character budget for user prompts.
pub const USER_PROMPT_BUDGET: usize = 24_000;

/// Head portion kept when a user prompt is over budget.
const USER_PROMPT_HEAD: usize = 16_000;

/// Tail portion kept when a user prompt is over budget. The tail carries
/// the trailing format instructions, which must survive truncation.
const USER_PROMPT_TAIL: usize = 8_000;

/// Character budget for raw-reply previews carried in error values.
pub const RAW_RESPONSE_PREVIEW: usize = 300;

/// Marker inserted where user-prompt content was cut.
const TRUNCATION_MARKER: &str = "\n...[content truncated]...\n";

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```(?:json)?\s*([\s\S]*?)```").expect("fenced block pattern is valid")
});

/// The result of attempting to read a JSON object out of raw reply text.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// A JSON value was recovered.
    Parsed(Value),
    /// No strategy produced JSON; carries the raw text unmodified.
    Unparsed(String),
}

/// Try to extract a JSON value from raw model output.
///
/// Strategies, in order, first success wins:
///
/// 1. parse the whole (trimmed) text as JSON;
/// 2. parse the contents of the first fenced code block;
/// 3. if the text is bounded by `{` and `}`, normalize single quotes to
///    double quotes and parse.
pub fn extract_json(raw: &str) -> ParseOutcome {
    let trimmed = raw.trim();

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return ParseOutcome::Parsed(value);
    }

    if let Some(captures) = FENCED_BLOCK.captures(trimmed) {
        if let Some(block) = captures.get(1) {
            if let Ok(value) = serde_json::from_str::<Value>(block.as_str().trim()) {
                return ParseOutcome::Parsed(value);
            }
        }
    }

    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        let normalized = trimmed.replace('\'', "\"");
        if let Ok(value) = serde_json::from_str::<Value>(&normalized) {
            return ParseOutcome::Parsed(value);
        }
    }

    ParseOutcome::Unparsed(raw.to_string())
}

/// Truncate text to at most `budget` characters, on a char boundary.
pub fn preview(text: &str, budget: usize) -> String {
    text.chars().take(budget).collect()
}

/// Cap a system prompt at its fixed character budget.
pub fn truncate_system_prompt(prompt: &str) -> String {
    preview(prompt, SYSTEM_PROMPT_BUDGET)
}

/// Cap a user prompt at its budget, keeping head and tail.
///
/// An over-budget prompt keeps its first [`USER_PROMPT_HEAD`] and last
/// [`USER_PROMPT_TAIL`] characters joined with a truncation marker, so
/// trailing format instructions are preserved.
pub fn truncate_user_prompt(prompt: &str) -> String {
    let total = prompt.chars().count();
    if total <= USER_PROMPT_BUDGET {
        return prompt.to_string();
    }

    let head: String = prompt.chars().take(USER_PROMPT_HEAD).collect();
    let tail: String = {
        let skip = total - USER_PROMPT_TAIL;
        prompt.chars().skip(skip).collect::<String>()
    };
    format!("{head}{TRUNCATION_MARKER}{tail}")
}
