use once_cell::sync::Lazy;
use regex::Regex;

static THINK_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<think>[\s\S]*?</think>|<think\s*/>").unwrap());

/// Cleans a raw completion: drops reasoning blocks some chat models emit,
/// then trims surrounding whitespace.
pub fn clean_completion(response: &str) -> String {
    THINK_TAG_PATTERN
        .replace_all(response, "")
        .trim()
        .to_string()
}
