use once_cell::sync::Lazy;
use regex::Regex;

const MASK: &str = "[REDACTED]";

static SK_TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"sk-[A-Za-z0-9_\-]{8,}").unwrap());

static BEARER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(bearer\s+)[A-Za-z0-9._\-]+").unwrap());

static KEY_PARAM_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([?&](?:key|api_key)=)[^&\s]+").unwrap());

/// Masks credentials in text bound for logs or the console: the exact
/// `secret` when given, plus anything shaped like an API token.
pub fn redact(text: &str, secret: Option<&str>) -> String {
    let mut cleaned = text.to_string();

    if let Some(secret) = secret.filter(|s| !s.is_empty()) {
        cleaned = cleaned.replace(secret, MASK);
    }

    cleaned = SK_TOKEN_PATTERN.replace_all(&cleaned, MASK).to_string();
    cleaned = BEARER_PATTERN
        .replace_all(&cleaned, format!("${{1}}{}", MASK).as_str())
        .to_string();
    cleaned = KEY_PARAM_PATTERN
        .replace_all(&cleaned, format!("${{1}}{}", MASK).as_str())
        .to_string();

    cleaned
}
