use regex::Regex;
use std::sync::LazyLock;

const MAX_VISIBLE_LENGTH: usize = 120;

static SECRET_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(bearer\s+|api_key=|password=|secret=|token=)[^\s&"']+"#).unwrap()
});

/// Shortens and redacts user text before it reaches a log line. Chat
/// messages are user data; only a bounded prefix is ever logged.
pub fn sanitize_prompt(prompt: &str) -> String {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let redacted = SECRET_PAIR.replace_all(trimmed, "${1}[REDACTED]");

    if redacted.chars().count() > MAX_VISIBLE_LENGTH {
        let visible: String = redacted.chars().take(MAX_VISIBLE_LENGTH).collect();
        format!("{}... ({} chars total)", visible, redacted.chars().count())
    } else {
        redacted.into_owned()
    }
}
