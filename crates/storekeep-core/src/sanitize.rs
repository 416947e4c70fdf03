//! Input sanitising applied before user text is sent to the backend.

use std::sync::LazyLock;

use regex::Regex;

static JAVASCRIPT_PROTOCOL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript:").expect("static regex"));

static EVENT_HANDLER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)on\w+=").expect("static regex"));

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static regex"));

/// Strip markup brackets, `javascript:` and inline event handlers, then trim.
pub fn sanitize_input(input: &str) -> String {
    let without_brackets: String = input.chars().filter(|c| *c != '<' && *c != '>').collect();
    let without_protocol = JAVASCRIPT_PROTOCOL.replace_all(&without_brackets, "");
    let without_handlers = EVENT_HANDLER.replace_all(&without_protocol, "");
    without_handlers.trim().to_string()
}

/// Sanitise an optional field, keeping `None` as-is.
pub fn sanitize_opt(input: Option<&str>) -> Option<String> {
    input.map(sanitize_input)
}

/// Loose email shape check, case-insensitive and whitespace-tolerant.
pub fn is_valid_email(email: &str) -> bool {
    let normalized = email.trim().to_lowercase();
    !normalized.is_empty() && EMAIL.is_match(&normalized)
}
