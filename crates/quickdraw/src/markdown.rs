//! Minimal markdown decoration for announcements.

/// Wraps `text` in inline-code backticks. Empty input gets a visible
/// placeholder instead of rendering as nothing.
pub fn code(text: &str) -> String {
    if text.is_empty() {
        "`<empty>`".to_string()
    } else {
        format!("`{text}`")
    }
}

/// Wraps `text` in bold markers.
pub fn bold(text: &str) -> String {
    format!("**{text}**")
}
