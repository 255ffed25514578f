//! Text and clock helpers shared by the core, API and CLI crates.

/// Trimmed copy of `value`, or `None` when nothing but whitespace remains.
pub fn non_empty_trimmed(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// [`non_empty_trimmed`] over an optional owned value.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    value.as_deref().and_then(non_empty_trimmed)
}

pub fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Canonical form of an uploads base URL: trimmed, no trailing slash.
///
/// Returns `None` unless the result is an `http(s)` URL.
pub fn normalize_base_url(value: &str) -> Option<String> {
    let trimmed = value.trim().trim_end_matches('/');
    is_http_url(trimmed).then(|| trimmed.to_string())
}

/// Registration timestamps are stored in milliseconds.
pub fn unix_timestamp_millis_now() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
