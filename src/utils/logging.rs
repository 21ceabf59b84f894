//! Helpers for logging model output safely
//!
//! Model responses can be long and are arbitrary UTF-8. These helpers keep log
//! lines short without ever slicing through a multi-byte character.

/// Maximum number of characters of model output included in a log line
pub const PREVIEW_CHARS: usize = 80;

/// Safely truncates a string to a maximum number of characters, respecting UTF-8 boundaries
///
/// # Examples
///
/// ```rust
/// use blobkit::utils::logging::truncate_string;
///
/// assert_eq!(truncate_string("Hello World", 5), "Hello");
/// assert_eq!(truncate_string("Short", 100), "Short");
/// ```
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

/// One-line preview of model output for log messages
///
/// Newlines are flattened and an ellipsis marks truncated text.
///
/// ```rust
/// use blobkit::utils::logging::preview;
///
/// assert_eq!(preview("a\nb"), "a\\nb");
/// ```
pub fn preview(s: &str) -> String {
    let flattened = s.replace('\n', "\\n");
    if flattened.chars().count() > PREVIEW_CHARS {
        format!("{}...", truncate_string(&flattened, PREVIEW_CHARS))
    } else {
        flattened
    }
}
