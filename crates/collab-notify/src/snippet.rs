//! Notification snippets

/// Default maximum snippet length in characters.
pub const DEFAULT_SNIPPET_LEN: usize = 200;

/// Trims content to at most `max_chars` characters for a notification
/// preview.
///
/// Counts Unicode scalar values, so multi-byte text is never split inside a
/// character. Content at or under the limit comes back unchanged.
///
/// # Examples
///
/// ```
/// use collab_notify::snippet;
///
/// assert_eq!(snippet("short", 200), "short");
/// assert_eq!(snippet("abcdef", 3), "abc");
/// ```
pub fn snippet(content: &str, max_chars: usize) -> String {
    content.chars().take(max_chars).collect()
}
