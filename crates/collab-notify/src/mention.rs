//! Mention parsing and resolution
//!
//! Two pure functions with no storage access: [`mention_tokens`] extracts
//! `@token` candidates from comment text, and [`resolve_mentions`] matches
//! them against a caller-supplied member list. Keeping both sides pure
//! makes the fan-out rules testable without a store.

use std::collections::HashSet;

use collab_team::UserProfile;
use uuid::Uuid;

/// Word characters for mention tokens: ASCII letters, digits, underscore.
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Extracts mention tokens from comment text.
///
/// A mention is an `@` at the start of the text or after a non-word
/// character, followed by one or more word characters. The `@` inside an
/// email address therefore does not count. Tokens are lowercased and
/// deduplicated, preserving first-occurrence order.
///
/// # Examples
///
/// ```
/// use collab_notify::mention_tokens;
///
/// assert_eq!(mention_tokens("Ping @ada and @Grace!"), vec!["ada", "grace"]);
/// assert_eq!(mention_tokens("mail ada@mercato.dev"), Vec::<String>::new());
/// assert_eq!(mention_tokens("@Bob @bob @BOB"), vec!["bob"]);
/// ```
pub fn mention_tokens(content: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut seen = HashSet::new();
    let mut prev: Option<char> = None;
    let mut chars = content.char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        if c == '@' && prev.map_or(true, |p| !is_word_char(p)) {
            let start = index + c.len_utf8();
            let mut end = start;
            while let Some(&(next_index, next_char)) = chars.peek() {
                if !is_word_char(next_char) {
                    break;
                }
                end = next_index + next_char.len_utf8();
                chars.next();
            }
            if end > start {
                let token = content[start..end].to_lowercase();
                if seen.insert(token.clone()) {
                    tokens.push(token);
                }
                prev = content[start..end].chars().next_back();
                continue;
            }
        }
        prev = Some(c);
    }

    tokens
}

/// Resolves mention tokens against a member list.
///
/// A token matches a member when it is a case-insensitive substring of
/// their display name or a prefix of their email. One token may resolve to
/// several members and several tokens may resolve to the same member; the
/// result is deduplicated by user ID, preserving resolution order.
///
/// Callers pass only the members of the relevant team, which is what
/// restricts mentions to that team.
pub fn resolve_mentions(tokens: &[String], members: &[UserProfile]) -> Vec<Uuid> {
    let mut resolved = Vec::new();
    for token in tokens {
        let needle = token.to_lowercase();
        if needle.is_empty() {
            continue;
        }
        for member in members {
            if matches_member(&needle, member) && !resolved.contains(&member.id) {
                resolved.push(member.id);
            }
        }
    }
    resolved
}

fn matches_member(needle: &str, member: &UserProfile) -> bool {
    member.name.to_lowercase().contains(needle)
        || member.email.to_lowercase().starts_with(needle)
}
