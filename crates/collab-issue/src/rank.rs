//! Rank generation for manual issue ordering
//!
//! Issues within a team are ordered by an opaque string rank, compared
//! lexicographically. New issues land at the bottom of the list, so the
//! generator only ever needs to produce a rank greater than the current
//! maximum. The scheme is pluggable: services take a [`RankStrategy`] and
//! tests can substitute a deterministic one.

/// Produces rank strings for newly created issues.
///
/// Implementations must guarantee that the returned rank compares strictly
/// greater than `current_max` (when present), so appending an issue never
/// reorders existing ones.
pub trait RankStrategy: Send + Sync {
    /// Returns a rank that sorts after `current_max`.
    ///
    /// `current_max` is the lexicographically greatest rank currently in the
    /// team's list, or `None` for the first issue.
    fn next_rank(&self, current_max: Option<&str>) -> String;
}

/// The default rank scheme.
///
/// Starts at `"m"`, then grows from the tail: while the final character is
/// below `z` it is bumped to the next letter, and once it reaches `z` a new
/// `m` is appended. Ranks therefore stay short until a list has seen many
/// appends, and every generated rank is strictly greater than its
/// predecessor.
///
/// # Examples
///
/// ```
/// use collab_issue::{RankStrategy, SuffixRank};
///
/// assert_eq!(SuffixRank.next_rank(None), "m");
/// assert_eq!(SuffixRank.next_rank(Some("m")), "n");
/// assert_eq!(SuffixRank.next_rank(Some("z")), "zm");
/// assert_eq!(SuffixRank.next_rank(Some("zz")), "zzm");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SuffixRank;

impl RankStrategy for SuffixRank {
    fn next_rank(&self, current_max: Option<&str>) -> String {
        let max = match current_max {
            Some(max) if !max.is_empty() => max,
            _ => return "m".to_string(),
        };

        match max.chars().last() {
            // Bumping the final letter keeps the rank the same length.
            Some(c) if c.is_ascii_lowercase() && c < 'z' => {
                let bumped = (c as u8 + 1) as char;
                let mut rank = max[..max.len() - c.len_utf8()].to_string();
                rank.push(bumped);
                rank
            }
            // Anything else (z, digits, unexpected input): appending always
            // sorts after the prefix.
            _ => {
                let mut rank = max.to_string();
                rank.push('m');
                rank
            }
        }
    }
}
