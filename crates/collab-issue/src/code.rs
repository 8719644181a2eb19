//! Human-readable issue codes
//!
//! Issues carry a `PREFIX-n` code such as `CORE-7`. The prefix is fixed per
//! deployment and the number increases monotonically across all issues, so a
//! code is a stable, unique handle for linking and lookup.

use serde::{Deserialize, Serialize};

/// The `PREFIX-n` identifier of an issue.
///
/// # Examples
///
/// ```
/// use collab_issue::IssueCode;
///
/// let code = IssueCode::new("CORE", 7);
/// assert_eq!(code.to_string(), "CORE-7");
///
/// let parsed = IssueCode::parse("CORE-7").unwrap();
/// assert_eq!(parsed, code);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssueCode {
    /// Deployment-wide prefix, e.g. "CORE"
    pub prefix: String,

    /// Sequence number, monotonically increasing across all issues
    pub number: u64,
}

impl IssueCode {
    /// Creates a code from a prefix and sequence number.
    pub fn new(prefix: impl Into<String>, number: u64) -> Self {
        Self {
            prefix: prefix.into(),
            number,
        }
    }

    /// Parses a code from its `PREFIX-n` form.
    ///
    /// The prefix may itself contain hyphens; the number is everything after
    /// the last one. Returns `None` when either part is missing or the
    /// number does not parse.
    pub fn parse(s: &str) -> Option<Self> {
        let (prefix, number) = s.rsplit_once('-')?;
        if prefix.is_empty() {
            return None;
        }
        let number = number.parse::<u64>().ok()?;
        Some(Self::new(prefix, number))
    }
}

impl std::fmt::Display for IssueCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.prefix, self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(IssueCode::new("CORE", 7).to_string(), "CORE-7");
        assert_eq!(IssueCode::new("SHOP", 1203).to_string(), "SHOP-1203");
    }

    #[test]
    fn test_parse_round_trip() {
        let code = IssueCode::parse("CORE-7").unwrap();
        assert_eq!(code.prefix, "CORE");
        assert_eq!(code.number, 7);
        assert_eq!(IssueCode::parse(&code.to_string()), Some(code));
    }

    #[test]
    fn test_parse_hyphenated_prefix() {
        let code = IssueCode::parse("CORE-WEB-42").unwrap();
        assert_eq!(code.prefix, "CORE-WEB");
        assert_eq!(code.number, 42);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(IssueCode::parse("CORE"), None);
        assert_eq!(IssueCode::parse("-7"), None);
        assert_eq!(IssueCode::parse("CORE-"), None);
        assert_eq!(IssueCode::parse("CORE-seven"), None);
        assert_eq!(IssueCode::parse(""), None);
    }
}
