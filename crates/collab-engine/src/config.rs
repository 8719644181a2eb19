//! Engine configuration

use chrono::Duration;

use collab_notify::DEFAULT_SNIPPET_LEN;

/// Deployment-level configuration for the collaboration engine.
///
/// # Examples
///
/// ```
/// use chrono::Duration;
/// use collab_engine::CollabConfig;
///
/// let config = CollabConfig::new("CORE")
///     .with_invitation_ttl(Duration::days(14));
/// assert_eq!(config.issue_prefix, "CORE");
/// ```
#[derive(Debug, Clone)]
pub struct CollabConfig {
    /// Prefix for issue codes, e.g. "SHOP" yields "SHOP-1", "SHOP-2", ...
    pub issue_prefix: String,

    /// Maximum notification snippet length in characters
    pub snippet_len: usize,

    /// Default invitation lifetime. `None` means invitations never expire
    /// unless an explicit deadline is passed at creation.
    pub invitation_ttl: Option<Duration>,
}

impl Default for CollabConfig {
    fn default() -> Self {
        Self {
            issue_prefix: "SHOP".to_string(),
            snippet_len: DEFAULT_SNIPPET_LEN,
            invitation_ttl: None,
        }
    }
}

impl CollabConfig {
    /// Creates a configuration with the given issue prefix and defaults for
    /// everything else.
    pub fn new(issue_prefix: impl Into<String>) -> Self {
        Self {
            issue_prefix: issue_prefix.into(),
            ..Self::default()
        }
    }

    /// Sets the snippet length (builder style).
    pub fn with_snippet_len(mut self, snippet_len: usize) -> Self {
        self.snippet_len = snippet_len;
        self
    }

    /// Sets the default invitation lifetime (builder style).
    pub fn with_invitation_ttl(mut self, ttl: Duration) -> Self {
        self.invitation_ttl = Some(ttl);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CollabConfig::default();

        assert_eq!(config.issue_prefix, "SHOP");
        assert_eq!(config.snippet_len, DEFAULT_SNIPPET_LEN);
        assert!(config.invitation_ttl.is_none());
    }

    #[test]
    fn test_builders() {
        let config = CollabConfig::new("CORE")
            .with_snippet_len(80)
            .with_invitation_ttl(Duration::days(7));

        assert_eq!(config.issue_prefix, "CORE");
        assert_eq!(config.snippet_len, 80);
        assert_eq!(config.invitation_ttl, Some(Duration::days(7)));
    }
}
