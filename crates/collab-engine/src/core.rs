//! Engine facade
//!
//! [`CollabCore`] wires every service onto one shared store so callers
//! get a single handle with consistent state across teams, issues,
//! comments, and notifications.

use std::sync::Arc;

use collab_issue::{RankStrategy, SuffixRank};

use crate::comments::CommentThread;
use crate::config::CollabConfig;
use crate::invitations::InvitationWorkflow;
use crate::issues::IssueLifecycle;
use crate::notifier::MentionNotifier;
use crate::registry::MembershipRegistry;
use crate::store::CollabStore;

/// Entry point bundling all collaboration services.
///
/// Cloning is cheap; clones share the same underlying store.
///
/// # Examples
///
/// ```rust,no_run
/// use collab_engine::{CollabConfig, CollabCore, NewTeam};
/// use collab_policy::{Actor, WorkspaceRole};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), collab_engine::CollabError> {
/// let core = CollabCore::new(CollabConfig::new("SHOP"));
///
/// let profile = core
///     .membership()
///     .register_user("Mara Vance", "mara@mercato.dev")
///     .await?;
/// let actor = Actor::new(profile.id).with_role(WorkspaceRole::Manager);
/// let team = core
///     .membership()
///     .create_team(
///         &actor,
///         NewTeam {
///             code: "CORE".into(),
///             name: "Core Commerce".into(),
///             ..Default::default()
///         },
///     )
///     .await?;
/// assert_eq!(team.code, "CORE");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CollabCore {
    config: Arc<CollabConfig>,
    membership: MembershipRegistry,
    invitations: InvitationWorkflow,
    issues: IssueLifecycle,
    comments: CommentThread,
    notifier: MentionNotifier,
}

impl CollabCore {
    /// Creates an engine with the default rank scheme.
    pub fn new(config: CollabConfig) -> Self {
        Self::with_rank_strategy(config, Arc::new(SuffixRank))
    }

    /// Creates an engine with a custom rank scheme for issue ordering.
    pub fn with_rank_strategy(config: CollabConfig, rank: Arc<dyn RankStrategy>) -> Self {
        let config = Arc::new(config);
        let store = Arc::new(CollabStore::new());
        Self {
            membership: MembershipRegistry::new(store.clone()),
            invitations: InvitationWorkflow::new(store.clone(), config.clone()),
            issues: IssueLifecycle::with_rank_strategy(store.clone(), config.clone(), rank),
            comments: CommentThread::new(store.clone(), config.clone()),
            notifier: MentionNotifier::new(store),
            config,
        }
    }

    /// Users, teams, and memberships.
    pub fn membership(&self) -> &MembershipRegistry {
        &self.membership
    }

    /// Invitation issue and response.
    pub fn invitations(&self) -> &InvitationWorkflow {
        &self.invitations
    }

    /// Issues and the label catalog.
    pub fn issues(&self) -> &IssueLifecycle {
        &self.issues
    }

    /// Comment threads.
    pub fn comments(&self) -> &CommentThread {
        &self.comments
    }

    /// Subscriptions and the notification inbox.
    pub fn notifier(&self) -> &MentionNotifier {
        &self.notifier
    }

    /// The configuration the engine was built with.
    pub fn config(&self) -> &CollabConfig {
        &self.config
    }
}

impl Default for CollabCore {
    fn default() -> Self {
        Self::new(CollabConfig::default())
    }
}
