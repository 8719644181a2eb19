//! Comment thread service
//!
//! Comments are flat records pointing at their issue, with an optional
//! parent for one level of threading. Creating a comment triggers the
//! mention fan-out inside the same store transaction, so readers never
//! observe a comment without its notifications.

use std::sync::Arc;

use uuid::Uuid;

use collab_issue::IssueComment;
use collab_policy::{decisions, Actor};

use crate::config::CollabConfig;
use crate::error::{CollabError, CollabResult};
use crate::notifier::fan_out_comment;
use crate::store::CollabStore;

/// Parameters for posting a comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    /// Issue the comment belongs to
    pub issue_id: Uuid,
    /// Comment body; mentions are parsed from it
    pub content: String,
    /// Parent comment when replying; must belong to the same issue
    pub parent_id: Option<Uuid>,
}

impl NewComment {
    /// A top-level comment.
    pub fn new(issue_id: Uuid, content: impl Into<String>) -> Self {
        Self {
            issue_id,
            content: content.into(),
            parent_id: None,
        }
    }

    /// A reply to an existing comment.
    pub fn reply(issue_id: Uuid, parent_id: Uuid, content: impl Into<String>) -> Self {
        Self {
            issue_id,
            content: content.into(),
            parent_id: Some(parent_id),
        }
    }
}

/// Stateful service for comment threads.
#[derive(Clone)]
pub struct CommentThread {
    store: Arc<CollabStore>,
    config: Arc<CollabConfig>,
}

impl CommentThread {
    pub fn new(store: Arc<CollabStore>, config: Arc<CollabConfig>) -> Self {
        Self { store, config }
    }

    /// Posts a comment and fans out notifications in one step.
    ///
    /// The author is subscribed to the issue, mentioned team members are
    /// notified and subscribed, and prior subscribers get a comment
    /// notification. See the notifier module for the full ordering.
    pub async fn create_comment(
        &self,
        actor: &Actor,
        new_comment: NewComment,
    ) -> CollabResult<IssueComment> {
        let NewComment {
            issue_id,
            content,
            parent_id,
        } = new_comment;

        if content.trim().is_empty() {
            return Err(CollabError::ValidationFailed(
                "comment content must not be empty".into(),
            ));
        }

        let mut state = self.store.write().await;
        let issue = state.issue(issue_id)?.clone();
        state.user(actor.id)?;
        let actor_role = state.role_of(issue.team_id, actor.id);
        if !decisions::can_create_comment(actor, actor_role) {
            return Err(CollabError::Unauthorized(
                "comments can be posted by team members and admins only".into(),
            ));
        }
        if let Some(parent_id) = parent_id {
            let parent = state.comment(parent_id)?;
            if parent.issue_id != issue_id {
                return Err(CollabError::ValidationFailed(
                    "parent comment belongs to a different issue".into(),
                ));
            }
        }

        let mut comment = IssueComment::new(issue_id, actor.id, content);
        if let Some(parent_id) = parent_id {
            comment = comment.with_parent(parent_id);
        }
        state.comments.insert(comment.id, comment.clone());

        let summary = fan_out_comment(&mut state, &self.config, &issue, &comment);
        tracing::info!(
            comment_id = %comment.id,
            issue_id = %issue_id,
            mentioned = summary.mentioned.len(),
            delivered = summary.delivered,
            "Created comment"
        );
        Ok(comment)
    }

    /// Rewrites a comment's body and stamps the edit time.
    ///
    /// Editing never re-runs the fan-out; mentions added after the fact
    /// notify nobody.
    pub async fn update_comment(
        &self,
        actor: &Actor,
        comment_id: Uuid,
        content: impl Into<String>,
    ) -> CollabResult<IssueComment> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(CollabError::ValidationFailed(
                "comment content must not be empty".into(),
            ));
        }

        let mut state = self.store.write().await;
        let author_id = state.comment(comment_id)?.author_id;
        if !decisions::can_update_comment(actor, author_id) {
            return Err(CollabError::Unauthorized(
                "only the author or an admin may edit a comment".into(),
            ));
        }

        let comment = state.comment_mut(comment_id)?;
        comment.edit(content);
        let updated = comment.clone();

        tracing::info!(comment_id = %comment_id, "Updated comment");
        Ok(updated)
    }

    /// Deletes a comment and its whole reply subtree.
    ///
    /// Returns how many comments were removed.
    pub async fn delete_comment(&self, actor: &Actor, comment_id: Uuid) -> CollabResult<usize> {
        let mut state = self.store.write().await;
        let comment = state.comment(comment_id)?.clone();
        let issue = state.issue(comment.issue_id)?.clone();
        let actor_role = state.role_of(issue.team_id, actor.id);
        if !decisions::can_delete_comment(actor, comment.author_id, actor_role) {
            return Err(CollabError::Unauthorized(
                "only the author, a team lead, or an admin may delete a comment".into(),
            ));
        }

        let subtree = state.comment_subtree(comment_id);
        for id in &subtree {
            state.comments.remove(id);
        }

        tracing::info!(
            comment_id = %comment_id,
            removed = subtree.len(),
            "Deleted comment subtree"
        );
        Ok(subtree.len())
    }

    /// Looks up a single comment.
    pub async fn comment(&self, actor: &Actor, comment_id: Uuid) -> CollabResult<IssueComment> {
        let state = self.store.read().await;
        let comment = state.comment(comment_id)?;
        let issue = state.issue(comment.issue_id)?;
        let actor_role = state.role_of(issue.team_id, actor.id);
        if !decisions::can_view_comment(actor, actor_role) {
            return Err(CollabError::Unauthorized(
                "comments are visible to team members and admins only".into(),
            ));
        }
        Ok(comment.clone())
    }

    /// All comments of an issue, oldest first.
    pub async fn comments_for_issue(
        &self,
        actor: &Actor,
        issue_id: Uuid,
    ) -> CollabResult<Vec<IssueComment>> {
        let state = self.store.read().await;
        let issue = state.issue(issue_id)?;
        let actor_role = state.role_of(issue.team_id, actor.id);
        if !decisions::can_view_comment(actor, actor_role) {
            return Err(CollabError::Unauthorized(
                "comments are visible to team members and admins only".into(),
            ));
        }

        let mut comments: Vec<IssueComment> = state
            .comments
            .values()
            .filter(|comment| comment.issue_id == issue_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(comments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issues::{IssueLifecycle, NewIssue};
    use crate::notifier::MentionNotifier;
    use crate::registry::{MembershipRegistry, NewTeam};
    use collab_policy::WorkspaceRole;
    use collab_team::TeamRole;

    struct Fixture {
        registry: MembershipRegistry,
        lifecycle: IssueLifecycle,
        comments: CommentThread,
        notifier: MentionNotifier,
        lead: Actor,
        member: Actor,
        team_id: Uuid,
        issue_id: Uuid,
    }

    async fn setup() -> Fixture {
        let store = Arc::new(CollabStore::new());
        let config = Arc::new(CollabConfig::new("CORE"));
        let registry = MembershipRegistry::new(store.clone());
        let lifecycle = IssueLifecycle::new(store.clone(), config.clone());
        let comments = CommentThread::new(store.clone(), config);
        let notifier = MentionNotifier::new(store);

        let lead_profile = registry
            .register_user("Mara Vance", "mara@mercato.dev")
            .await
            .unwrap();
        let lead = Actor::new(lead_profile.id).with_role(WorkspaceRole::Manager);
        let team = registry
            .create_team(
                &lead,
                NewTeam {
                    code: "CORE".into(),
                    name: "Core Commerce".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let member_profile = registry
            .register_user("Noa Reed", "noa@mercato.dev")
            .await
            .unwrap();
        let member = Actor::new(member_profile.id);
        registry
            .add_member(&lead, team.id, member.id, TeamRole::Member)
            .await
            .unwrap();

        let issue = lifecycle
            .create_issue(&lead, NewIssue::new(team.id, "Checkout flow audit"))
            .await
            .unwrap();

        Fixture {
            registry,
            lifecycle,
            comments,
            notifier,
            lead,
            member,
            team_id: team.id,
            issue_id: issue.id,
        }
    }

    #[tokio::test]
    async fn test_comment_subscribes_author_and_notifies_subscribers() {
        let fx = setup().await;
        fx.notifier.subscribe(fx.issue_id, fx.lead.id).await.unwrap();

        fx.comments
            .create_comment(&fx.member, NewComment::new(fx.issue_id, "First pass done"))
            .await
            .unwrap();

        let subscribers = fx.notifier.subscribers_of(fx.issue_id).await.unwrap();
        assert!(subscribers.contains(&fx.member.id));

        let inbox = fx.notifier.inbox_for(fx.lead.id).await;
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].actor_id, fx.member.id);
        // The author gets nothing.
        assert!(fx.notifier.inbox_for(fx.member.id).await.is_empty());
    }

    #[tokio::test]
    async fn test_reply_must_stay_on_the_same_issue() {
        let fx = setup().await;
        let parent = fx
            .comments
            .create_comment(&fx.lead, NewComment::new(fx.issue_id, "Parent"))
            .await
            .unwrap();

        let reply = fx
            .comments
            .create_comment(
                &fx.member,
                NewComment::reply(fx.issue_id, parent.id, "Child"),
            )
            .await
            .unwrap();
        assert!(reply.is_reply());

        // A parent from another issue is rejected.
        let other = fx
            .lifecycle
            .create_issue(&fx.lead, NewIssue::new(fx.team_id, "Other issue"))
            .await
            .unwrap();
        let err = fx
            .comments
            .create_comment(
                &fx.member,
                NewComment::reply(other.id, parent.id, "Cross-issue"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CollabError::ValidationFailed(_)));

        let err = fx
            .comments
            .create_comment(
                &fx.member,
                NewComment::reply(fx.issue_id, Uuid::now_v7(), "Orphan"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CollabError::CommentNotFound(_)));
    }

    #[tokio::test]
    async fn test_editing_keeps_notifications_quiet() {
        let fx = setup().await;
        fx.notifier.subscribe(fx.issue_id, fx.lead.id).await.unwrap();
        let comment = fx
            .comments
            .create_comment(&fx.member, NewComment::new(fx.issue_id, "Draft"))
            .await
            .unwrap();
        let before = fx.notifier.inbox_for(fx.lead.id).await.len();

        let updated = fx
            .comments
            .update_comment(&fx.member, comment.id, "Draft, now with @mara")
            .await
            .unwrap();
        assert!(updated.is_edited());
        assert_eq!(fx.notifier.inbox_for(fx.lead.id).await.len(), before);
    }

    #[tokio::test]
    async fn test_only_author_or_admin_edits() {
        let fx = setup().await;
        let comment = fx
            .comments
            .create_comment(&fx.member, NewComment::new(fx.issue_id, "Mine"))
            .await
            .unwrap();

        let err = fx
            .comments
            .update_comment(&fx.lead, comment.id, "Rewritten")
            .await
            .unwrap_err();
        assert!(matches!(err, CollabError::Unauthorized(_)));

        let admin_profile = fx
            .registry
            .register_user("Iris Sol", "iris@mercato.dev")
            .await
            .unwrap();
        let admin = Actor::new(admin_profile.id).with_role(WorkspaceRole::Admin);
        assert!(fx
            .comments
            .update_comment(&admin, comment.id, "Moderated")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_delete_removes_reply_subtree() {
        let fx = setup().await;
        let root = fx
            .comments
            .create_comment(&fx.member, NewComment::new(fx.issue_id, "Root"))
            .await
            .unwrap();
        let child = fx
            .comments
            .create_comment(
                &fx.lead,
                NewComment::reply(fx.issue_id, root.id, "Child"),
            )
            .await
            .unwrap();
        fx.comments
            .create_comment(
                &fx.member,
                NewComment::reply(fx.issue_id, child.id, "Grandchild"),
            )
            .await
            .unwrap();
        fx.comments
            .create_comment(&fx.lead, NewComment::new(fx.issue_id, "Unrelated"))
            .await
            .unwrap();

        // Team leads may moderate other people's comments.
        let removed = fx.comments.delete_comment(&fx.lead, root.id).await.unwrap();
        assert_eq!(removed, 3);

        let remaining = fx
            .comments
            .comments_for_issue(&fx.lead, fx.issue_id)
            .await
            .unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].content, "Unrelated");
    }

    #[tokio::test]
    async fn test_plain_members_cannot_delete_others_comments() {
        let fx = setup().await;
        let comment = fx
            .comments
            .create_comment(&fx.lead, NewComment::new(fx.issue_id, "Lead's note"))
            .await
            .unwrap();

        let err = fx
            .comments
            .delete_comment(&fx.member, comment.id)
            .await
            .unwrap_err();
        assert!(matches!(err, CollabError::Unauthorized(_)));
        // Their own comments they can delete.
        let own = fx
            .comments
            .create_comment(&fx.member, NewComment::new(fx.issue_id, "Mine"))
            .await
            .unwrap();
        assert_eq!(fx.comments.delete_comment(&fx.member, own.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_comments_listed_oldest_first() {
        let fx = setup().await;
        for body in ["one", "two", "three"] {
            fx.comments
                .create_comment(&fx.member, NewComment::new(fx.issue_id, body))
                .await
                .unwrap();
        }

        let listed = fx
            .comments
            .comments_for_issue(&fx.member, fx.issue_id)
            .await
            .unwrap();
        let bodies: Vec<&str> = listed.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(bodies, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn test_outsiders_cannot_comment_or_read() {
        let fx = setup().await;
        let outsider_profile = fx
            .registry
            .register_user("Kai Flint", "kai@mercato.dev")
            .await
            .unwrap();
        let outsider = Actor::new(outsider_profile.id);

        let err = fx
            .comments
            .create_comment(&outsider, NewComment::new(fx.issue_id, "Hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, CollabError::Unauthorized(_)));
        let err = fx
            .comments
            .comments_for_issue(&outsider, fx.issue_id)
            .await
            .unwrap_err();
        assert!(matches!(err, CollabError::Unauthorized(_)));
    }
}
