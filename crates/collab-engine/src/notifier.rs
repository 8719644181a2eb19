//! Mention notifier
//!
//! Owns subscriptions and inbox items, and implements the comment fan-out.
//! The fan-out runs inside the comment service's write guard via
//! [`fan_out_comment`], so a comment and all of its notifications land as
//! one atomic step. Exclusion sets are computed against the subscriber
//! snapshot taken before any new subscriptions are inserted, which is what
//! makes the outcome deterministic.
//!
//! Delivery rules for one new comment:
//! 1. The author is subscribed to the issue (idempotent).
//! 2. Mention tokens are resolved against the issue team's members.
//! 3. Each mentioned user except the author gets a mention notification
//!    and is subscribed.
//! 4. Each prior subscriber except the author and the users notified in
//!    step 3 gets a comment notification.
//! 5. On a reply, the parent comment's author gets a comment notification
//!    unless they are the author or were already notified.
//!
//! Every user receives at most one inbox item per comment, mentions taking
//! precedence.

use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use collab_issue::{Issue, IssueComment};
use collab_notify::{
    mention_tokens, resolve_mentions, snippet, InboxItem, IssueSubscription, NotificationKind,
};
use collab_policy::Actor;

use crate::config::CollabConfig;
use crate::error::{CollabError, CollabResult};
use crate::store::{CollabStore, StoreState};

/// What one comment fan-out did, for logging.
#[derive(Debug)]
pub(crate) struct FanOutSummary {
    /// Users resolved from mention tokens, author included if self-mentioned
    pub(crate) mentioned: Vec<Uuid>,
    /// Inbox items delivered
    pub(crate) delivered: usize,
}

/// Runs the fan-out for a freshly inserted comment.
///
/// Must be called under the same write guard that inserted the comment.
pub(crate) fn fan_out_comment(
    state: &mut StoreState,
    config: &CollabConfig,
    issue: &Issue,
    comment: &IssueComment,
) -> FanOutSummary {
    let author_id = comment.author_id;

    // Snapshot the subscriber list before anyone new is subscribed; the
    // comment-notification audience is decided against this set.
    let subscribers_before = state.subscribers_of(issue.id);
    state.upsert_subscription(issue.id, author_id);

    let members = state.member_profiles(issue.team_id);
    let tokens = mention_tokens(&comment.content);
    let mentioned = resolve_mentions(&tokens, &members);

    let preview = snippet(&comment.content, config.snippet_len);
    let mut notified: HashSet<Uuid> = HashSet::new();
    let mut delivered = 0;

    for &user_id in &mentioned {
        if user_id == author_id {
            continue;
        }
        state.push_inbox(InboxItem::new(
            user_id,
            issue.id,
            NotificationKind::Mention,
            preview.clone(),
            author_id,
        ));
        state.upsert_subscription(issue.id, user_id);
        notified.insert(user_id);
        delivered += 1;
    }

    for &user_id in &subscribers_before {
        if user_id == author_id || notified.contains(&user_id) {
            continue;
        }
        state.push_inbox(InboxItem::new(
            user_id,
            issue.id,
            NotificationKind::Comment,
            preview.clone(),
            author_id,
        ));
        notified.insert(user_id);
        delivered += 1;
    }

    if let Some(parent_id) = comment.parent_id {
        if let Some(parent) = state.comments.get(&parent_id) {
            let parent_author = parent.author_id;
            if parent_author != author_id && !notified.contains(&parent_author) {
                state.push_inbox(InboxItem::new(
                    parent_author,
                    issue.id,
                    NotificationKind::Comment,
                    preview,
                    author_id,
                ));
                delivered += 1;
            }
        }
    }

    FanOutSummary {
        mentioned,
        delivered,
    }
}

/// Stateful service for subscriptions and the notification inbox.
#[derive(Clone)]
pub struct MentionNotifier {
    store: Arc<CollabStore>,
}

impl MentionNotifier {
    /// Creates a notifier over the shared store.
    pub fn new(store: Arc<CollabStore>) -> Self {
        Self { store }
    }

    /// Subscribes a user to an issue. Idempotent.
    pub async fn subscribe(&self, issue_id: Uuid, user_id: Uuid) -> CollabResult<IssueSubscription> {
        let mut state = self.store.write().await;
        state.issue(issue_id)?;
        state.user(user_id)?;
        let subscription = state.upsert_subscription(issue_id, user_id);
        tracing::debug!(issue_id = %issue_id, user_id = %user_id, "Subscribed to issue");
        Ok(subscription)
    }

    /// Unsubscribes a user from an issue.
    ///
    /// Returns whether a subscription existed. A later comment can
    /// re-subscribe the user through the fan-out rules.
    pub async fn unsubscribe(&self, issue_id: Uuid, user_id: Uuid) -> CollabResult<bool> {
        let mut state = self.store.write().await;
        state.issue(issue_id)?;
        let removed = state.remove_subscription(issue_id, user_id);
        tracing::debug!(issue_id = %issue_id, user_id = %user_id, "Unsubscribed from issue");
        Ok(removed)
    }

    /// User IDs subscribed to an issue, ordered by user ID.
    pub async fn subscribers_of(&self, issue_id: Uuid) -> CollabResult<Vec<Uuid>> {
        let state = self.store.read().await;
        state.issue(issue_id)?;
        Ok(state.subscribers_of(issue_id))
    }

    /// A user's inbox, newest first.
    pub async fn inbox_for(&self, user_id: Uuid) -> Vec<InboxItem> {
        let state = self.store.read().await;
        let mut items: Vec<InboxItem> = state
            .inbox
            .values()
            .filter(|item| item.recipient_id == user_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        items
    }

    /// Number of unread inbox items for a user.
    pub async fn unread_count(&self, user_id: Uuid) -> usize {
        let state = self.store.read().await;
        state
            .inbox
            .values()
            .filter(|item| item.recipient_id == user_id && !item.read)
            .count()
    }

    /// Marks one inbox item read. Idempotent; scoped to the recipient.
    pub async fn mark_as_read(&self, actor: &Actor, item_id: Uuid) -> CollabResult<InboxItem> {
        let mut state = self.store.write().await;
        let item = state
            .inbox
            .get_mut(&item_id)
            .ok_or(CollabError::NotificationNotFound(item_id))?;
        if item.recipient_id != actor.id {
            return Err(CollabError::Unauthorized(
                "only the recipient may mark a notification read".into(),
            ));
        }
        item.mark_read();
        Ok(item.clone())
    }

    /// Marks all of the actor's unread items read. Returns how many changed.
    pub async fn mark_all_read(&self, actor: &Actor) -> usize {
        let mut state = self.store.write().await;
        let mut changed = 0;
        for item in state.inbox.values_mut() {
            if item.recipient_id == actor.id && item.mark_read() {
                changed += 1;
            }
        }
        tracing::debug!(user_id = %actor.id, changed = %changed, "Marked inbox read");
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collab_issue::IssueCode;
    use collab_team::{TeamRole, UserProfile};

    struct Board {
        state: StoreState,
        config: CollabConfig,
        issue: Issue,
        ada: Uuid,
        grace: Uuid,
        kai: Uuid,
    }

    /// One team with three members and one issue, no subscriptions yet.
    fn board() -> Board {
        let mut state = StoreState::default();
        let config = CollabConfig::default();
        let team_id = Uuid::now_v7();

        let mut ids = Vec::new();
        for (name, email) in [
            ("Ada Lovelace", "ada@mercato.dev"),
            ("Grace Hopper", "grace@mercato.dev"),
            ("Kai Flint", "kai@mercato.dev"),
        ] {
            let profile = UserProfile::new(name, email);
            ids.push(profile.id);
            state
                .insert_membership(team_id, profile.id, TeamRole::Member)
                .unwrap();
            state.users.insert(profile.id, profile);
        }

        let issue = Issue::new(
            IssueCode::new("CORE", 1),
            team_id,
            ids[0],
            "Checkout rounding",
            "m",
        );
        state.issues.insert(issue.id, issue.clone());

        Board {
            state,
            config,
            issue,
            ada: ids[0],
            grace: ids[1],
            kai: ids[2],
        }
    }

    fn push_comment(board: &mut Board, author: Uuid, content: &str) -> IssueComment {
        let comment = IssueComment::new(board.issue.id, author, content);
        board.state.comments.insert(comment.id, comment.clone());
        comment
    }

    fn inbox_of(state: &StoreState, user: Uuid) -> Vec<(NotificationKind, Uuid)> {
        state
            .inbox
            .values()
            .filter(|item| item.recipient_id == user)
            .map(|item| (item.kind, item.actor_id))
            .collect()
    }

    #[test]
    fn test_author_is_subscribed_and_not_notified() {
        let mut board = board();
        let comment = push_comment(&mut board, board.ada, "First note");

        let summary = fan_out_comment(&mut board.state, &board.config, &board.issue, &comment);

        assert_eq!(summary.delivered, 0);
        assert_eq!(board.state.subscribers_of(board.issue.id), vec![board.ada]);
        assert!(inbox_of(&board.state, board.ada).is_empty());
    }

    #[test]
    fn test_mention_notifies_and_subscribes() {
        let mut board = board();
        let comment = push_comment(&mut board, board.ada, "What do you think @grace?");

        let summary = fan_out_comment(&mut board.state, &board.config, &board.issue, &comment);

        assert_eq!(summary.mentioned, vec![board.grace]);
        assert_eq!(
            inbox_of(&board.state, board.grace),
            vec![(NotificationKind::Mention, board.ada)]
        );
        let subscribers = board.state.subscribers_of(board.issue.id);
        assert!(subscribers.contains(&board.ada));
        assert!(subscribers.contains(&board.grace));
    }

    #[test]
    fn test_mentioned_subscriber_gets_mention_only() {
        let mut board = board();
        board.state.upsert_subscription(board.issue.id, board.grace);
        let comment = push_comment(&mut board, board.ada, "Still broken @grace");

        fan_out_comment(&mut board.state, &board.config, &board.issue, &comment);

        assert_eq!(
            inbox_of(&board.state, board.grace),
            vec![(NotificationKind::Mention, board.ada)]
        );
    }

    #[test]
    fn test_prior_subscribers_get_comment_notifications() {
        let mut board = board();
        board.state.upsert_subscription(board.issue.id, board.grace);
        board.state.upsert_subscription(board.issue.id, board.kai);
        let comment = push_comment(&mut board, board.ada, "Update: fix is in review");

        let summary = fan_out_comment(&mut board.state, &board.config, &board.issue, &comment);

        assert_eq!(summary.delivered, 2);
        assert_eq!(
            inbox_of(&board.state, board.grace),
            vec![(NotificationKind::Comment, board.ada)]
        );
        assert_eq!(
            inbox_of(&board.state, board.kai),
            vec![(NotificationKind::Comment, board.ada)]
        );
    }

    #[test]
    fn test_self_mention_subscribes_but_never_notifies() {
        let mut board = board();
        let comment = push_comment(&mut board, board.ada, "Note to self @ada");

        let summary = fan_out_comment(&mut board.state, &board.config, &board.issue, &comment);

        assert_eq!(summary.mentioned, vec![board.ada]);
        assert_eq!(summary.delivered, 0);
        assert!(inbox_of(&board.state, board.ada).is_empty());
        assert_eq!(board.state.subscribers_of(board.issue.id), vec![board.ada]);
    }

    #[test]
    fn test_mentions_outside_team_are_ignored() {
        let mut board = board();
        let outsider = UserProfile::new("Outside Ola", "ola@mercato.dev");
        board.state.users.insert(outsider.id, outsider.clone());
        let comment = push_comment(&mut board, board.ada, "Ask @ola about this");

        let summary = fan_out_comment(&mut board.state, &board.config, &board.issue, &comment);

        assert!(summary.mentioned.is_empty());
        assert!(inbox_of(&board.state, outsider.id).is_empty());
    }

    #[test]
    fn test_reply_notifies_parent_author_once() {
        let mut board = board();
        let parent = push_comment(&mut board, board.grace, "I can take this");
        fan_out_comment(&mut board.state, &board.config, &board.issue, &parent);

        let reply = IssueComment::new(board.issue.id, board.ada, "Thanks!").with_parent(parent.id);
        board.state.comments.insert(reply.id, reply.clone());
        let summary = fan_out_comment(&mut board.state, &board.config, &board.issue, &reply);

        // Grace subscribed by authoring the parent, so she is a prior
        // subscriber and the courtesy rule must not double-notify her.
        assert_eq!(summary.delivered, 1);
        assert_eq!(
            inbox_of(&board.state, board.grace),
            vec![(NotificationKind::Comment, board.ada)]
        );
    }

    #[test]
    fn test_reply_courtesy_reaches_unsubscribed_parent_author() {
        let mut board = board();
        let parent = push_comment(&mut board, board.grace, "I can take this");
        fan_out_comment(&mut board.state, &board.config, &board.issue, &parent);
        board.state.remove_subscription(board.issue.id, board.grace);

        let reply = IssueComment::new(board.issue.id, board.ada, "Any update?").with_parent(parent.id);
        board.state.comments.insert(reply.id, reply.clone());
        fan_out_comment(&mut board.state, &board.config, &board.issue, &reply);

        assert_eq!(
            inbox_of(&board.state, board.grace),
            vec![(NotificationKind::Comment, board.ada)]
        );
        // The courtesy notification does not re-subscribe.
        assert!(!board
            .state
            .subscribers_of(board.issue.id)
            .contains(&board.grace));
    }

    #[test]
    fn test_snippet_respects_configured_length() {
        let mut board = board();
        board.config.snippet_len = 10;
        board.state.upsert_subscription(board.issue.id, board.grace);
        let comment = push_comment(&mut board, board.ada, "0123456789ABCDEF");

        fan_out_comment(&mut board.state, &board.config, &board.issue, &comment);

        let item = board
            .state
            .inbox
            .values()
            .find(|item| item.recipient_id == board.grace)
            .unwrap();
        assert_eq!(item.snippet, "0123456789");
    }
}
