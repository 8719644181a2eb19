//! Shared in-memory state
//!
//! All collaboration tables live behind a single `tokio::sync::RwLock`.
//! Services hold the write guard for the full extent of a mutating
//! operation, so composite changes (accept invitation + create membership,
//! remove member + unassign issues, insert comment + fan out notifications)
//! commit as one step: outside readers observe the state before or after,
//! never in between.
//!
//! `StoreState` carries the tables plus the lookup and cascade helpers the
//! services share. It is crate-private; the public API surface is the
//! services in the sibling modules.

use std::collections::{BTreeMap, HashMap};

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use collab_issue::{Issue, IssueComment, IssueLabel};
use collab_notify::{InboxItem, IssueSubscription};
use collab_team::{Team, TeamInvitation, TeamMembership, TeamRole, UserProfile};

use crate::error::{CollabError, CollabResult};

/// All collaboration tables.
///
/// Memberships and subscriptions are keyed by their composite identity, so
/// the pair-uniqueness invariants hold by construction and per-team or
/// per-issue scans are ordered range queries.
#[derive(Debug, Default)]
pub(crate) struct StoreState {
    pub(crate) users: HashMap<Uuid, UserProfile>,
    pub(crate) teams: HashMap<Uuid, Team>,
    /// Keyed by (team_id, user_id)
    pub(crate) memberships: BTreeMap<(Uuid, Uuid), TeamMembership>,
    pub(crate) invitations: HashMap<Uuid, TeamInvitation>,
    pub(crate) issues: HashMap<Uuid, Issue>,
    pub(crate) labels: HashMap<Uuid, IssueLabel>,
    pub(crate) comments: HashMap<Uuid, IssueComment>,
    /// Keyed by (issue_id, user_id)
    pub(crate) subscriptions: BTreeMap<(Uuid, Uuid), IssueSubscription>,
    pub(crate) inbox: HashMap<Uuid, InboxItem>,
    /// Last issue sequence number handed out, shared by all teams
    pub(crate) issue_seq: u64,
}

impl StoreState {
    // ========================================================================
    // Lookups
    // ========================================================================

    pub(crate) fn user(&self, id: Uuid) -> CollabResult<&UserProfile> {
        self.users.get(&id).ok_or(CollabError::UserNotFound(id))
    }

    pub(crate) fn team(&self, id: Uuid) -> CollabResult<&Team> {
        self.teams.get(&id).ok_or(CollabError::TeamNotFound(id))
    }

    pub(crate) fn team_mut(&mut self, id: Uuid) -> CollabResult<&mut Team> {
        self.teams.get_mut(&id).ok_or(CollabError::TeamNotFound(id))
    }

    pub(crate) fn issue(&self, id: Uuid) -> CollabResult<&Issue> {
        self.issues.get(&id).ok_or(CollabError::IssueNotFound(id))
    }

    pub(crate) fn issue_mut(&mut self, id: Uuid) -> CollabResult<&mut Issue> {
        self.issues.get_mut(&id).ok_or(CollabError::IssueNotFound(id))
    }

    pub(crate) fn comment(&self, id: Uuid) -> CollabResult<&IssueComment> {
        self.comments
            .get(&id)
            .ok_or(CollabError::CommentNotFound(id))
    }

    pub(crate) fn comment_mut(&mut self, id: Uuid) -> CollabResult<&mut IssueComment> {
        self.comments
            .get_mut(&id)
            .ok_or(CollabError::CommentNotFound(id))
    }

    pub(crate) fn invitation(&self, id: Uuid) -> CollabResult<&TeamInvitation> {
        self.invitations
            .get(&id)
            .ok_or(CollabError::InvitationNotFound(id))
    }

    pub(crate) fn label(&self, id: Uuid) -> CollabResult<&IssueLabel> {
        self.labels.get(&id).ok_or(CollabError::LabelNotFound(id))
    }

    // ========================================================================
    // Memberships
    // ========================================================================

    /// The user's role in the team, if they are a member.
    pub(crate) fn role_of(&self, team_id: Uuid, user_id: Uuid) -> Option<TeamRole> {
        self.memberships
            .get(&(team_id, user_id))
            .map(|membership| membership.role)
    }

    pub(crate) fn membership_mut(
        &mut self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Option<&mut TeamMembership> {
        self.memberships.get_mut(&(team_id, user_id))
    }

    /// Creates a membership, enforcing pair uniqueness.
    ///
    /// Both the member-management path and invitation acceptance funnel
    /// through here, so `AlreadyMember` means the same thing everywhere.
    pub(crate) fn insert_membership(
        &mut self,
        team_id: Uuid,
        user_id: Uuid,
        role: TeamRole,
    ) -> CollabResult<TeamMembership> {
        if self.memberships.contains_key(&(team_id, user_id)) {
            return Err(CollabError::AlreadyMember { team_id, user_id });
        }
        let membership = TeamMembership::new(team_id, user_id, role);
        self.memberships
            .insert((team_id, user_id), membership.clone());
        Ok(membership)
    }

    pub(crate) fn remove_membership(
        &mut self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> CollabResult<TeamMembership> {
        self.memberships
            .remove(&(team_id, user_id))
            .ok_or(CollabError::NotMember { team_id, user_id })
    }

    /// All memberships of a team, ordered by user ID.
    pub(crate) fn team_memberships(&self, team_id: Uuid) -> Vec<&TeamMembership> {
        self.memberships
            .range((team_id, Uuid::nil())..=(team_id, Uuid::max()))
            .map(|(_, membership)| membership)
            .collect()
    }

    /// Profiles of all team members, for mention resolution.
    ///
    /// Membership rows without a directory entry are skipped.
    pub(crate) fn member_profiles(&self, team_id: Uuid) -> Vec<UserProfile> {
        self.team_memberships(team_id)
            .iter()
            .filter_map(|membership| self.users.get(&membership.user_id).cloned())
            .collect()
    }

    pub(crate) fn lead_count(&self, team_id: Uuid) -> usize {
        self.team_memberships(team_id)
            .iter()
            .filter(|membership| membership.is_lead())
            .count()
    }

    // ========================================================================
    // Issues
    // ========================================================================

    /// Hands out the next issue sequence number. Never reused, even after
    /// issue deletion.
    pub(crate) fn next_issue_number(&mut self) -> u64 {
        self.issue_seq += 1;
        self.issue_seq
    }

    /// The lexicographically greatest rank among the team's issues.
    pub(crate) fn max_rank(&self, team_id: Uuid) -> Option<String> {
        self.issues
            .values()
            .filter(|issue| issue.team_id == team_id)
            .map(|issue| issue.rank.as_str())
            .max()
            .map(str::to_string)
    }

    /// All issues of a team, ordered by rank (ties broken by code number).
    pub(crate) fn team_issues(&self, team_id: Uuid) -> Vec<Issue> {
        let mut issues: Vec<Issue> = self
            .issues
            .values()
            .filter(|issue| issue.team_id == team_id)
            .cloned()
            .collect();
        issues.sort_by(|a, b| {
            a.rank
                .cmp(&b.rank)
                .then_with(|| a.code.number.cmp(&b.code.number))
        });
        issues
    }

    /// Clears the assignee on every team issue assigned to the user.
    ///
    /// Returns how many issues were unassigned.
    pub(crate) fn unassign_team_issues(&mut self, team_id: Uuid, user_id: Uuid) -> usize {
        let mut unassigned = 0;
        for issue in self.issues.values_mut() {
            if issue.team_id == team_id && issue.assignee_id == Some(user_id) {
                issue.assignee_id = None;
                issue.touch();
                unassigned += 1;
            }
        }
        unassigned
    }

    // ========================================================================
    // Subscriptions and inbox
    // ========================================================================

    /// User IDs subscribed to an issue, ordered by user ID.
    pub(crate) fn subscribers_of(&self, issue_id: Uuid) -> Vec<Uuid> {
        self.subscriptions
            .range((issue_id, Uuid::nil())..=(issue_id, Uuid::max()))
            .map(|((_, user_id), _)| *user_id)
            .collect()
    }

    /// Creates the subscription if absent; an existing one is untouched.
    pub(crate) fn upsert_subscription(&mut self, issue_id: Uuid, user_id: Uuid) -> IssueSubscription {
        self.subscriptions
            .entry((issue_id, user_id))
            .or_insert_with(|| IssueSubscription::new(issue_id, user_id))
            .clone()
    }

    pub(crate) fn remove_subscription(&mut self, issue_id: Uuid, user_id: Uuid) -> bool {
        self.subscriptions.remove(&(issue_id, user_id)).is_some()
    }

    pub(crate) fn push_inbox(&mut self, item: InboxItem) {
        self.inbox.insert(item.id, item);
    }

    // ========================================================================
    // Cascades
    // ========================================================================

    /// The comment plus every transitive reply under it.
    pub(crate) fn comment_subtree(&self, comment_id: Uuid) -> Vec<Uuid> {
        let mut subtree = vec![comment_id];
        let mut frontier = vec![comment_id];
        while let Some(parent_id) = frontier.pop() {
            for comment in self.comments.values() {
                if comment.parent_id == Some(parent_id) {
                    subtree.push(comment.id);
                    frontier.push(comment.id);
                }
            }
        }
        subtree
    }

    /// Removes an issue together with its comments, subscriptions, and
    /// inbox items.
    pub(crate) fn remove_issue_cascade(&mut self, issue_id: Uuid) {
        self.comments.retain(|_, comment| comment.issue_id != issue_id);
        let subscribers = self.subscribers_of(issue_id);
        for user_id in subscribers {
            self.subscriptions.remove(&(issue_id, user_id));
        }
        self.inbox.retain(|_, item| item.issue_id != issue_id);
        self.issues.remove(&issue_id);
    }

    /// Removes a team together with its memberships, invitations, and
    /// issues (each issue cascading in turn).
    pub(crate) fn remove_team_cascade(&mut self, team_id: Uuid) {
        let issue_ids: Vec<Uuid> = self
            .issues
            .values()
            .filter(|issue| issue.team_id == team_id)
            .map(|issue| issue.id)
            .collect();
        for issue_id in issue_ids {
            self.remove_issue_cascade(issue_id);
        }

        let member_ids: Vec<Uuid> = self
            .team_memberships(team_id)
            .iter()
            .map(|membership| membership.user_id)
            .collect();
        for user_id in member_ids {
            self.memberships.remove(&(team_id, user_id));
        }

        self.invitations
            .retain(|_, invitation| invitation.team_id != team_id);
        self.teams.remove(&team_id);
    }
}

/// The shared store every service clones an `Arc` of.
#[derive(Debug, Default)]
pub struct CollabStore {
    state: RwLock<StoreState>,
}

impl CollabStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().await
    }

    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().await
    }
}
