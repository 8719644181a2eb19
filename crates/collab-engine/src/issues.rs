//! Issue lifecycle service
//!
//! Creates issues with their sequential code and initial rank, applies
//! field updates, and owns the label catalog. Lifecycle changes deliver
//! inbox items directly: assignment and creation notify the assignee,
//! status and edit changes notify subscribers. Comment-driven delivery is
//! the mention notifier's job, not this module's.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use collab_issue::{
    Issue, IssueCode, IssueLabel, IssuePriority, IssueStatus, RankStrategy, SuffixRank,
};
use collab_notify::{snippet, InboxItem, NotificationKind};
use collab_policy::{decisions, Actor};

use crate::config::CollabConfig;
use crate::error::{CollabError, CollabResult};
use crate::store::{CollabStore, StoreState};

/// Parameters for creating an issue.
#[derive(Debug, Clone)]
pub struct NewIssue {
    /// Owning team
    pub team_id: Uuid,
    /// Short summary
    pub title: String,
    /// Longer body text
    pub description: Option<String>,
    /// Initial status; defaults to backlog
    pub status: Option<IssueStatus>,
    /// Initial priority; defaults to medium
    pub priority: Option<IssuePriority>,
    /// Initial assignee; must be a member of the owning team
    pub assignee_id: Option<Uuid>,
    /// Due date
    pub due_date: Option<NaiveDate>,
    /// Labels to attach, from the deployment-wide catalog
    pub label_ids: Vec<Uuid>,
}

impl NewIssue {
    /// A minimal issue: just a team and a title.
    pub fn new(team_id: Uuid, title: impl Into<String>) -> Self {
        Self {
            team_id,
            title: title.into(),
            description: None,
            status: None,
            priority: None,
            assignee_id: None,
            due_date: None,
            label_ids: Vec::new(),
        }
    }
}

/// Parameters for creating a label.
#[derive(Debug, Clone)]
pub struct NewLabel {
    /// Stable machine name, unique across the catalog
    pub slug: String,
    /// Human-readable name
    pub name: String,
    /// Display color; defaults to a neutral gray
    pub color: Option<String>,
}

/// Stateful service for issues and the label catalog.
///
/// The rank scheme is injected so tests can pin a deterministic one; the
/// default is [`SuffixRank`].
#[derive(Clone)]
pub struct IssueLifecycle {
    store: Arc<CollabStore>,
    config: Arc<CollabConfig>,
    rank: Arc<dyn RankStrategy>,
}

impl IssueLifecycle {
    /// Creates a lifecycle service with the default rank scheme.
    pub fn new(store: Arc<CollabStore>, config: Arc<CollabConfig>) -> Self {
        Self::with_rank_strategy(store, config, Arc::new(SuffixRank))
    }

    /// Creates a lifecycle service with a custom rank scheme.
    pub fn with_rank_strategy(
        store: Arc<CollabStore>,
        config: Arc<CollabConfig>,
        rank: Arc<dyn RankStrategy>,
    ) -> Self {
        Self { store, config, rank }
    }

    // ========================================================================
    // Creation and queries
    // ========================================================================

    /// Creates an issue, assigning the next sequential code and a rank at
    /// the bottom of the team's list.
    ///
    /// If the issue starts out assigned to someone other than the creator,
    /// the assignee is notified.
    pub async fn create_issue(&self, actor: &Actor, new_issue: NewIssue) -> CollabResult<Issue> {
        let NewIssue {
            team_id,
            title,
            description,
            status,
            priority,
            assignee_id,
            due_date,
            label_ids,
        } = new_issue;

        if title.trim().is_empty() {
            return Err(CollabError::ValidationFailed(
                "issue title must not be empty".into(),
            ));
        }

        let mut state = self.store.write().await;
        state.team(team_id)?;
        ensure_can_edit(&state, actor, team_id)?;
        if let Some(assignee) = assignee_id {
            if state.role_of(team_id, assignee).is_none() {
                return Err(CollabError::NotMember {
                    team_id,
                    user_id: assignee,
                });
            }
        }
        for label_id in &label_ids {
            state.label(*label_id)?;
        }

        let number = state.next_issue_number();
        let code = IssueCode::new(self.config.issue_prefix.clone(), number);
        let rank = self.rank.next_rank(state.max_rank(team_id).as_deref());

        let mut issue = Issue::new(code, team_id, actor.id, title, rank);
        issue.description = description;
        if let Some(status) = status {
            issue.status = status;
        }
        if let Some(priority) = priority {
            issue.priority = priority;
        }
        issue.assignee_id = assignee_id;
        issue.due_date = due_date;
        for label_id in label_ids {
            if !issue.has_label(label_id) {
                issue.toggle_label(label_id);
            }
        }
        state.issues.insert(issue.id, issue.clone());

        if let Some(assignee) = issue.assignee_id {
            if assignee != actor.id {
                let preview = snippet(&issue.title, self.config.snippet_len);
                state.push_inbox(InboxItem::new(
                    assignee,
                    issue.id,
                    NotificationKind::Created,
                    preview,
                    actor.id,
                ));
            }
        }

        tracing::info!(
            issue_id = %issue.id,
            code = %issue.code,
            team_id = %team_id,
            "Created issue"
        );
        Ok(issue)
    }

    /// Looks up an issue by ID.
    pub async fn issue(&self, actor: &Actor, issue_id: Uuid) -> CollabResult<Issue> {
        let state = self.store.read().await;
        let issue = state.issue(issue_id)?;
        ensure_can_view(&state, actor, issue.team_id)?;
        Ok(issue.clone())
    }

    /// Looks up an issue by its `PREFIX-n` code.
    pub async fn issue_by_code(&self, actor: &Actor, code: &str) -> CollabResult<Issue> {
        let parsed =
            IssueCode::parse(code).ok_or_else(|| CollabError::IssueCodeNotFound(code.into()))?;
        let state = self.store.read().await;
        let issue = state
            .issues
            .values()
            .find(|issue| issue.code == parsed)
            .ok_or_else(|| CollabError::IssueCodeNotFound(code.into()))?;
        ensure_can_view(&state, actor, issue.team_id)?;
        Ok(issue.clone())
    }

    /// All issues of a team in rank order.
    pub async fn team_issues(&self, actor: &Actor, team_id: Uuid) -> CollabResult<Vec<Issue>> {
        let state = self.store.read().await;
        state.team(team_id)?;
        ensure_can_view(&state, actor, team_id)?;
        Ok(state.team_issues(team_id))
    }

    // ========================================================================
    // Field updates
    // ========================================================================

    /// Moves an issue to a new workflow status.
    ///
    /// Subscribers other than the actor are notified; the kind depends on
    /// whether the change crosses the closed boundary.
    pub async fn update_status(
        &self,
        actor: &Actor,
        issue_id: Uuid,
        status: IssueStatus,
    ) -> CollabResult<Issue> {
        let mut state = self.store.write().await;
        let issue = state.issue(issue_id)?.clone();
        ensure_can_edit(&state, actor, issue.team_id)?;
        if issue.status == status {
            return Ok(issue);
        }

        let kind = if !issue.status.is_closed() && status.is_closed() {
            NotificationKind::Closed
        } else if issue.status.is_closed() && !status.is_closed() {
            NotificationKind::Reopened
        } else {
            NotificationKind::Status
        };

        let stored = state.issue_mut(issue_id)?;
        stored.status = status;
        stored.touch();
        let updated = stored.clone();

        let preview = snippet(&updated.title, self.config.snippet_len);
        let notified = notify_subscribers(&mut state, &updated, kind, actor.id, &preview);

        tracing::info!(
            issue_id = %issue_id,
            status = %status,
            notified = %notified,
            "Updated issue status"
        );
        Ok(updated)
    }

    /// Changes an issue's priority. No notifications.
    pub async fn update_priority(
        &self,
        actor: &Actor,
        issue_id: Uuid,
        priority: IssuePriority,
    ) -> CollabResult<Issue> {
        let mut state = self.store.write().await;
        let issue = state.issue(issue_id)?.clone();
        ensure_can_edit(&state, actor, issue.team_id)?;
        if issue.priority == priority {
            return Ok(issue);
        }

        let stored = state.issue_mut(issue_id)?;
        stored.priority = priority;
        stored.touch();
        let updated = stored.clone();

        tracing::info!(issue_id = %issue_id, priority = %priority, "Updated issue priority");
        Ok(updated)
    }

    /// Assigns the issue to a team member, or clears the assignee.
    ///
    /// A new assignee other than the actor is notified. Unassignment is
    /// silent.
    pub async fn update_assignee(
        &self,
        actor: &Actor,
        issue_id: Uuid,
        assignee_id: Option<Uuid>,
    ) -> CollabResult<Issue> {
        let mut state = self.store.write().await;
        let issue = state.issue(issue_id)?.clone();
        ensure_can_edit(&state, actor, issue.team_id)?;
        if let Some(assignee) = assignee_id {
            if state.role_of(issue.team_id, assignee).is_none() {
                return Err(CollabError::NotMember {
                    team_id: issue.team_id,
                    user_id: assignee,
                });
            }
        }
        if issue.assignee_id == assignee_id {
            return Ok(issue);
        }

        let stored = state.issue_mut(issue_id)?;
        stored.assignee_id = assignee_id;
        stored.touch();
        let updated = stored.clone();

        if let Some(assignee) = assignee_id {
            if assignee != actor.id {
                let preview = snippet(&updated.title, self.config.snippet_len);
                state.push_inbox(InboxItem::new(
                    assignee,
                    issue_id,
                    NotificationKind::Assignment,
                    preview,
                    actor.id,
                ));
            }
        }

        tracing::info!(issue_id = %issue_id, assignee = ?assignee_id, "Updated issue assignee");
        Ok(updated)
    }

    /// Sets or clears the due date. No notifications.
    pub async fn update_due_date(
        &self,
        actor: &Actor,
        issue_id: Uuid,
        due_date: Option<NaiveDate>,
    ) -> CollabResult<Issue> {
        let mut state = self.store.write().await;
        let issue = state.issue(issue_id)?.clone();
        ensure_can_edit(&state, actor, issue.team_id)?;
        if issue.due_date == due_date {
            return Ok(issue);
        }

        let stored = state.issue_mut(issue_id)?;
        stored.due_date = due_date;
        stored.touch();
        Ok(stored.clone())
    }

    /// Retitles the issue. Subscribers other than the actor are notified.
    pub async fn update_title(
        &self,
        actor: &Actor,
        issue_id: Uuid,
        title: impl Into<String>,
    ) -> CollabResult<Issue> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CollabError::ValidationFailed(
                "issue title must not be empty".into(),
            ));
        }

        let mut state = self.store.write().await;
        let issue = state.issue(issue_id)?.clone();
        ensure_can_edit(&state, actor, issue.team_id)?;
        if issue.title == title {
            return Ok(issue);
        }

        let stored = state.issue_mut(issue_id)?;
        stored.title = title;
        stored.touch();
        let updated = stored.clone();

        let preview = snippet(&updated.title, self.config.snippet_len);
        let notified = notify_subscribers(
            &mut state,
            &updated,
            NotificationKind::Edited,
            actor.id,
            &preview,
        );

        tracing::info!(issue_id = %issue_id, notified = %notified, "Updated issue title");
        Ok(updated)
    }

    /// Rewrites or clears the description. Subscribers other than the
    /// actor are notified.
    pub async fn update_description(
        &self,
        actor: &Actor,
        issue_id: Uuid,
        description: Option<String>,
    ) -> CollabResult<Issue> {
        let mut state = self.store.write().await;
        let issue = state.issue(issue_id)?.clone();
        ensure_can_edit(&state, actor, issue.team_id)?;
        if issue.description == description {
            return Ok(issue);
        }

        let stored = state.issue_mut(issue_id)?;
        stored.description = description;
        stored.touch();
        let updated = stored.clone();

        let source = updated.description.as_deref().unwrap_or(&updated.title);
        let preview = snippet(source, self.config.snippet_len);
        let notified = notify_subscribers(
            &mut state,
            &updated,
            NotificationKind::Edited,
            actor.id,
            &preview,
        );

        tracing::info!(issue_id = %issue_id, notified = %notified, "Updated issue description");
        Ok(updated)
    }

    /// Attaches the label if absent, detaches it if present.
    pub async fn toggle_label(
        &self,
        actor: &Actor,
        issue_id: Uuid,
        label_id: Uuid,
    ) -> CollabResult<Issue> {
        let mut state = self.store.write().await;
        let issue = state.issue(issue_id)?.clone();
        ensure_can_edit(&state, actor, issue.team_id)?;
        state.label(label_id)?;

        let stored = state.issue_mut(issue_id)?;
        let attached = stored.toggle_label(label_id);
        stored.touch();
        let updated = stored.clone();

        tracing::info!(
            issue_id = %issue_id,
            label_id = %label_id,
            attached = %attached,
            "Toggled issue label"
        );
        Ok(updated)
    }

    /// Deletes an issue, cascading to comments, subscriptions, and inbox
    /// items.
    pub async fn delete_issue(&self, actor: &Actor, issue_id: Uuid) -> CollabResult<()> {
        let mut state = self.store.write().await;
        let issue = state.issue(issue_id)?.clone();
        let actor_role = state.role_of(issue.team_id, actor.id);
        if !decisions::can_delete_issue(actor, issue.creator_id, actor_role) {
            return Err(CollabError::Unauthorized(
                "only the creator, a team lead, or an admin may delete an issue".into(),
            ));
        }

        state.remove_issue_cascade(issue_id);
        tracing::info!(issue_id = %issue_id, code = %issue.code, "Deleted issue");
        Ok(())
    }

    // ========================================================================
    // Label catalog
    // ========================================================================

    /// Adds a label to the deployment-wide catalog.
    pub async fn create_label(&self, actor: &Actor, new_label: NewLabel) -> CollabResult<IssueLabel> {
        if !actor.can_manage_all_teams() {
            return Err(CollabError::Unauthorized(
                "only team managers may create labels".into(),
            ));
        }
        let slug = new_label.slug.trim().to_string();
        if slug.is_empty() || slug.contains(char::is_whitespace) {
            return Err(CollabError::ValidationFailed(
                "label slug must be non-empty without whitespace".into(),
            ));
        }
        if new_label.name.trim().is_empty() {
            return Err(CollabError::ValidationFailed(
                "label name must not be empty".into(),
            ));
        }

        let mut state = self.store.write().await;
        if state.labels.values().any(|label| label.slug == slug) {
            return Err(CollabError::ValidationFailed(format!(
                "label slug {slug} is already in use"
            )));
        }

        let color = new_label.color.unwrap_or_else(|| "#6b7280".to_string());
        let label = IssueLabel::new(slug, new_label.name, color);
        state.labels.insert(label.id, label.clone());

        tracing::info!(label_id = %label.id, slug = %label.slug, "Created label");
        Ok(label)
    }

    /// The whole label catalog, ordered by slug.
    pub async fn labels(&self) -> Vec<IssueLabel> {
        let state = self.store.read().await;
        let mut labels: Vec<IssueLabel> = state.labels.values().cloned().collect();
        labels.sort_by(|a, b| a.slug.cmp(&b.slug));
        labels
    }
}

fn ensure_can_view(state: &StoreState, actor: &Actor, team_id: Uuid) -> CollabResult<()> {
    let role = state.role_of(team_id, actor.id);
    if decisions::can_view_issue(actor, role) {
        Ok(())
    } else {
        Err(CollabError::Unauthorized(
            "issues are visible to team members and admins only".into(),
        ))
    }
}

fn ensure_can_edit(state: &StoreState, actor: &Actor, team_id: Uuid) -> CollabResult<()> {
    let role = state.role_of(team_id, actor.id);
    if decisions::can_edit_issue(actor, role) {
        Ok(())
    } else {
        Err(CollabError::Unauthorized(
            "issues can be edited by team members and admins only".into(),
        ))
    }
}

fn notify_subscribers(
    state: &mut StoreState,
    issue: &Issue,
    kind: NotificationKind,
    actor_id: Uuid,
    preview: &str,
) -> usize {
    let mut notified = 0;
    for user_id in state.subscribers_of(issue.id) {
        if user_id == actor_id {
            continue;
        }
        state.push_inbox(InboxItem::new(user_id, issue.id, kind, preview, actor_id));
        notified += 1;
    }
    notified
}
