//! Concurrency tests for the collaboration engine.
//!
//! Every composite operation runs under a single store write guard, so
//! concurrent callers must never observe half of one: no duplicate issue
//! codes, no double-accepted invitations, no moment where a lead transfer
//! has moved one role but not the other.

use std::sync::Arc;

use collab_engine::{CollabConfig, CollabCore, CollabError, NewComment, NewIssue, NewTeam};
use collab_notify::NotificationKind;
use collab_policy::{Actor, WorkspaceRole};
use collab_team::TeamRole;
use uuid::Uuid;

/// Test fixture with a manager-led team and a pool of plain members.
struct TestFixture {
    core: CollabCore,
    manager: Actor,
    members: Vec<Actor>,
    team_id: Uuid,
}

impl TestFixture {
    async fn new(member_count: usize) -> Self {
        let core = CollabCore::new(CollabConfig::new("SHOP"));

        let manager_profile = core
            .membership()
            .register_user("Mara Vance", "mara@mercato.dev")
            .await
            .expect("Should register manager");
        let manager = Actor::new(manager_profile.id).with_role(WorkspaceRole::Manager);
        let team = core
            .membership()
            .create_team(
                &manager,
                NewTeam {
                    code: "CORE".into(),
                    name: "Core Commerce".into(),
                    ..Default::default()
                },
            )
            .await
            .expect("Should create team");

        let mut members = Vec::new();
        for n in 0..member_count {
            let profile = core
                .membership()
                .register_user(format!("Member {n}"), format!("member{n}@mercato.dev"))
                .await
                .expect("Should register member");
            core.membership()
                .add_member(&manager, team.id, profile.id, TeamRole::Member)
                .await
                .expect("Should add member");
            members.push(Actor::new(profile.id));
        }

        Self {
            core,
            manager,
            members,
            team_id: team.id,
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_issue_creation_yields_unique_codes() {
    let fixture = TestFixture::new(0).await;
    let count = 16;

    let mut handles = Vec::new();
    for n in 0..count {
        let core = fixture.core.clone();
        let actor = fixture.manager.clone();
        let team_id = fixture.team_id;
        handles.push(tokio::spawn(async move {
            core.issues()
                .create_issue(&actor, NewIssue::new(team_id, format!("Task {n}")))
                .await
                .expect("Should create issue")
        }));
    }

    let mut numbers: Vec<u64> = Vec::new();
    for handle in handles {
        let issue = handle.await.expect("Task should not panic");
        numbers.push(issue.code.number);
    }
    numbers.sort_unstable();
    let expected: Vec<u64> = (1..=count as u64).collect();
    assert_eq!(numbers, expected);

    // Ranks are unique too, so the board has a total order.
    let board = fixture
        .core
        .issues()
        .team_issues(&fixture.manager, fixture.team_id)
        .await
        .expect("Should list issues");
    for pair in board.windows(2) {
        assert!(pair[0].rank < pair[1].rank);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_invitation_accept_races_produce_one_membership() {
    let fixture = TestFixture::new(0).await;
    let invitee_profile = fixture
        .core
        .membership()
        .register_user("Kai Flint", "kai@mercato.dev")
        .await
        .expect("Should register invitee");
    let invitee = Actor::new(invitee_profile.id);

    let invitation = fixture
        .core
        .invitations()
        .invite(
            &fixture.manager,
            collab_engine::NewInvitation::member(fixture.team_id, invitee.id),
        )
        .await
        .expect("Should invite");

    let mut handles = Vec::new();
    for _ in 0..4 {
        let core = fixture.core.clone();
        let actor = invitee.clone();
        let invitation_id = invitation.id;
        handles.push(tokio::spawn(async move {
            core.invitations().accept(&actor, invitation_id).await
        }));
    }

    let mut accepted = 0;
    for handle in handles {
        match handle.await.expect("Task should not panic") {
            Ok(_) => accepted += 1,
            Err(CollabError::InvitationAlreadyResolved) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(accepted, 1);

    let members = fixture
        .core
        .membership()
        .members_of(fixture.team_id)
        .await
        .expect("Should list members");
    assert_eq!(
        members.iter().filter(|m| m.user_id == invitee.id).count(),
        1
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_lead_transfer_is_never_observed_half_done() {
    let fixture = Arc::new(TestFixture::new(2).await);
    let alpha = fixture.members[0].id;
    let beta = fixture.members[1].id;
    fixture
        .core
        .membership()
        .promote_member(&fixture.manager, fixture.team_id, alpha)
        .await
        .expect("Should promote alpha");

    let writer = {
        let fixture = fixture.clone();
        tokio::spawn(async move {
            for n in 0..20 {
                let (from, to) = if n % 2 == 0 { (alpha, beta) } else { (beta, alpha) };
                fixture
                    .core
                    .membership()
                    .transfer_lead(&fixture.manager, fixture.team_id, from, to)
                    .await
                    .expect("Should transfer lead");
            }
        })
    };
    let reader = {
        let fixture = fixture.clone();
        tokio::spawn(async move {
            for _ in 0..200 {
                let members = fixture
                    .core
                    .membership()
                    .members_of(fixture.team_id)
                    .await
                    .expect("Should list members");
                let pair_leads = members
                    .iter()
                    .filter(|m| {
                        (m.user_id == alpha || m.user_id == beta) && m.role == TeamRole::Lead
                    })
                    .count();
                assert_eq!(pair_leads, 1, "transfer observed mid-flight");
                tokio::task::yield_now().await;
            }
        })
    };

    writer.await.expect("Writer should not panic");
    reader.await.expect("Reader should not panic");

    // After an even number of swaps the roles are back where they started.
    assert!(fixture.core.membership().is_lead(fixture.team_id, alpha).await);
    assert!(!fixture.core.membership().is_lead(fixture.team_id, beta).await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_comments_all_reach_a_stable_subscriber() {
    let fixture = TestFixture::new(5).await;
    let issue = fixture
        .core
        .issues()
        .create_issue(
            &fixture.manager,
            NewIssue::new(fixture.team_id, "Busy thread"),
        )
        .await
        .expect("Should create issue");

    // members[0] watches; the other four comment concurrently.
    let watcher = fixture.members[0].clone();
    fixture
        .core
        .notifier()
        .subscribe(issue.id, watcher.id)
        .await
        .expect("Should subscribe watcher");

    let mut handles = Vec::new();
    for author in &fixture.members[1..] {
        let core = fixture.core.clone();
        let author = author.clone();
        let issue_id = issue.id;
        handles.push(tokio::spawn(async move {
            core.comments()
                .create_comment(&author, NewComment::new(issue_id, "checking in"))
                .await
                .expect("Should create comment")
        }));
    }
    for handle in handles {
        handle.await.expect("Task should not panic");
    }

    // One item per comment, none authored by the watcher.
    let inbox = fixture.core.notifier().inbox_for(watcher.id).await;
    assert_eq!(inbox.len(), 4);
    for item in &inbox {
        assert_eq!(item.kind, NotificationKind::Comment);
        assert_ne!(item.actor_id, watcher.id);
    }

    // Nobody is ever notified about their own comment.
    for member in &fixture.members {
        for item in fixture.core.notifier().inbox_for(member.id).await {
            assert_ne!(item.actor_id, member.id);
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_duplicate_email_race_registers_once() {
    let fixture = TestFixture::new(0).await;

    let mut handles = Vec::new();
    for n in 0..8 {
        let core = fixture.core.clone();
        handles.push(tokio::spawn(async move {
            core.membership()
                .register_user(format!("Claimant {n}"), "shared@mercato.dev")
                .await
        }));
    }

    let mut registered = 0;
    for handle in handles {
        match handle.await.expect("Task should not panic") {
            Ok(_) => registered += 1,
            Err(CollabError::ValidationFailed(_)) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(registered, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_duplicate_member_race_adds_once() {
    let fixture = TestFixture::new(0).await;
    let profile = fixture
        .core
        .membership()
        .register_user("Kai Flint", "kai@mercato.dev")
        .await
        .expect("Should register user");

    let mut handles = Vec::new();
    for _ in 0..4 {
        let core = fixture.core.clone();
        let manager = fixture.manager.clone();
        let team_id = fixture.team_id;
        let user_id = profile.id;
        handles.push(tokio::spawn(async move {
            core.membership()
                .add_member(&manager, team_id, user_id, TeamRole::Member)
                .await
        }));
    }

    let mut added = 0;
    for handle in handles {
        match handle.await.expect("Task should not panic") {
            Ok(_) => added += 1,
            Err(CollabError::AlreadyMember { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(added, 1);
}
