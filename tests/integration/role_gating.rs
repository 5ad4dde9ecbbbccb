//! Integration tests for role-gated mutation.
//!
//! Only EB, EC and Core members may create or delete; every delete goes
//! through a confirmation step that can cancel it before the store sees it.
//!
//! Verification command: `cargo test --test role_gating`

use std::cell::Cell;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use clubdesk::session::{DashboardSession, DeleteOutcome, Member, SessionError};
use clubdesk_model::{DocumentId, NewEvent, NewTask, Priority, Role, TaskStatus};
use clubdesk_store::MemoryStore;

fn member(role: Role) -> Member {
    Member {
        id: format!("{role}-member"),
        role,
    }
}

fn new_task() -> NewTask {
    NewTask {
        title: "Book venue".to_string(),
        description: String::new(),
        domain: "Events".to_string(),
        priority: Priority::Medium,
        status: TaskStatus::Upcoming,
        due_date: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
        created_by: String::new(),
        assigned_to: None,
    }
}

#[tokio::test]
async fn senior_roles_can_create() {
    for role in [Role::Eb, Role::Ec, Role::Core] {
        let store = Arc::new(MemoryStore::new());
        let mut session = DashboardSession::new(Arc::clone(&store), member(role));
        assert!(session.can_edit());
        session.create_task(&new_task()).await.unwrap();
        assert_eq!(store.len("tasks").await, 1, "role {role}");
    }
}

#[tokio::test]
async fn member_role_is_denied_everywhere() {
    let store = Arc::new(MemoryStore::new());
    let mut session = DashboardSession::new(Arc::clone(&store), member(Role::Member));
    assert!(!session.can_edit());

    let err = session.create_task(&new_task()).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::PermissionDenied { role: Role::Member, action: "create tasks" }
    ));

    let event = NewEvent {
        title: "Social".to_string(),
        date: Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap(),
        time: String::new(),
        location: String::new(),
        description: String::new(),
    };
    assert!(matches!(
        session.create_event(&event).await,
        Err(SessionError::PermissionDenied { .. })
    ));

    let asked = Cell::new(false);
    let err = session
        .delete_task(&DocumentId::from("t1"), |_| {
            asked.set(true);
            true
        })
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::PermissionDenied { .. }));
    assert!(!asked.get(), "denied members are never asked to confirm");
    assert_eq!(store.len("tasks").await, 0);
    assert_eq!(store.len("events").await, 0);
}

#[tokio::test]
async fn declined_confirmation_never_reaches_store() {
    let store = Arc::new(MemoryStore::new());
    let mut session = DashboardSession::new(Arc::clone(&store), member(Role::Eb));
    let id = session.create_task(&new_task()).await.unwrap();

    // A failing store proves the delete is never attempted.
    store.fail_writes("must not be called");
    let seen = Cell::new(None);
    let outcome = session
        .delete_task(&id, |asked| {
            seen.set(Some(asked.clone()));
            false
        })
        .await
        .unwrap();

    assert_eq!(outcome, DeleteOutcome::Cancelled);
    assert_eq!(seen.take(), Some(id));
    assert_eq!(store.len("tasks").await, 1);
    assert_eq!(session.tasks().items().len(), 1);
}
