//! Integration tests for the dashboard read/write flow.
//!
//! Drives a `DashboardSession` over an in-memory store and a JSON file
//! store: seeded snapshots, filtering, create/delete with re-fetch, and
//! stale-snapshot retention when the store fails.
//!
//! Verification command: `cargo test --test dashboard_flow`

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use clubdesk::aggregate::{self, FetchError};
use clubdesk::config::Command;
use clubdesk::gateway::{self, MutationGateway, WriteError};
use clubdesk::session::{DashboardSession, DeleteOutcome, Member, SessionError};
use clubdesk_model::{
    Document, DocumentId, FilterSelection, FilterValue, NewEvent, NewTask, Priority, Role,
    TaskStatus, Value,
};
use clubdesk_store::{DocumentStore, JsonFileStore, MemoryStore};

// =============================================================================
// Test helpers
// =============================================================================

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
}

fn new_task(title: &str, domain: &str, priority: Priority, status: TaskStatus) -> NewTask {
    NewTask {
        title: title.to_string(),
        description: String::new(),
        domain: domain.to_string(),
        priority,
        status,
        due_date: day(28),
        created_by: "alice".to_string(),
        assigned_to: None,
    }
}

/// Seeds a task document with an explicit id and creation day.
async fn seed(store: &MemoryStore, id: &str, task: &NewTask, created: u32) {
    let mut fields = gateway::task_fields(task);
    fields.insert("createdAt".to_string(), Value::from(day(created)));
    store
        .insert_raw("tasks", Document::new(DocumentId::from(id), fields))
        .await;
}

/// Three tasks: (Web, High, Today), (Web, Low, Completed), (Ops, High, Today),
/// created so that newest-first order is t1, t2, t3.
async fn three_task_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    seed(&store, "t1", &new_task("one", "Web", Priority::High, TaskStatus::Today), 3).await;
    seed(&store, "t2", &new_task("two", "Web", Priority::Low, TaskStatus::Completed), 2).await;
    seed(&store, "t3", &new_task("three", "Ops", Priority::High, TaskStatus::Today), 1).await;
    store
}

fn eb() -> Member {
    Member {
        id: "alice".to_string(),
        role: Role::Eb,
    }
}

fn visible_ids<S: DocumentStore>(session: &DashboardSession<S>) -> Vec<String> {
    session.visible_tasks().iter().map(|t| t.id.to_string()).collect()
}

// =============================================================================
// Filtering
// =============================================================================

#[tokio::test]
async fn three_task_filter_scenario() {
    let mut session = DashboardSession::new(three_task_store().await, eb());
    session.mount().await.unwrap();

    session.set_selection(FilterSelection {
        domain: FilterValue::Only("Web".to_string()),
        ..FilterSelection::all()
    });
    assert_eq!(visible_ids(&session), ["t1", "t2"]);

    session.set_selection(FilterSelection {
        priority: FilterValue::Only(Priority::High),
        ..FilterSelection::all()
    });
    assert_eq!(visible_ids(&session), ["t1", "t3"]);

    session.set_status_filter(FilterValue::Only(TaskStatus::Completed));
    assert!(visible_ids(&session).is_empty());
}

#[tokio::test]
async fn domain_options_follow_snapshot() {
    let mut session = DashboardSession::new(three_task_store().await, eb());
    session.mount().await.unwrap();
    assert_eq!(
        session.domain_options(),
        [
            FilterValue::All,
            FilterValue::Only("Web".to_string()),
            FilterValue::Only("Ops".to_string()),
        ]
    );
}

// =============================================================================
// Mutation
// =============================================================================

#[tokio::test]
async fn created_task_appears_exactly_once() {
    let store = three_task_store().await;
    let mut session = DashboardSession::new(Arc::clone(&store), eb());
    session.mount().await.unwrap();

    let id = session
        .create_task(&new_task("four", "Finance", Priority::Medium, TaskStatus::Upcoming))
        .await
        .unwrap();

    let fetched = aggregate::fetch_tasks(&*store).await.unwrap();
    assert_eq!(fetched.iter().filter(|t| t.id == id).count(), 1);
    // Newest first: the server-stamped task leads.
    assert_eq!(fetched[0].id, id);
    assert_eq!(session.tasks().items().len(), 4);
    assert_eq!(session.tasks().items()[0].id, id);
}

#[tokio::test]
async fn deleting_missing_task_leaves_snapshot_unchanged() {
    let store = three_task_store().await;
    let mut session = DashboardSession::new(Arc::clone(&store), eb());
    session.mount().await.unwrap();
    let before = aggregate::fetch_tasks(&*store).await.unwrap();

    let err = session
        .delete_task(&DocumentId::from("ghost"), |_| true)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::Write(WriteError::NotFound { collection: "tasks", .. })
    ));

    assert_eq!(aggregate::fetch_tasks(&*store).await.unwrap(), before);
    assert_eq!(session.tasks().items(), before.as_slice());
}

#[tokio::test]
async fn delete_removes_and_refreshes() {
    let mut session = DashboardSession::new(three_task_store().await, eb());
    session.mount().await.unwrap();
    let outcome = session
        .delete_task(&DocumentId::from("t2"), |_| true)
        .await
        .unwrap();
    assert_eq!(outcome, DeleteOutcome::Deleted);
    let ids: Vec<_> = session.tasks().items().iter().map(|t| t.id.to_string()).collect();
    assert_eq!(ids, ["t1", "t3"]);
}

// =============================================================================
// Failure handling
// =============================================================================

#[tokio::test]
async fn failed_refresh_keeps_stale_snapshot() {
    let store = three_task_store().await;
    let mut session = DashboardSession::new(Arc::clone(&store), eb());
    session.mount().await.unwrap();
    let fetched_at = session.tasks().fetched_at();

    store.fail_reads("network down");
    let err = session.refresh_tasks().await.unwrap_err();
    assert!(matches!(err, FetchError::Query { .. }));
    assert_eq!(session.tasks().items().len(), 3);
    assert_eq!(session.tasks().fetched_at(), fetched_at);

    store.heal();
    session.refresh_tasks().await.unwrap();
    assert!(session.tasks().fetched_at() >= fetched_at);
}

#[tokio::test]
async fn mount_attempts_every_collection() {
    let store = three_task_store().await;
    let mut bad = gateway::task_fields(&new_task("bad", "Web", Priority::Low, TaskStatus::Today));
    bad.insert("createdAt".to_string(), Value::from(day(9)));
    bad.insert("dueDate".to_string(), Value::from(true));
    store.insert_raw("tasks", Document::new("bad".into(), bad)).await;

    let mut session = DashboardSession::new(Arc::clone(&store), eb());
    let err = session.mount().await.unwrap_err();
    assert_eq!(err.collection(), "tasks");
    assert!(session.tasks().fetched_at().is_none());
    assert!(session.events().fetched_at().is_some());
    assert!(session.announcements().fetched_at().is_some());

    // An events listing can still run; a task listing or summary cannot.
    let unloaded = |command: Command| {
        command
            .required_collections()
            .iter()
            .any(|c| !session.is_loaded(c))
    };
    assert!(!unloaded(Command::Events));
    assert!(!unloaded(Command::Announcements));
    assert!(unloaded(Command::Summary));
    assert!(unloaded(Command::Tasks {
        domain: None,
        priority: None,
        status: None,
    }));
}

#[tokio::test]
async fn events_with_mixed_date_encodings_stay_soonest_first() {
    let store = Arc::new(MemoryStore::new());
    let mut fields = gateway::event_fields(&NewEvent {
        title: "Weekly Meeting".to_string(),
        date: day(15),
        time: "14:00".to_string(),
        location: String::new(),
        description: String::new(),
    });
    fields.insert("date".to_string(), Value::from("2024-01-15"));
    fields.insert("createdAt".to_string(), Value::from(day(1)));
    store
        .insert_raw("events", Document::new("e1".into(), fields))
        .await;

    let mut session = DashboardSession::new(Arc::clone(&store), eb());
    session.mount().await.unwrap();
    let far = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
    session
        .create_event(&NewEvent {
            title: "Reunion".to_string(),
            date: far,
            time: String::new(),
            location: String::new(),
            description: String::new(),
        })
        .await
        .unwrap();

    let dates: Vec<_> = session.events().items().iter().map(|e| e.date).collect();
    assert_eq!(dates, [day(15), far]);
}

#[tokio::test]
async fn failed_write_reports_and_keeps_snapshot() {
    let store = three_task_store().await;
    let mut session = DashboardSession::new(Arc::clone(&store), eb());
    session.mount().await.unwrap();

    store.fail_writes("read-only");
    let err = session
        .create_task(&new_task("x", "Web", Priority::Low, TaskStatus::Today))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Write(WriteError::Store { .. })));
    assert_eq!(session.tasks().items().len(), 3);
    assert_eq!(store.len("tasks").await, 3);
}

// =============================================================================
// File-backed store
// =============================================================================

#[tokio::test]
async fn json_store_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    let id = {
        let store = Arc::new(JsonFileStore::open(&path).await.unwrap());
        let gw = MutationGateway::new(store);
        let mut session = DashboardSession::with_gateway(gw, eb());
        session.mount().await.unwrap();
        session
            .create_task(&new_task("persisted", "Ops", Priority::High, TaskStatus::Upcoming))
            .await
            .unwrap()
    };

    let store = Arc::new(JsonFileStore::open(&path).await.unwrap());
    let mut session = DashboardSession::new(store, eb());
    session.mount().await.unwrap();
    let tasks = session.tasks().items();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, id);
    assert_eq!(tasks[0].title, "persisted");
}
