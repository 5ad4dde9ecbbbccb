//! `ClubDesk`: role-aware society dashboard.
//!
//! Reads tasks, events and announcements from a JSON document store and
//! prints them as text cards. Senior members (EB, EC, Core) can also create
//! and delete. Configuration via CLI flags, environment variables, or
//! config file (`~/.config/clubdesk/config.toml`).
//!
//! ```bash
//! # Task list with the configured default filters
//! cargo run --bin clubdesk
//!
//! # Filtered task list
//! cargo run --bin clubdesk -- tasks --domain Web --priority High
//!
//! # Create a task as an EB member
//! CLUBDESK_ROLE=EB CLUBDESK_MEMBER=alice cargo run --bin clubdesk -- \
//!     add-task "Fix website" --domain Web --due 2024-01-20
//! ```

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, Utc};
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;

use clubdesk::config::{CliArgs, ClientConfig, Command};
use clubdesk::gateway::MutationGateway;
use clubdesk::render::Renderer;
use clubdesk::schema;
use clubdesk::session::{DashboardSession, DeleteOutcome, Member, SessionError};
use clubdesk_model::{
    DocumentId, FilterSelection, FilterValue, NewAnnouncement, NewEvent, NewTask,
};
use clubdesk_store::{JsonFileStore, StoreError};

/// Errors that end the process with a non-zero status.
#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("{0} could not be loaded")]
    NotLoaded(&'static str),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

#[tokio::main]
async fn main() {
    let cli = CliArgs::parse();

    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    };

    // Logs go to a file so stdout carries only rendered output.
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!(
        store = %config.store_path.display(),
        member = %config.member_id,
        role = %config.role,
        "clubdesk starting"
    );

    let command = cli.command.clone().unwrap_or(Command::Tasks {
        domain: None,
        priority: None,
        status: None,
    });

    if let Err(e) = run(&config, command).await {
        tracing::error!(error = %e, "command failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Initialize file-based logging.
///
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure all
/// buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("clubdesk.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

async fn run(config: &ClientConfig, command: Command) -> Result<(), AppError> {
    let store = Arc::new(JsonFileStore::open(&config.store_path).await?);
    tracing::debug!(path = %store.path().display(), "store ready");
    let gateway = MutationGateway::new(store).with_max_title_len(config.max_task_title_len);
    let member = Member {
        id: config.member_id.clone(),
        role: config.role,
    };
    let mut session = DashboardSession::with_gateway(gateway, member);
    // Only the collections this command reads must load; the rest warn.
    let mount_error = session.mount().await.err();
    for collection in [schema::TASKS, schema::EVENTS, schema::ANNOUNCEMENTS] {
        if session.is_loaded(collection) {
            continue;
        }
        if command.required_collections().contains(&collection) {
            return Err(mount_error
                .filter(|e| e.collection() == collection)
                .map_or(AppError::NotLoaded(collection), |e| SessionError::from(e).into()));
        }
        tracing::warn!(collection, "continuing without collection");
        eprintln!("warning: {collection} could not be loaded");
    }

    let renderer = Renderer::new(&config.date_format);
    let can_edit = session.can_edit();
    let mut out = io::stdout();

    match command {
        Command::Tasks {
            domain,
            priority,
            status,
        } => {
            let defaults = &config.default_filters;
            session.set_selection(FilterSelection {
                domain: domain.map_or_else(|| defaults.domain.clone(), domain_filter),
                priority: priority.unwrap_or_else(|| defaults.priority.clone()),
                status: status.unwrap_or_else(|| defaults.status.clone()),
            });
            write!(
                out,
                "{}",
                renderer.filter_panel(session.selection(), &session.domain_options())
            )?;
            writeln!(out)?;
            write!(out, "{}", renderer.task_list(&session.visible_tasks(), can_edit))?;
        }
        Command::Events => {
            for event in session.events().items() {
                writeln!(out, "{}", renderer.event_card(event, can_edit))?;
            }
        }
        Command::Announcements => {
            for announcement in session.announcements().items() {
                writeln!(out, "{}", renderer.announcement_card(announcement, can_edit))?;
            }
        }
        Command::Summary => {
            write!(out, "{}", renderer.summary(&session.summary(Utc::now())))?;
        }
        Command::AddTask {
            title,
            domain,
            due,
            priority,
            status,
            description,
            assign,
        } => {
            let task = NewTask {
                title,
                description,
                domain,
                priority,
                status,
                due_date: midnight(due),
                created_by: config.member_id.clone(),
                assigned_to: assign,
            };
            let id = session.create_task(&task).await?;
            writeln!(out, "created task {id}")?;
        }
        Command::DeleteTask { id, yes } => {
            let outcome = session
                .delete_task(&DocumentId::new(id), |id| yes || confirm("task", id))
                .await?;
            report_delete(&mut out, "task", outcome)?;
        }
        Command::AddEvent {
            title,
            date,
            time,
            location,
            description,
        } => {
            let event = NewEvent {
                title,
                date: midnight(date),
                time,
                location,
                description,
            };
            let id = session.create_event(&event).await?;
            writeln!(out, "created event {id}")?;
        }
        Command::DeleteEvent { id, yes } => {
            let outcome = session
                .delete_event(&DocumentId::new(id), |id| yes || confirm("event", id))
                .await?;
            report_delete(&mut out, "event", outcome)?;
        }
        Command::Announce {
            title,
            content,
            priority,
        } => {
            let announcement = NewAnnouncement {
                title,
                content,
                priority,
                created_by: config.member_id.clone(),
            };
            let id = session.create_announcement(&announcement).await?;
            writeln!(out, "posted announcement {id}")?;
        }
        Command::DeleteAnnouncement { id, yes } => {
            let outcome = session
                .delete_announcement(&DocumentId::new(id), |id| {
                    yes || confirm("announcement", id)
                })
                .await?;
            report_delete(&mut out, "announcement", outcome)?;
        }
    }
    Ok(())
}

fn domain_filter(raw: String) -> FilterValue<String> {
    match raw.parse() {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

fn midnight(day: NaiveDate) -> chrono::DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// Asks on stdin; anything but `y`/`yes` declines.
fn confirm(kind: &str, id: &DocumentId) -> bool {
    print!("Are you sure you want to delete this {kind} ({id})? [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn report_delete(out: &mut impl Write, kind: &str, outcome: DeleteOutcome) -> io::Result<()> {
    match outcome {
        DeleteOutcome::Deleted => writeln!(out, "deleted {kind}"),
        DeleteOutcome::Cancelled => writeln!(out, "cancelled"),
    }
}
