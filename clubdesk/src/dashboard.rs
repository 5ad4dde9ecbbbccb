//! Quick stats for the dashboard header.

use chrono::{DateTime, NaiveTime, Utc};
use clubdesk_model::{Announcement, Event, Task, TaskStatus};

/// Counts shown above the task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardSummary {
    /// Events dated today or later.
    pub upcoming_events: usize,
    /// All announcements.
    pub announcements: usize,
    /// All tasks.
    pub tasks_total: usize,
    pub tasks_upcoming: usize,
    pub tasks_today: usize,
    pub tasks_completed: usize,
    /// Tasks due before today that are not completed.
    pub overdue_tasks: usize,
}

/// Midnight UTC of the day containing `now`.
#[must_use]
pub fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Events on or after the start of today, in snapshot order.
#[must_use]
pub fn upcoming_events(events: &[Event], now: DateTime<Utc>) -> Vec<&Event> {
    let today = start_of_day(now);
    events.iter().filter(|e| e.date >= today).collect()
}

/// A task is overdue when it is due before today and not completed.
#[must_use]
pub fn is_overdue(task: &Task, now: DateTime<Utc>) -> bool {
    task.status != TaskStatus::Completed && task.due_date < start_of_day(now)
}

/// Computes the dashboard counts.
#[must_use]
pub fn summarize(
    tasks: &[Task],
    events: &[Event],
    announcements: &[Announcement],
    now: DateTime<Utc>,
) -> DashboardSummary {
    let mut summary = DashboardSummary {
        upcoming_events: upcoming_events(events, now).len(),
        announcements: announcements.len(),
        tasks_total: tasks.len(),
        ..DashboardSummary::default()
    };
    for task in tasks {
        match task.status {
            TaskStatus::Upcoming => summary.tasks_upcoming += 1,
            TaskStatus::Today => summary.tasks_today += 1,
            TaskStatus::Completed => summary.tasks_completed += 1,
        }
        if is_overdue(task, now) {
            summary.overdue_tasks += 1;
        }
    }
    summary
}
