//! Plain-text rendering of dashboard cards.

use std::fmt::{Display, Write};

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use clubdesk_model::{Announcement, Event, FilterSelection, FilterValue, Task};

use crate::dashboard::DashboardSummary;
use crate::filter;

/// Date format used when none is configured.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Shown in place of the task list when the filters exclude everything.
pub const NO_MATCHING_TASKS: &str = "No tasks found matching your filters.";

/// Renders entities as text cards.
#[derive(Debug, Clone)]
pub struct Renderer {
    date_format: String,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl Renderer {
    /// Creates a renderer with a chrono `strftime` date format.
    ///
    /// An invalid format falls back to [`DEFAULT_DATE_FORMAT`].
    #[must_use]
    pub fn new(date_format: &str) -> Self {
        if StrftimeItems::new(date_format).any(|item| matches!(item, Item::Error)) {
            tracing::warn!(date_format, "invalid date format, using default");
            return Self::default();
        }
        Self {
            date_format: date_format.to_string(),
        }
    }

    #[must_use]
    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    /// Formats a date with the configured format.
    #[must_use]
    pub fn date(&self, dt: DateTime<Utc>) -> String {
        dt.format(&self.date_format).to_string()
    }

    /// One task card. `can_edit` adds the manage marker with the task id.
    #[must_use]
    pub fn task_card(&self, task: &Task, can_edit: bool) -> String {
        let mut out = format!("[{}] {}", task.priority, task.title);
        if can_edit {
            let _ = write!(out, "  (id: {})", task.id);
        }
        out.push('\n');
        if !task.description.is_empty() {
            let _ = writeln!(out, "  {}", task.description);
        }
        let _ = writeln!(
            out,
            "  Status: {} | Domain: {} | Due: {}",
            task.status,
            task.domain,
            self.date(task.due_date)
        );
        let _ = write!(out, "  Created by: {}", task.created_by);
        if let Some(assignee) = &task.assigned_to {
            let _ = write!(out, " | Assigned to: {assignee}");
        }
        out.push('\n');
        out
    }

    /// The task list, or the empty state when nothing passes the filters.
    #[must_use]
    pub fn task_list(&self, tasks: &[&Task], can_edit: bool) -> String {
        if tasks.is_empty() {
            return format!("{NO_MATCHING_TASKS}\n");
        }
        tasks
            .iter()
            .map(|t| self.task_card(t, can_edit))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// One event card.
    #[must_use]
    pub fn event_card(&self, event: &Event, can_edit: bool) -> String {
        let mut out = event.title.clone();
        if can_edit {
            let _ = write!(out, "  (id: {})", event.id);
        }
        out.push('\n');
        let _ = write!(out, "  {}", self.date(event.date));
        if !event.time.is_empty() {
            let _ = write!(out, " at {}", event.time);
        }
        if !event.location.is_empty() {
            let _ = write!(out, " | {}", event.location);
        }
        out.push('\n');
        if !event.description.is_empty() {
            let _ = writeln!(out, "  {}", event.description);
        }
        out
    }

    /// One announcement card.
    #[must_use]
    pub fn announcement_card(&self, announcement: &Announcement, can_edit: bool) -> String {
        let mut out = format!("[{}] {}", announcement.priority, announcement.title);
        if can_edit {
            let _ = write!(out, "  (id: {})", announcement.id);
        }
        out.push('\n');
        let _ = writeln!(out, "  {}", announcement.content);
        let _ = writeln!(
            out,
            "  Posted by {} on {}",
            announcement.created_by,
            self.date(announcement.created_at)
        );
        out
    }

    /// The three filter dimensions with the current choice bracketed.
    #[must_use]
    pub fn filter_panel(
        &self,
        selection: &FilterSelection,
        domains: &[FilterValue<String>],
    ) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Domain:   {}", option_row(domains, &selection.domain));
        let _ = writeln!(
            out,
            "Priority: {}",
            option_row(&filter::priority_options(), &selection.priority)
        );
        let _ = writeln!(
            out,
            "Status:   {}",
            option_row(&filter::status_options(), &selection.status)
        );
        out
    }

    /// The quick-stats block.
    #[must_use]
    pub fn summary(&self, summary: &DashboardSummary) -> String {
        format!(
            "Upcoming events: {}\nAnnouncements:   {}\nTasks:           {} ({} upcoming, {} today, {} completed)\nOverdue tasks:   {}\n",
            summary.upcoming_events,
            summary.announcements,
            summary.tasks_total,
            summary.tasks_upcoming,
            summary.tasks_today,
            summary.tasks_completed,
            summary.overdue_tasks,
        )
    }
}

fn option_row<T: Display + PartialEq>(options: &[FilterValue<T>], current: &FilterValue<T>) -> String {
    options
        .iter()
        .map(|o| {
            if o == current {
                format!("[{o}]")
            } else {
                o.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
