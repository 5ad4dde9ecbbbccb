//! Client-side filtering of the task snapshot.
//!
//! Pure functions over an already-fetched snapshot: no I/O, no store
//! round-trips. Filtering keeps snapshot order and never adds, duplicates or
//! alters a task.

use std::collections::HashSet;

use clubdesk_model::{FilterSelection, FilterValue, Priority, Task, TaskStatus};

/// Returns `true` if `task` passes every dimension of `selection`.
#[must_use]
pub fn matches(task: &Task, selection: &FilterSelection) -> bool {
    selection.domain.admits(&task.domain)
        && selection.priority.admits(&task.priority)
        && selection.status.admits(&task.status)
}

/// The tasks of `snapshot` that pass `selection`, in snapshot order.
#[must_use]
pub fn apply<'a>(snapshot: &'a [Task], selection: &FilterSelection) -> Vec<&'a Task> {
    snapshot.iter().filter(|t| matches(t, selection)).collect()
}

/// Domain choices for the filter panel: `All`, then each distinct domain in
/// order of first appearance in `snapshot`.
#[must_use]
pub fn domain_options(snapshot: &[Task]) -> Vec<FilterValue<String>> {
    let mut seen = HashSet::new();
    let mut options = vec![FilterValue::All];
    options.extend(
        snapshot
            .iter()
            .filter(|t| seen.insert(t.domain.as_str()))
            .map(|t| FilterValue::Only(t.domain.clone())),
    );
    options
}

/// Priority choices: `All`, `High`, `Medium`, `Low`.
#[must_use]
pub fn priority_options() -> Vec<FilterValue<Priority>> {
    std::iter::once(FilterValue::All)
        .chain(Priority::ALL.into_iter().map(FilterValue::Only))
        .collect()
}

/// Status choices: `All`, `Upcoming`, `Today`, `Completed`.
#[must_use]
pub fn status_options() -> Vec<FilterValue<TaskStatus>> {
    std::iter::once(FilterValue::All)
        .chain(TaskStatus::ALL.into_iter().map(FilterValue::Only))
        .collect()
}
