//! Property tests for task filtering.
//!
//! 1. The result is a subsequence of the snapshot and every element passes
//!    the selection.
//! 2. The unconstrained selection returns the snapshot unchanged.
//! 3. Filtering an already-filtered list changes nothing.
//! 4. Domain options are `All` followed by the distinct domains.

use chrono::{TimeZone, Utc};
use clubdesk::filter::{apply, domain_options, matches};
use clubdesk_model::{
    DocumentId, FilterSelection, FilterValue, Priority, Task, TaskStatus,
};
use proptest::prelude::*;

const DOMAINS: [&str; 4] = ["Web", "Ops", "Events", "Finance"];

fn arb_priority() -> impl Strategy<Value = Priority> {
    prop::sample::select(Priority::ALL.to_vec())
}

fn arb_status() -> impl Strategy<Value = TaskStatus> {
    prop::sample::select(TaskStatus::ALL.to_vec())
}

fn arb_domain() -> impl Strategy<Value = String> {
    prop::sample::select(DOMAINS.to_vec()).prop_map(str::to_string)
}

fn arb_snapshot() -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec((arb_domain(), arb_priority(), arb_status()), 0..40).prop_map(|rows| {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        rows.into_iter()
            .enumerate()
            .map(|(i, (domain, priority, status))| Task {
                id: DocumentId::new(format!("t{i}")),
                title: format!("task {i}"),
                description: String::new(),
                domain,
                priority,
                status,
                due_date: at,
                created_by: "alice".to_string(),
                assigned_to: None,
                created_at: at,
            })
            .collect()
    })
}

fn arb_filter<T: Clone + std::fmt::Debug + 'static>(
    inner: impl Strategy<Value = T> + 'static,
) -> impl Strategy<Value = FilterValue<T>> {
    prop_oneof![Just(FilterValue::All), inner.prop_map(FilterValue::Only)]
}

fn arb_selection() -> impl Strategy<Value = FilterSelection> {
    (arb_filter(arb_domain()), arb_filter(arb_priority()), arb_filter(arb_status())).prop_map(
        |(domain, priority, status)| FilterSelection {
            domain,
            priority,
            status,
        },
    )
}

proptest! {
    #[test]
    fn result_is_ordered_subset_of_matching_tasks(
        snapshot in arb_snapshot(),
        selection in arb_selection(),
    ) {
        let result = apply(&snapshot, &selection);
        prop_assert!(result.iter().all(|t| matches(t, &selection)));

        // Subsequence: walk the snapshot once, consuming result in order.
        let mut rest = result.iter().peekable();
        for task in &snapshot {
            if rest.peek().is_some_and(|r| std::ptr::eq(**r, task)) {
                rest.next();
            }
        }
        prop_assert!(rest.next().is_none());

        let expected = snapshot.iter().filter(|t| matches(t, &selection)).count();
        prop_assert_eq!(result.len(), expected);
    }

    #[test]
    fn unconstrained_selection_is_identity(snapshot in arb_snapshot()) {
        let result: Vec<Task> = apply(&snapshot, &FilterSelection::all())
            .into_iter()
            .cloned()
            .collect();
        prop_assert_eq!(result, snapshot);
    }

    #[test]
    fn filtering_is_idempotent(snapshot in arb_snapshot(), selection in arb_selection()) {
        let once: Vec<Task> = apply(&snapshot, &selection).into_iter().cloned().collect();
        let twice: Vec<Task> = apply(&once, &selection).into_iter().cloned().collect();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn domain_options_are_all_then_distinct(snapshot in arb_snapshot()) {
        let options = domain_options(&snapshot);
        prop_assert_eq!(&options[0], &FilterValue::All);

        let domains: Vec<&str> = options[1..]
            .iter()
            .filter_map(|o| match o {
                FilterValue::Only(d) => Some(d.as_str()),
                FilterValue::All => None,
            })
            .collect();
        prop_assert_eq!(domains.len(), options.len() - 1);

        let mut distinct = domains.clone();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(distinct.len(), domains.len());
        prop_assert!(snapshot.iter().all(|t| domains.contains(&t.domain.as_str())));
    }
}
