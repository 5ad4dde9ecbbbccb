//! Filter selections for the task list.
//!
//! Each dimension is either the `All` sentinel or a concrete value. A
//! selection is transient view state and is never written to the store.

use std::str::FromStr;

use crate::task::{Priority, TaskStatus};

/// Label of the "no constraint" sentinel.
pub const ALL_LABEL: &str = "All";

/// One filter dimension: no constraint, or exactly one value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilterValue<T> {
    /// Matches every value.
    All,
    /// Matches only this value.
    Only(T),
}

impl<T> Default for FilterValue<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T: PartialEq> FilterValue<T> {
    /// Returns `true` if `value` passes this dimension.
    #[must_use]
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == value,
        }
    }
}

impl<T> FilterValue<T> {
    /// Returns `true` for the `All` sentinel.
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl<T: std::fmt::Display> std::fmt::Display for FilterValue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str(ALL_LABEL),
            Self::Only(v) => write!(f, "{v}"),
        }
    }
}

impl<T: FromStr> FromStr for FilterValue<T> {
    type Err = T::Err;

    /// `All` parses to the sentinel; anything else must parse as `T`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL_LABEL {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

/// The three task-list filter dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSelection {
    /// Domain constraint (free text, exact match).
    pub domain: FilterValue<String>,
    /// Priority constraint.
    pub priority: FilterValue<Priority>,
    /// Status constraint.
    pub status: FilterValue<TaskStatus>,
}

impl FilterSelection {
    /// The selection that constrains nothing.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Returns `true` if no dimension is constrained.
    #[must_use]
    pub const fn is_unconstrained(&self) -> bool {
        self.domain.is_all() && self.priority.is_all() && self.status.is_all()
    }
}
