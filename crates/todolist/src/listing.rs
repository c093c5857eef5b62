//! Filtering and ordering of the main task list.
//!
//! Query-string values are parsed leniently: anything unrecognised falls back
//! to the default view rather than failing the page.

use chrono::NaiveDate;
use serde::Serialize;

use crate::task::Task;

/// Which tasks the list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    /// Every task.
    #[default]
    All,
    /// Only completed tasks.
    Completed,
    /// Only tasks still to do.
    Pending,
}

impl StatusFilter {
    /// Parse a `status` query value; unknown values mean [`StatusFilter::All`].
    #[must_use]
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("completed") => Self::Completed,
            Some("pending") => Self::Pending,
            _ => Self::All,
        }
    }

    /// The value of the `completed` column this filter selects, if any.
    #[must_use]
    pub fn completed_flag(self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Completed => Some(true),
            Self::Pending => Some(false),
        }
    }

    /// The query-string form of this filter.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Completed => "completed",
            Self::Pending => "pending",
        }
    }
}

/// How the list is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Priority rank, then incomplete before complete.
    #[default]
    Priority,
    /// Due date with undated tasks last, then incomplete before complete.
    DueDate,
    /// Creation order.
    Created,
    /// Store order, left as fetched.
    Unsorted,
}

impl SortKey {
    /// Parse a `sort` query value. A missing value means [`SortKey::Priority`];
    /// an unknown one leaves the list in store order.
    #[must_use]
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("priority") => Self::Priority,
            Some("due_date") => Self::DueDate,
            Some("created") => Self::Created,
            Some(_) => Self::Unsorted,
        }
    }

    /// The query-string form of this key.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Priority => "priority",
            Self::DueDate => "due_date",
            Self::Created => "created",
            Self::Unsorted => "none",
        }
    }
}

/// Order `tasks` in place. The sort is stable, so ties keep store order.
pub fn sort_tasks(tasks: &mut [Task], key: SortKey) {
    match key {
        SortKey::Priority => {
            tasks.sort_by_key(|t| (t.priority.rank(), t.is_completed()));
        }
        SortKey::DueDate => {
            tasks.sort_by_key(|t| (t.due_date.unwrap_or(NaiveDate::MAX), t.is_completed()));
        }
        SortKey::Created => tasks.sort_by_key(|t| t.id),
        SortKey::Unsorted => {}
    }
}

/// Order pending tasks most urgent first: priority rank, then due date with
/// undated tasks last.
pub fn sort_by_urgency(tasks: &mut [Task]) {
    tasks.sort_by_key(|t| (t.priority.rank(), t.due_date.unwrap_or(NaiveDate::MAX)));
}

/// Whole-number percentage of `part` in `total`, truncated; 0 when `total` is 0.
#[must_use]
pub fn percent(part: usize, total: usize) -> usize {
    if total == 0 {
        0
    } else {
        part * 100 / total
    }
}

/// Share of `tasks` that are complete, as a truncated percentage.
#[must_use]
pub fn completion_percent(tasks: &[Task]) -> usize {
    let done = tasks.iter().filter(|t| t.is_completed()).count();
    percent(done, tasks.len())
}
