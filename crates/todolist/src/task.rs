//! Core task types for todolist.
//!
//! This module defines the task record, its priority and completion state, and
//! the validation applied to submitted task data before it reaches storage.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Format of due dates in forms and in the database.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// How urgent a task is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    /// Do first.
    High,
    /// The default.
    #[default]
    Medium,
    /// Do when there is time.
    Low,
}

impl Priority {
    /// All priorities, most urgent first.
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    /// Ordinal used for sorting: High (1) before Medium (2) before Low (3).
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }

    /// The stored text form of this priority.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| TaskError::InvalidPriority(trimmed.to_string()))
    }
}

/// Completion state of a task.
///
/// The `completed` flag and the completion timestamp are both derived from
/// this one value, so a task can never be completed without a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Completion {
    /// Not done yet.
    #[default]
    Pending,
    /// Done at the given instant.
    Done {
        /// When the task was marked complete.
        at: DateTime<Utc>,
    },
}

impl Completion {
    /// Whether the task is complete.
    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done { .. })
    }

    /// The completion timestamp, if complete.
    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Pending => None,
            Self::Done { at } => Some(*at),
        }
    }

    /// The opposite state: pending becomes done at `now`, done becomes pending.
    #[must_use]
    pub fn toggled(self, now: DateTime<Utc>) -> Self {
        match self {
            Self::Pending => Self::Done { at: now },
            Self::Done { .. } => Self::Pending,
        }
    }
}

/// A stored to-do item.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    /// Identifier assigned by the store.
    pub id: i64,
    /// Free-text description.
    pub task: String,
    /// How urgent the task is.
    pub priority: Priority,
    /// Optional calendar due date.
    pub due_date: Option<NaiveDate>,
    /// When the task was created.
    pub created_at: DateTime<Utc>,
    /// Whether and when the task was completed.
    pub completion: Completion,
}

impl Task {
    /// Whether the task is complete.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completion.is_done()
    }

    /// When the task was completed, if it is.
    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completion.completed_at()
    }

    /// Hours between creation and completion, if complete.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn completion_hours(&self) -> Option<f64> {
        self.completed_at()
            .map(|done| (done - self.created_at).num_seconds() as f64 / 3600.0)
    }
}

/// Reasons a task submission is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// The description was empty after trimming.
    #[error("task description cannot be empty")]
    EmptyDescription,

    /// The due date is before today.
    #[error("due date cannot be in the past")]
    PastDueDate,

    /// The due date is not a `YYYY-MM-DD` date.
    #[error("invalid due date: {0}")]
    InvalidDueDate(String),

    /// The priority is not one of High, Medium or Low.
    #[error("invalid priority: {0}")]
    InvalidPriority(String),
}

/// Validated task fields, ready to be inserted or applied as an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Trimmed, non-empty description.
    pub task: String,
    /// Chosen priority.
    pub priority: Priority,
    /// Due date, never before the day of submission.
    pub due_date: Option<NaiveDate>,
}

impl TaskDraft {
    /// Validate raw form fields against `today`.
    ///
    /// The due date is checked first, then the priority, then the
    /// description. A missing or blank priority means Medium; a blank due
    /// date means none.
    ///
    /// # Errors
    ///
    /// Returns a [`TaskError`] describing the first field that was rejected.
    pub fn parse(
        task: &str,
        priority: Option<&str>,
        due_date: Option<&str>,
        today: NaiveDate,
    ) -> Result<Self, TaskError> {
        let due_date = parse_due_date(due_date)?;
        if due_date.is_some_and(|due| due < today) {
            return Err(TaskError::PastDueDate);
        }

        let priority = match priority.map(str::trim) {
            None | Some("") => Priority::default(),
            Some(text) => text.parse()?,
        };

        let task = task.trim();
        if task.is_empty() {
            return Err(TaskError::EmptyDescription);
        }

        Ok(Self {
            task: task.to_string(),
            priority,
            due_date,
        })
    }
}

/// Parse an optional `YYYY-MM-DD` form value; blank means no date.
///
/// # Errors
///
/// Returns [`TaskError::InvalidDueDate`] if the value is not a valid date.
pub fn parse_due_date(value: Option<&str>) -> Result<Option<NaiveDate>, TaskError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map(Some)
            .map_err(|_| TaskError::InvalidDueDate(text.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2024, 3, 15)
    }

    #[test]
    fn test_priority_rank_order() {
        assert!(Priority::High.rank() < Priority::Medium.rank());
        assert!(Priority::Medium.rank() < Priority::Low.rank());
    }

    #[test]
    fn test_priority_default_is_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn test_priority_display() {
        assert_eq!(Priority::High.to_string(), "High");
        assert_eq!(Priority::Medium.to_string(), "Medium");
        assert_eq!(Priority::Low.to_string(), "Low");
    }

    #[test]
    fn test_priority_parse_ignores_case() {
        assert_eq!("high".parse::<Priority>(), Ok(Priority::High));
        assert_eq!(" LOW ".parse::<Priority>(), Ok(Priority::Low));
        assert_eq!(
            "Urgent".parse::<Priority>(),
            Err(TaskError::InvalidPriority("Urgent".to_string()))
        );
    }

    #[test]
    fn test_completion_toggle_sets_and_clears_timestamp() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap();
        let done = Completion::Pending.toggled(now);
        assert!(done.is_done());
        assert_eq!(done.completed_at(), Some(now));

        let pending = done.toggled(now);
        assert!(!pending.is_done());
        assert_eq!(pending.completed_at(), None);
    }

    #[test]
    fn test_completion_hours() {
        let created = Utc.with_ymd_and_hms(2024, 3, 15, 8, 0, 0).unwrap();
        let mut task = Task {
            id: 1,
            task: "Write report".to_string(),
            priority: Priority::High,
            due_date: None,
            created_at: created,
            completion: Completion::Pending,
        };
        assert_eq!(task.completion_hours(), None);

        task.completion = Completion::Done {
            at: Utc.with_ymd_and_hms(2024, 3, 15, 11, 30, 0).unwrap(),
        };
        assert_eq!(task.completion_hours(), Some(3.5));
    }

    #[test]
    fn test_draft_parse_valid() {
        let draft =
            TaskDraft::parse("  Buy milk ", Some("Low"), Some("2024-03-20"), today()).unwrap();
        assert_eq!(draft.task, "Buy milk");
        assert_eq!(draft.priority, Priority::Low);
        assert_eq!(draft.due_date, Some(date(2024, 3, 20)));
    }

    #[test]
    fn test_draft_parse_rejects_past_due_date() {
        let result = TaskDraft::parse("Buy milk", Some("High"), Some("2024-03-14"), today());
        assert_eq!(result, Err(TaskError::PastDueDate));
    }

    #[test]
    fn test_draft_parse_accepts_today() {
        let draft = TaskDraft::parse("Buy milk", None, Some("2024-03-15"), today()).unwrap();
        assert_eq!(draft.due_date, Some(today()));
    }

    #[test]
    fn test_draft_parse_blank_due_date_is_none() {
        let draft = TaskDraft::parse("Buy milk", None, Some("  "), today()).unwrap();
        assert_eq!(draft.due_date, None);
        assert_eq!(draft.priority, Priority::Medium);
    }

    #[test]
    fn test_draft_parse_rejects_blank_description() {
        let result = TaskDraft::parse("   ", Some("High"), None, today());
        assert_eq!(result, Err(TaskError::EmptyDescription));
    }

    #[test]
    fn test_draft_parse_checks_due_date_before_description() {
        let result = TaskDraft::parse("", None, Some("2020-01-01"), today());
        assert_eq!(result, Err(TaskError::PastDueDate));
    }

    #[test]
    fn test_draft_parse_rejects_malformed_date() {
        let result = TaskDraft::parse("Buy milk", None, Some("15/03/2024"), today());
        assert_eq!(
            result,
            Err(TaskError::InvalidDueDate("15/03/2024".to_string()))
        );
    }

    #[test]
    fn test_draft_parse_rejects_unknown_priority() {
        let result = TaskDraft::parse("Buy milk", Some("Someday"), None, today());
        assert!(matches!(result, Err(TaskError::InvalidPriority(_))));
    }
}
