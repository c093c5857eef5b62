//! Due-date reminders.
//!
//! Pending tasks with a due date fall into at most one bucket: overdue
//! (before today), due today, or due soon (after today, within the soon
//! window). Completed and undated tasks are never reminded about.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::task::Task;

/// Which bucket a reminder belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderKind {
    /// Due before today.
    Overdue,
    /// Due today.
    Today,
    /// Due after today, within the soon window.
    Soon,
}

/// A single reminder as shown on the index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reminder {
    /// Task id.
    pub id: i64,
    /// Task description.
    pub task: String,
    /// Due date in `YYYY-MM-DD` form.
    pub due_date: NaiveDate,
    /// Bucket.
    #[serde(rename = "type")]
    pub kind: ReminderKind,
}

/// Classify one due date relative to `today`.
///
/// Returns `None` for dates beyond `soon_threshold`.
#[must_use]
pub fn classify(
    due_date: NaiveDate,
    today: NaiveDate,
    soon_threshold: NaiveDate,
) -> Option<ReminderKind> {
    if due_date < today {
        Some(ReminderKind::Overdue)
    } else if due_date == today {
        Some(ReminderKind::Today)
    } else if due_date <= soon_threshold {
        Some(ReminderKind::Soon)
    } else {
        None
    }
}

/// The last day that still counts as "soon".
#[must_use]
pub fn soon_threshold(today: NaiveDate, soon_window_days: u32) -> NaiveDate {
    today
        .checked_add_days(Days::new(u64::from(soon_window_days)))
        .unwrap_or(NaiveDate::MAX)
}

/// Pending tasks partitioned into reminder buckets, each in input order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Notifications {
    /// Due before today.
    pub overdue: Vec<Reminder>,
    /// Due today.
    pub due_today: Vec<Reminder>,
    /// Due within the soon window.
    pub due_soon: Vec<Reminder>,
    /// Last day of the soon window.
    pub soon_threshold: Option<NaiveDate>,
}

impl Notifications {
    /// Bucket `tasks` relative to `today`.
    ///
    /// Completed tasks and tasks without a due date are skipped, so callers
    /// may pass the full task list.
    #[must_use]
    pub fn collect(tasks: &[Task], today: NaiveDate, soon_window_days: u32) -> Self {
        let threshold = soon_threshold(today, soon_window_days);
        let mut notifications = Self {
            soon_threshold: Some(threshold),
            ..Self::default()
        };

        for task in tasks.iter().filter(|t| !t.is_completed()) {
            let Some(due_date) = task.due_date else {
                continue;
            };
            let Some(kind) = classify(due_date, today, threshold) else {
                continue;
            };
            let reminder = Reminder {
                id: task.id,
                task: task.task.clone(),
                due_date,
                kind,
            };
            match kind {
                ReminderKind::Overdue => notifications.overdue.push(reminder),
                ReminderKind::Today => notifications.due_today.push(reminder),
                ReminderKind::Soon => notifications.due_soon.push(reminder),
            }
        }

        notifications
    }

    /// All reminders: overdue first, then due today, then due soon.
    #[must_use]
    pub fn all(&self) -> Vec<&Reminder> {
        self.overdue
            .iter()
            .chain(&self.due_today)
            .chain(&self.due_soon)
            .collect()
    }

    /// Total number of reminders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.overdue.len() + self.due_today.len() + self.due_soon.len()
    }

    /// Whether there is nothing to remind about.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
