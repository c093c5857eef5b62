//! Progress statistics for the dashboard, completed and incomplete pages.
//!
//! Everything here is computed from an in-memory task list and a calendar
//! date for "today"; timestamps are bucketed by their UTC date.

use std::collections::HashMap;

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::listing::percent;
use crate::notify::{classify, soon_threshold, ReminderKind};
use crate::task::{Priority, Task};

/// Number of days in the completion histogram.
pub const HISTORY_DAYS: u64 = 7;

/// Task counts per priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PriorityCounts {
    /// High-priority tasks.
    pub high: usize,
    /// Medium-priority tasks.
    pub medium: usize,
    /// Low-priority tasks.
    pub low: usize,
}

impl PriorityCounts {
    /// Count `tasks` by priority.
    #[must_use]
    pub fn tally(tasks: &[Task]) -> Self {
        tasks.iter().fold(Self::default(), |mut counts, task| {
            match task.priority {
                Priority::High => counts.high += 1,
                Priority::Medium => counts.medium += 1,
                Priority::Low => counts.low += 1,
            }
            counts
        })
    }

    /// The count for one priority.
    #[must_use]
    pub fn get(&self, priority: Priority) -> usize {
        match priority {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }
}

/// One day of the completion histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCount {
    /// The calendar day.
    pub date: NaiveDate,
    /// Weekday abbreviation, e.g. `Mon`.
    pub label: String,
    /// Tasks completed that day.
    pub completed: usize,
}

/// Everything the dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    /// All tasks.
    pub total: usize,
    /// Completed tasks.
    pub completed: usize,
    /// Pending tasks.
    pub incomplete: usize,
    /// Tasks per priority.
    pub priority_counts: PriorityCounts,
    /// Completions per day over the last week, oldest first, ending today.
    pub history: Vec<DayCount>,
    /// Completed share of all tasks, truncated percent.
    pub completion_rate: usize,
    /// Trailing days, ending today, with at least one completion.
    pub streak: usize,
    /// Mean creation-to-completion time in hours, one decimal.
    pub avg_completion_hours: Option<f64>,
}

impl Dashboard {
    /// Compute the dashboard for `tasks` as of `today`.
    #[must_use]
    pub fn compute(tasks: &[Task], today: NaiveDate) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.is_completed()).count();
        let history = completion_history(tasks, today);

        Self {
            total,
            completed,
            incomplete: total - completed,
            priority_counts: PriorityCounts::tally(tasks),
            streak: streak(&history),
            history,
            completion_rate: percent(completed, total),
            avg_completion_hours: average_completion_hours(tasks),
        }
    }
}

/// Count completions per day for the [`HISTORY_DAYS`] days ending `today`.
#[must_use]
pub fn completion_history(tasks: &[Task], today: NaiveDate) -> Vec<DayCount> {
    let mut per_day: HashMap<NaiveDate, usize> = HashMap::new();
    for at in tasks.iter().filter_map(Task::completed_at) {
        *per_day.entry(at.date_naive()).or_default() += 1;
    }

    (0..HISTORY_DAYS)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .map(|date| DayCount {
            date,
            label: date.format("%a").to_string(),
            completed: per_day.get(&date).copied().unwrap_or(0),
        })
        .collect()
}

/// Length of the run of non-zero days at the end of `history`.
#[must_use]
pub fn streak(history: &[DayCount]) -> usize {
    history
        .iter()
        .rev()
        .take_while(|day| day.completed > 0)
        .count()
}

/// Mean hours from creation to completion over completed tasks, rounded to
/// one decimal place. `None` when nothing has been completed.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_completion_hours(tasks: &[Task]) -> Option<f64> {
    let hours: Vec<f64> = tasks.iter().filter_map(Task::completion_hours).collect();
    if hours.is_empty() {
        return None;
    }
    let mean = hours.iter().sum::<f64>() / hours.len() as f64;
    Some((mean * 10.0).round() / 10.0)
}

/// Totals for the completed-tasks page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CompletedSummary {
    /// All completed tasks.
    pub total: usize,
    /// Completed on `today`.
    pub today: usize,
    /// Completed Monday through Sunday of the week containing `today`.
    pub this_week: usize,
}

impl CompletedSummary {
    /// Summarise completed tasks as of `today`. Pending tasks are ignored.
    #[must_use]
    pub fn compute(tasks: &[Task], today: NaiveDate) -> Self {
        let first = week_start(today);
        let last = first.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX);

        tasks
            .iter()
            .filter_map(Task::completed_at)
            .map(|at| at.date_naive())
            .fold(Self::default(), |mut summary, day| {
                summary.total += 1;
                if day == today {
                    summary.today += 1;
                }
                if (first..=last).contains(&day) {
                    summary.this_week += 1;
                }
                summary
            })
    }
}

/// Totals for the incomplete-tasks page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct IncompleteSummary {
    /// All pending tasks.
    pub total: usize,
    /// Pending and due before today.
    pub overdue: usize,
    /// Pending and due today.
    pub due_today: usize,
    /// Pending and due within the soon window.
    pub due_soon: usize,
}

impl IncompleteSummary {
    /// Summarise pending tasks as of `today`. Completed tasks are ignored.
    #[must_use]
    pub fn compute(tasks: &[Task], today: NaiveDate, soon_window_days: u32) -> Self {
        let threshold = soon_threshold(today, soon_window_days);
        tasks
            .iter()
            .filter(|t| !t.is_completed())
            .fold(Self::default(), |mut summary, task| {
                summary.total += 1;
                match task.due_date.and_then(|d| classify(d, today, threshold)) {
                    Some(ReminderKind::Overdue) => summary.overdue += 1,
                    Some(ReminderKind::Today) => summary.due_today += 1,
                    Some(ReminderKind::Soon) => summary.due_soon += 1,
                    None => {}
                }
                summary
            })
    }
}

/// Monday of the week containing `day`.
#[must_use]
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day.checked_sub_days(Days::new(u64::from(
        day.weekday().num_days_from_monday(),
    )))
    .unwrap_or(day)
}
