//! Page templates and the view models rendered into them.
//!
//! Templates are compiled into the binary and loaded into one minijinja
//! environment at startup. HTML auto-escaping is on for every `.html`
//! template.

use axum::response::Html;
use chrono::{DateTime, NaiveDate, Utc};
use minijinja::Environment;
use serde::Serialize;

use crate::analytics::{CompletedSummary, Dashboard, IncompleteSummary};
use crate::error::Result;
use crate::notify::{classify, Reminder, ReminderKind};
use crate::storage::StorageStats;
use crate::task::{Priority, Task, DATE_FORMAT};

use super::notice::NoticeView;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../templates/base.html")),
    ("index.html", include_str!("../../templates/index.html")),
    ("edit.html", include_str!("../../templates/edit.html")),
    ("dashboard.html", include_str!("../../templates/dashboard.html")),
    (
        "completed_tasks.html",
        include_str!("../../templates/completed_tasks.html"),
    ),
    (
        "incomplete_tasks.html",
        include_str!("../../templates/incomplete_tasks.html"),
    ),
    ("debug_tasks.html", include_str!("../../templates/debug_tasks.html")),
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// The loaded page templates.
#[derive(Debug)]
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    /// Compile every page template.
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to parse.
    pub fn load() -> Result<Self> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    /// Render a named template with a serializable context.
    ///
    /// # Errors
    ///
    /// Returns an error if the template is unknown or rendering fails.
    pub fn render<S: Serialize>(&self, name: &str, context: S) -> Result<Html<String>> {
        let template = self.env.get_template(name)?;
        Ok(Html(template.render(context)?))
    }
}

/// A task as displayed in a list row or form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskView {
    pub id: i64,
    pub task: String,
    pub completed: bool,
    pub priority: Priority,
    pub due_date: Option<String>,
    pub created_at: String,
    pub completed_at: Option<String>,
    /// Reminder bucket for pending tasks with a due date.
    pub reminder: Option<ReminderKind>,
}

impl TaskView {
    /// Build the view of `task` as of `today`.
    #[must_use]
    pub fn new(task: &Task, today: NaiveDate, soon_threshold: NaiveDate) -> Self {
        let reminder = if task.is_completed() {
            None
        } else {
            task.due_date
                .and_then(|due| classify(due, today, soon_threshold))
        };

        Self {
            id: task.id,
            task: task.task.clone(),
            completed: task.is_completed(),
            priority: task.priority,
            due_date: task.due_date.map(|d| d.format(DATE_FORMAT).to_string()),
            created_at: format_timestamp(task.created_at),
            completed_at: task.completed_at().map(format_timestamp),
            reminder,
        }
    }

    /// Build views for a list of tasks.
    #[must_use]
    pub fn all(tasks: &[Task], today: NaiveDate, soon_threshold: NaiveDate) -> Vec<Self> {
        tasks
            .iter()
            .map(|t| Self::new(t, today, soon_threshold))
            .collect()
    }
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Context for `index.html`.
#[derive(Debug, Serialize)]
pub struct IndexPage<'a> {
    pub tasks: Vec<TaskView>,
    pub percent: usize,
    pub status: &'static str,
    pub sort: &'static str,
    pub search: &'a str,
    pub today: NaiveDate,
    pub soon_threshold: NaiveDate,
    pub num_overdue: usize,
    pub num_due_today: usize,
    pub num_due_soon: usize,
    pub reminders: Vec<&'a Reminder>,
    pub priorities: [Priority; 3],
    pub notice: Option<NoticeView>,
}

/// Context for `edit.html`.
#[derive(Debug, Serialize)]
pub struct EditPage {
    pub task: TaskView,
    pub today: NaiveDate,
    pub priorities: [Priority; 3],
    pub notice: Option<NoticeView>,
}

/// Context for `dashboard.html`.
#[derive(Debug, Serialize)]
pub struct DashboardPage {
    #[serde(flatten)]
    pub dashboard: Dashboard,
    pub today: NaiveDate,
}

/// Context for `completed_tasks.html`.
#[derive(Debug, Serialize)]
pub struct CompletedPage {
    pub completed_tasks: Vec<TaskView>,
    pub summary: CompletedSummary,
    pub today: NaiveDate,
}

/// Context for `incomplete_tasks.html`.
#[derive(Debug, Serialize)]
pub struct IncompletePage {
    pub incomplete_tasks: Vec<TaskView>,
    pub summary: IncompleteSummary,
    pub today: NaiveDate,
    pub soon_threshold: NaiveDate,
}

/// One sample row of the debug dump.
#[derive(Debug, Serialize)]
pub struct DebugTask {
    pub id: i64,
    pub task: String,
    pub completed: bool,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
}

impl From<&Task> for DebugTask {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            task: task.task.clone(),
            completed: task.is_completed(),
            priority: task.priority,
            due_date: task.due_date,
        }
    }
}

/// Everything the debug dump reports.
#[derive(Debug, Serialize)]
pub struct DebugInfo {
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub incomplete_tasks: i64,
    pub sample_tasks: Vec<DebugTask>,
}

impl DebugInfo {
    /// Combine store counts with a few sample tasks.
    #[must_use]
    pub fn new(stats: StorageStats, sample: &[Task]) -> Self {
        Self {
            total_tasks: stats.total,
            completed_tasks: stats.completed,
            incomplete_tasks: stats.incomplete,
            sample_tasks: sample.iter().map(DebugTask::from).collect(),
        }
    }
}

/// Context for `debug_tasks.html`.
#[derive(Debug, Serialize)]
pub struct DebugPage {
    #[serde(flatten)]
    pub info: DebugInfo,
    /// `info` as pretty-printed JSON.
    pub dump: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Completion;
    use chrono::TimeZone;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn sample_task() -> Task {
        Task {
            id: 4,
            task: "<b>Pay</b> rent".to_string(),
            priority: Priority::High,
            due_date: Some(date(14)),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 5, 0).unwrap(),
            completion: Completion::Pending,
        }
    }

    #[test]
    fn test_all_templates_load() {
        assert!(Templates::load().is_ok());
    }

    #[test]
    fn test_unknown_template_fails() {
        let templates = Templates::load().unwrap();
        assert!(templates.render("missing.html", ()).is_err());
    }

    #[test]
    fn test_task_view_formats_fields() {
        let view = TaskView::new(&sample_task(), date(15), date(16));
        assert_eq!(view.due_date.as_deref(), Some("2024-03-14"));
        assert_eq!(view.created_at, "2024-03-01 09:05");
        assert_eq!(view.completed_at, None);
        assert_eq!(view.reminder, Some(ReminderKind::Overdue));
    }

    #[test]
    fn test_completed_task_view_has_no_reminder() {
        let mut task = sample_task();
        task.completion = Completion::Done {
            at: Utc.with_ymd_and_hms(2024, 3, 2, 18, 0, 0).unwrap(),
        };
        let view = TaskView::new(&task, date(15), date(16));
        assert!(view.completed);
        assert_eq!(view.reminder, None);
        assert_eq!(view.completed_at.as_deref(), Some("2024-03-02 18:00"));
    }

    #[test]
    fn test_edit_page_escapes_description() {
        let templates = Templates::load().unwrap();
        let page = EditPage {
            task: TaskView::new(&sample_task(), date(15), date(16)),
            today: date(15),
            priorities: Priority::ALL,
            notice: None,
        };
        let Html(body) = templates.render("edit.html", &page).unwrap();
        assert!(body.contains("&lt;b&gt;Pay&lt;&#x2f;b&gt; rent"));
        assert!(!body.contains("<b>"));
    }

    #[test]
    fn test_debug_info_from_tasks() {
        let stats = StorageStats {
            total: 3,
            completed: 1,
            incomplete: 2,
        };
        let info = DebugInfo::new(stats, &[sample_task()]);
        assert_eq!(info.total_tasks, 3);
        assert_eq!(info.sample_tasks.len(), 1);
        assert_eq!(info.sample_tasks[0].priority, Priority::High);
    }
}
