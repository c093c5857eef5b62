//! One-shot notices carried across a redirect.
//!
//! A notice travels as a fixed code in the `notice` query parameter of the
//! redirect target, so no session state is needed. Unknown codes are ignored.

use axum::response::Redirect;
use serde::Serialize;

use crate::task::TaskError;

/// A message shown once after a form submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The submitted due date was before today.
    PastDueDate,
    /// The submitted due date could not be parsed.
    InvalidDueDate,
    /// The submitted priority was not recognised.
    InvalidPriority,
    /// An edit left the description blank.
    EmptyTask,
    /// An edit was saved.
    TaskUpdated,
    /// The incomplete-tasks page failed to load.
    LoadFailed,
}

/// Styling class of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Something was rejected or failed.
    Danger,
    /// Something worked.
    Success,
}

/// What templates receive for a notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeView {
    /// Text shown to the user.
    pub message: &'static str,
    /// Styling class.
    pub category: Category,
}

impl Notice {
    /// Every notice.
    pub const ALL: [Self; 6] = [
        Self::PastDueDate,
        Self::InvalidDueDate,
        Self::InvalidPriority,
        Self::EmptyTask,
        Self::TaskUpdated,
        Self::LoadFailed,
    ];

    /// The query-string code for this notice.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::PastDueDate => "past-due-date",
            Self::InvalidDueDate => "invalid-due-date",
            Self::InvalidPriority => "invalid-priority",
            Self::EmptyTask => "empty-task",
            Self::TaskUpdated => "task-updated",
            Self::LoadFailed => "load-failed",
        }
    }

    /// Look a notice up by its code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.code() == code)
    }

    /// The text shown to the user.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::PastDueDate => "Due date cannot be in the past!",
            Self::InvalidDueDate => "Due date must be a valid date (YYYY-MM-DD).",
            Self::InvalidPriority => "Priority must be High, Medium or Low.",
            Self::EmptyTask => "Task description cannot be empty.",
            Self::TaskUpdated => "Task updated successfully!",
            Self::LoadFailed => "An error occurred while loading incomplete tasks.",
        }
    }

    /// The styling class.
    #[must_use]
    pub fn category(self) -> Category {
        match self {
            Self::TaskUpdated => Category::Success,
            _ => Category::Danger,
        }
    }

    /// The template view of this notice.
    #[must_use]
    pub fn view(self) -> NoticeView {
        NoticeView {
            message: self.message(),
            category: self.category(),
        }
    }

    /// Redirect to `path` carrying this notice.
    #[must_use]
    pub fn redirect(self, path: &str) -> Redirect {
        Redirect::to(&format!("{path}?notice={}", self.code()))
    }
}

impl From<&TaskError> for Notice {
    fn from(err: &TaskError) -> Self {
        match err {
            TaskError::EmptyDescription => Self::EmptyTask,
            TaskError::PastDueDate => Self::PastDueDate,
            TaskError::InvalidDueDate(_) => Self::InvalidDueDate,
            TaskError::InvalidPriority(_) => Self::InvalidPriority,
        }
    }
}

/// Resolve an optional `notice` query value to its view.
#[must_use]
pub fn lookup(code: Option<&str>) -> Option<NoticeView> {
    code.and_then(Notice::from_code).map(Notice::view)
}
