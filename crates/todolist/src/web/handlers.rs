//! Request handlers.
//!
//! Each handler takes the store lock, runs its queries, and releases the lock
//! before rendering.

use axum::extract::{Form, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::analytics::{CompletedSummary, Dashboard, IncompleteSummary};
use crate::error::{Error, Result};
use crate::listing::{completion_percent, sort_by_urgency, sort_tasks, SortKey, StatusFilter};
use crate::notify::{soon_threshold, Notifications};
use crate::task::{Priority, TaskDraft, TaskError};

use super::notice::{self, Notice};
use super::views::{
    CompletedPage, DashboardPage, DebugInfo, DebugPage, EditPage, IncompletePage, IndexPage,
    TaskView,
};
use super::AppState;

/// How many tasks the debug dump shows.
const DEBUG_SAMPLE_SIZE: usize = 5;

/// Query parameters of the task list.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub sort: Option<String>,
    pub search: Option<String>,
    pub notice: Option<String>,
}

/// Query parameters of pages that only show a notice.
#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
}

/// Fields submitted by the add and edit forms.
#[derive(Debug, Default, Deserialize)]
pub struct TaskForm {
    #[serde(default)]
    pub task: String,
    pub priority: Option<String>,
    pub due_date: Option<String>,
}

impl TaskForm {
    fn parse(&self, state: &AppState) -> std::result::Result<TaskDraft, TaskError> {
        TaskDraft::parse(
            &self.task,
            self.priority.as_deref(),
            self.due_date.as_deref(),
            state.today(),
        )
    }
}

/// `GET /`
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Html<String>> {
    let today = state.today();
    let window = state.reminders.soon_window_days;
    let status = StatusFilter::from_param(query.status.as_deref());
    let sort = SortKey::from_param(query.sort.as_deref());
    let search = query.search.as_deref().unwrap_or_default().trim();

    let (mut tasks, pending) = {
        let store = state.store()?;
        (store.list(status, search)?, store.pending()?)
    };
    sort_tasks(&mut tasks, sort);

    let notifications = Notifications::collect(&pending, today, window);
    let threshold = soon_threshold(today, window);

    let page = IndexPage {
        tasks: TaskView::all(&tasks, today, threshold),
        percent: completion_percent(&tasks),
        status: status.as_str(),
        sort: sort.as_str(),
        search,
        today,
        soon_threshold: threshold,
        num_overdue: notifications.overdue.len(),
        num_due_today: notifications.due_today.len(),
        num_due_soon: notifications.due_soon.len(),
        reminders: notifications.all(),
        priorities: Priority::ALL,
        notice: notice::lookup(query.notice.as_deref()),
    };
    state.templates.render("index.html", &page)
}

/// `POST /add`
pub async fn add(State(state): State<AppState>, Form(form): Form<TaskForm>) -> Result<Redirect> {
    match form.parse(&state) {
        Ok(draft) => {
            let id = state.store()?.insert(&draft, state.now())?;
            info!(id, priority = %draft.priority, "Task added");
            Ok(Redirect::to("/"))
        }
        Err(TaskError::EmptyDescription) => Ok(Redirect::to("/")),
        Err(err) => {
            debug!(error = %err, "Rejected new task");
            Ok(Notice::from(&err).redirect("/"))
        }
    }
}

/// `POST /complete/{id}`
pub async fn toggle(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Redirect> {
    let task = state.store()?.toggle_completion(id, state.now())?;
    info!(id, completed = task.is_completed(), "Task toggled");
    Ok(Redirect::to("/"))
}

/// `POST /delete/{id}`
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Redirect> {
    if !state.store()?.delete(id)? {
        return Err(Error::TaskNotFound { id });
    }
    info!(id, "Task deleted");
    Ok(Redirect::to("/"))
}

/// `GET /edit/{id}`
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>> {
    let today = state.today();
    let task = state.store()?.require(id)?;

    let page = EditPage {
        task: TaskView::new(
            &task,
            today,
            soon_threshold(today, state.reminders.soon_window_days),
        ),
        today,
        priorities: Priority::ALL,
        notice: notice::lookup(query.notice.as_deref()),
    };
    state.templates.render("edit.html", &page)
}

/// `POST /edit/{id}`
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<TaskForm>,
) -> Result<Redirect> {
    let store = state.store()?;
    store.require(id)?;

    let draft = match form.parse(&state) {
        Ok(draft) => draft,
        Err(err) => {
            debug!(id, error = %err, "Rejected task edit");
            return Ok(Notice::from(&err).redirect(&format!("/edit/{id}")));
        }
    };

    if !store.update(id, &draft)? {
        return Err(Error::TaskNotFound { id });
    }
    info!(id, "Task updated");
    Ok(Notice::TaskUpdated.redirect("/"))
}

/// `GET /dashboard`
pub async fn dashboard(State(state): State<AppState>) -> Result<Html<String>> {
    let today = state.today();
    let tasks = state.store()?.all()?;

    let page = DashboardPage {
        dashboard: Dashboard::compute(&tasks, today),
        today,
    };
    state.templates.render("dashboard.html", &page)
}

/// `GET /completed-tasks`
pub async fn completed_tasks(State(state): State<AppState>) -> Result<Html<String>> {
    let today = state.today();
    let tasks = state.store()?.completed_by_recency()?;

    let page = CompletedPage {
        summary: CompletedSummary::compute(&tasks, today),
        completed_tasks: TaskView::all(&tasks, today, today),
        today,
    };
    state.templates.render("completed_tasks.html", &page)
}

/// `GET /incomplete-tasks`
///
/// Any failure sends the user back to the list with a notice instead of an
/// error page.
pub async fn incomplete_tasks(State(state): State<AppState>) -> Response {
    match render_incomplete(&state) {
        Ok(page) => page.into_response(),
        Err(err) => {
            error!(error = %err, "Failed to load incomplete tasks");
            Notice::LoadFailed.redirect("/").into_response()
        }
    }
}

fn render_incomplete(state: &AppState) -> Result<Html<String>> {
    let today = state.today();
    let window = state.reminders.soon_window_days;
    let mut tasks = state.store()?.pending()?;
    sort_by_urgency(&mut tasks);

    let threshold = soon_threshold(today, window);
    let page = IncompletePage {
        summary: IncompleteSummary::compute(&tasks, today, window),
        incomplete_tasks: TaskView::all(&tasks, today, threshold),
        today,
        soon_threshold: threshold,
    };
    state.templates.render("incomplete_tasks.html", &page)
}

/// `GET /debug-tasks`
pub async fn debug_tasks(State(state): State<AppState>) -> Response {
    match render_debug(&state) {
        Ok(page) => page.into_response(),
        Err(err) => {
            error!(error = %err, "Failed to build debug dump");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {err}")).into_response()
        }
    }
}

fn render_debug(state: &AppState) -> Result<Html<String>> {
    let (stats, sample) = {
        let store = state.store()?;
        (store.stats()?, store.sample(DEBUG_SAMPLE_SIZE)?)
    };

    let info = DebugInfo::new(stats, &sample);
    let dump = serde_json::to_string_pretty(&info)?;
    state
        .templates
        .render("debug_tasks.html", &DebugPage { info, dump })
}
