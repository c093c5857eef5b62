//! Storage layer for todolist.
//!
//! This module provides `SQLite`-based persistent storage for tasks: creation,
//! lookup, filtered listing, completion toggling, editing and deletion.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::listing::StatusFilter;
use crate::task::{Completion, Priority, Task, TaskDraft, DATE_FORMAT};

/// Column list shared by every task query, in `row_to_task` order.
const TASK_COLUMNS: &str = "id, task, completed, priority, due_date, created_at, completed_at";

/// Storage engine for tasks.
///
/// Every call runs as its own auto-committed statement; there is no
/// multi-statement transaction anywhere in the application.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert a new pending task created at `created_at`.
    ///
    /// Returns the assigned ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn insert(&self, draft: &TaskDraft, created_at: DateTime<Utc>) -> Result<i64> {
        self.conn.execute(
            r"
            INSERT INTO tasks (task, completed, priority, due_date, created_at, completed_at)
            VALUES (?1, 0, ?2, ?3, ?4, NULL)
            ",
            params![
                draft.task,
                draft.priority.as_str(),
                draft.due_date.map(format_date),
                created_at.to_rfc3339(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("Inserted task with id {}", id);
        Ok(id)
    }

    /// Get a task by its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get(&self, id: i64) -> Result<Option<Task>> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1");
        let task = self
            .conn
            .query_row(&sql, [id], Self::row_to_task)
            .optional()?;
        Ok(task)
    }

    /// Get a task by its ID, failing if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TaskNotFound`] if no task has this ID, or an error if
    /// the database operation fails.
    pub fn require(&self, id: i64) -> Result<Task> {
        self.get(id)?.ok_or(Error::TaskNotFound { id })
    }

    /// List tasks matching a status filter and a case-insensitive substring
    /// search on the description, in store (id) order.
    ///
    /// An empty or blank `search` matches every task.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list(&self, status: StatusFilter, search: &str) -> Result<Vec<Task>> {
        let search = search.trim();
        let pattern = (!search.is_empty()).then(|| format!("%{}%", escape_like(search)));

        let sql = format!(
            r"
            SELECT {TASK_COLUMNS} FROM tasks
            WHERE (?1 IS NULL OR (completed_at IS NOT NULL) = ?1)
              AND (?2 IS NULL OR task LIKE ?2 ESCAPE '\')
            ORDER BY id
            "
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let tasks = stmt
            .query_map(params![status.completed_flag(), pattern], Self::row_to_task)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(tasks)
    }

    /// Every task, in store order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn all(&self) -> Result<Vec<Task>> {
        self.list(StatusFilter::All, "")
    }

    /// Every pending task, in store order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn pending(&self) -> Result<Vec<Task>> {
        self.list(StatusFilter::Pending, "")
    }

    /// Every completed task, most recently completed first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn completed_by_recency(&self) -> Result<Vec<Task>> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE completed_at IS NOT NULL \
             ORDER BY completed_at DESC, id DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let tasks = stmt
            .query_map([], Self::row_to_task)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    /// The first `limit` tasks in store order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn sample(&self, limit: usize) -> Result<Vec<Task>> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY id LIMIT ?1");
        let mut stmt = self.conn.prepare(&sql)?;

        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let tasks = stmt
            .query_map([limit_i64], Self::row_to_task)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    /// Flip a task between pending and completed.
    ///
    /// Completing stamps `now` as the completion time; reopening clears it.
    /// Returns the task in its new state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TaskNotFound`] if no task has this ID, or an error if
    /// the database operation fails.
    pub fn toggle_completion(&self, id: i64, now: DateTime<Utc>) -> Result<Task> {
        let mut task = self.require(id)?;
        task.completion = task.completion.toggled(now);
        self.set_completion(id, task.completion)?;
        debug!(
            "Task {} is now {}",
            id,
            if task.is_completed() { "completed" } else { "pending" }
        );
        Ok(task)
    }

    /// Write a completion state, keeping the flag and timestamp columns in step.
    ///
    /// Returns `true` if a task was updated, `false` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn set_completion(&self, id: i64, completion: Completion) -> Result<bool> {
        let affected = self.conn.execute(
            "UPDATE tasks SET completed = ?1, completed_at = ?2 WHERE id = ?3",
            params![
                completion.is_done(),
                completion.completed_at().map(|at| at.to_rfc3339()),
                id,
            ],
        )?;
        Ok(affected > 0)
    }

    /// Replace a task's description, priority and due date.
    ///
    /// Completion state and creation time are left untouched.
    /// Returns `true` if a task was updated, `false` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn update(&self, id: i64, draft: &TaskDraft) -> Result<bool> {
        let affected = self.conn.execute(
            "UPDATE tasks SET task = ?1, priority = ?2, due_date = ?3 WHERE id = ?4",
            params![
                draft.task,
                draft.priority.as_str(),
                draft.due_date.map(format_date),
                id,
            ],
        )?;
        if affected > 0 {
            debug!("Updated task {}", id);
        }
        Ok(affected > 0)
    }

    /// Delete a task by ID.
    ///
    /// Returns `true` if a task was deleted, `false` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let affected = self.conn.execute("DELETE FROM tasks WHERE id = ?1", [id])?;
        if affected > 0 {
            info!("Deleted task {}", id);
        }
        Ok(affected > 0)
    }

    /// Count total tasks in storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Get task counts by completion state.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let (total, completed): (i64, i64) = self.conn.query_row(
            "SELECT COUNT(*), COUNT(completed_at) FROM tasks",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(StorageStats {
            total,
            completed,
            incomplete: total - completed,
        })
    }

    /// Convert a database row to a Task struct.
    fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
        let id: i64 = row.get(0)?;
        let task: String = row.get(1)?;
        let completed: bool = row.get(2)?;
        let priority_str: String = row.get(3)?;
        let due_date_str: Option<String> = row.get(4)?;
        let created_at_str: String = row.get(5)?;
        let completed_at_str: Option<String> = row.get(6)?;

        let priority = priority_str.parse::<Priority>().unwrap_or_else(|_| {
            warn!(
                "Unknown priority '{}' on task {}, treating as Medium",
                priority_str, id
            );
            Priority::Medium
        });

        let due_date = due_date_str.and_then(|s| {
            NaiveDate::parse_from_str(&s, DATE_FORMAT)
                .map_err(|_| warn!("Ignoring unreadable due date '{}' on task {}", s, id))
                .ok()
        });

        let created_at = parse_timestamp(5, &created_at_str)?;
        let completion = match completed_at_str {
            Some(s) => Completion::Done {
                at: parse_timestamp(6, &s)?,
            },
            None => Completion::Pending,
        };
        if completed != completion.is_done() {
            warn!(
                "Task {} has completed={} but completed_at is {}; using completed_at",
                id,
                completed,
                if completion.is_done() { "set" } else { "empty" }
            );
        }

        Ok(Task {
            id,
            task,
            priority,
            due_date,
            created_at,
            completion,
        })
    }
}

/// Counts of tasks by completion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StorageStats {
    /// Total number of tasks stored.
    pub total: i64,
    /// Number of completed tasks.
    pub completed: i64,
    /// Number of pending tasks.
    pub incomplete: i64,
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_timestamp(column: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

/// Escape `LIKE` wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
