//! `SQLite` schema definitions for todolist.
//!
//! This module contains the SQL statements for creating and managing
//! the database schema.

/// SQL statement to create the tasks table.
///
/// `priority` is free text; values outside High/Medium/Low are tolerated on
/// read. `completed` and `completed_at` are always written together, and
/// queries select on `completed_at`.
pub const CREATE_TASKS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    task TEXT NOT NULL,
    completed INTEGER NOT NULL DEFAULT 0,
    priority TEXT NOT NULL DEFAULT 'Medium',
    due_date TEXT,
    created_at TEXT NOT NULL,
    completed_at TEXT
)
";

/// SQL statement to create an index on `completed_at` for status filters and
/// the completed-tasks ordering.
pub const CREATE_COMPLETED_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_tasks_completed_at ON tasks(completed_at)
";

/// SQL statement to create an index on `due_date` for reminder queries.
pub const CREATE_DUE_DATE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_tasks_due_date ON tasks(due_date)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_TASKS_TABLE,
    CREATE_COMPLETED_INDEX,
    CREATE_DUE_DATE_INDEX,
    CREATE_METADATA_TABLE,
];
