//! `todolist` - A personal to-do list web application
//!
//! This library provides the task model, its `SQLite` store, the listing,
//! reminder and analytics calculations, and the axum web interface that
//! serves them.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod analytics;
pub mod cli;
pub mod config;
pub mod error;
pub mod listing;
pub mod logging;
pub mod notify;
pub mod storage;
pub mod task;
pub mod web;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use storage::{Storage, StorageStats};
pub use task::{Completion, Priority, Task, TaskDraft, TaskError};
pub use web::AppState;
