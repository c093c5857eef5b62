//! HTTP interface for todolist.
//!
//! This module wires the request handlers into an axum router over shared
//! application state and runs the server until Ctrl-C.

mod handlers;
mod notice;
mod views;

use std::fmt;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::ReminderConfig;
use crate::error::{Error, Result};
use crate::storage::Storage;

pub use notice::Notice;
pub use views::Templates;

/// State shared by every request.
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<Storage>>,
    templates: Arc<Templates>,
    clock: Arc<dyn Clock + Send + Sync>,
    reminders: ReminderConfig,
}

impl AppState {
    /// Build the state around an open store.
    ///
    /// # Errors
    ///
    /// Returns an error if the page templates fail to load.
    pub fn new(
        storage: Storage,
        clock: Arc<dyn Clock + Send + Sync>,
        reminders: ReminderConfig,
    ) -> Result<Self> {
        Ok(Self {
            store: Arc::new(Mutex::new(storage)),
            templates: Arc::new(Templates::load()?),
            clock,
            reminders,
        })
    }

    /// Lock the store for the duration of one request's queries.
    ///
    /// # Errors
    ///
    /// Returns an internal error if a previous holder panicked.
    pub fn store(&self) -> Result<MutexGuard<'_, Storage>> {
        self.store
            .lock()
            .map_err(|_| Error::internal("task store lock poisoned"))
    }

    /// The current instant.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }

    /// The current UTC calendar date.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store)
            .field("reminders", &self.reminders)
            .finish_non_exhaustive()
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/add", post(handlers::add))
        .route("/complete/{id}", post(handlers::toggle))
        .route("/delete/{id}", post(handlers::delete))
        .route("/edit/{id}", get(handlers::edit_form).post(handlers::edit))
        .route("/dashboard", get(handlers::dashboard))
        .route("/completed-tasks", get(handlers::completed_tasks))
        .route("/incomplete-tasks", get(handlers::incomplete_tasks))
        .route("/debug-tasks", get(handlers::debug_tasks))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the application on `addr` until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| Error::ServerBind {
            addr: addr.to_string(),
            source,
        })?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        return;
    }
    info!("Shutting down");
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = if self.is_not_found() {
            (StatusCode::NOT_FOUND, "That task does not exist.")
        } else {
            error!(error = %self, "Request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong. Please try again.",
            )
        };
        (status, Html(error_page(status, message))).into_response()
    }
}

fn error_page(status: StatusCode, message: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{status}</title></head>\n\
         <body>\n<h1>{status}</h1>\n<p>{message}</p>\n<p><a href=\"/\">Back to tasks</a></p>\n</body>\n</html>\n"
    )
}
