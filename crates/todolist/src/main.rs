//! `todolist` - CLI for the to-do list web application
//!
//! This binary runs the web server and offers a few commands for inspecting
//! the task store and configuration.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use mockable::DefaultClock;
use tracing::info;

use todolist::cli::{Cli, Command, ConfigCommand, ServeCommand};
use todolist::{init_logging, web, AppState, Config, Storage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Execute the command
    match cli.command {
        Command::Serve(serve_cmd) => handle_serve(load_config(cli.config)?, &serve_cmd).await,
        Command::Status(status_cmd) => handle_status(&load_config(cli.config)?, status_cmd.json),
        Command::Config(config_cmd) => handle_config(cli.config, config_cmd),
    }
}

fn load_config(config_path: Option<PathBuf>) -> anyhow::Result<Config> {
    Config::load_from(config_path).context("loading configuration")
}

async fn handle_serve(mut config: Config, cmd: &ServeCommand) -> anyhow::Result<()> {
    cmd.apply(&mut config);
    config.validate()?;

    let database_path = config.database_path();
    let storage = Storage::open(&database_path)
        .with_context(|| format!("opening database {}", database_path.display()))?;
    info!("Using database {}", database_path.display());

    let state = AppState::new(storage, Arc::new(DefaultClock), config.reminders.clone())?;
    web::serve(config.bind_addr()?, state).await?;
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let database_path = config.database_path();
    let storage = Storage::open(&database_path)
        .with_context(|| format!("opening database {}", database_path.display()))?;
    let stats = storage.stats()?;

    if json {
        let status = serde_json::json!({
            "database_path": database_path,
            "total_tasks": stats.total,
            "completed_tasks": stats.completed,
            "incomplete_tasks": stats.incomplete,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("todolist status");
        println!("---------------");
        println!("Database:      {}", database_path.display());
        println!("Tasks:         {}", stats.total);
        println!("Completed:     {}", stats.completed);
        println!("Incomplete:    {}", stats.incomplete);
    }
    Ok(())
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = &load_config(config_path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Server]");
                println!("  Host:               {}", config.server.host);
                println!("  Port:               {}", config.server.port);
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Reminders]");
                println!(
                    "  Soon window (days): {}",
                    config.reminders.soon_window_days
                );
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::load_from(Some(path.clone()))
                .with_context(|| format!("invalid configuration {}", path.display()))?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
