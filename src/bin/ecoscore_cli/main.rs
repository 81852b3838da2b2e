// ABOUTME: Eco score CLI - runs predictions, profile and log intake, and dashboards locally
// ABOUTME: Loads the model artifact, opens the database, and prints JSON results on stdout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org
//!
//! Usage:
//! ```bash
//! # Show the serving model's metadata
//! ecoscore-cli model-info
//!
//! # Save a profile, log today's travel, and predict
//! ecoscore-cli profile --user 6f1c... --input profile.json
//! ecoscore-cli log --user 6f1c... --input today.json
//! ecoscore-cli predict --user 6f1c... --input request.json
//!
//! # Dashboard for today
//! ecoscore-cli dashboard --user 6f1c...
//! ```
//!
//! `--input -` reads JSON from stdin. Errors are printed as a JSON error
//! response and the process exits non-zero.

mod commands;

use clap::{Parser, Subcommand};
use ecoscore_intelligence::ModelStore;
use ecoscore_server::config::{DatabaseUrl, ServerConfig};
use ecoscore_server::database::Database;
use ecoscore_server::errors::{AppError, AppResult, ErrorResponse};
use ecoscore_server::logging::LoggingConfig;
use ecoscore_server::services::Services;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Parser)]
#[command(
    name = "ecoscore-cli",
    about = "Eco score prediction CLI",
    long_about = "Command-line access to eco score predictions, profiles, daily logs, and dashboards."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Model artifact path override
    #[arg(long, global = true)]
    model_path: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Show the loaded model's metadata and status
    ModelInfo,

    /// Predict an eco score
    Predict {
        /// User id
        #[arg(long)]
        user: Uuid,

        /// Prediction request JSON file (`-` for stdin); empty request if omitted
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Show or replace a user's profile
    Profile {
        /// User id
        #[arg(long)]
        user: Uuid,

        /// Profile JSON file (`-` for stdin); prints the stored profile if omitted
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Merge measurements into a user's daily log
    Log {
        /// User id
        #[arg(long)]
        user: Uuid,

        /// Daily log JSON file (`-` for stdin); `date` defaults to today
        #[arg(long)]
        input: PathBuf,
    },

    /// Show a user's dashboard
    Dashboard {
        /// User id
        #[arg(long)]
        user: Uuid,

        /// Dashboard date (`YYYY-MM-DD`); today if omitted
        #[arg(long)]
        date: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        "debug".clone_into(&mut logging.level);
    }
    if let Err(e) = logging.init() {
        eprintln!("{e}");
    }

    match run(cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            let response = ErrorResponse::from(error);
            match serde_json::to_string_pretty(&response) {
                Ok(json) => println!("{json}"),
                Err(e) => eprintln!("{e}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> AppResult<String> {
    let mut config = ServerConfig::from_env().map_err(AppError::from)?;
    if let Some(url) = cli.database_url.as_deref() {
        config.database_url = DatabaseUrl::parse_url(url);
    }
    if let Some(path) = cli.model_path {
        config.model_path = path;
    }
    info!("{}", config.summary());

    let database = Database::new(&config.database_url).await?;
    let models = Arc::new(ModelStore::new());
    if command_needs_model(&cli.command) {
        if let Err(e) = models.load_from_path(&config.model_path).await {
            warn!(model.path = %config.model_path.display(), error = %e, "Scoring model unavailable");
        }
    }
    let services = Services::new(&config, &database, models);

    match cli.command {
        Command::ModelInfo => commands::model_info(&services),
        Command::Predict { user, input } => commands::predict(&services, user, input).await,
        Command::Profile { user, input } => commands::profile(&services, user, input).await,
        Command::Log { user, input } => commands::log(&services, user, &input).await,
        Command::Dashboard { user, date } => {
            commands::dashboard(&services, user, date.as_deref()).await
        }
    }
}

/// Dashboards never touch the model; skipping the load keeps them fast
const fn command_needs_model(command: &Command) -> bool {
    !matches!(command, Command::Dashboard { .. })
}
