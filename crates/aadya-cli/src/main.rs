//! Terminal front end for the Aadya assessment.
//!
//! Runs one assessment session against the configured backend. Commands
//! are read line by line from stdin on a dedicated thread and fed to the
//! session runner; screens and messages are printed to stdout. Logs go to
//! stderr.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `$AADYA_CONFIG` or `aadya-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Create the HTTP backend
//! 4. Start the stdin reader
//! 5. Run the session until `quit`, end of input, or a failed login

mod display;
mod error;
mod input;

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use aadya_client::HttpBackend;
use aadya_core::config::AssessmentConfig;
use aadya_core::runner::run_session;
use aadya_core::session::{Action, Session};
use aadya_types::Question;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::display::TerminalPresenter;
use crate::error::{CliError, InputError};
use crate::input::{Command, HELP};

/// Queued user actions before the reader blocks.
const ACTION_BUFFER: usize = 16;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "aadya-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration or backend setup fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(
        api_url = config.backend.api_url,
        request_timeout_ms = config.backend.request_timeout_ms,
        hit_target = config.motor.hit_target,
        "aadya starting"
    );

    // 3. Create the HTTP backend.
    let backend = Arc::new(HttpBackend::new(&config.backend).map_err(CliError::from)?);

    // 4. Start the stdin reader.
    let (action_tx, action_rx) = mpsc::channel(ACTION_BUFFER);
    let (question_tx, question_rx) = watch::channel(None);
    std::thread::spawn(move || read_commands(&action_tx, &question_rx));

    // 5. Run the session.
    let session = Session::new(&config);
    let mut presenter = TerminalPresenter::new(question_tx);
    let summary = run_session(session, backend, action_rx, &mut presenter).await;

    info!(
        session_id = %summary.session_id,
        end_reason = ?summary.end_reason,
        final_stage = %summary.final_stage,
        "aadya finished"
    );
    println!("Goodbye!");
    Ok(())
}

/// Load configuration, falling back to defaults when no file exists.
fn load_config() -> Result<AssessmentConfig, CliError> {
    let path = std::env::var_os("AADYA_CONFIG")
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    if path.exists() {
        Ok(AssessmentConfig::from_file(&path)?)
    } else {
        Ok(AssessmentConfig::parse("")?)
    }
}

/// Read commands from stdin until `quit` or end of input.
///
/// Dropping `actions` on return closes the session runner's input.
fn read_commands(actions: &mpsc::Sender<Action>, question: &watch::Receiver<Option<Question>>) {
    println!("Type `help` for commands.");
    for line in std::io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "failed to read input");
                break;
            }
        };
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(InputError::Empty) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        match command {
            Command::Quit => break,
            Command::Help => {
                println!("{HELP}");
                continue;
            }
            _ => {}
        }
        let action = command.into_action(question.borrow().as_ref());
        match action {
            Ok(Some(action)) => {
                if actions.blocking_send(action).is_err() {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => println!("{e}"),
        }
    }
}
