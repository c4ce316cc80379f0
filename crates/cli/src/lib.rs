//! Shared plumbing for the `aes256-key`, `string-crypto`, and `file-crypto`
//! binaries.
//!
//! Startup sequence of every binary (see [`run`]):
//! 1. Load and validate [`Settings`] from environment variables.
//! 2. Initialise tracing to stderr.
//! 3. Run the command inside a span tagged with the binary name.
//! 4. On failure, print the error chain to stderr and exit with status 1.

pub mod commands;
pub mod config;
pub mod io;
pub mod telemetry;

use std::process::ExitCode;

use anyhow::Result;
use tracing::{debug, error};

pub use config::Settings;

/// Run `command` with loaded settings and telemetry, mapping failure to exit status 1.
///
/// Usage errors are handled earlier by argument parsing, which exits with status 2.
pub fn run<F>(source: &str, command: F) -> ExitCode
where
    F: FnOnce(&Settings) -> Result<()>,
{
    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            // Telemetry is not yet up; write to stderr directly.
            eprintln!("configuration invalid: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = telemetry::init(&settings) {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }

    run_command(source, &settings, command)
}

/// Run `command` inside the `source` span and map its result to an exit status.
///
/// Expects telemetry to be initialised already.
pub fn run_command<F>(source: &str, settings: &Settings, command: F) -> ExitCode
where
    F: FnOnce(&Settings) -> Result<()>,
{
    let span = telemetry::source_span(source);
    let _entered = span.enter();
    debug!(version = env!("CARGO_PKG_VERSION"), "starting");

    match command(settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("command failed: {e:#}");
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
