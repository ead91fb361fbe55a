//! Diagnostic tracing setup.
//!
//! The TUI owns the terminal, so tracing output only goes to the file given
//! with `--debug-log`. Without that flag no subscriber is installed.

use std::error::Error;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the tracing filter directives.
pub const LOG_ENV_VAR: &str = "TUTOR_LOG";
const DEFAULT_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs a file-backed subscriber when `debug_log` is set.
///
/// Appends to an existing file. Installing twice is not an error; the first
/// subscriber stays in place.
pub fn init_tracing(debug_log: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let Some(path) = debug_log else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();

    if installed.is_ok() {
        tracing::info!(path = %path.display(), "debug logging started");
    }
    Ok(())
}
