//! File-backed tracing setup.
//!
//! A full-screen terminal UI owns stdout, so diagnostic output has to go
//! somewhere else. [`init_file_logging`] installs a global `tracing`
//! subscriber that appends plain-text events to a file. `RUST_LOG` wins over
//! the default filter when set.

use crate::runtime::ProgramError;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Install a global subscriber writing to `path` (opened in append mode).
///
/// Fails if the file cannot be opened or a global subscriber already exists.
///
/// ```no_run
/// typeahead_core::logging::init_file_logging("typeahead.log", "typeahead=debug").unwrap();
/// tracing::info!("logging to file");
/// ```
pub fn init_file_logging(path: impl AsRef<Path>, default_filter: &str) -> Result<(), ProgramError> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| ProgramError::Logging(err.to_string()))
}
