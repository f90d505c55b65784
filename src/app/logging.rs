use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt};

use crate::app::AppError;

pub fn init(log_path: &Path, verbose: bool) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(|err| AppError::logging_init(format!("{}: {err}", log_path.display())))?;

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .try_init()
        .map_err(AppError::logging_init)
}

// Dependencies stay at info even in verbose mode.
fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "info,device_outages=debug"
    } else {
        "info"
    }
}
