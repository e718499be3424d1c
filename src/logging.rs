use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

pub const LOG_FILE: &str = "zhuyin-typer.log";

pub fn log_path() -> PathBuf {
    Config::data_dir().join(LOG_FILE)
}

/// Pick the filter directive: `RUST_LOG` when set, the configured level
/// otherwise.
fn filter_directive(from_env: Option<String>, configured: &str) -> String {
    match from_env {
        Some(directive) if !directive.trim().is_empty() => directive,
        _ => configured.to_string(),
    }
}

fn open_log(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))
}

/// Route tracing output to the log file. The terminal belongs to the UI, so
/// nothing is ever written to stdout or stderr. Safe to call twice.
pub fn init(level: &str) -> Result<PathBuf> {
    let path = log_path();
    let file = open_log(&path)?;

    let directive = filter_directive(std::env::var(EnvFilter::DEFAULT_ENV).ok(), level);
    let filter = EnvFilter::try_new(&directive)
        .or_else(|_| EnvFilter::try_new("info"))
        .context("building log filter")?;

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false),
        )
        .try_init();

    Ok(path)
}
