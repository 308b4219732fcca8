// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Logging setup: a colored stderr sink and a per-run log file.
//!
//! Stderr shows INFO and above by default, DEBUG with `--verbose`, and
//! colors level names only when attached to a terminal (`RUST_LOG`
//! overrides the level). The log file always captures DEBUG. At most
//! [`MAX_KEPT_LOG_FILES`] files are kept in `.logs/`; older ones are
//! removed first.

use std::fs::{self, File};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::consts::{LOG_DIR_NAME, MAX_KEPT_LOG_FILES};

/// Install the global subscriber. Call once, at process start.
pub fn init(verbose: bool) {
    fn stderr_filter(verbose: bool) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }))
    }

    match open_log_file() {
        Ok((file, path)) => {
            let file_layer = fmt::layer()
                .with_writer(Arc::new(file))
                .with_ansi(false)
                .with_filter(LevelFilter::DEBUG);
            let stderr_layer = fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(io::stderr().is_terminal())
                .with_target(false)
                .with_filter(stderr_filter(verbose));
            tracing_subscriber::registry()
                .with(file_layer)
                .with(stderr_layer)
                .init();
            tracing::debug!("Logs can be found in {}", path.display());
        }
        Err(error) => {
            let stderr_layer = fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(io::stderr().is_terminal())
                .with_target(false)
                .with_filter(stderr_filter(verbose));
            tracing_subscriber::registry().with(stderr_layer).init();
            tracing::warn!("Could not create a log file ({error}); logging to stderr only.");
        }
    }
}

fn open_log_file() -> io::Result<(File, PathBuf)> {
    let directory = PathBuf::from(LOG_DIR_NAME);
    fs::create_dir_all(&directory)?;
    prune_old_logs(&directory)?;

    let timestamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
    let path = directory.join(format!("precice-case-generate-{timestamp}.log"));
    let file = File::create(&path)?;
    Ok((file, path))
}

/// Keep the newest log files, removing the rest so the directory holds at
/// most [`MAX_KEPT_LOG_FILES`] files after the new one is created.
fn prune_old_logs(directory: &Path) -> io::Result<()> {
    let mut logs: Vec<PathBuf> = fs::read_dir(directory)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| {
                    name.starts_with("precice-case-generate-") && name.ends_with(".log")
                })
        })
        .collect();
    logs.sort();

    if logs.len() >= MAX_KEPT_LOG_FILES {
        let excess = logs.len() - (MAX_KEPT_LOG_FILES - 1);
        for stale in logs.into_iter().take(excess) {
            let _ = fs::remove_file(stale);
        }
    }
    Ok(())
}
