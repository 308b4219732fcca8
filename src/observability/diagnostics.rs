// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashSet;
use std::fmt::Display;

/// Run-scoped sink for non-fatal findings.
///
/// A fresh sink is created at the start of every run, so no state leaks
/// between invocations. Each warning is logged immediately via `tracing` and
/// recorded for the end-of-run summary; repeated messages are deduplicated.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<String>,
    seen: HashSet<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record and log a warning. Duplicate messages are dropped.
    pub fn warn(&mut self, message: impl Display) {
        let message = message.to_string();
        if self.seen.insert(message.clone()) {
            tracing::warn!("{message}");
            self.warnings.push(message);
        }
    }

    /// Number of distinct warnings recorded so far.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// The recorded warnings, in emission order.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Log the end-of-run summary of all recorded warnings.
    pub fn replay(&self) {
        if self.warnings.is_empty() {
            return;
        }
        tracing::info!(
            "{} warning(s) were emitted during generation:",
            self.warnings.len()
        );
        for warning in &self.warnings {
            tracing::info!("  - {warning}");
        }
    }
}
