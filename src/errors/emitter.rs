// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while writing generated files.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while emitting the generated case.
#[derive(Error, Debug)]
pub enum EmitterError {
    /// The output directory could not be reset or created.
    #[error("failed to prepare output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A generated file could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A generated JSON document could not be serialized.
    #[error("failed to serialize adapter configuration: {0}")]
    Json(#[from] serde_json::Error),
}
