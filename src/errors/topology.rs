// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while reading and checking a topology file.
//!
//! Every variant is fatal: the run aborts before any output is written.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that make a topology unusable.
#[derive(Error, Debug)]
pub enum TopologyError {
    /// The input path does not point to an existing file.
    #[error("topology file {0} does not exist")]
    FileNotFound(PathBuf),

    /// The input file does not carry a .yaml/.yml extension.
    #[error("topology file {0} is not a YAML file")]
    NotYaml(PathBuf),

    /// The input file could not be read.
    #[error("failed to read topology file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input file is not well-formed YAML.
    #[error("failed to parse topology file: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The parsed document violates the bundled topology schema.
    #[error("topology file does not adhere to the schema: {0}")]
    Schema(String),

    /// Two participants share a name.
    #[error("duplicate participant name \"{0}\" in topology file")]
    DuplicateParticipant(String),

    /// An exchange references a participant that was never declared.
    #[error("unknown participant \"{0}\" in topology file")]
    UnknownParticipant(String),

    /// Two exchanges agree on (from, to, data, data-type).
    #[error("duplicate exchange of data \"{data}\" from \"{from_participant}\" to \"{to_participant}\" in topology file")]
    DuplicateExchange {
        from_participant: String,
        to_participant: String,
        data: String,
    },

    /// Every reserved adjective has been used up while renaming data.
    #[error("ran out of uniquifiers while renaming data \"{0}\"; use distinct data names per direction")]
    UniquifierPoolExhausted(String),
}
