// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod emitter;
mod topology;

pub use emitter::EmitterError;
pub use topology::TopologyError;

use thiserror::Error;

/// Top-level error for a generation run.
///
/// The variant determines the process exit code: invalid input exits with 1,
/// emitter failures with 2. Warnings never surface here; they accumulate in
/// the run's diagnostics sink instead.
#[derive(Error, Debug)]
pub enum CaseError {
    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Emitter(#[from] EmitterError),
}

impl CaseError {
    /// The process exit code this error maps to.
    pub fn exit_code(&self) -> i32 {
        match self {
            CaseError::Topology(_) => 1,
            CaseError::Emitter(_) => 2,
        }
    }
}
