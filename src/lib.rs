// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod case;     // run orchestration
pub mod consts;   // defaults + vocabularies
pub mod emitter;  // precice-config.xml, adapter configs, scaffolding
pub mod errors;   // error handling
pub mod graph;    // typed configuration graph
pub mod logging;
pub mod observability;
pub mod schema;   // bundled JSON Schemas
pub mod topology; // topology reading + patch preprocessing

pub use case::{generate_case, CaseReport};
