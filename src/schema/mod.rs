// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Bundled JSON Schemas and validation helpers.
//!
//! Two schemas ship with the tool: `topology-schema.json` is the
//! authoritative shape contract for the input file, and
//! `adapter-config-schema.json` guards the generated adapter configurations.
//! Both are compiled once per process and reused across runs.

use jsonschema::Validator;
use serde_json::Value;
use std::sync::OnceLock;

use crate::errors::TopologyError;

const TOPOLOGY_SCHEMA: &str = include_str!("topology-schema.json");
const ADAPTER_CONFIG_SCHEMA: &str = include_str!("adapter-config-schema.json");

fn compiled(schema_source: &str, cell: &'static OnceLock<Validator>) -> &'static Validator {
    cell.get_or_init(|| {
        let schema: Value =
            serde_json::from_str(schema_source).expect("bundled schema is valid JSON");
        jsonschema::validator_for(&schema).expect("bundled schema is a valid JSON Schema")
    })
}

fn topology_validator() -> &'static Validator {
    static CELL: OnceLock<Validator> = OnceLock::new();
    compiled(TOPOLOGY_SCHEMA, &CELL)
}

fn adapter_config_validator() -> &'static Validator {
    static CELL: OnceLock<Validator> = OnceLock::new();
    compiled(ADAPTER_CONFIG_SCHEMA, &CELL)
}

/// Validate a parsed topology document against the bundled topology schema.
pub fn validate_topology(instance: &Value) -> Result<(), TopologyError> {
    topology_validator()
        .validate(instance)
        .map_err(|error| TopologyError::Schema(error.to_string()))
}

/// Validate a generated adapter configuration against the bundled schema.
///
/// Violations indicate a bug in the generator rather than bad user input, so
/// the caller logs them instead of aborting.
pub fn validate_adapter_config(instance: &Value) -> Result<(), String> {
    adapter_config_validator()
        .validate(instance)
        .map_err(|error| error.to_string())
}
