// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-participant adapter configuration files.
//!
//! Every participant gets an `adapter-config.json` describing its interfaces:
//! one entry per provided mesh with the patches bound to it and the data read
//! and written over it. Written files are checked against the bundled adapter
//! schema; a mismatch points at a generator bug and is logged, not fatal.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::consts::{ADAPTER_CONFIG_FILE_NAME, PRECICE_CONFIG_FILE_NAME};
use crate::errors::EmitterError;
use crate::graph::{CaseGraph, ParticipantId};
use crate::schema;

#[derive(Debug, Serialize)]
pub struct AdapterConfig {
    pub participant_name: String,
    pub precice_config_file_name: String,
    pub interfaces: Vec<AdapterInterface>,
}

#[derive(Debug, Serialize)]
pub struct AdapterInterface {
    pub mesh_name: String,
    pub patches: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub read_data_names: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub write_data_names: Vec<String>,
}

/// Assemble the adapter configuration for one participant.
pub fn adapter_config_for(graph: &CaseGraph, id: ParticipantId) -> AdapterConfig {
    let participant = graph.participant(id);
    let mut interfaces = Vec::with_capacity(participant.provide_meshes.len());

    for &mesh in &participant.provide_meshes {
        let mut patches: Vec<String> = graph
            .patches_of_mesh(mesh)
            .into_iter()
            .map(str::to_string)
            .collect();
        patches.sort();

        let mut read_data_names: Vec<String> = participant
            .read_data
            .iter()
            .filter(|entry| entry.mesh == mesh)
            .map(|entry| graph.data(entry.data).name.clone())
            .collect();
        read_data_names.sort();

        let mut write_data_names: Vec<String> = participant
            .write_data
            .iter()
            .filter(|entry| entry.mesh == mesh)
            .map(|entry| graph.data(entry.data).name.clone())
            .collect();
        write_data_names.sort();

        interfaces.push(AdapterInterface {
            mesh_name: graph.mesh(mesh).name.clone(),
            patches,
            read_data_names,
            write_data_names,
        });
        tracing::debug!(
            "Created adapter configuration entry for mesh {} in participant {}'s adapter-config.",
            graph.mesh(mesh).name,
            participant.name
        );
    }

    AdapterConfig {
        participant_name: participant.name.clone(),
        precice_config_file_name: format!("../{PRECICE_CONFIG_FILE_NAME}"),
        interfaces,
    }
}

/// Write a participant's adapter configuration into its run directory and
/// validate the result against the bundled schema.
pub fn write_adapter_config(
    graph: &CaseGraph,
    id: ParticipantId,
    directory: &Path,
) -> Result<PathBuf, EmitterError> {
    let config = adapter_config_for(graph, id);
    let path = directory.join(ADAPTER_CONFIG_FILE_NAME);

    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    config.serialize(&mut serializer)?;
    fs::write(&path, buffer).map_err(|source| EmitterError::Write {
        path: path.clone(),
        source,
    })?;
    tracing::info!(
        "Adapter configuration file for participant {} written to {}",
        config.participant_name,
        path.display()
    );

    let instance = serde_json::to_value(&config)?;
    if let Err(violation) = schema::validate_adapter_config(&instance) {
        tracing::error!(
            "Adapter config file {} does not adhere to the schema: {violation}. This is likely an error within the program.",
            path.display()
        );
    } else {
        tracing::debug!("Adapter config file {} adheres to the schema.", path.display());
    }

    Ok(path)
}
