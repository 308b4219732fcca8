// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Topology reading and structural checking.
//!
//! The topology file is parsed exactly once at this boundary: YAML in,
//! schema-validated, then deserialized into the typed records below. All
//! downstream stages consume the typed form, so schema drift is caught in
//! one place.
//!
//! Structural checks, each fatal:
//!
//! 1. Participant names are pairwise unique.
//! 2. Every exchange endpoint names a declared participant.
//! 3. Exchanges are pairwise unique on `(from, to, data, data-type)`; patches
//!    and coupling strength are ignored because the same data cannot be
//!    exchanged twice in the same direction.
//!
//! Reading also shrinks the run's [`UniquifierPool`]: adjectives occurring in
//! user data names must never be used for generated names.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::errors::TopologyError;
use crate::schema;
use crate::topology::UniquifierPool;

/// The parsed topology: the complete description of the coupled case.
#[derive(Debug, Clone, Deserialize)]
pub struct Topology {
    pub participants: Vec<ParticipantDecl>,
    pub exchanges: Vec<ExchangeDecl>,
}

/// One participating solver.
#[derive(Debug, Clone, Deserialize)]
pub struct ParticipantDecl {
    pub name: String,
    pub solver: String,
    pub dimensionality: Option<i64>,
}

/// One directional data transfer between two participants.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeDecl {
    pub from: String,
    pub to: String,
    #[serde(rename = "from-patch")]
    pub from_patch: String,
    #[serde(rename = "to-patch")]
    pub to_patch: String,
    pub data: String,
    #[serde(rename = "type")]
    pub kind: ExchangeKind,
    #[serde(rename = "data-type")]
    pub data_type: Option<DataKindDecl>,
}

/// Coupling strength of an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeKind {
    Strong,
    Weak,
}

/// Declared data type of an exchange; defaults to scalar when absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKindDecl {
    Scalar,
    Vector,
}

/// Load, schema-validate and structurally check a topology file.
pub fn load_topology(path: &Path, pool: &mut UniquifierPool) -> Result<Topology, TopologyError> {
    tracing::debug!("Reading topology file at {}", path.display());

    if !path.is_file() {
        return Err(TopologyError::FileNotFound(path.to_path_buf()));
    }
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase);
    if !matches!(extension.as_deref(), Some("yaml") | Some("yml")) {
        return Err(TopologyError::NotYaml(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| TopologyError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: serde_yaml::Value = serde_yaml::from_str(&content)?;
    let document =
        serde_json::to_value(&raw).map_err(|error| TopologyError::Schema(error.to_string()))?;

    schema::validate_topology(&document)?;
    tracing::debug!("Topology file adheres to the schema.");

    let topology: Topology = serde_json::from_value(document)
        .map_err(|error| TopologyError::Schema(error.to_string()))?;
    check_topology(&topology, pool)?;
    tracing::debug!("Topology does not contain any errors.");

    Ok(topology)
}

fn check_topology(topology: &Topology, pool: &mut UniquifierPool) -> Result<(), TopologyError> {
    let mut participant_names: HashSet<&str> = HashSet::new();
    for participant in &topology.participants {
        if !participant_names.insert(&participant.name) {
            return Err(TopologyError::DuplicateParticipant(participant.name.clone()));
        }
    }
    tracing::debug!("Topology does not contain duplicate participant names.");

    let mut seen: Vec<(&str, &str, &str, Option<DataKindDecl>)> = Vec::new();
    for exchange in &topology.exchanges {
        if !participant_names.contains(exchange.to.as_str()) {
            return Err(TopologyError::UnknownParticipant(exchange.to.clone()));
        }
        if !participant_names.contains(exchange.from.as_str()) {
            return Err(TopologyError::UnknownParticipant(exchange.from.clone()));
        }

        pool.shrink_for(&exchange.data);

        let key = (
            exchange.from.as_str(),
            exchange.to.as_str(),
            exchange.data.as_str(),
            exchange.data_type,
        );
        if seen.contains(&key) {
            return Err(TopologyError::DuplicateExchange {
                from_participant: exchange.from.clone(),
                to_participant: exchange.to.clone(),
                data: exchange.data.clone(),
            });
        }
        seen.push(key);
    }

    Ok(())
}
