// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod builder;
pub mod nodes;
pub mod planner;

#[cfg(test)]
mod integration_tests;

pub use builder::{build_graph, PotentialCoupling};
pub use nodes::{
    Acceleration, CaseGraph, ConvergenceMeasure, CouplingScheme, Data, DataAccess, DataId,
    DataKind, Exchange, ExchangeId, M2n, Mapping, MappingConstraint, MappingDirection, MappingId,
    Mesh, MeshId, Participant, ParticipantId, PatchBinding, PatchLabel, ReceiveMesh, SchemeId,
};
pub use planner::plan_couplings;
