// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The typed configuration graph.
//!
//! Participants, mappings and meshes reference each other cyclically in the
//! conceptual graph, so each node kind lives in its own arena inside
//! [`CaseGraph`] and nodes carry small integer ids instead of shared
//! references. The graph is built by the builder and planner stages and is
//! immutable afterwards.

/// Index into [`CaseGraph::participants`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticipantId(pub usize);

/// Index into [`CaseGraph::data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DataId(pub usize);

/// Index into [`CaseGraph::meshes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub usize);

/// Index into [`CaseGraph::mappings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MappingId(pub usize);

/// Index into [`CaseGraph::exchanges`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExchangeId(pub usize);

/// Index into [`CaseGraph::schemes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemeId(pub usize);

/// A named solver instance in the coupled simulation.
#[derive(Debug, Clone)]
pub struct Participant {
    pub name: String,
    pub solver: String,
    pub dimensionality: u8,
    pub provide_meshes: Vec<MeshId>,
    pub receive_meshes: Vec<ReceiveMesh>,
    pub write_data: Vec<DataAccess>,
    pub read_data: Vec<DataAccess>,
    pub mappings: Vec<MappingId>,
}

/// A mesh a participant receives from a peer in order to map onto or from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiveMesh {
    pub mesh: MeshId,
    pub from_participant: ParticipantId,
}

/// A (data, mesh) pair, used for read-data, write-data and acceleration data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataAccess {
    pub data: DataId,
    pub mesh: MeshId,
}

/// A named field exchanged between participants.
#[derive(Debug, Clone)]
pub struct Data {
    pub name: String,
    pub kind: DataKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    Scalar,
    Vector,
}

impl DataKind {
    pub fn xml_tag(self) -> &'static str {
        match self {
            DataKind::Scalar => "data:scalar",
            DataKind::Vector => "data:vector",
        }
    }
}

/// A named surface data is exchanged over; provided by exactly one participant.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub dimensions: u8,
    pub use_data: Vec<DataId>,
    pub provided_by: ParticipantId,
}

/// Thermodynamic quality of the data crossing a patch; decides the mapping
/// constraint (conservative for extensive, consistent for intensive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchLabel {
    Extensive,
    Intensive,
}

/// A boundary patch bound to the mesh that carries its exchanges.
/// Patches never appear in the preCICE configuration; adapter configs need them.
#[derive(Debug, Clone)]
pub struct PatchBinding {
    pub name: String,
    pub participant: ParticipantId,
    pub mesh: MeshId,
    pub label: PatchLabel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingDirection {
    Write,
    Read,
}

impl MappingDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            MappingDirection::Write => "write",
            MappingDirection::Read => "read",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingConstraint {
    Conservative,
    Consistent,
}

impl MappingConstraint {
    pub fn as_str(self) -> &'static str {
        match self {
            MappingConstraint::Conservative => "conservative",
            MappingConstraint::Consistent => "consistent",
        }
    }
}

/// A transfer rule between two meshes. Write mappings live on the from-mesh's
/// provider and are conservative; read mappings live on the to-mesh's provider
/// and are consistent. The method is always nearest-neighbor.
#[derive(Debug, Clone)]
pub struct Mapping {
    pub parent: ParticipantId,
    pub direction: MappingDirection,
    pub from_mesh: MeshId,
    pub to_mesh: MeshId,
    pub constraint: MappingConstraint,
}

impl Mapping {
    pub fn xml_tag(&self) -> &'static str {
        "mapping:nearest-neighbor"
    }
}

/// One directional data transfer over one mesh per time window.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub data: DataId,
    /// The transported mesh: the mapping's to-mesh for write mappings, its
    /// from-mesh for read mappings.
    pub mesh: MeshId,
    pub from_participant: ParticipantId,
    pub to_participant: ParticipantId,
    pub scheme: Option<SchemeId>,
}

/// Acceleration attached to implicit and multi schemes; always IQN-ILS over
/// every exchanged (data, mesh) pair.
#[derive(Debug, Clone, Default)]
pub struct Acceleration {
    pub data: Vec<DataAccess>,
}

impl Acceleration {
    pub fn xml_tag(&self) -> &'static str {
        "acceleration:IQN-ILS"
    }
}

/// A relative convergence measure over one exchanged (data, mesh) pair.
#[derive(Debug, Clone)]
pub struct ConvergenceMeasure {
    pub data: DataId,
    pub mesh: MeshId,
    pub limit: &'static str,
}

/// The temporal coordination protocol between participants.
///
/// Acceleration and convergence measures exist only on the implicit and multi
/// variants; explicit schemes cannot carry them.
#[derive(Debug, Clone)]
pub enum CouplingScheme {
    ParallelExplicit {
        first: ParticipantId,
        second: ParticipantId,
        exchanges: Vec<ExchangeId>,
    },
    ParallelImplicit {
        first: ParticipantId,
        second: ParticipantId,
        exchanges: Vec<ExchangeId>,
        acceleration: Acceleration,
        convergence_measures: Vec<ConvergenceMeasure>,
    },
    Multi {
        control: ParticipantId,
        participants: Vec<ParticipantId>,
        exchanges: Vec<ExchangeId>,
        acceleration: Acceleration,
        convergence_measures: Vec<ConvergenceMeasure>,
    },
}

impl CouplingScheme {
    pub fn exchanges(&self) -> &[ExchangeId] {
        match self {
            CouplingScheme::ParallelExplicit { exchanges, .. }
            | CouplingScheme::ParallelImplicit { exchanges, .. }
            | CouplingScheme::Multi { exchanges, .. } => exchanges,
        }
    }

    pub fn exchanges_mut(&mut self) -> &mut Vec<ExchangeId> {
        match self {
            CouplingScheme::ParallelExplicit { exchanges, .. }
            | CouplingScheme::ParallelImplicit { exchanges, .. }
            | CouplingScheme::Multi { exchanges, .. } => exchanges,
        }
    }
}

/// A process-to-process transport binding between two participants; at most
/// one per unordered pair. The transport is always sockets.
#[derive(Debug, Clone, Copy)]
pub struct M2n {
    pub acceptor: ParticipantId,
    pub connector: ParticipantId,
}

impl M2n {
    pub fn xml_tag(&self) -> &'static str {
        "m2n:sockets"
    }
}

/// Arena-per-kind storage for the whole configuration graph.
#[derive(Debug, Clone, Default)]
pub struct CaseGraph {
    pub participants: Vec<Participant>,
    pub data: Vec<Data>,
    pub meshes: Vec<Mesh>,
    pub mappings: Vec<Mapping>,
    pub exchanges: Vec<Exchange>,
    pub patches: Vec<PatchBinding>,
    pub schemes: Vec<CouplingScheme>,
    pub m2ns: Vec<M2n>,
}

impl CaseGraph {
    pub fn participant(&self, id: ParticipantId) -> &Participant {
        &self.participants[id.0]
    }

    pub fn participant_mut(&mut self, id: ParticipantId) -> &mut Participant {
        &mut self.participants[id.0]
    }

    pub fn data(&self, id: DataId) -> &Data {
        &self.data[id.0]
    }

    pub fn mesh(&self, id: MeshId) -> &Mesh {
        &self.meshes[id.0]
    }

    pub fn mapping(&self, id: MappingId) -> &Mapping {
        &self.mappings[id.0]
    }

    pub fn exchange(&self, id: ExchangeId) -> &Exchange {
        &self.exchanges[id.0]
    }

    pub fn add_participant(&mut self, participant: Participant) -> ParticipantId {
        self.participants.push(participant);
        ParticipantId(self.participants.len() - 1)
    }

    pub fn add_data(&mut self, data: Data) -> DataId {
        self.data.push(data);
        DataId(self.data.len() - 1)
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshId {
        self.meshes.push(mesh);
        MeshId(self.meshes.len() - 1)
    }

    pub fn add_mapping(&mut self, mapping: Mapping) -> MappingId {
        self.mappings.push(mapping);
        MappingId(self.mappings.len() - 1)
    }

    pub fn add_exchange(&mut self, exchange: Exchange) -> ExchangeId {
        self.exchanges.push(exchange);
        ExchangeId(self.exchanges.len() - 1)
    }

    /// The patch names bound to the given mesh, in binding order.
    pub fn patches_of_mesh(&self, mesh: MeshId) -> Vec<&str> {
        self.patches
            .iter()
            .filter(|binding| binding.mesh == mesh)
            .map(|binding| binding.name.as_str())
            .collect()
    }
}
