// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Graph building: from preprocessed topology to typed nodes.
//!
//! The builder materializes participants, data, meshes, patch bindings,
//! mappings, receive-meshes, read/write-data entries and exchanges, walking
//! the topology strictly in document order so the resulting graph is
//! identical across runs.
//!
//! The subtle parts all live in data creation:
//!
//! * A data name reused by the *reverse* participant pair is renamed with the
//!   next adjective from the uniquifier pool; otherwise one participant would
//!   both write and read the same data, which preCICE rejects.
//! * A data name declared scalar in one exchange and vector in another is
//!   escalated to vector for all of them.
//!
//! Mesh construction hangs one mesh per ordered participant pair and label
//! off the pair-patch map. A pair exchanging both extensive and intensive
//! data gets two meshes; the `-<Peer>-` infix appears only when the provider
//! communicates with more than one peer.

use indexmap::IndexMap;
use std::collections::HashMap;

use crate::consts::DEFAULT_PARTICIPANT_DIMENSIONALITY;
use crate::errors::TopologyError;
use crate::graph::nodes::{
    CaseGraph, Data, DataAccess, DataId, DataKind, Exchange, ExchangeId, Mapping,
    MappingConstraint, MappingDirection, Mesh, MeshId, Participant, ParticipantId, PatchBinding,
    PatchLabel, ReceiveMesh,
};
use crate::observability::messages::{DataTypeEscalated, DataUniquified, DimensionalityClamped};
use crate::observability::Diagnostics;
use crate::topology::{data_label, DataKindDecl, ExchangeKind, PairPatchMap, Topology, UniquifierPool};

/// An exchange with the endpoint and strength information the planner needs.
#[derive(Debug, Clone, Copy)]
pub struct PotentialCoupling {
    pub exchange: ExchangeId,
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub kind: ExchangeKind,
}

/// Capitalize the first letter only, leaving the rest untouched. This allows
/// all-caps participant names like "SU2" to survive mesh naming.
fn capitalize_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Build the configuration graph from the preprocessed topology.
///
/// Returns the graph (without coupling schemes and M2Ns, which the planner
/// adds) plus one [`PotentialCoupling`] per topology exchange.
pub fn build_graph(
    topology: &Topology,
    pair_patches: &PairPatchMap,
    pool: &mut UniquifierPool,
    diagnostics: &mut Diagnostics,
) -> Result<(CaseGraph, Vec<PotentialCoupling>), TopologyError> {
    let mut graph = CaseGraph::default();

    let participant_ids = initialize_participants(topology, &mut graph, diagnostics);
    tracing::debug!("Created {} participant nodes.", graph.participants.len());

    let exchange_data =
        initialize_data(topology, &mut graph, &participant_ids, pool, diagnostics)?;
    tracing::debug!("Created {} data nodes.", graph.data.len());

    let mesh_map = initialize_meshes_and_patches(&mut graph, pair_patches, &participant_ids);
    tracing::debug!("Created {} mesh nodes.", graph.meshes.len());

    let mapping_map = initialize_mappings(
        topology,
        &mut graph,
        &participant_ids,
        &mesh_map,
        &exchange_data,
    );
    tracing::debug!("Created {} mapping nodes.", graph.mappings.len());

    raise_mapped_mesh_dimensions(&mut graph);

    let potentials = initialize_exchanges(
        topology,
        &mut graph,
        &participant_ids,
        &mesh_map,
        &mapping_map,
        &exchange_data,
    );
    tracing::debug!("Created {} exchange nodes.", graph.exchanges.len());

    Ok((graph, potentials))
}

fn initialize_participants(
    topology: &Topology,
    graph: &mut CaseGraph,
    diagnostics: &mut Diagnostics,
) -> IndexMap<String, ParticipantId> {
    let mut participant_ids = IndexMap::new();
    for declaration in &topology.participants {
        let dimensionality = match declaration.dimensionality {
            None => DEFAULT_PARTICIPANT_DIMENSIONALITY,
            Some(dimensionality) if (2..=3).contains(&dimensionality) => dimensionality as u8,
            Some(declared) => {
                diagnostics.warn(DimensionalityClamped {
                    participant: &declaration.name,
                    declared,
                    fallback: DEFAULT_PARTICIPANT_DIMENSIONALITY,
                });
                DEFAULT_PARTICIPANT_DIMENSIONALITY
            }
        };
        let id = graph.add_participant(Participant {
            name: declaration.name.clone(),
            solver: declaration.solver.clone(),
            dimensionality,
            provide_meshes: Vec::new(),
            receive_meshes: Vec::new(),
            write_data: Vec::new(),
            read_data: Vec::new(),
            mappings: Vec::new(),
        });
        participant_ids.insert(declaration.name.clone(), id);
        tracing::debug!(
            "Initialized participant {} with dimensionality {dimensionality}.",
            declaration.name
        );
    }
    participant_ids
}

/// Create data nodes, one entry in the returned vector per topology exchange.
fn initialize_data(
    topology: &Topology,
    graph: &mut CaseGraph,
    participant_ids: &IndexMap<String, ParticipantId>,
    pool: &mut UniquifierPool,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<DataId>, TopologyError> {
    let mut exchange_data = Vec::with_capacity(topology.exchanges.len());
    let mut data_by_name: IndexMap<String, DataId> = IndexMap::new();
    let mut pair_data: HashMap<(ParticipantId, ParticipantId), Vec<DataId>> = HashMap::new();

    for exchange in &topology.exchanges {
        let from = participant_ids[&exchange.from];
        let to = participant_ids[&exchange.to];
        let kind = match exchange.data_type {
            Some(DataKindDecl::Vector) => DataKind::Vector,
            Some(DataKindDecl::Scalar) | None => DataKind::Scalar,
        };

        let data_id = match data_by_name.get(&exchange.data).copied() {
            Some(existing) => {
                let exchanged_in_reverse = pair_data
                    .get(&(to, from))
                    .is_some_and(|data| data.contains(&existing));
                if exchanged_in_reverse {
                    // The reverse direction already carries this name; rename
                    // this direction so no participant reads and writes the
                    // same data.
                    let adjective = pool
                        .take()
                        .ok_or_else(|| TopologyError::UniquifierPoolExhausted(exchange.data.clone()))?;
                    let new_name = format!(
                        "{}-{}",
                        capitalize_first(adjective),
                        capitalize_first(&exchange.data)
                    );
                    diagnostics.warn(DataUniquified {
                        data: &exchange.data,
                        from_participant: &exchange.from,
                        to_participant: &exchange.to,
                        new_name: &new_name,
                    });
                    let id = graph.add_data(Data {
                        name: new_name.clone(),
                        kind,
                    });
                    data_by_name.insert(new_name, id);
                    id
                } else {
                    if kind != graph.data(existing).kind {
                        // One scalar, one vector: vector wins for everyone.
                        diagnostics.warn(DataTypeEscalated {
                            data: &exchange.data,
                        });
                        graph.data[existing.0].kind = DataKind::Vector;
                    }
                    existing
                }
            }
            None => {
                let id = graph.add_data(Data {
                    name: capitalize_first(&exchange.data),
                    kind,
                });
                data_by_name.insert(exchange.data.clone(), id);
                tracing::debug!(
                    "Created new data node {} for data {} between participants {} and {}.",
                    graph.data(id).name,
                    exchange.data,
                    exchange.from,
                    exchange.to
                );
                id
            }
        };

        pair_data.entry((from, to)).or_default().push(data_id);
        exchange_data.push(data_id);
    }

    Ok(exchange_data)
}

/// Create meshes per ordered participant pair and label, binding patches to
/// the mesh that carries them.
fn initialize_meshes_and_patches(
    graph: &mut CaseGraph,
    pair_patches: &PairPatchMap,
    participant_ids: &IndexMap<String, ParticipantId>,
) -> IndexMap<(ParticipantId, ParticipantId, PatchLabel), MeshId> {
    // How many peers each participant talks to decides mesh naming.
    let mut peer_count: IndexMap<ParticipantId, usize> = IndexMap::new();
    for (from_name, _) in pair_patches.keys() {
        *peer_count.entry(participant_ids[from_name]).or_insert(0) += 1;
    }

    let mut mesh_map = IndexMap::new();
    for ((from_name, to_name), sets) in pair_patches {
        let from = participant_ids[from_name];
        let to = participant_ids[to_name];
        let dimensions = graph.participant(from).dimensionality;

        let base_name = if peer_count[&from] > 1 {
            format!(
                "{}-{}",
                capitalize_first(from_name),
                capitalize_first(to_name)
            )
        } else {
            capitalize_first(from_name)
        };

        let has_extensive = !sets.extensive.is_empty();
        let has_intensive = !sets.intensive.is_empty();

        if has_extensive && has_intensive {
            for label in [PatchLabel::Extensive, PatchLabel::Intensive] {
                let infix = match label {
                    PatchLabel::Extensive => "Extensive",
                    PatchLabel::Intensive => "Intensive",
                };
                let mesh = graph.add_mesh(Mesh {
                    name: format!("{base_name}-{infix}-Mesh"),
                    dimensions,
                    use_data: Vec::new(),
                    provided_by: from,
                });
                graph.participant_mut(from).provide_meshes.push(mesh);
                mesh_map.insert((from, to, label), mesh);
                bind_patches(graph, sets.for_label(label), from, mesh, label);
            }
            tracing::debug!(
                "Created extensive and intensive mesh for communication between {from_name} and {to_name}."
            );
        } else if has_extensive || has_intensive {
            let label = if has_extensive {
                PatchLabel::Extensive
            } else {
                PatchLabel::Intensive
            };
            let mesh = graph.add_mesh(Mesh {
                name: format!("{base_name}-Mesh"),
                dimensions,
                use_data: Vec::new(),
                provided_by: from,
            });
            graph.participant_mut(from).provide_meshes.push(mesh);
            mesh_map.insert((from, to, label), mesh);
            bind_patches(graph, sets.for_label(label), from, mesh, label);
            tracing::debug!(
                "Created mesh for communication between {from_name} and {to_name}."
            );
        }
    }

    mesh_map
}

fn bind_patches(
    graph: &mut CaseGraph,
    patches: &indexmap::IndexSet<String>,
    participant: ParticipantId,
    mesh: MeshId,
    label: PatchLabel,
) {
    for patch in patches {
        graph.patches.push(PatchBinding {
            name: patch.clone(),
            participant,
            mesh,
            label,
        });
    }
}

/// Create mappings, receive-meshes and read/write-data entries per exchange.
fn initialize_mappings(
    topology: &Topology,
    graph: &mut CaseGraph,
    participant_ids: &IndexMap<String, ParticipantId>,
    mesh_map: &IndexMap<(ParticipantId, ParticipantId, PatchLabel), MeshId>,
    exchange_data: &[DataId],
) -> IndexMap<(MeshId, MeshId), crate::graph::nodes::MappingId> {
    let mut mapping_map = IndexMap::new();

    for (index, exchange) in topology.exchanges.iter().enumerate() {
        let from = participant_ids[&exchange.from];
        let to = participant_ids[&exchange.to];
        let data = exchange_data[index];
        let label = data_label(&graph.data(data).name);

        let from_mesh = mesh_map[&(from, to, label)];
        let to_mesh = mesh_map[&(to, from, label)];

        if !graph.mesh(from_mesh).use_data.contains(&data) {
            graph.meshes[from_mesh.0].use_data.push(data);
        }
        if !graph.mesh(to_mesh).use_data.contains(&data) {
            graph.meshes[to_mesh.0].use_data.push(data);
        }

        if !mapping_map.contains_key(&(from_mesh, to_mesh)) {
            let mapping_id = match label {
                // Extensive data is transported conservatively: the writer
                // maps onto the receiver's mesh, so it must receive it.
                PatchLabel::Extensive => {
                    let id = graph.add_mapping(Mapping {
                        parent: from,
                        direction: MappingDirection::Write,
                        from_mesh,
                        to_mesh,
                        constraint: MappingConstraint::Conservative,
                    });
                    graph.participant_mut(from).mappings.push(id);
                    graph.participant_mut(from).receive_meshes.push(ReceiveMesh {
                        mesh: to_mesh,
                        from_participant: to,
                    });
                    id
                }
                // Intensive data is transported consistently: the reader maps
                // from the sender's mesh, so it must receive it.
                PatchLabel::Intensive => {
                    let id = graph.add_mapping(Mapping {
                        parent: to,
                        direction: MappingDirection::Read,
                        from_mesh,
                        to_mesh,
                        constraint: MappingConstraint::Consistent,
                    });
                    graph.participant_mut(to).mappings.push(id);
                    graph.participant_mut(to).receive_meshes.push(ReceiveMesh {
                        mesh: from_mesh,
                        from_participant: from,
                    });
                    id
                }
            };
            mapping_map.insert((from_mesh, to_mesh), mapping_id);
            tracing::debug!(
                "Created {}-mapping between {} and {}.",
                graph.mapping(mapping_id).direction.as_str(),
                graph.mesh(from_mesh).name,
                graph.mesh(to_mesh).name
            );
        }

        let write_entry = DataAccess {
            data,
            mesh: from_mesh,
        };
        if !graph.participant(from).write_data.contains(&write_entry) {
            graph.participant_mut(from).write_data.push(write_entry);
        }
        let read_entry = DataAccess {
            data,
            mesh: to_mesh,
        };
        if !graph.participant(to).read_data.contains(&read_entry) {
            graph.participant_mut(to).read_data.push(read_entry);
        }
    }

    mapping_map
}

/// Meshes connected by a mapping must agree on dimensionality; the lower one
/// is raised to the higher.
fn raise_mapped_mesh_dimensions(graph: &mut CaseGraph) {
    for index in 0..graph.mappings.len() {
        let (from_mesh, to_mesh) = {
            let mapping = &graph.mappings[index];
            (mapping.from_mesh, mapping.to_mesh)
        };
        let raised = graph
            .mesh(from_mesh)
            .dimensions
            .max(graph.mesh(to_mesh).dimensions);
        graph.meshes[from_mesh.0].dimensions = raised;
        graph.meshes[to_mesh.0].dimensions = raised;
    }
}

/// Create exchange nodes. The transported mesh depends on the governing
/// mapping: write mappings exchange the to-mesh, read mappings the from-mesh.
fn initialize_exchanges(
    topology: &Topology,
    graph: &mut CaseGraph,
    participant_ids: &IndexMap<String, ParticipantId>,
    mesh_map: &IndexMap<(ParticipantId, ParticipantId, PatchLabel), MeshId>,
    mapping_map: &IndexMap<(MeshId, MeshId), crate::graph::nodes::MappingId>,
    exchange_data: &[DataId],
) -> Vec<PotentialCoupling> {
    let mut potentials = Vec::with_capacity(topology.exchanges.len());

    for (index, exchange) in topology.exchanges.iter().enumerate() {
        let from = participant_ids[&exchange.from];
        let to = participant_ids[&exchange.to];
        let data = exchange_data[index];
        let label = data_label(&graph.data(data).name);

        let from_mesh = mesh_map[&(from, to, label)];
        let to_mesh = mesh_map[&(to, from, label)];
        let mapping = graph.mapping(mapping_map[&(from_mesh, to_mesh)]);

        let mesh = match mapping.direction {
            MappingDirection::Write => to_mesh,
            MappingDirection::Read => from_mesh,
        };
        let id = graph.add_exchange(Exchange {
            data,
            mesh,
            from_participant: from,
            to_participant: to,
            scheme: None,
        });
        tracing::debug!(
            "Created exchange from {} to {} for data {} on mesh {}.",
            exchange.from,
            exchange.to,
            graph.data(data).name,
            graph.mesh(mesh).name
        );

        potentials.push(PotentialCoupling {
            exchange: id,
            from,
            to,
            kind: exchange.kind,
        });
    }

    potentials
}
