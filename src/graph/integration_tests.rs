// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! End-to-end tests over the in-memory pipeline: preprocessing, graph
//! building and coupling planning, without touching the filesystem.

use proptest::prelude::*;

use crate::graph::{
    build_graph, plan_couplings, CaseGraph, CouplingScheme, MappingConstraint, MappingDirection,
};
use crate::observability::Diagnostics;
use crate::topology::{
    preprocess_patches, DataKindDecl, ExchangeDecl, ExchangeKind, ParticipantDecl, Topology,
    UniquifierPool,
};

fn participant(name: &str) -> ParticipantDecl {
    ParticipantDecl {
        name: name.to_string(),
        solver: "solver".to_string(),
        dimensionality: None,
    }
}

fn exchange(from: &str, to: &str, data: &str, kind: ExchangeKind) -> ExchangeDecl {
    ExchangeDecl {
        from: from.to_string(),
        to: to.to_string(),
        from_patch: format!("{}-patch", from.to_lowercase()),
        to_patch: format!("{}-patch", to.to_lowercase()),
        data: data.to_string(),
        kind,
        data_type: None,
    }
}

fn run_pipeline(mut topology: Topology) -> (CaseGraph, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let mut pool = UniquifierPool::new();
    let pair_patches = preprocess_patches(&mut topology, &mut diagnostics);
    let (mut graph, potentials) =
        build_graph(&topology, &pair_patches, &mut pool, &mut diagnostics).unwrap();
    plan_couplings(&mut graph, potentials);
    (graph, diagnostics)
}

#[test]
fn single_weak_exchange_yields_one_explicit_scheme() {
    let (graph, _) = run_pipeline(Topology {
        participants: vec![participant("Fluid"), participant("Solid")],
        exchanges: vec![exchange("Fluid", "Solid", "Pressure", ExchangeKind::Weak)],
    });

    assert_eq!(graph.schemes.len(), 1);
    assert!(matches!(
        graph.schemes[0],
        CouplingScheme::ParallelExplicit { .. }
    ));

    // Pressure is intensive: Solid carries a read-consistent mapping.
    assert_eq!(graph.mappings.len(), 1);
    let mapping = &graph.mappings[0];
    assert_eq!(mapping.direction, MappingDirection::Read);
    assert_eq!(mapping.constraint, MappingConstraint::Consistent);
    assert_eq!(graph.participant(mapping.parent).name, "Solid");

    assert!(graph.meshes.iter().any(|mesh| mesh.name == "Fluid-Mesh"));
    assert_eq!(graph.m2ns.len(), 1);
}

#[test]
fn bidirectional_strong_fsi_yields_one_implicit_scheme() {
    let (graph, _) = run_pipeline(Topology {
        participants: vec![participant("Fluid"), participant("Solid")],
        exchanges: vec![
            exchange("Fluid", "Solid", "Force", ExchangeKind::Strong),
            exchange("Solid", "Fluid", "Displacement", ExchangeKind::Strong),
        ],
    });

    assert_eq!(graph.schemes.len(), 1);
    match &graph.schemes[0] {
        CouplingScheme::ParallelImplicit {
            exchanges,
            acceleration,
            convergence_measures,
            ..
        } => {
            assert_eq!(exchanges.len(), 2);
            assert_eq!(acceleration.data.len(), 2);
            assert_eq!(convergence_measures.len(), 2);
        }
        other => panic!("expected a parallel-implicit scheme, got {other:?}"),
    }
    assert_eq!(graph.m2ns.len(), 1);
}

#[test]
fn two_bidirectional_pairs_yield_a_multi_scheme_with_elected_control() {
    let (graph, _) = run_pipeline(Topology {
        participants: vec![participant("A"), participant("B"), participant("C")],
        exchanges: vec![
            exchange("A", "B", "Force", ExchangeKind::Strong),
            exchange("B", "A", "Displacement", ExchangeKind::Strong),
            exchange("B", "C", "Pressure", ExchangeKind::Strong),
            exchange("C", "B", "Temperature", ExchangeKind::Strong),
        ],
    });

    assert_eq!(graph.schemes.len(), 1);
    match &graph.schemes[0] {
        CouplingScheme::Multi {
            control,
            participants,
            exchanges,
            ..
        } => {
            // B appears in both bidirectional pairs.
            assert_eq!(graph.participant(*control).name, "B");
            assert_eq!(participants.len(), 3);
            assert_eq!(exchanges.len(), 4);
        }
        other => panic!("expected a multi scheme, got {other:?}"),
    }
    // One M2N for {A,B}, one for {B,C}; the control adds nothing new.
    assert_eq!(graph.m2ns.len(), 2);
}

#[test]
fn strong_exchanges_without_a_bidirectional_pair_become_explicit() {
    let (graph, _) = run_pipeline(Topology {
        participants: vec![participant("A"), participant("B"), participant("C")],
        exchanges: vec![
            exchange("A", "B", "Pressure", ExchangeKind::Strong),
            exchange("B", "C", "Velocity", ExchangeKind::Strong),
        ],
    });

    assert_eq!(graph.schemes.len(), 2);
    assert!(graph
        .schemes
        .iter()
        .all(|scheme| matches!(scheme, CouplingScheme::ParallelExplicit { .. })));
}

#[test]
fn weak_exchange_inside_the_implicit_pair_is_absorbed() {
    let (graph, _) = run_pipeline(Topology {
        participants: vec![participant("Fluid"), participant("Solid")],
        exchanges: vec![
            exchange("Fluid", "Solid", "Force", ExchangeKind::Strong),
            exchange("Solid", "Fluid", "Displacement", ExchangeKind::Strong),
            exchange("Fluid", "Solid", "Temperature", ExchangeKind::Weak),
        ],
    });

    // The weak temperature exchange joins the implicit scheme instead of
    // founding an explicit one.
    assert_eq!(graph.schemes.len(), 1);
    assert_eq!(graph.schemes[0].exchanges().len(), 3);
    assert_eq!(graph.m2ns.len(), 1);
}

#[test]
fn patch_shared_by_both_kinds_is_split_onto_two_meshes() {
    let (graph, diagnostics) = run_pipeline(Topology {
        participants: vec![participant("X"), participant("Y")],
        exchanges: vec![
            ExchangeDecl {
                from_patch: "interface".to_string(),
                ..exchange("X", "Y", "Force", ExchangeKind::Weak)
            },
            ExchangeDecl {
                from_patch: "interface".to_string(),
                ..exchange("X", "Y", "Temperature", ExchangeKind::Weak)
            },
        ],
    });

    let x_patches: Vec<_> = graph
        .patches
        .iter()
        .filter(|binding| graph.participant(binding.participant).name == "X")
        .collect();
    assert_eq!(x_patches.len(), 2);
    let names: Vec<_> = x_patches.iter().map(|binding| binding.name.as_str()).collect();
    assert!(names.contains(&"interface-extensive"));
    assert!(names.contains(&"interface-intensive"));
    // The two halves live on distinct meshes of X.
    assert_ne!(x_patches[0].mesh, x_patches[1].mesh);
    assert!(diagnostics.warning_count() >= 1);
}

#[test]
fn data_reused_in_both_directions_is_uniquified() {
    let (graph, diagnostics) = run_pipeline(Topology {
        participants: vec![participant("A"), participant("B")],
        exchanges: vec![
            exchange("A", "B", "Heat", ExchangeKind::Weak),
            exchange("B", "A", "Heat", ExchangeKind::Weak),
        ],
    });

    let names: Vec<_> = graph.data.iter().map(|data| data.name.as_str()).collect();
    assert_eq!(names, vec!["Heat", "Magnificent-Heat"]);
    assert!(diagnostics.warning_count() >= 1);
}

#[test]
fn conflicting_data_types_collapse_to_vector() {
    let (graph, diagnostics) = run_pipeline(Topology {
        participants: vec![participant("A"), participant("B"), participant("C")],
        exchanges: vec![
            ExchangeDecl {
                data_type: Some(DataKindDecl::Scalar),
                ..exchange("A", "B", "Flux", ExchangeKind::Weak)
            },
            ExchangeDecl {
                data_type: Some(DataKindDecl::Vector),
                ..exchange("C", "B", "Flux", ExchangeKind::Weak)
            },
        ],
    });

    assert_eq!(graph.data.len(), 1);
    assert_eq!(graph.data[0].kind, crate::graph::DataKind::Vector);
    assert!(diagnostics.warning_count() >= 1);
}

#[test]
fn empty_topology_yields_no_schemes_and_no_m2ns() {
    let (graph, _) = run_pipeline(Topology {
        participants: vec![participant("Fluid")],
        exchanges: vec![],
    });
    assert!(graph.schemes.is_empty());
    assert!(graph.m2ns.is_empty());
    assert!(graph.meshes.is_empty());
}

// Generator for structurally valid random topologies over three participants.
fn arbitrary_topology() -> impl Strategy<Value = Topology> {
    let names = ["Alpha", "Beta", "Gamma"];
    let data_names = ["Force", "Pressure", "Heat"];
    let raw_exchange = (0usize..3, 0usize..3, 0usize..3, any::<bool>(), any::<bool>());
    proptest::collection::vec(raw_exchange, 0..8).prop_map(move |raw| {
        let mut exchanges: Vec<ExchangeDecl> = Vec::new();
        let mut seen: Vec<(usize, usize, usize, bool)> = Vec::new();
        for (from, to_offset, data, strong, vector) in raw {
            // Never self-couple, never duplicate (from, to, data, data-type).
            let to = (from + 1 + to_offset % 2) % 3;
            let key = (from, to, data, vector);
            if seen.contains(&key) {
                continue;
            }
            seen.push(key);
            exchanges.push(ExchangeDecl {
                from: names[from].to_string(),
                to: names[to].to_string(),
                from_patch: format!("{}-patch", names[from].to_lowercase()),
                to_patch: format!("{}-patch", names[to].to_lowercase()),
                data: data_names[data].to_string(),
                kind: if strong {
                    ExchangeKind::Strong
                } else {
                    ExchangeKind::Weak
                },
                data_type: Some(if vector {
                    DataKindDecl::Vector
                } else {
                    DataKindDecl::Scalar
                }),
            });
        }
        Topology {
            participants: names.iter().map(|name| participant(name)).collect(),
            exchanges,
        }
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_mesh_has_exactly_one_provider(topology in arbitrary_topology()) {
        let (graph, _) = run_pipeline(topology);
        for (index, mesh) in graph.meshes.iter().enumerate() {
            let providers = graph
                .participants
                .iter()
                .filter(|participant| {
                    participant
                        .provide_meshes
                        .iter()
                        .any(|provided| provided.0 == index)
                })
                .count();
            prop_assert_eq!(providers, 1);
            prop_assert!(graph
                .participant(mesh.provided_by)
                .provide_meshes
                .iter()
                .any(|provided| provided.0 == index));
        }
    }

    #[test]
    fn exchanged_data_is_written_and_read_by_the_endpoints(topology in arbitrary_topology()) {
        let (graph, _) = run_pipeline(topology);
        for exchange in &graph.exchanges {
            let writer = graph.participant(exchange.from_participant);
            prop_assert!(writer.write_data.iter().any(|entry| entry.data == exchange.data));
            let reader = graph.participant(exchange.to_participant);
            prop_assert!(reader.read_data.iter().any(|entry| entry.data == exchange.data));
            prop_assert!(graph.mesh(exchange.mesh).use_data.contains(&exchange.data));
        }
    }

    #[test]
    fn mappings_imply_matching_receive_meshes(topology in arbitrary_topology()) {
        let (graph, _) = run_pipeline(topology);
        for mapping in &graph.mappings {
            let owner = graph.participant(mapping.parent);
            let received = match mapping.direction {
                MappingDirection::Write => mapping.to_mesh,
                MappingDirection::Read => mapping.from_mesh,
            };
            let entry = owner
                .receive_meshes
                .iter()
                .find(|receive| receive.mesh == received);
            prop_assert!(entry.is_some());
            prop_assert_eq!(
                entry.unwrap().from_participant,
                graph.mesh(received).provided_by
            );
        }
    }

    #[test]
    fn no_participant_writes_and_reads_the_same_data(topology in arbitrary_topology()) {
        let (graph, _) = run_pipeline(topology);
        for participant in &graph.participants {
            for write in &participant.write_data {
                prop_assert!(
                    !participant.read_data.iter().any(|read| read.data == write.data)
                );
            }
        }
    }

    #[test]
    fn every_exchanged_pair_has_exactly_one_m2n(topology in arbitrary_topology()) {
        let (graph, _) = run_pipeline(topology);
        let mut m2n_pairs: Vec<(usize, usize)> = Vec::new();
        for m2n in &graph.m2ns {
            let pair = (
                m2n.acceptor.0.min(m2n.connector.0),
                m2n.acceptor.0.max(m2n.connector.0),
            );
            prop_assert!(!m2n_pairs.contains(&pair), "duplicate M2N for pair {pair:?}");
            m2n_pairs.push(pair);
        }
        for scheme in &graph.schemes {
            for &exchange in scheme.exchanges() {
                let exchange = graph.exchange(exchange);
                let pair = (
                    exchange.from_participant.0.min(exchange.to_participant.0),
                    exchange.from_participant.0.max(exchange.to_participant.0),
                );
                prop_assert!(m2n_pairs.contains(&pair));
            }
        }
    }

    #[test]
    fn bidirectional_strong_count_decides_the_scheme_shape(topology in arbitrary_topology()) {
        let strong_directed: Vec<(String, String)> = topology
            .exchanges
            .iter()
            .filter(|exchange| exchange.kind == ExchangeKind::Strong)
            .map(|exchange| (exchange.from.clone(), exchange.to.clone()))
            .collect();
        let mut bidirectional_pairs: Vec<(String, String)> = Vec::new();
        for (from, to) in &strong_directed {
            if strong_directed.contains(&(to.clone(), from.clone())) {
                let pair = if from < to {
                    (from.clone(), to.clone())
                } else {
                    (to.clone(), from.clone())
                };
                if !bidirectional_pairs.contains(&pair) {
                    bidirectional_pairs.push(pair);
                }
            }
        }

        let (graph, _) = run_pipeline(topology);
        let implicit = graph
            .schemes
            .iter()
            .filter(|scheme| matches!(scheme, CouplingScheme::ParallelImplicit { .. }))
            .count();
        let multi = graph
            .schemes
            .iter()
            .filter(|scheme| matches!(scheme, CouplingScheme::Multi { .. }))
            .count();

        match bidirectional_pairs.len() {
            0 => {
                prop_assert_eq!(implicit, 0);
                prop_assert_eq!(multi, 0);
            }
            1 => {
                prop_assert_eq!(implicit, 1);
                prop_assert_eq!(multi, 0);
            }
            _ => {
                prop_assert_eq!(implicit, 0);
                prop_assert_eq!(multi, 1);
            }
        }
    }
}
