// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Coupling planning: wiring exchanges into coupling schemes.
//!
//! Strong exchanges express a tight interaction. When a participant pair
//! exchanges strongly in *both* directions, the pair must iterate to
//! convergence inside one time window:
//!
//! * no bidirectional pair: every exchange is handled explicitly,
//! * exactly one bidirectional pair: a parallel-implicit scheme,
//! * two or more: a single multi scheme whose control participant is the one
//!   involved in the most bidirectional strong exchanges (ties go to the
//!   participant declared first in the topology).
//!
//! Any other exchange whose endpoints both sit inside the implicit/multi
//! scheme is absorbed into it; whatever remains gets one parallel-explicit
//! scheme per participant pair. The planner is total: every well-formed
//! graph yields some scheme, and an empty exchange list yields none.

use indexmap::{IndexMap, IndexSet};

use crate::consts::DEFAULT_CONVERGENCE_LIMIT;
use crate::graph::builder::PotentialCoupling;
use crate::graph::nodes::{
    Acceleration, CaseGraph, ConvergenceMeasure, CouplingScheme, DataAccess, ExchangeId, M2n,
    ParticipantId, SchemeId,
};
use crate::topology::ExchangeKind;

type Pair = (ParticipantId, ParticipantId);

fn pair_key(a: ParticipantId, b: ParticipantId) -> Pair {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Partition the exchanges into coupling schemes and synthesize M2N links.
pub fn plan_couplings(graph: &mut CaseGraph, potentials: Vec<PotentialCoupling>) {
    let (strong, mut weak): (Vec<_>, Vec<_>) = potentials
        .into_iter()
        .partition(|coupling| coupling.kind == ExchangeKind::Strong);
    tracing::debug!(
        "Found {} strong and {} weak exchanges.",
        strong.len(),
        weak.len()
    );

    let mut scheme_for_pair: IndexMap<Pair, SchemeId> = IndexMap::new();

    if !strong.is_empty() {
        create_strong_schemes(graph, strong, &mut weak, &mut scheme_for_pair);
    }
    if !weak.is_empty() {
        create_weak_schemes(graph, weak, &mut scheme_for_pair);
    }

    synthesize_m2ns(graph);
    tracing::debug!("Created {} M2N nodes.", graph.m2ns.len());
}

/// Handle strong exchanges; leftovers are pushed onto the weak list.
fn create_strong_schemes(
    graph: &mut CaseGraph,
    strong: Vec<PotentialCoupling>,
    weak: &mut Vec<PotentialCoupling>,
    scheme_for_pair: &mut IndexMap<Pair, SchemeId>,
) {
    // Pairs exchanging strongly in both directions.
    let mut bidirectional_pairs: IndexSet<Pair> = IndexSet::new();
    for coupling in &strong {
        for other in &strong {
            if coupling.from == other.to && coupling.to == other.from {
                bidirectional_pairs.insert(pair_key(coupling.from, coupling.to));
            }
        }
    }
    tracing::debug!(
        "There are {} participant pairs involved in bidirectional strong couplings.",
        bidirectional_pairs.len()
    );

    let (bidirectional, mut unidirectional): (Vec<_>, Vec<_>) = strong
        .into_iter()
        .partition(|coupling| bidirectional_pairs.contains(&pair_key(coupling.from, coupling.to)));

    if bidirectional_pairs.is_empty() {
        // No implicit scheme is required; the weak handling picks these up.
        tracing::debug!(
            "No bidirectional strong couplings found. Adding all strong couplings to weak couplings list."
        );
        weak.append(&mut unidirectional);
        return;
    }

    // Participants of the implicit/multi scheme, in declaration order.
    let mut members: Vec<ParticipantId> = Vec::new();
    for &(a, b) in &bidirectional_pairs {
        if !members.contains(&a) {
            members.push(a);
        }
        if !members.contains(&b) {
            members.push(b);
        }
    }
    members.sort();

    let scheme = if bidirectional_pairs.len() > 1 {
        let control = elect_control(&members, &bidirectional);
        tracing::debug!(
            "Created multi-coupling-scheme with control participant {}.",
            graph.participant(control).name
        );
        CouplingScheme::Multi {
            control,
            participants: members.clone(),
            exchanges: Vec::new(),
            acceleration: Acceleration::default(),
            convergence_measures: Vec::new(),
        }
    } else {
        let (first, second) = (members[0], members[1]);
        tracing::debug!(
            "Created implicit coupling-scheme between {} and {}.",
            graph.participant(first).name,
            graph.participant(second).name
        );
        CouplingScheme::ParallelImplicit {
            first,
            second,
            exchanges: Vec::new(),
            acceleration: Acceleration::default(),
            convergence_measures: Vec::new(),
        }
    };

    graph.schemes.push(scheme);
    let scheme_id = SchemeId(graph.schemes.len() - 1);
    for i in 0..members.len() {
        for j in (i + 1)..members.len() {
            scheme_for_pair.insert(pair_key(members[i], members[j]), scheme_id);
        }
    }

    for coupling in &bidirectional {
        attach_exchange(graph, scheme_id, coupling.exchange);
    }

    // Any other exchange fully inside the scheme's participant set is
    // absorbed rather than given a scheme of its own.
    unidirectional.retain(|coupling| {
        if members.contains(&coupling.from) && members.contains(&coupling.to) {
            attach_exchange(graph, scheme_id, coupling.exchange);
            false
        } else {
            true
        }
    });
    weak.retain(|coupling| {
        if members.contains(&coupling.from) && members.contains(&coupling.to) {
            attach_exchange(graph, scheme_id, coupling.exchange);
            false
        } else {
            true
        }
    });
    weak.append(&mut unidirectional);

    add_acceleration_and_convergence(graph, scheme_id);
}

/// The control participant is the one appearing most often in bidirectional
/// strong exchanges; ties go to the earliest-declared participant.
fn elect_control(members: &[ParticipantId], bidirectional: &[PotentialCoupling]) -> ParticipantId {
    let mut frequency: IndexMap<ParticipantId, usize> =
        members.iter().map(|&member| (member, 0)).collect();
    for coupling in bidirectional {
        *frequency.entry(coupling.from).or_insert(0) += 1;
        *frequency.entry(coupling.to).or_insert(0) += 1;
    }
    let mut best = members[0];
    for &member in members {
        if frequency[&member] > frequency[&best] {
            best = member;
        }
    }
    tracing::debug!(
        "Control participant determined with frequency {}.",
        frequency[&best]
    );
    best
}

fn attach_exchange(graph: &mut CaseGraph, scheme: SchemeId, exchange: ExchangeId) {
    graph.schemes[scheme.0].exchanges_mut().push(exchange);
    graph.exchanges[exchange.0].scheme = Some(scheme);
}

/// Add one IQN-ILS acceleration entry and one relative convergence measure
/// per exchanged (data, mesh) pair of the implicit/multi scheme.
fn add_acceleration_and_convergence(graph: &mut CaseGraph, scheme: SchemeId) {
    let entries: Vec<DataAccess> = graph.schemes[scheme.0]
        .exchanges()
        .iter()
        .map(|&exchange| {
            let exchange = graph.exchange(exchange);
            DataAccess {
                data: exchange.data,
                mesh: exchange.mesh,
            }
        })
        .collect();

    match &mut graph.schemes[scheme.0] {
        CouplingScheme::ParallelImplicit {
            acceleration,
            convergence_measures,
            ..
        }
        | CouplingScheme::Multi {
            acceleration,
            convergence_measures,
            ..
        } => {
            for entry in entries {
                acceleration.data.push(entry);
                convergence_measures.push(ConvergenceMeasure {
                    data: entry.data,
                    mesh: entry.mesh,
                    limit: DEFAULT_CONVERGENCE_LIMIT,
                });
            }
        }
        CouplingScheme::ParallelExplicit { .. } => {
            unreachable!("acceleration is only added to implicit and multi schemes")
        }
    }
}

/// Find or create one parallel-explicit scheme per participant pair.
fn create_weak_schemes(
    graph: &mut CaseGraph,
    weak: Vec<PotentialCoupling>,
    scheme_for_pair: &mut IndexMap<Pair, SchemeId>,
) {
    for coupling in weak {
        let key = pair_key(coupling.from, coupling.to);
        let scheme_id = match scheme_for_pair.get(&key) {
            Some(&existing) => existing,
            None => {
                graph.schemes.push(CouplingScheme::ParallelExplicit {
                    first: coupling.from,
                    second: coupling.to,
                    exchanges: Vec::new(),
                });
                let id = SchemeId(graph.schemes.len() - 1);
                scheme_for_pair.insert(key, id);
                tracing::debug!(
                    "Created coupling-scheme between {} and {}.",
                    graph.participant(coupling.from).name,
                    graph.participant(coupling.to).name
                );
                id
            }
        };
        attach_exchange(graph, scheme_id, coupling.exchange);
    }
}

/// Every participant pair coupled by a scheme gets exactly one M2N link;
/// duplicates across schemes are suppressed globally.
fn synthesize_m2ns(graph: &mut CaseGraph) {
    let mut seen: IndexSet<Pair> = IndexSet::new();
    let mut links: Vec<M2n> = Vec::new();

    for scheme in &graph.schemes {
        match scheme {
            CouplingScheme::ParallelExplicit { first, second, .. }
            | CouplingScheme::ParallelImplicit { first, second, .. } => {
                if seen.insert(pair_key(*first, *second)) {
                    links.push(M2n {
                        acceptor: *first,
                        connector: *second,
                    });
                }
            }
            CouplingScheme::Multi {
                control,
                participants,
                exchanges,
                ..
            } => {
                // One link per communicating pair, plus control-to-member.
                for &exchange in exchanges {
                    let exchange = graph.exchange(exchange);
                    if seen.insert(pair_key(exchange.from_participant, exchange.to_participant)) {
                        links.push(M2n {
                            acceptor: exchange.from_participant,
                            connector: exchange.to_participant,
                        });
                    }
                }
                for &participant in participants {
                    if participant != *control && seen.insert(pair_key(*control, participant)) {
                        links.push(M2n {
                            acceptor: *control,
                            connector: participant,
                        });
                    }
                }
            }
        }
    }

    graph.m2ns = links;
}
