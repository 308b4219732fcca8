// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Patch preprocessing.
//!
//! A single mesh cannot carry both extensive and intensive data, but a single
//! boundary patch may well be named in exchanges of both kinds. This stage
//! reconciles the two views:
//!
//! 1. Label every exchange's data as extensive or intensive by matching the
//!    lowercased data name against two fixed vocabularies; unknown names
//!    default to intensive with a warning.
//! 2. Split every `(participant, patch)` that collected both labels into
//!    `<patch>-extensive` / `<patch>-intensive`, rewriting the affected
//!    exchanges in place.
//! 3. Produce the symmetric pair-patch map `(p1, p2) -> {extensive patches,
//!    intensive patches}` recording which patches of `p1` face `p2` under
//!    each label. Mesh construction later hangs one mesh per non-empty label
//!    off every ordered pair.

use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;

use crate::consts::{EXTENSIVE_DATA, INTENSIVE_DATA};
use crate::graph::PatchLabel;
use crate::observability::messages::{DataDefaultedIntensive, PatchSplit};
use crate::observability::Diagnostics;
use crate::topology::Topology;

/// Patches one participant uses towards one peer, bucketed by label.
#[derive(Debug, Clone, Default)]
pub struct PatchSets {
    pub extensive: IndexSet<String>,
    pub intensive: IndexSet<String>,
}

impl PatchSets {
    pub fn for_label(&self, label: PatchLabel) -> &IndexSet<String> {
        match label {
            PatchLabel::Extensive => &self.extensive,
            PatchLabel::Intensive => &self.intensive,
        }
    }

    fn for_label_mut(&mut self, label: PatchLabel) -> &mut IndexSet<String> {
        match label {
            PatchLabel::Extensive => &mut self.extensive,
            PatchLabel::Intensive => &mut self.intensive,
        }
    }
}

/// Symmetric map from ordered participant pairs to the patch sets the first
/// participant uses when communicating with the second.
pub type PairPatchMap = IndexMap<(String, String), PatchSets>;

/// Match a data name against the extensive/intensive vocabularies.
///
/// Returns `None` when the name matches neither; callers decide how loudly to
/// fall back to intensive.
pub fn classify_data(data_name: &str) -> Option<PatchLabel> {
    let lowered = data_name.to_lowercase();
    if EXTENSIVE_DATA.iter().any(|keyword| lowered.contains(keyword)) {
        Some(PatchLabel::Extensive)
    } else if INTENSIVE_DATA.iter().any(|keyword| lowered.contains(keyword)) {
        Some(PatchLabel::Intensive)
    } else {
        None
    }
}

/// The label of a data name, defaulting silently to intensive.
pub fn data_label(data_name: &str) -> PatchLabel {
    classify_data(data_name).unwrap_or(PatchLabel::Intensive)
}

fn label_for_exchange(data_name: &str, diagnostics: &mut Diagnostics) -> PatchLabel {
    match classify_data(data_name) {
        Some(label) => label,
        None => {
            diagnostics.warn(DataDefaultedIntensive { data: data_name });
            PatchLabel::Intensive
        }
    }
}

/// Label patches, split dual-use ones and build the pair-patch map.
///
/// Rewrites the topology's exchanges in place where patches were split, so
/// anything keyed on patch names must run after this.
pub fn preprocess_patches(topology: &mut Topology, diagnostics: &mut Diagnostics) -> PairPatchMap {
    // Which labels land on each (participant, patch).
    let mut labels: IndexMap<(String, String), HashSet<PatchLabel>> = IndexMap::new();
    for exchange in &topology.exchanges {
        let label = label_for_exchange(&exchange.data, diagnostics);
        labels
            .entry((exchange.from.clone(), exchange.from_patch.clone()))
            .or_default()
            .insert(label);
        labels
            .entry((exchange.to.clone(), exchange.to_patch.clone()))
            .or_default()
            .insert(label);
    }

    // Split dual-use patches. The rename map is keyed by the original patch
    // name; exchanges still carrying that name pick up their half here.
    let mut renamed: IndexMap<(String, String), (String, String)> = IndexMap::new();
    for exchange in &mut topology.exchanges {
        let label = data_label(&exchange.data);
        rewrite_patch(
            &exchange.from,
            &mut exchange.from_patch,
            label,
            &labels,
            &mut renamed,
            diagnostics,
        );
        rewrite_patch(
            &exchange.to,
            &mut exchange.to_patch,
            label,
            &labels,
            &mut renamed,
            diagnostics,
        );
    }

    // The symmetric pair map: for (p1, p2), the patches p1 uses towards p2.
    let mut pairs: PairPatchMap = IndexMap::new();
    for exchange in &topology.exchanges {
        let label = data_label(&exchange.data);
        let forward = (exchange.from.clone(), exchange.to.clone());
        let backward = (exchange.to.clone(), exchange.from.clone());
        if !pairs.contains_key(&forward) {
            pairs.insert(forward.clone(), PatchSets::default());
            pairs.insert(backward.clone(), PatchSets::default());
        }
        if let Some(sets) = pairs.get_mut(&forward) {
            sets.for_label_mut(label).insert(exchange.from_patch.clone());
        }
        if let Some(sets) = pairs.get_mut(&backward) {
            sets.for_label_mut(label).insert(exchange.to_patch.clone());
        }
    }

    pairs
}

fn rewrite_patch(
    participant: &str,
    patch: &mut String,
    label: PatchLabel,
    labels: &IndexMap<(String, String), HashSet<PatchLabel>>,
    renamed: &mut IndexMap<(String, String), (String, String)>,
    diagnostics: &mut Diagnostics,
) {
    let key = (participant.to_string(), patch.clone());
    if let Some((extensive, intensive)) = renamed.get(&key) {
        *patch = match label {
            PatchLabel::Extensive => extensive.clone(),
            PatchLabel::Intensive => intensive.clone(),
        };
    } else if labels.get(&key).is_some_and(|set| set.len() > 1) {
        let extensive = format!("{patch}-extensive");
        let intensive = format!("{patch}-intensive");
        diagnostics.warn(PatchSplit {
            participant,
            patch,
            extensive_patch: &extensive,
            intensive_patch: &intensive,
        });
        *patch = match label {
            PatchLabel::Extensive => extensive.clone(),
            PatchLabel::Intensive => intensive.clone(),
        };
        renamed.insert(key, (extensive, intensive));
    }
}
