// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod preprocess;
mod reader;
mod uniquifier;

pub use preprocess::{classify_data, data_label, preprocess_patches, PairPatchMap, PatchSets};
pub use reader::{
    load_topology, DataKindDecl, ExchangeDecl, ExchangeKind, ParticipantDecl, Topology,
};
pub use uniquifier::UniquifierPool;
