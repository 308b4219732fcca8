// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Diagnostics for the generation pipeline.
//!
//! Fatal errors travel through `Result`s; everything the user should see but
//! that must not abort the run goes through the [`Diagnostics`] sink defined
//! here. Message texts live in [`messages`] as small `Display` types.

pub mod diagnostics;
pub mod messages;

pub use diagnostics::Diagnostics;
