// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod adapter;
mod config;
pub mod scaffold;
mod writer;
mod xml;

pub use adapter::{adapter_config_for, write_adapter_config, AdapterConfig, AdapterInterface};
pub use config::{build_document, check_config, write_config_file, ValidatorOutcome};
pub use writer::render_document;
pub use xml::{XmlElement, XmlNode};
