// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Serialization of the configuration graph into preCICE XML.
//!
//! Top-level element order is fixed: log header, data, meshes, participants,
//! M2Ns, coupling schemes. Within a participant: provide-mesh, receive-mesh,
//! write-data, read-data, mappings. Within a coupling scheme: participants,
//! max-time, time-window-size, max-iterations (implicit/multi only),
//! exchanges, relative-convergence-measures, acceleration (implicit/multi
//! only). Blank separators group the blocks visually.
//!
//! After the file is written the external `precice-config-check` tool is
//! invoked. Its verdict is advisory: failures are surfaced to the user but
//! the file stays on disk for inspection.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::consts::{
    DEFAULT_MAX_ITERATIONS, DEFAULT_MAX_TIME, DEFAULT_TIME_WINDOW_SIZE, PRECICE_CONFIG_FILE_NAME,
};
use crate::emitter::writer::render_document;
use crate::emitter::xml::XmlElement;
use crate::errors::EmitterError;
use crate::graph::{
    Acceleration, CaseGraph, ConvergenceMeasure, CouplingScheme, Mapping, Participant,
    ParticipantId,
};

/// Width budget for mapping elements before their attributes wrap.
const MAPPING_WRAP_BUDGET: usize = 100;

/// Verdict of the external configuration checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatorOutcome {
    Passed,
    SyntacticErrors(String),
    LogicalErrors(String),
    /// The checker could not be run; the reason is carried along.
    Skipped(String),
}

impl ValidatorOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            ValidatorOutcome::SyntacticErrors(_) | ValidatorOutcome::LogicalErrors(_)
        )
    }
}

/// Build the full preCICE configuration document for the given graph.
pub fn build_document(graph: &CaseGraph) -> XmlElement {
    let mut root = XmlElement::new("precice-configuration");

    root.push(XmlElement::new("log").child(
        XmlElement::new("sink")
            .attr("filter", "%Severity% > debug")
            .attr("format", "---[precice] %ColorizedSeverity% %Message%")
            .attr("enabled", "true"),
    ));
    root.blank();

    for data in &graph.data {
        root.push(XmlElement::new(data.kind.xml_tag()).attr("name", &data.name));
        root.blank();
    }

    for mesh in &graph.meshes {
        let mut element = XmlElement::new("mesh")
            .attr("name", &mesh.name)
            .attr("dimensions", mesh.dimensions.to_string());
        for &data in &mesh.use_data {
            element.push(XmlElement::new("use-data").attr("name", &graph.data(data).name));
        }
        root.push(element);
        root.blank();
    }

    for participant in &graph.participants {
        root.push(participant_element(graph, participant));
        root.blank();
    }

    for m2n in &graph.m2ns {
        root.push(
            XmlElement::new(m2n.xml_tag())
                .attr("acceptor", &graph.participant(m2n.acceptor).name)
                .attr("connector", &graph.participant(m2n.connector).name)
                .attr("exchange-directory", ".."),
        );
        root.blank();
    }

    for scheme in &graph.schemes {
        root.push(scheme_element(graph, scheme));
        root.blank();
    }

    root.trim_trailing_blank();
    root
}

fn participant_element(graph: &CaseGraph, participant: &Participant) -> XmlElement {
    let mut element = XmlElement::new("participant").attr("name", &participant.name);

    for &mesh in &participant.provide_meshes {
        element.push(XmlElement::new("provide-mesh").attr("name", &graph.mesh(mesh).name));
    }
    for receive in &participant.receive_meshes {
        element.push(
            XmlElement::new("receive-mesh")
                .attr("name", &graph.mesh(receive.mesh).name)
                .attr("from", &graph.participant(receive.from_participant).name),
        );
    }

    let has_data_entries = !participant.write_data.is_empty() || !participant.read_data.is_empty();
    if !element.children.is_empty() && has_data_entries {
        element.blank();
    }
    for entry in &participant.write_data {
        element.push(
            XmlElement::new("write-data")
                .attr("name", &graph.data(entry.data).name)
                .attr("mesh", &graph.mesh(entry.mesh).name),
        );
    }
    for entry in &participant.read_data {
        element.push(
            XmlElement::new("read-data")
                .attr("name", &graph.data(entry.data).name)
                .attr("mesh", &graph.mesh(entry.mesh).name),
        );
    }

    if has_data_entries && !participant.mappings.is_empty() {
        element.blank();
    }
    for &mapping in &participant.mappings {
        element.push(mapping_element(graph, graph.mapping(mapping)));
    }

    element
}

fn mapping_element(graph: &CaseGraph, mapping: &Mapping) -> XmlElement {
    XmlElement::new(mapping.xml_tag())
        .attr("direction", mapping.direction.as_str())
        .attr("from", &graph.mesh(mapping.from_mesh).name)
        .attr("to", &graph.mesh(mapping.to_mesh).name)
        .attr("constraint", mapping.constraint.as_str())
        .wrap_budget(MAPPING_WRAP_BUDGET)
}

fn scheme_element(graph: &CaseGraph, scheme: &CouplingScheme) -> XmlElement {
    match scheme {
        CouplingScheme::ParallelExplicit {
            first,
            second,
            exchanges,
        } => {
            let mut element = XmlElement::new("coupling-scheme:parallel-explicit");
            push_scheme_header(graph, &mut element, *first, *second, false);
            element.blank();
            push_exchanges(graph, &mut element, exchanges);
            element
        }
        CouplingScheme::ParallelImplicit {
            first,
            second,
            exchanges,
            acceleration,
            convergence_measures,
        } => {
            let mut element = XmlElement::new("coupling-scheme:parallel-implicit");
            push_scheme_header(graph, &mut element, *first, *second, true);
            element.blank();
            push_exchanges(graph, &mut element, exchanges);
            push_convergence_and_acceleration(graph, &mut element, convergence_measures, acceleration);
            element
        }
        CouplingScheme::Multi {
            control,
            participants,
            exchanges,
            acceleration,
            convergence_measures,
        } => {
            let mut element = XmlElement::new("coupling-scheme:multi");
            for &participant in participants {
                let mut row = XmlElement::new("participant")
                    .attr("name", &graph.participant(participant).name);
                if participant == *control {
                    row = row.attr("control", "yes");
                }
                element.push(row);
            }
            push_time_settings(&mut element, true);
            element.blank();
            push_exchanges(graph, &mut element, exchanges);
            push_convergence_and_acceleration(graph, &mut element, convergence_measures, acceleration);
            element
        }
    }
}

fn push_scheme_header(
    graph: &CaseGraph,
    element: &mut XmlElement,
    first: ParticipantId,
    second: ParticipantId,
    implicit: bool,
) {
    element.push(
        XmlElement::new("participants")
            .attr("first", &graph.participant(first).name)
            .attr("second", &graph.participant(second).name),
    );
    push_time_settings(element, implicit);
}

fn push_time_settings(element: &mut XmlElement, implicit: bool) {
    element.push(XmlElement::new("max-time").attr("value", DEFAULT_MAX_TIME));
    element.push(XmlElement::new("time-window-size").attr("value", DEFAULT_TIME_WINDOW_SIZE));
    if implicit {
        element.push(XmlElement::new("max-iterations").attr("value", DEFAULT_MAX_ITERATIONS));
    }
}

fn push_exchanges(graph: &CaseGraph, element: &mut XmlElement, exchanges: &[crate::graph::ExchangeId]) {
    for &exchange in exchanges {
        let exchange = graph.exchange(exchange);
        element.push(
            XmlElement::new("exchange")
                .attr("data", &graph.data(exchange.data).name)
                .attr("mesh", &graph.mesh(exchange.mesh).name)
                .attr("from", &graph.participant(exchange.from_participant).name)
                .attr("to", &graph.participant(exchange.to_participant).name),
        );
    }
}

fn push_convergence_and_acceleration(
    graph: &CaseGraph,
    element: &mut XmlElement,
    convergence_measures: &[ConvergenceMeasure],
    acceleration: &Acceleration,
) {
    if !convergence_measures.is_empty() {
        element.blank();
        for measure in convergence_measures {
            element.push(
                XmlElement::new("relative-convergence-measure")
                    .attr("data", &graph.data(measure.data).name)
                    .attr("mesh", &graph.mesh(measure.mesh).name)
                    .attr("limit", measure.limit),
            );
        }
    }
    if !acceleration.data.is_empty() {
        element.blank();
        let mut acceleration_element = XmlElement::new(acceleration.xml_tag());
        for entry in &acceleration.data {
            acceleration_element.push(
                XmlElement::new("data")
                    .attr("name", &graph.data(entry.data).name)
                    .attr("mesh", &graph.mesh(entry.mesh).name),
            );
        }
        element.push(acceleration_element);
    }
}

/// Render the configuration and write it into the given directory.
pub fn write_config_file(graph: &CaseGraph, directory: &Path) -> Result<PathBuf, EmitterError> {
    let path = directory.join(PRECICE_CONFIG_FILE_NAME);
    let document = render_document(&build_document(graph));
    fs::write(&path, document).map_err(|source| EmitterError::Write {
        path: path.clone(),
        source,
    })?;
    tracing::info!("preCICE configuration file written to {}", path.display());
    Ok(path)
}

/// Run `precice-config-check` on the emitted file.
///
/// The checker is advisory: a missing binary or a failed check never removes
/// the file.
pub fn check_config(path: &Path) -> ValidatorOutcome {
    let output = match Command::new("precice-config-check").arg(path).output() {
        Ok(output) => output,
        Err(error) => {
            tracing::warn!(
                "precice-config-check is not available ({error}); skipping validation of {}.",
                path.display()
            );
            return ValidatorOutcome::Skipped(error.to_string());
        }
    };

    match output.status.code() {
        Some(0) => {
            tracing::debug!(
                "preCICE configuration file has been validated with precice-config-check."
            );
            ValidatorOutcome::Passed
        }
        Some(1) => {
            ValidatorOutcome::SyntacticErrors(String::from_utf8_lossy(&output.stderr).into_owned())
        }
        Some(2) => {
            ValidatorOutcome::LogicalErrors(String::from_utf8_lossy(&output.stdout).into_owned())
        }
        other => ValidatorOutcome::Skipped(format!("unexpected exit status {other:?}")),
    }
}
