// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Run orchestration: the five pipeline stages plus file generation.
//!
//! Stages run strictly in sequence, each consuming the previous stage's
//! output. All validation happens before the first filesystem write, so an
//! invalid topology never touches the output directory.

use std::path::{Path, PathBuf};

use crate::emitter::{self, scaffold, ValidatorOutcome};
use crate::errors::CaseError;
use crate::graph::{build_graph, plan_couplings, ParticipantId};
use crate::observability::Diagnostics;
use crate::topology::{load_topology, preprocess_patches, UniquifierPool};

/// What a successful run produced.
#[derive(Debug)]
pub struct CaseReport {
    pub generated_dir: PathBuf,
    pub config_path: PathBuf,
    pub validator: ValidatorOutcome,
    pub warning_count: usize,
}

/// Generate all files for a preCICE case.
///
/// Reads and checks the topology, builds and plans the configuration graph,
/// then writes the `_generated` tree: the preCICE configuration, the clean
/// script and README, and one run directory per participant holding its
/// adapter configuration and run script.
pub fn generate_case(input_file: &Path, output_root: &Path) -> Result<CaseReport, CaseError> {
    let mut diagnostics = Diagnostics::new();
    let mut pool = UniquifierPool::new();

    tracing::debug!("Starting topology reader.");
    let mut topology = load_topology(input_file, &mut pool)?;
    tracing::debug!("Topology reader finished.");

    tracing::debug!("Starting patch preprocessor.");
    let pair_patches = preprocess_patches(&mut topology, &mut diagnostics);

    tracing::debug!("Starting graph builder.");
    let (mut graph, potentials) =
        build_graph(&topology, &pair_patches, &mut pool, &mut diagnostics)?;

    tracing::debug!("Starting coupling planner.");
    plan_couplings(&mut graph, potentials);

    let generated_dir = scaffold::reset_generated_dir(output_root)?;

    tracing::debug!("Starting config emitter.");
    let config_path = emitter::write_config_file(&graph, &generated_dir)?;
    let validator = emitter::check_config(&config_path);

    scaffold::write_clean_script(&generated_dir)?;
    scaffold::write_readme(&generated_dir, &graph)?;

    for index in 0..graph.participants.len() {
        let participant = &graph.participants[index];
        let name = participant.name.clone();
        let solver = participant.solver.clone();
        let directory = scaffold::create_participant_directory(&generated_dir, &name, &solver)?;
        emitter::write_adapter_config(&graph, ParticipantId(index), &directory)?;
        scaffold::write_run_script(&directory, &name, &solver)?;
    }

    diagnostics.replay();

    Ok(CaseReport {
        generated_dir,
        config_path,
        validator,
        warning_count: diagnostics.warning_count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;

    fn write_topology(directory: &Path, content: &str) -> PathBuf {
        let path = directory.join("topology.yaml");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    const FSI_TOPOLOGY: &str = r#"
participants:
  - name: Fluid
    solver: SU2
  - name: Solid
    solver: CalculiX
exchanges:
  - from: Fluid
    to: Solid
    from-patch: wet-surface
    to-patch: structure-surface
    data: Force
    type: strong
    data-type: vector
  - from: Solid
    to: Fluid
    from-patch: structure-surface
    to-patch: wet-surface
    data: Displacement
    type: strong
    data-type: vector
"#;

    #[test]
    fn generated_tree_has_the_documented_layout() {
        let root = tempfile::tempdir().unwrap();
        let input = write_topology(root.path(), FSI_TOPOLOGY);

        let report = generate_case(&input, root.path()).unwrap();

        let generated = &report.generated_dir;
        assert!(generated.join("precice-config.xml").is_file());
        assert!(generated.join("clean.sh").is_file());
        assert!(generated.join("README.md").is_file());
        for directory in ["fluid-su2", "solid-calculix"] {
            assert!(generated.join(directory).join("adapter-config.json").is_file());
            assert!(generated.join(directory).join("run.sh").is_file());
        }
    }

    #[test]
    fn generation_is_idempotent() {
        let root = tempfile::tempdir().unwrap();
        let input = write_topology(root.path(), FSI_TOPOLOGY);

        generate_case(&input, root.path()).unwrap();
        let first_config =
            fs::read(root.path().join("_generated/precice-config.xml")).unwrap();
        let first_adapter = fs::read(
            root.path()
                .join("_generated/fluid-su2/adapter-config.json"),
        )
        .unwrap();

        generate_case(&input, root.path()).unwrap();
        let second_config =
            fs::read(root.path().join("_generated/precice-config.xml")).unwrap();
        let second_adapter = fs::read(
            root.path()
                .join("_generated/fluid-su2/adapter-config.json"),
        )
        .unwrap();

        assert_eq!(first_config, second_config);
        assert_eq!(first_adapter, second_adapter);
    }

    #[test]
    fn invalid_topology_writes_nothing() {
        let root = tempfile::tempdir().unwrap();
        let input = write_topology(
            root.path(),
            r#"
participants:
  - name: Fluid
    solver: SU2
exchanges:
  - from: Fluid
    to: Ghost
    from-patch: a
    to-patch: b
    data: Pressure
    type: weak
"#,
        );

        let result = generate_case(&input, root.path());
        assert!(result.is_err());
        assert!(!root.path().join("_generated").exists());
    }

    #[test]
    fn readme_lists_participants_and_solvers() {
        let root = tempfile::tempdir().unwrap();
        let input = write_topology(root.path(), FSI_TOPOLOGY);
        generate_case(&input, root.path()).unwrap();

        let readme = fs::read_to_string(root.path().join("_generated/README.md")).unwrap();
        assert!(readme.contains("| Fluid | SU2 |"));
        assert!(readme.contains("| Solid | CalculiX |"));
    }

    #[test]
    fn stale_files_are_removed_on_rerun() {
        let root = tempfile::tempdir().unwrap();
        let input = write_topology(root.path(), FSI_TOPOLOGY);
        generate_case(&input, root.path()).unwrap();

        let stale = root.path().join("_generated/leftover.txt");
        fs::write(&stale, "junk").unwrap();
        generate_case(&input, root.path()).unwrap();
        assert!(!stale.exists());
    }
}
