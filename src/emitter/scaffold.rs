// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Output directory scaffolding: the `_generated` tree, run/clean scripts
//! and the generated README.

use std::fs;
use std::path::{Path, PathBuf};

use crate::consts::{GENERATED_DIR_NAME, PRECICE_URL};
use crate::errors::EmitterError;
use crate::graph::CaseGraph;

const RUN_TEMPLATE: &str = include_str!("../../templates/run.sh");
const CLEAN_TEMPLATE: &str = include_str!("../../templates/clean.sh");

/// Delete and recreate `<output-root>/_generated/`.
pub fn reset_generated_dir(output_root: &Path) -> Result<PathBuf, EmitterError> {
    let generated = output_root.join(GENERATED_DIR_NAME);
    tracing::debug!("Resetting generated files at {}.", generated.display());
    if generated.exists() {
        fs::remove_dir_all(&generated).map_err(|source| EmitterError::OutputDir {
            path: generated.clone(),
            source,
        })?;
    }
    fs::create_dir_all(&generated).map_err(|source| EmitterError::OutputDir {
        path: generated.clone(),
        source,
    })?;
    Ok(generated)
}

/// The run directory of one participant: `<generated>/<participant>-<solver>/`.
pub fn participant_directory(generated: &Path, participant: &str, solver: &str) -> PathBuf {
    generated.join(format!(
        "{}-{}",
        participant.to_lowercase(),
        solver.to_lowercase()
    ))
}

pub fn create_participant_directory(
    generated: &Path,
    participant: &str,
    solver: &str,
) -> Result<PathBuf, EmitterError> {
    let directory = participant_directory(generated, participant, solver);
    fs::create_dir_all(&directory).map_err(|source| EmitterError::OutputDir {
        path: directory.clone(),
        source,
    })?;
    tracing::debug!("Created participant directory at {}", directory.display());
    Ok(directory)
}

fn write_script(path: &Path, content: &str) -> Result<(), EmitterError> {
    fs::write(path, content).map_err(|source| EmitterError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = fs::Permissions::from_mode(0o755);
        fs::set_permissions(path, permissions).map_err(|source| EmitterError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Copy the clean script into the generated directory.
pub fn write_clean_script(generated: &Path) -> Result<(), EmitterError> {
    write_script(&generated.join("clean.sh"), CLEAN_TEMPLATE)
}

/// Instantiate the run script template for one participant.
pub fn write_run_script(
    directory: &Path,
    participant: &str,
    solver: &str,
) -> Result<(), EmitterError> {
    let content = RUN_TEMPLATE
        .replace("{participant}", participant)
        .replace("{solver}", solver);
    write_script(&directory.join("run.sh"), &content)
}

/// Generate the case README: participants, solvers and how to run.
pub fn write_readme(generated: &Path, graph: &CaseGraph) -> Result<(), EmitterError> {
    let mut content = String::from("# Generated preCICE case\n\n");
    content.push_str("This directory was generated from a topology description. ");
    content.push_str("It contains the shared preCICE configuration and one run directory per participant.\n\n");

    content.push_str("## Participants\n\n");
    content.push_str("| Participant | Solver | Run directory |\n");
    content.push_str("|---|---|---|\n");
    for participant in &graph.participants {
        let directory = format!(
            "{}-{}",
            participant.name.to_lowercase(),
            participant.solver.to_lowercase()
        );
        content.push_str(&format!(
            "| {} | {} | `{}/` |\n",
            participant.name, participant.solver, directory
        ));
    }

    content.push_str("\n## Running the case\n\n");
    content.push_str(
        "Start every participant from its own run directory, e.g. `./run.sh`, each in a separate terminal. ",
    );
    content.push_str("Use `./clean.sh` to remove artifacts between runs.\n\n");
    content.push_str("## Links\n\n");
    content.push_str(&format!("- preCICE: {PRECICE_URL}\n"));
    content.push_str(&format!("- Documentation: {PRECICE_URL}/docs.html\n"));

    let path = generated.join("README.md");
    fs::write(&path, content).map_err(|source| EmitterError::Write { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_dir_is_reset() {
        let root = tempfile::tempdir().unwrap();
        let generated = reset_generated_dir(root.path()).unwrap();
        fs::write(generated.join("stale.txt"), "old").unwrap();

        let generated = reset_generated_dir(root.path()).unwrap();
        assert!(generated.exists());
        assert!(!generated.join("stale.txt").exists());
    }

    #[test]
    fn participant_directories_are_lowercased() {
        let directory = participant_directory(Path::new("_generated"), "Fluid", "SU2");
        assert_eq!(directory, Path::new("_generated/fluid-su2"));
    }

    #[test]
    fn run_script_substitutes_participant_and_solver() {
        let root = tempfile::tempdir().unwrap();
        write_run_script(root.path(), "Fluid", "SU2").unwrap();
        let content = fs::read_to_string(root.path().join("run.sh")).unwrap();
        assert!(content.contains("Participant: Fluid"));
        assert!(content.contains("Solver:      SU2"));
        assert!(!content.contains("{participant}"));
    }

    #[cfg(unix)]
    #[test]
    fn scripts_are_executable() {
        use std::os::unix::fs::PermissionsExt;
        let root = tempfile::tempdir().unwrap();
        write_clean_script(root.path()).unwrap();
        let mode = fs::metadata(root.path().join("clean.sh"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o111, 0o111);
    }
}
