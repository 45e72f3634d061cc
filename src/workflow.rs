//! The generation pipeline: branch guard, root lookup, read, merge, emit.
use crate::environment::{write_environment, EnvironmentTemplate};
use crate::git::{is_main_branch, Vcs};
use crate::paths::ProjectPaths;
use crate::requirements::read_requirements;
use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};

/// Where the rendered document goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Emit {
    /// Replace `environment.yml` at the repository root.
    #[default]
    File,
    /// Return the YAML without touching the filesystem.
    Stdout,
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub template: EnvironmentTemplate,
    pub emit: Emit,
}

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The current branch is the main branch; nothing was read or written.
    SkippedMainBranch { branch: String },
    Written { path: PathBuf, requirements: usize },
    Rendered { yaml: String, requirements: usize },
}

/// Run the pipeline for the repository containing `cwd`.
pub fn run(vcs: &dyn Vcs, cwd: &Path, options: &RunOptions) -> Result<Outcome> {
    let branch = vcs.current_branch(cwd)?;
    if is_main_branch(&branch) {
        tracing::info!(%branch, "skipping generation on main branch");
        return Ok(Outcome::SkippedMainBranch { branch });
    }

    let root = vcs.toplevel(cwd)?.ok_or_else(|| {
        anyhow!(
            "not inside a git working tree (searched from {})",
            cwd.display()
        )
    })?;
    let paths = ProjectPaths::new(root);
    tracing::debug!(%branch, root = %paths.root().display(), "resolved repository");

    let requirements = read_requirements(&paths.requirements_path())?;
    let count = requirements.len();
    let document = options.template.merge(requirements);

    match options.emit {
        Emit::File => {
            let path = paths.environment_path();
            write_environment(&path, &document)?;
            tracing::info!(path = %path.display(), requirements = count, "wrote environment file");
            Ok(Outcome::Written {
                path,
                requirements: count,
            })
        }
        Emit::Stdout => Ok(Outcome::Rendered {
            yaml: document.to_yaml()?,
            requirements: count,
        }),
    }
}
