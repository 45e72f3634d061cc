//! Typed paths into the repository layout.
use std::path::{Path, PathBuf};

pub const REQUIREMENTS_FILE: &str = "requirements.txt";
pub const ENVIRONMENT_FILE: &str = "environment.yml";

/// Locates the input and output files relative to a repository root.
#[derive(Debug, Clone)]
pub struct ProjectPaths {
    root: PathBuf,
}

impl ProjectPaths {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Return the repository root used for path derivation.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Return the `requirements.txt` path.
    pub fn requirements_path(&self) -> PathBuf {
        self.root.join(REQUIREMENTS_FILE)
    }

    /// Return the `environment.yml` path.
    pub fn environment_path(&self) -> PathBuf {
        self.root.join(ENVIRONMENT_FILE)
    }
}
