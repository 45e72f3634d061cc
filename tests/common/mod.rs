//! Shared test infrastructure for integration tests.
#![allow(dead_code)]

use anyhow::{anyhow, Result};
use reqs_to_env::git::Vcs;
use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// In-memory [`Vcs`] with a fixed branch and root.
pub struct FakeVcs {
    pub branch: Result<String, String>,
    pub root: Option<PathBuf>,
    pub toplevel_calls: Cell<usize>,
}

impl FakeVcs {
    pub fn on_branch(branch: &str, root: &Path) -> Self {
        Self {
            branch: Ok(branch.to_string()),
            root: Some(root.to_path_buf()),
            toplevel_calls: Cell::new(0),
        }
    }

    pub fn outside_repository(branch: &str) -> Self {
        Self {
            branch: Ok(branch.to_string()),
            root: None,
            toplevel_calls: Cell::new(0),
        }
    }

    pub fn failing_branch(message: &str) -> Self {
        Self {
            branch: Err(message.to_string()),
            root: None,
            toplevel_calls: Cell::new(0),
        }
    }
}

impl Vcs for FakeVcs {
    fn current_branch(&self, _cwd: &Path) -> Result<String> {
        self.branch.clone().map_err(|message| anyhow!(message))
    }

    fn toplevel(&self, _cwd: &Path) -> Result<Option<PathBuf>> {
        self.toplevel_calls.set(self.toplevel_calls.get() + 1);
        Ok(self.root.clone())
    }
}

/// Temp project root with an optional `requirements.txt`.
pub fn project_with_requirements(content: Option<&str>) -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    if let Some(content) = content {
        fs::write(dir.path().join("requirements.txt"), content).expect("write requirements");
    }
    dir
}

pub fn git_available() -> bool {
    which::which("git").is_ok()
}

/// Run git in `dir` with an isolated identity.
pub fn git(dir: &Path, args: &[&str]) -> Output {
    let output = Command::new("git")
        .args([
            "-c",
            "user.name=reqs2env tests",
            "-c",
            "user.email=tests@example.invalid",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .current_dir(dir)
        .env("LC_ALL", "C")
        .output()
        .expect("run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

/// Initialize a repository with one commit, checked out on `branch`.
pub fn init_repo(branch: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    git(dir.path(), &["init", "-q"]);
    git(dir.path(), &["commit", "-q", "--allow-empty", "-m", "init"]);
    git(dir.path(), &["checkout", "-q", "-B", branch]);
    dir
}

/// True when `dir` is not nested inside some other checkout.
pub fn outside_any_repository(dir: &Path) -> bool {
    Command::new("git")
        .args(["rev-parse", "--is-inside-work-tree"])
        .current_dir(dir)
        .output()
        .map(|out| !out.status.success())
        .unwrap_or(false)
}

pub fn run_bin(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_reqs2env"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .output()
        .expect("run reqs2env")
}
