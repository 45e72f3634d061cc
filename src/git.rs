//! Version-control queries: current branch and repository root.
//!
//! The working directory is always passed in, so the pipeline can run against
//! a fake [`Vcs`] in tests.
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Branch on which generation is skipped.
pub const MAIN_BRANCH: &str = "main";

const NOT_A_REPOSITORY: &str = "not a git repository";

/// Repository lookups needed by the pipeline.
pub trait Vcs {
    /// Name of the checked-out branch for the repository containing `cwd`.
    fn current_branch(&self, cwd: &Path) -> Result<String>;

    /// Top-level directory of the working tree containing `cwd`, or `None`
    /// when `cwd` is not inside a repository.
    fn toplevel(&self, cwd: &Path) -> Result<Option<PathBuf>>;
}

pub fn is_main_branch(branch: &str) -> bool {
    branch == MAIN_BRANCH
}

/// [`Vcs`] backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
}

impl GitCli {
    /// Locate `git` on `PATH`.
    pub fn discover() -> Result<Self> {
        let program = which::which("git").context("locate git on PATH")?;
        Ok(Self { program })
    }

    pub fn with_program(program: PathBuf) -> Self {
        Self { program }
    }

    fn rev_parse(&self, cwd: &Path, args: &[&str]) -> Result<Output> {
        tracing::debug!(
            program = %self.program.display(),
            cwd = %cwd.display(),
            ?args,
            "git rev-parse"
        );
        Command::new(&self.program)
            .arg("rev-parse")
            .args(args)
            .current_dir(cwd)
            // Stable English diagnostics for the not-a-repository check.
            .env("LC_ALL", "C")
            .output()
            .with_context(|| format!("run git rev-parse {}", args.join(" ")))
    }
}

impl Vcs for GitCli {
    fn current_branch(&self, cwd: &Path) -> Result<String> {
        let output = self.rev_parse(cwd, &["--abbrev-ref", "HEAD"])?;
        if !output.status.success() {
            return Err(anyhow!(
                "git rev-parse --abbrev-ref HEAD failed: {}",
                failure_detail(&output)
            ));
        }
        Ok(stdout_trim(&output))
    }

    fn toplevel(&self, cwd: &Path) -> Result<Option<PathBuf>> {
        let output = self.rev_parse(cwd, &["--show-toplevel"])?;
        if !output.status.success() {
            if stderr_trim(&output).contains(NOT_A_REPOSITORY) {
                return Ok(None);
            }
            return Err(anyhow!(
                "git rev-parse --show-toplevel failed: {}",
                failure_detail(&output)
            ));
        }
        toplevel_from_stdout(&output.stdout)
    }
}

/// Interpret `--show-toplevel` output. Empty output means there is no work
/// tree (inside `.git` or a bare repository on older git).
fn toplevel_from_stdout(stdout: &[u8]) -> Result<Option<PathBuf>> {
    let mut end = stdout.len();
    while end > 0 && matches!(stdout[end - 1], b'\n' | b'\r') {
        end -= 1;
    }
    let raw = &stdout[..end];
    if raw.is_empty() {
        return Ok(None);
    }
    path_from_bytes(raw).map(Some)
}

#[cfg(unix)]
fn path_from_bytes(raw: &[u8]) -> Result<PathBuf> {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;
    Ok(PathBuf::from(OsStr::from_bytes(raw)))
}

#[cfg(not(unix))]
fn path_from_bytes(raw: &[u8]) -> Result<PathBuf> {
    let text = std::str::from_utf8(raw)
        .map_err(|_| anyhow!("git reported a repository root that is not valid UTF-8"))?;
    Ok(PathBuf::from(text))
}

fn stdout_trim(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn stderr_trim(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

fn failure_detail(output: &Output) -> String {
    let stderr = stderr_trim(output);
    match stderr.lines().next() {
        Some(line) if !line.is_empty() => line.to_string(),
        _ => format!("status {}", output.status),
    }
}
