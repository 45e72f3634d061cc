//! The conda environment document and its on-disk form.
//!
//! The base template never changes; each run merges the parsed requirements
//! into a fresh [`EnvironmentDocument`] instead of mutating shared state.
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_CHANNELS: [&str; 2] = ["conda-forge", "defaults"];
pub const DEFAULT_ENV_NAME: &str = "DTU_ML_Ops";

/// Conda-installed packages that precede the pip section, in order.
pub const BASE_DEPENDENCIES: [&str; 3] = ["python=3.10", "pip", "dvc"];

/// Fixed skeleton shared by every generated document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentTemplate {
    pub channels: Vec<String>,
    pub name: String,
}

impl Default for EnvironmentTemplate {
    fn default() -> Self {
        Self {
            channels: DEFAULT_CHANNELS.iter().map(|c| c.to_string()).collect(),
            name: DEFAULT_ENV_NAME.to_string(),
        }
    }
}

impl EnvironmentTemplate {
    /// Build the document for `requirements`. The dependency list is always
    /// rebuilt from scratch, never appended to.
    pub fn merge(&self, requirements: Vec<String>) -> EnvironmentDocument {
        let mut dependencies: Vec<Dependency> = BASE_DEPENDENCIES
            .iter()
            .map(|dep| Dependency::Package(dep.to_string()))
            .collect();
        dependencies.push(Dependency::Pip { pip: requirements });

        EnvironmentDocument {
            channels: self.channels.clone(),
            dependencies,
            name: self.name.clone(),
        }
    }
}

/// One entry of the `dependencies` sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dependency {
    /// A conda package spec such as `python=3.10`.
    Package(String),
    /// The `pip:` mapping holding everything from requirements.txt.
    Pip { pip: Vec<String> },
}

/// Serialized form of `environment.yml`.
///
/// Field order is the emitted key order (alphabetical, as the reference
/// files were produced by a key-sorting dumper).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentDocument {
    pub channels: Vec<String>,
    pub dependencies: Vec<Dependency>,
    pub name: String,
}

impl EnvironmentDocument {
    /// Requirements carried in the `pip:` entry, if present.
    pub fn pip_requirements(&self) -> Option<&[String]> {
        self.dependencies.iter().find_map(|dep| match dep {
            Dependency::Pip { pip } => Some(pip.as_slice()),
            Dependency::Package(_) => None,
        })
    }

    /// Render as block-style YAML.
    pub fn to_yaml(&self) -> Result<String> {
        let yaml = serde_yaml::to_string(self).context("serialize environment document")?;
        Ok(quote_yaml11_booleans(&yaml))
    }
}

/// Words YAML 1.1 readers load as booleans; serde_yaml leaves them plain.
const YAML11_BOOLEAN_WORDS: [&str; 12] = [
    "yes", "Yes", "YES", "no", "No", "NO", "on", "On", "ON", "off", "Off", "OFF",
];

/// Single-quote sequence items and mapping values that are YAML 1.1 booleans.
fn quote_yaml11_booleans(yaml: &str) -> String {
    let mut out = String::with_capacity(yaml.len());
    for line in yaml.split_inclusive('\n') {
        let body = line.strip_suffix('\n').unwrap_or(line);
        let indent = body.len() - body.trim_start().len();
        let rest = &body[indent..];
        let split = if rest.starts_with("- ") {
            Some(indent + 2)
        } else {
            body.find(": ").map(|at| at + 2)
        };
        match split {
            Some(at) if YAML11_BOOLEAN_WORDS.contains(&&body[at..]) => {
                out.push_str(&body[..at]);
                out.push('\'');
                out.push_str(&body[at..]);
                out.push('\'');
                out.push_str(&line[body.len()..]);
            }
            _ => out.push_str(line),
        }
    }
    out
}

/// Replace the contents of `path` with the rendered document.
///
/// A symlinked `path` is followed so its target is updated. The content is
/// staged in a temp file beside the target and renamed into place, so a failed
/// write leaves the previous file untouched. An existing target keeps its
/// permissions; a new one gets the umask-derived default.
pub fn write_environment(path: &Path, document: &EnvironmentDocument) -> Result<()> {
    let yaml = document.to_yaml()?;
    let target = resolve_destination(path)?;
    let parent = match target.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Path::new("."),
        Some(parent) => parent,
        None => return Err(anyhow!("output path {} has no parent", target.display())),
    };
    let existing = match fs::metadata(&target) {
        Ok(meta) => Some(meta.permissions()),
        Err(err) if err.kind() == ErrorKind::NotFound => None,
        Err(err) => return Err(err).with_context(|| format!("stat {}", target.display())),
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix(".environment.").suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Passed to open(2), so the process umask still applies.
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut staged = builder
        .tempfile_in(parent)
        .with_context(|| format!("create temp file in {}", parent.display()))?;
    if let Some(permissions) = existing {
        staged
            .as_file()
            .set_permissions(permissions)
            .with_context(|| format!("set permissions on {}", staged.path().display()))?;
    }
    staged
        .write_all(yaml.as_bytes())
        .with_context(|| format!("write {}", staged.path().display()))?;
    staged
        .persist(&target)
        .map_err(|err| err.error)
        .with_context(|| format!("write {}", target.display()))?;
    Ok(())
}

/// Follow a symlinked destination to the file that should be replaced.
fn resolve_destination(path: &Path) -> Result<PathBuf> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            if path.exists() {
                return fs::canonicalize(path)
                    .with_context(|| format!("resolve {}", path.display()));
            }
            // Dangling link: write the file it points at.
            let link = fs::read_link(path)
                .with_context(|| format!("read link {}", path.display()))?;
            Ok(match path.parent() {
                Some(parent) => parent.join(link),
                None => link,
            })
        }
        Ok(_) => Ok(path.to_path_buf()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(err) => Err(err).with_context(|| format!("stat {}", path.display())),
    }
}
