//! On-disk history of which real tasks existed at previous runs, so that
//! reruns can reuse prior outputs instead of rebuilding everything.
//!
//! Persistence format mirrors `branchpoints.txt`: one plain-text record per
//! line, rather than pulling in a serialization framework for something this
//! simple. Each version gets its own numbered directory holding a `tasks`
//! file of `task<TAB>realization<TAB>version` lines.

use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};

use util::{HashMap, Hasher};

/// How long to wait before deleting a version directory that failed to
/// load, in case the failure is due to a concurrent writer that hasn't
/// finished yet. The spec requires "a bounded delay" without naming one;
/// this value is a judgment call, not a derived constant.
const CORRUPT_DIR_DELETE_DELAY: Duration = Duration::from_millis(500);

const TASKS_FILE: &str = "tasks";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("version directory name {0:?} is not a valid version number")]
    InvalidVersionDirName(String),
    #[error("malformed line in version history file: {0:?}")]
    MalformedLine(String),
}

/// Identifies one real task as it existed in a specific prior version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionedTaskId {
    pub task: String,
    pub realization: String,
    pub version: u32,
}

/// The set of real tasks that existed at one historical workflow run.
#[derive(Debug, Clone)]
pub struct WorkflowVersionInfo {
    version: u32,
    ids: Vec<VersionedTaskId>,
}

impl WorkflowVersionInfo {
    pub fn new(version: u32) -> Self {
        Self {
            version,
            ids: Vec::new(),
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn insert(&mut self, task: impl Into<String>, realization: impl Into<String>) {
        self.ids.push(VersionedTaskId {
            task: task.into(),
            realization: realization.into(),
            version: self.version,
        });
    }

    pub fn ids(&self) -> impl Iterator<Item = &VersionedTaskId> {
        self.ids.iter()
    }

    fn load(dir: &Path) -> Result<Self> {
        let name = dir
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::InvalidVersionDirName(format!("{dir:?}")))?;
        let version: u32 = name
            .parse()
            .map_err(|_| Error::InvalidVersionDirName(name.to_owned()))?;

        let text = fs::read_to_string(dir.join(TASKS_FILE))
            .with_context(|| format!("while reading version history file in {dir:?}"))?;

        let mut info = Self::new(version);
        for line in text.lines() {
            if line.is_empty() {
                continue;
            }
            let mut parts = line.split('\t');
            let task = parts.next().ok_or_else(|| Error::MalformedLine(line.to_owned()))?;
            let realization = parts.next().ok_or_else(|| Error::MalformedLine(line.to_owned()))?;
            let line_version: u32 = parts
                .next()
                .ok_or_else(|| Error::MalformedLine(line.to_owned()))?
                .parse()
                .map_err(|_| Error::MalformedLine(line.to_owned()))?;
            if line_version != version {
                return Err(Error::MalformedLine(line.to_owned()).into());
            }
            info.insert(task, realization);
        }
        Ok(info)
    }

    fn save(&self, root: &Path) -> Result<()> {
        let dir = root.join(self.version.to_string());
        fs::create_dir_all(&dir)?;
        let mut buf = String::with_capacity(self.ids.len() * 32);
        for id in &self.ids {
            buf.push_str(&id.task);
            buf.push('\t');
            buf.push_str(&id.realization);
            buf.push('\t');
            buf.push_str(&id.version.to_string());
            buf.push('\n');
        }
        fs::write(dir.join(TASKS_FILE), buf)?;
        Ok(())
    }
}

/// Ordered history of every version successfully loaded from a version-history
/// root directory. Corrupt or incomplete version directories are deleted
/// (after a bounded delay) rather than failing the load.
#[derive(Debug, Default)]
pub struct WorkflowVersionHistory {
    infos: Vec<WorkflowVersionInfo>,
}

impl WorkflowVersionHistory {
    /// Load every version directory under `root`. Never fails on a single
    /// corrupt entry: it is logged and deleted instead.
    pub fn load(root: &Path) -> Result<Self> {
        let mut infos = Vec::new();
        if root.exists() {
            for entry in fs::read_dir(root).with_context(|| format!("while reading {root:?}"))? {
                let entry = entry?;
                let path = entry.path();
                if !path.is_dir() {
                    continue;
                }
                match WorkflowVersionInfo::load(&path) {
                    Ok(info) => infos.push(info),
                    Err(e) => {
                        log::warn!("Removing corrupt version directory {:?}: {:#}", path, e);
                        thread::sleep(CORRUPT_DIR_DELETE_DELAY);
                        fs::remove_dir_all(&path).with_context(|| {
                            format!("while removing corrupt version directory {path:?}")
                        })?;
                    }
                }
            }
        }
        infos.sort_by_key(|i| i.version);
        Ok(Self { infos })
    }

    /// Persist `info` as a new version directory under `root`.
    pub fn save_version(root: &Path, info: &WorkflowVersionInfo) -> Result<()> {
        info.save(root)
    }

    pub fn prev_version(&self) -> Option<u32> {
        self.infos.iter().map(|i| i.version).max()
    }

    pub fn next_version(&self) -> u32 {
        self.prev_version().map_or(1, |v| v + 1)
    }

    /// Build a union view answering "what version should I consider the
    /// latest of this real task?" across every retained version.
    pub fn union(&self) -> UnionWorkflowVersionInfo {
        let fallback_version = self.prev_version().unwrap_or(0);
        let mut lookup = HashMap::with_capacity_and_hasher(64, Hasher::default());
        // ascending order, so the highest version for a given (task, realization) wins.
        for info in &self.infos {
            for id in info.ids() {
                lookup.insert((id.task.clone(), id.realization.clone()), id.version);
            }
        }
        UnionWorkflowVersionInfo {
            lookup,
            fallback_version,
        }
    }
}

/// A view over a `WorkflowVersionHistory` that resolves a (task, realization)
/// pair to the version it should be treated as having, falling back to the
/// latest known version for tasks that are new this run.
#[derive(Debug)]
pub struct UnionWorkflowVersionInfo {
    lookup: HashMap<(String, String), u32>,
    pub fallback_version: u32,
}

impl UnionWorkflowVersionInfo {
    pub fn lookup(&self, task: &str, realization: &str) -> u32 {
        self.lookup
            .get(&(task.to_owned(), realization.to_owned()))
            .copied()
            .unwrap_or(self.fallback_version)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_round_trip_and_corrupt_dir_removal() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let root = tmp.path();

        let mut v1 = WorkflowVersionInfo::new(1);
        v1.insert("tokenize", "baseline");
        v1.insert("align", "size.small");
        WorkflowVersionHistory::save_version(root, &v1)?;

        // a corrupt entry adjacent to the valid one:
        fs::create_dir_all(root.join("2"))?;
        fs::write(root.join("2").join("tasks"), "not\tenough\tcolumns\textra")?;

        let history = WorkflowVersionHistory::load(root)?;
        assert_eq!(history.infos.len(), 1);
        assert_eq!(history.infos[0].version, 1);
        assert!(!root.join("2").exists());

        Ok(())
    }

    #[test]
    fn test_union_fallback_s6() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let root = tmp.path();

        let mut v1 = WorkflowVersionInfo::new(1);
        v1.insert("X", "baseline");
        v1.insert("Y", "baseline");
        WorkflowVersionHistory::save_version(root, &v1)?;

        let history = WorkflowVersionHistory::load(root)?;
        assert_eq!(history.next_version(), 2);

        let union = history.union();
        assert_eq!(union.lookup("X", "baseline"), 1);
        assert_eq!(union.lookup("Z", "baseline"), union.fallback_version);
        assert_eq!(union.fallback_version, 1);

        Ok(())
    }
}
