//! Artifact synchronizer.
//!
//! Persists generated artifacts under the output root, writing a file only
//! when its bytes differ from what is on disk, and optionally prunes
//! previously generated templates whose source is gone.

use std::{
    collections::HashSet,
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use glob::{Pattern, glob};
use rayon::prelude::*;

use crate::core::artifact::Artifact;
use crate::issues::{Issue, SyncFailureIssue};

/// Output directories prune may delete from, relative to the output root.
pub const MANAGED_DIRS: &[&str] = &["sections", "snippets", "layout", "blocks"];

/// File name pattern of managed output files.
pub const MANAGED_FILE_PATTERN: &str = "*.liquid";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The file was written; `created` when it did not exist before.
    Written { created: bool },
    Unchanged,
}

/// Result of pruning: deleted paths and the ones that could not be deleted.
#[derive(Debug, Default)]
pub struct PruneOutcome {
    pub deleted: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, anyhow::Error)>,
}

/// Everything a full sync did, in artifact order.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub outcomes: Vec<(PathBuf, SyncOutcome)>,
    pub deleted: Vec<PathBuf>,
    pub issues: Vec<Issue>,
}

impl SyncReport {
    pub fn written(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, SyncOutcome::Written { .. }))
            .count()
    }

    pub fn unchanged(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| *o == SyncOutcome::Unchanged)
            .count()
    }
}

pub struct Synchronizer {
    root: PathBuf,
    exempt: Vec<Pattern>,
}

impl Synchronizer {
    /// `exempt` holds file name patterns that are only ever created, never
    /// compared, overwritten or pruned.
    pub fn new(root: impl Into<PathBuf>, exempt: Vec<Pattern>) -> Self {
        Self {
            root: root.into(),
            exempt,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_exempt(&self, path: &Path) -> bool {
        path.file_name()
            .map(|name| name.to_string_lossy())
            .is_some_and(|name| self.exempt.iter().any(|p| p.matches(&name)))
    }

    /// Persist one artifact if its content differs from the target.
    pub fn sync(&self, artifact: &Artifact) -> Result<SyncOutcome> {
        let target = self.root.join(artifact.path());

        let existing = match fs::read(&target) {
            Ok(bytes) => Some(bytes),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to read {}", target.display()));
            }
        };

        match existing {
            Some(_) if artifact.is_create_only() || self.is_exempt(artifact.path()) => {
                Ok(SyncOutcome::Unchanged)
            }
            Some(bytes) if bytes == artifact.content() => Ok(SyncOutcome::Unchanged),
            existing => {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create directory {}", parent.display())
                    })?;
                }
                fs::write(&target, artifact.content())
                    .with_context(|| format!("Failed to write {}", target.display()))?;
                Ok(SyncOutcome::Written {
                    created: existing.is_none(),
                })
            }
        }
    }

    /// Delete managed templates that are not in `expected` (paths relative
    /// to the output root). Exempt names are never deleted.
    pub fn prune(&self, expected: &HashSet<PathBuf>) -> Result<PruneOutcome> {
        let mut outcome = PruneOutcome::default();

        for dir in MANAGED_DIRS {
            let base = Pattern::escape(&self.root.join(dir).to_string_lossy());
            let pattern = format!("{}/{}", base, MANAGED_FILE_PATTERN);
            let entries =
                glob(&pattern).with_context(|| format!("Invalid glob pattern: {}", pattern))?;

            for entry in entries {
                let path = match entry {
                    Ok(path) => path,
                    Err(err) => {
                        let relative = managed_path(dir, err.path());
                        outcome.failed.push((relative, err.into()));
                        continue;
                    }
                };
                // glob drops a leading `./`, so rebuild the path from the
                // managed directory rather than stripping the root.
                let relative = managed_path(dir, &path);
                if expected.contains(&relative) || self.is_exempt(&relative) || !path.is_file() {
                    continue;
                }
                match fs::remove_file(&path)
                    .with_context(|| format!("Failed to delete {}", path.display()))
                {
                    Ok(()) => outcome.deleted.push(relative),
                    Err(err) => outcome.failed.push((relative, err)),
                }
            }
        }
        Ok(outcome)
    }

    /// Sync every artifact, then prune when `keep` is given.
    ///
    /// Prune spares every artifact path plus `keep`: outputs whose source
    /// still exists but produced no artifact this pass. A failure on one path
    /// becomes an issue; the other paths are still processed.
    pub fn sync_all(
        &self,
        artifacts: &[Artifact],
        keep: Option<&HashSet<PathBuf>>,
    ) -> Result<SyncReport> {
        let results: Vec<_> = artifacts
            .par_iter()
            .map(|artifact| (artifact.path().to_path_buf(), self.sync(artifact)))
            .collect();

        let mut report = SyncReport::default();
        for (path, result) in results {
            match result {
                Ok(outcome) => report.outcomes.push((path, outcome)),
                Err(err) => report.issues.push(self.failure(&path, &err)),
            }
        }

        if let Some(keep) = keep {
            let expected: HashSet<PathBuf> = artifacts
                .iter()
                .map(|a| a.path().to_path_buf())
                .chain(keep.iter().cloned())
                .collect();
            let pruned = self.prune(&expected)?;
            report.deleted = pruned.deleted;
            report
                .issues
                .extend(pruned.failed.iter().map(|(path, err)| self.failure(path, err)));
        }
        Ok(report)
    }

    fn failure(&self, path: &Path, err: &anyhow::Error) -> Issue {
        Issue::SyncFailure(SyncFailureIssue {
            file_path: self.root.join(path).display().to_string(),
            error: format!("{:#}", err),
        })
    }
}

/// `<dir>/<file name>`, relative to the output root.
fn managed_path(dir: &str, path: &Path) -> PathBuf {
    match path.file_name() {
        Some(name) => Path::new(dir).join(name),
        None => path.to_path_buf(),
    }
}
