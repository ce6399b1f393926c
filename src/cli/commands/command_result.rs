use std::{path::PathBuf, time::Duration};

use crate::issues::Issue;
use crate::sync::SyncOutcome;

#[derive(Debug)]
pub enum CommandSummary {
    Build(BuildSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct BuildSummary {
    /// Output root as configured, used as the prefix of printed paths.
    pub output_root: String,
    /// Per-artifact outcome, in generation order.
    pub outcomes: Vec<(PathBuf, SyncOutcome)>,
    /// Paths removed by pruning, relative to the output root.
    pub deleted: Vec<PathBuf>,
    pub elapsed: Duration,
}

impl BuildSummary {
    pub fn written_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, SyncOutcome::Written { .. }))
            .count()
    }

    pub fn unchanged_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| *o == SyncOutcome::Unchanged)
            .count()
    }
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
    pub error: Option<String>,
}

/// Result of running a themegen command
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    pub error_count: usize,
    pub warning_count: usize,
    /// All issues found while running the command, sorted.
    pub issues: Vec<Issue>,
}
