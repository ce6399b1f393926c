use std::{
    path::{Component, Path, PathBuf},
    time::Instant,
};

use anyhow::{Context, Result};

use super::super::args::BuildCommand;
use super::{BuildSummary, CommandResult, CommandSummary, helper::finish};
use crate::{
    config::{CONFIG_FILE_NAME, load_config},
    core::{PassOptions, generate},
    sources::FileSystemSources,
    sync::Synchronizer,
};

/// Run one full generation pass and sync the output tree.
pub fn build(cmd: BuildCommand) -> Result<CommandResult> {
    let started = Instant::now();
    let verbose = cmd.common.verbose;

    // Priority: CLI --source-root arg > current directory
    let project_dir = cmd
        .common
        .source_root
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    let loaded = load_config(&project_dir)?;
    if verbose && !loaded.from_file {
        eprintln!(
            "Note: No {} found, using default configuration",
            CONFIG_FILE_NAME
        );
    }

    let mut config = loaded.config;
    cmd.apply_to(&mut config);
    config.validate()?;

    // Paths from the config file are relative to that file; a flag or
    // environment output root is relative to the project directory.
    let output_base = match cmd.output_root {
        Some(_) => &project_dir,
        None => &loaded.base_dir,
    };
    let source_root = resolve(&loaded.base_dir, &config.source_root);
    let output_root = resolve(output_base, config.output_root());

    let snapshot = FileSystemSources::new(&source_root, config.target)
        .load()
        .with_context(|| format!("Failed to load sources from {}", source_root.display()))?;

    let output = generate(&snapshot, &PassOptions::from_config(&config))?;

    let synchronizer = Synchronizer::new(&output_root, config.exempt_patterns()?);
    let keep = config.delete.then_some(&snapshot.discovered_outputs);
    let report = synchronizer.sync_all(&output.artifacts, keep)?;

    let mut issues = snapshot.issues;
    issues.extend(output.issues);
    issues.extend(report.issues);

    let summary = BuildSummary {
        output_root: config.output_root().to_string(),
        outcomes: report.outcomes,
        deleted: report.deleted,
        elapsed: started.elapsed(),
    };
    Ok(finish(CommandSummary::Build(summary), issues))
}

/// Resolve a configured path against the project directory.
fn resolve(base: &Path, configured: &str) -> PathBuf {
    let path = Path::new(configured);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let relative: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    base.join(relative)
}
