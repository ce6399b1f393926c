//! File-system source provider.
//!
//! Reads a fresh, complete snapshot of every schema and template under the
//! source root. Nothing is cached between passes: hoisting decisions are only
//! correct over the whole current forest.
//!
//! Layout (relative to the source root):
//!
//! ```text
//! sections/<name>/schema.json      section schema        (theme)
//! sections/<name>/<name>.liquid    section body          (theme)
//! blocks/<name>/schema.json        app block schema      (app)
//! blocks/<name>/<name>.liquid      app block body        (app)
//! sections|blocks/<name>/<a>.<b>.liquid, snippets/*.liquid   snippets
//! layout/*.liquid                  layouts               (theme)
//! config/settings_schema.json      settings schema       (theme)
//! assets/*                         assets
//! config/*.json, templates/*.json, templates/customers/*.json,
//! sections/*.json                  seed files            (theme)
//! ```
//!
//! Walks are sorted by file name so every pass sees items in the same order.
//! File contents are read in parallel and reassembled in that order.

use std::{
    collections::{HashMap, HashSet},
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::config::Target;
use crate::core::schema::{Section, SettingsSchema, parse_section, parse_settings_schema};
use crate::issues::{
    DuplicateOutputIssue, Issue, MissingSchemaSourceIssue, MissingTemplateSourceIssue,
};

pub const SCHEMA_FILE_NAME: &str = "schema.json";
pub const SETTINGS_SCHEMA_FILE: &str = "config/settings_schema.json";
const LIQUID_EXTENSION: &str = "liquid";
const JSON_EXTENSION: &str = "json";

/// A section (theme) or app block (app) with its schema and body.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionSource {
    /// Directory name; the output file is `<name>.liquid`.
    pub name: String,
    pub schema: Section,
    /// Display path of the body, relative to the source root.
    pub body_path: String,
    pub body: String,
}

/// A snippet or layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSource {
    /// Output file name, e.g. `price.liquid`.
    pub file_name: String,
    /// Display path, relative to the source root.
    pub path: String,
    pub content: String,
}

/// A file copied to the output tree as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedSource {
    /// Path relative to both the source and output roots, `/`-separated.
    pub relative_path: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SettingsSchemaSource {
    pub path: String,
    pub schema: SettingsSchema,
}

/// Everything one generation pass reads.
#[derive(Debug, Clone, Default)]
pub struct SourceSnapshot {
    pub sections: Vec<SectionSource>,
    pub snippets: Vec<TemplateSource>,
    pub layouts: Vec<TemplateSource>,
    pub settings_schema: Option<SettingsSchemaSource>,
    pub assets: Vec<CopiedSource>,
    /// Files written only when missing from the output tree.
    pub seeds: Vec<CopiedSource>,
    /// Output templates (relative to the output root) of every source that
    /// exists, including the ones that failed to load. Prune keeps these.
    pub discovered_outputs: HashSet<PathBuf>,
    /// Per-item problems; the affected items are absent from the snapshot.
    pub issues: Vec<Issue>,
}

/// What one section directory holds.
struct SectionDir {
    section: Option<SectionSource>,
    /// Output template, when the directory has a schema or a body.
    output: Option<String>,
    colocated: Vec<PathBuf>,
    issues: Vec<Issue>,
}

/// Loads snapshots from a source directory.
pub struct FileSystemSources {
    root: PathBuf,
    target: Target,
}

impl FileSystemSources {
    pub fn new(root: impl Into<PathBuf>, target: Target) -> Self {
        Self {
            root: root.into(),
            target,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read a complete snapshot.
    ///
    /// Fails only when the source root itself is unusable; per-file problems
    /// are collected into [`SourceSnapshot::issues`].
    pub fn load(&self) -> Result<SourceSnapshot> {
        if !self.root.is_dir() {
            bail!("Source root does not exist: {}", self.root.display());
        }

        let mut snapshot = SourceSnapshot::default();
        let section_dir = self.section_dir();

        // ============================================================
        // Sections / app blocks and their co-located snippets
        // ============================================================
        let section_dirs = self.list(section_dir, |p| p.is_dir())?;
        let loaded: Vec<_> = section_dirs
            .par_iter()
            .map(|dir| self.load_section(dir))
            .collect();

        let mut snippet_paths = Vec::new();
        for dir in loaded {
            snapshot.sections.extend(dir.section);
            snapshot
                .discovered_outputs
                .extend(dir.output.map(PathBuf::from));
            snippet_paths.extend(dir.colocated);
            snapshot.issues.extend(dir.issues);
        }
        snippet_paths.extend(self.list("snippets", |p| has_extension(p, LIQUID_EXTENSION))?);

        let snippet_paths = self.dedupe_outputs(snippet_paths, "snippets", &mut snapshot);
        snapshot.snippets = self.read_templates(&snippet_paths, &mut snapshot.issues);

        // ============================================================
        // Theme-only inputs
        // ============================================================
        if self.target == Target::Theme {
            let layout_paths = self.list("layout", |p| has_extension(p, LIQUID_EXTENSION))?;
            let layout_paths = self.dedupe_outputs(layout_paths, "layout", &mut snapshot);
            snapshot.layouts = self.read_templates(&layout_paths, &mut snapshot.issues);

            let settings_path = self.root.join(SETTINGS_SCHEMA_FILE);
            if settings_path.is_file() {
                match read_string(&settings_path).and_then(|c| parse_settings_schema(&c)) {
                    Ok(schema) => {
                        snapshot.settings_schema = Some(SettingsSchemaSource {
                            path: SETTINGS_SCHEMA_FILE.to_string(),
                            schema,
                        })
                    }
                    Err(err) => snapshot.issues.push(Issue::MissingSchemaSource(
                        MissingSchemaSourceIssue {
                            file_path: SETTINGS_SCHEMA_FILE.to_string(),
                            error: format!("{:#}", err),
                        },
                    )),
                }
            }

            let mut seed_paths = Vec::new();
            for dir in ["config", "templates", "templates/customers", "sections"] {
                seed_paths.extend(self.list(dir, |p| {
                    has_extension(p, JSON_EXTENSION) && !p.ends_with(SETTINGS_SCHEMA_FILE)
                })?);
            }
            snapshot.seeds = self.read_copied(&seed_paths, &mut snapshot.issues);
        }

        let asset_paths = self.list("assets", |p| p.is_file())?;
        snapshot.assets = self.read_copied(&asset_paths, &mut snapshot.issues);

        Ok(snapshot)
    }

    /// Immediate children of `dir` matching `filter`, sorted by file name.
    /// A missing directory yields nothing.
    fn list(&self, dir: &str, filter: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
        let base = self.root.join(dir);
        if !base.is_dir() {
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        for entry in WalkDir::new(&base)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.with_context(|| format!("Failed to read {}", base.display()))?;
            if filter(entry.path()) {
                paths.push(entry.into_path());
            }
        }
        Ok(paths)
    }

    /// Keep the first source for each output file name in `out_dir`; later
    /// ones are reported. Records the kept outputs as discovered.
    fn dedupe_outputs(
        &self,
        paths: Vec<PathBuf>,
        out_dir: &str,
        snapshot: &mut SourceSnapshot,
    ) -> Vec<PathBuf> {
        let mut claimed: HashMap<String, String> = HashMap::new();
        let mut kept = Vec::with_capacity(paths.len());

        for path in paths {
            let output_path = format!("{}/{}", out_dir, file_name(&path));
            let display = self.display(&path);
            match claimed.get(&output_path) {
                Some(first) => {
                    snapshot
                        .issues
                        .push(Issue::DuplicateOutput(DuplicateOutputIssue {
                            file_path: display,
                            output_path,
                            kept_path: first.clone(),
                        }))
                }
                None => {
                    snapshot
                        .discovered_outputs
                        .insert(PathBuf::from(&output_path));
                    claimed.insert(output_path, display);
                    kept.push(path);
                }
            }
        }
        kept
    }

    /// Load one section directory: its schema and body, plus the paths of
    /// snippets living next to them.
    fn load_section(&self, dir: &Path) -> SectionDir {
        let name = file_name(dir);
        let mut issues = Vec::new();

        let colocated = self
            .list_in(dir, |p| has_extension(p, LIQUID_EXTENSION) && is_snippet_name(p))
            .unwrap_or_else(|err| {
                issues.push(missing_template(&self.display(dir), &err));
                Vec::new()
            });

        let schema_path = dir.join(SCHEMA_FILE_NAME);
        let body_path = dir.join(format!("{name}.{LIQUID_EXTENSION}"));
        if !schema_path.exists() && !body_path.exists() {
            // A directory holding only snippets.
            return SectionDir {
                section: None,
                output: None,
                colocated,
                issues,
            };
        }
        let output = format!("{}/{name}.{LIQUID_EXTENSION}", self.section_dir());

        let schema = read_string(&schema_path)
            .and_then(|content| parse_section(&content))
            .map_err(|err| {
                issues.push(Issue::MissingSchemaSource(MissingSchemaSourceIssue {
                    file_path: self.display(&schema_path),
                    error: format!("{:#}", err),
                }))
            });
        let body = read_string(&body_path)
            .map_err(|err| issues.push(missing_template(&self.display(&body_path), &err)));

        let section = match (schema, body) {
            (Ok(schema), Ok(body)) => Some(SectionSource {
                name,
                schema,
                body_path: self.display(&body_path),
                body,
            }),
            _ => None,
        };
        SectionDir {
            section,
            output: Some(output),
            colocated,
            issues,
        }
    }

    fn section_dir(&self) -> &'static str {
        match self.target {
            Target::Theme => "sections",
            Target::App => "blocks",
        }
    }

    fn list_in(&self, dir: &Path, filter: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
        let relative = dir.strip_prefix(&self.root).unwrap_or(dir);
        self.list(&relative.to_string_lossy(), filter)
    }

    fn read_templates(&self, paths: &[PathBuf], issues: &mut Vec<Issue>) -> Vec<TemplateSource> {
        let results: Vec<_> = paths
            .par_iter()
            .map(|path| {
                let display = self.display(path);
                read_string(path)
                    .map(|content| TemplateSource {
                        file_name: file_name(path),
                        path: display.clone(),
                        content,
                    })
                    .map_err(|err| missing_template(&display, &err))
            })
            .collect();

        collect_ok(results, issues)
    }

    fn read_copied(&self, paths: &[PathBuf], issues: &mut Vec<Issue>) -> Vec<CopiedSource> {
        let results: Vec<_> = paths
            .par_iter()
            .map(|path| {
                let relative_path = self.display(path);
                fs::read(path)
                    .with_context(|| format!("Failed to read {}", path.display()))
                    .map(|bytes| CopiedSource {
                        relative_path: relative_path.clone(),
                        bytes,
                    })
                    .map_err(|err| missing_template(&relative_path, &err))
            })
            .collect();

        collect_ok(results, issues)
    }

    /// `/`-separated path relative to the source root.
    fn display(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn collect_ok<T>(results: Vec<std::result::Result<T, Issue>>, issues: &mut Vec<Issue>) -> Vec<T> {
    let mut items = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(item) => items.push(item),
            Err(issue) => issues.push(issue),
        }
    }
    items
}

fn missing_template(path: &str, err: &anyhow::Error) -> Issue {
    Issue::MissingTemplateSource(MissingTemplateSourceIssue {
        file_path: path.to_string(),
        error: format!("{:#}", err),
    })
}

fn read_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.is_file() && path.extension().is_some_and(|e| e == extension)
}

/// `<a>.<b>.liquid`: a dotted stem marks a snippet inside a section directory.
fn is_snippet_name(path: &Path) -> bool {
    path.file_stem()
        .is_some_and(|stem| stem.to_string_lossy().contains('.'))
}
