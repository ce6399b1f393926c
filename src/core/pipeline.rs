//! One generation pass.
//!
//! Wires the engine together over an immutable source snapshot:
//! frequency index, schema localization, class rewriting, translation
//! extraction and locale documents. Produces artifacts and issues; performs
//! no I/O.

use std::borrow::Cow;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::{Config, Target};
use crate::core::artifact::Artifact;
use crate::core::classes;
use crate::core::extract::{Extraction, Translations, extract, malformed_spans, unwrap_spans};
use crate::core::frequency::FrequencyIndex;
use crate::core::locale::{LocaleDocument, schema_locale};
use crate::core::localize::{
    BLOCKS_ROOT, LocaleEntry, SECTIONS_ROOT, SETTINGS_SCHEMA_ROOT, SchemaLocalizer,
};
use crate::core::normalize::{NormalizedKey, normalize};
use crate::core::schema::{Section, SettingsSchema};
use crate::issues::{Issue, MalformedSpanIssue, SourceLocation};
use crate::sources::{SectionSource, SourceSnapshot, TemplateSource};
use crate::utils::source_line;

pub const LOCALE_FILE: &str = "locales/en.default.json";
pub const SCHEMA_LOCALE_FILE: &str = "locales/en.default.schema.json";
pub const SETTINGS_SCHEMA_OUTPUT: &str = "config/settings_schema.json";
pub const SNIPPETS_DIR: &str = "snippets";
pub const LAYOUT_DIR: &str = "layout";

const SCHEMA_OPEN: &str = "{% schema %}";
const SCHEMA_CLOSE: &str = "{% endschema %}";

/// Settings for one pass.
#[derive(Debug, Clone, Copy)]
pub struct PassOptions<'a> {
    pub target: Target,
    pub localize: bool,
    pub before_render: Option<&'a str>,
    pub after_render: Option<&'a str>,
    pub class_prefix: Option<&'a str>,
    pub hoist_word_limit: usize,
}

impl<'a> PassOptions<'a> {
    pub fn from_config(config: &'a Config) -> Self {
        Self {
            target: config.target,
            localize: config.localize,
            before_render: config.before_render.as_deref(),
            after_render: config.after_render.as_deref(),
            class_prefix: config.class_prefix(),
            hoist_word_limit: config.hoist_word_limit,
        }
    }

    /// Reference root for section (or app block) schemas.
    pub fn schema_root(&self) -> &'static str {
        match self.target {
            Target::Theme => SECTIONS_ROOT,
            Target::App => BLOCKS_ROOT,
        }
    }

    /// Output directory for section (or app block) templates.
    pub fn sections_dir(&self) -> &'static str {
        self.schema_root()
    }
}

/// Everything a pass produced.
#[derive(Debug, Default)]
pub struct PassOutput {
    pub artifacts: Vec<Artifact>,
    pub issues: Vec<Issue>,
}

/// Run a full generation pass over `snapshot`.
pub fn generate(snapshot: &SourceSnapshot, options: &PassOptions) -> Result<PassOutput> {
    let mut pass = Pass::new(snapshot, options);
    pass.run()?;
    Ok(pass.output)
}

struct Pass<'a> {
    snapshot: &'a SourceSnapshot,
    options: &'a PassOptions<'a>,
    index: FrequencyIndex,
    translations: Translations,
    schema_entries: Vec<LocaleEntry>,
    output: PassOutput,
}

impl<'a> Pass<'a> {
    fn new(snapshot: &'a SourceSnapshot, options: &'a PassOptions<'a>) -> Self {
        let index = if options.localize {
            FrequencyIndex::build(
                snapshot.sections.iter().map(|s| &s.schema),
                options.hoist_word_limit,
            )
        } else {
            FrequencyIndex::empty(options.hoist_word_limit)
        };

        Self {
            snapshot,
            options,
            index,
            translations: Translations::new(),
            schema_entries: Vec::new(),
            output: PassOutput::default(),
        }
    }

    fn run(&mut self) -> Result<()> {
        let snapshot = self.snapshot;

        for section in &snapshot.sections {
            self.section(section)?;
        }
        for snippet in &snapshot.snippets {
            self.template(SNIPPETS_DIR, snippet);
        }
        for layout in &snapshot.layouts {
            self.template(LAYOUT_DIR, layout);
        }

        let settings_entries = match &snapshot.settings_schema {
            Some(source) => self.settings_schema(source.schema.clone())?,
            None => Vec::new(),
        };

        if self.options.localize {
            self.locales(settings_entries)?;
        }

        for asset in &snapshot.assets {
            self.output
                .artifacts
                .push(Artifact::new(&asset.relative_path, asset.bytes.clone()));
        }
        for seed in &snapshot.seeds {
            self.output
                .artifacts
                .push(Artifact::seed(&seed.relative_path, seed.bytes.clone()));
        }
        Ok(())
    }

    fn section(&mut self, source: &SectionSource) -> Result<()> {
        let body = self.body(&source.name, &source.body_path, &source.body);
        let schema = self.section_schema(&source.schema);
        let json = to_pretty_json(&schema)
            .with_context(|| format!("Failed to serialize schema of {}", source.body_path))?;

        let content = [
            self.options.before_render.unwrap_or_default(),
            body.as_str(),
            self.options.after_render.unwrap_or_default(),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .chain([SCHEMA_OPEN, json.as_str(), SCHEMA_CLOSE, ""])
        .collect::<Vec<_>>()
        .join("\n");

        let path = format!("{}/{}.liquid", self.options.sections_dir(), source.name);
        self.output.artifacts.push(Artifact::new(path, content));
        Ok(())
    }

    fn section_schema(&mut self, schema: &Section) -> Section {
        let schema = schema.clone().without_tool_fields();
        if !self.options.localize {
            return schema;
        }

        let group = normalize(&schema.name);
        let localizer = SchemaLocalizer::new(self.options.schema_root(), &self.index);
        let localized = localizer.localize_section(schema, group.as_str());
        self.schema_entries.extend(localized.entries);
        localized.node
    }

    fn template(&mut self, dir: &str, source: &TemplateSource) {
        let body = self.body(&source.file_name, &source.path, &source.content);
        let path = format!("{}/{}", dir, source.file_name);
        self.output.artifacts.push(Artifact::new(path, body));
    }

    /// Class rewriting, then translation extraction (or span unwrapping).
    ///
    /// Malformed spans are located in the source as written, since class
    /// rewriting may move text across lines.
    fn body(&mut self, name: &str, display_path: &str, content: &str) -> String {
        let rewritten = match self.options.class_prefix {
            Some(prefix) => classes::rewrite(content, prefix),
            None => content.into(),
        };

        let Extraction { text, malformed } = if self.options.localize {
            let group = translation_group(name);
            extract(&group, &rewritten, self.translations.group_mut(&group))
        } else {
            unwrap_spans(&rewritten)
        };
        let malformed = match rewritten {
            Cow::Owned(_) if !malformed.is_empty() => malformed_spans(content),
            _ => malformed,
        };

        self.output
            .issues
            .extend(malformed.into_iter().map(|span| {
                Issue::MalformedSpan(MalformedSpanIssue {
                    location: SourceLocation::new(
                        display_path,
                        span.line,
                        span.col,
                        source_line(content, span.line),
                    ),
                    kind: span.kind,
                })
            }));
        text
    }

    fn settings_schema(&mut self, schema: SettingsSchema) -> Result<Vec<LocaleEntry>> {
        let (schema, entries) = if self.options.localize {
            // No hoisting for the settings schema.
            let index = FrequencyIndex::empty(self.options.hoist_word_limit);
            let localized =
                SchemaLocalizer::new(SETTINGS_SCHEMA_ROOT, &index).localize_settings_schema(schema);
            (localized.node, localized.entries)
        } else {
            (schema, Vec::new())
        };

        let json = to_pretty_json(&schema).context("Failed to serialize settings schema")?;
        self.output
            .artifacts
            .push(Artifact::new(SETTINGS_SCHEMA_OUTPUT, format!("{json}\n")));
        Ok(entries)
    }

    fn locales(&mut self, settings_entries: Vec<LocaleEntry>) -> Result<()> {
        let translations = std::mem::take(&mut self.translations);
        let mut messages = LocaleDocument::new();
        for (group, table) in translations.iter() {
            for (key, text) in table.iter() {
                messages.insert(
                    &format!("{group}.{key}"),
                    serde_json::Value::String(text.to_string()),
                );
            }
        }
        self.output
            .artifacts
            .push(Artifact::new(LOCALE_FILE, messages.to_pretty_string()?));

        let mut schema_document = schema_locale(
            self.options.schema_root(),
            &self.index,
            &self.schema_entries,
        );
        for entry in &settings_entries {
            schema_document.insert(&entry.path, serde_json::Value::String(entry.text.clone()));
        }
        self.output.artifacts.push(Artifact::new(
            SCHEMA_LOCALE_FILE,
            schema_document.to_pretty_string()?,
        ));
        Ok(())
    }
}

/// Translation group of a template: its file name up to the first `.`.
pub fn translation_group(file_name: &str) -> NormalizedKey {
    let stem = file_name.split('.').next().unwrap_or(file_name);
    normalize(stem)
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize JSON")
}
