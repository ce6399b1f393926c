use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use clap::ValueEnum;
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::frequency::DEFAULT_HOIST_WORD_LIMIT;

pub const CONFIG_FILE_NAME: &str = ".themegenrc.json";

/// Generated snippets with this suffix are maintained by hand once created.
pub const ALWAYS_EXEMPT_PATTERNS: &[&str] = &["*_translations.liquid"];

/// Prefix applied to app block classes when none is configured.
pub const DEFAULT_APP_CLASS_PREFIX: &str = "tw-";

/// What kind of output tree is generated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// An online store theme: sections, snippets, layouts, settings schema.
    #[default]
    Theme,
    /// A theme app extension: app blocks and snippets.
    App,
}

impl Target {
    fn default_output_root(self) -> &'static str {
        match self {
            Target::Theme => "./theme",
            Target::App => "./extensions/app",
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub target: Target,
    #[serde(default = "default_source_root")]
    pub source_root: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_root: Option<String>,
    #[serde(default = "default_localize")]
    pub localize: bool,
    #[serde(default)]
    pub delete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_render: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_render: Option<String>,
    #[serde(default)]
    pub ignore_assets: Vec<String>,
    #[serde(default = "default_hoist_word_limit")]
    pub hoist_word_limit: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_prefix: Option<String>,
}

fn default_source_root() -> String {
    "./".to_string()
}

fn default_localize() -> bool {
    true
}

fn default_hoist_word_limit() -> usize {
    DEFAULT_HOIST_WORD_LIMIT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target: Target::default(),
            source_root: default_source_root(),
            output_root: None,
            localize: default_localize(),
            delete: false,
            before_render: None,
            after_render: None,
            ignore_assets: Vec::new(),
            hoist_word_limit: default_hoist_word_limit(),
            class_prefix: None,
        }
    }
}

impl Config {
    /// Configured output root, or the target's conventional one.
    pub fn output_root(&self) -> &str {
        self.output_root
            .as_deref()
            .unwrap_or_else(|| self.target.default_output_root())
    }

    /// Class prefix to apply, if any. An empty configured prefix disables prefixing.
    pub fn class_prefix(&self) -> Option<&str> {
        match (&self.class_prefix, self.target) {
            (Some(prefix), _) if prefix.is_empty() => None,
            (Some(prefix), _) => Some(prefix),
            (None, Target::App) => Some(DEFAULT_APP_CLASS_PREFIX),
            (None, Target::Theme) => None,
        }
    }

    /// Exempt file name patterns: `ignoreAssets` plus the always-exempt ones.
    pub fn exempt_patterns(&self) -> Result<Vec<Pattern>> {
        ALWAYS_EXEMPT_PATTERNS
            .iter()
            .copied()
            .chain(self.ignore_assets.iter().map(String::as_str))
            .map(|p| {
                Pattern::new(p)
                    .with_context(|| format!("Invalid pattern in 'ignoreAssets': \"{}\"", p))
            })
            .collect()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if let Some(prefix) = &self.class_prefix
            && !prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            bail!(
                "Invalid 'classPrefix': \"{}\" (only letters, digits, '-' and '_' are allowed)",
                prefix
            );
        }

        if self.hoist_word_limit == 0 {
            bail!("Invalid 'hoistWordLimit': must be at least 1");
        }

        for name in &self.ignore_assets {
            if name.contains('/') || name.contains('\\') {
                bail!(
                    "Invalid entry in 'ignoreAssets': \"{}\" (file names only, no paths)",
                    name
                );
            }
        }
        self.exempt_patterns()?;

        Ok(())
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    // A relative `.` cannot be popped to its parent.
    let mut current = start_dir
        .canonicalize()
        .unwrap_or_else(|_| start_dir.to_path_buf());

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
    /// Directory relative config paths are resolved against: the config
    /// file's directory, or the start directory when using defaults.
    pub base_dir: PathBuf,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            let base_dir = path
                .parent()
                .map_or_else(|| start_dir.to_path_buf(), Path::to_path_buf);
            Ok(ConfigLoadResult {
                config,
                from_file: true,
                base_dir,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
            base_dir: start_dir.to_path_buf(),
        }),
    }
}
