//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `build`: Generate the output tree from sources
//! - `init`: Initialize themegen configuration file
//!
//! Build flags can also be set through `THEMEGEN_*` environment variables.
//! Resolution order: flag > environment > `.themegenrc.json` > defaults.

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::config::{Config, Target};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Build(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Project directory, where the config file is searched from
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct BuildCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Kind of output tree to generate (overrides config file)
    #[arg(long, value_enum)]
    pub target: Option<Target>,

    /// Output directory (overrides config file)
    #[arg(long, env = "THEMEGEN_OUTPUT_ROOT")]
    pub output_root: Option<String>,

    /// Emit literal text instead of translation references
    #[arg(long, env = "THEMEGEN_NO_LOCALIZATION")]
    pub no_localization: bool,

    /// Delete generated templates whose source no longer exists
    #[arg(long, env = "THEMEGEN_DELETE")]
    pub delete: bool,

    /// Text placed before every section body
    #[arg(long, env = "THEMEGEN_BEFORE_RENDER")]
    pub before_render: Option<String>,

    /// Text placed after every section body
    #[arg(long, env = "THEMEGEN_AFTER_RENDER")]
    pub after_render: Option<String>,

    /// File names that are only created, never overwritten or deleted
    #[arg(long, env = "THEMEGEN_IGNORE_ASSETS", value_delimiter = ',')]
    pub ignore_assets: Vec<String>,

    /// Prefix for utility classes (empty to disable)
    #[arg(long, env = "THEMEGEN_CLASS_PREFIX")]
    pub class_prefix: Option<String>,
}

impl BuildCommand {
    /// Apply flag and environment overrides on top of the loaded config.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(target) = self.target {
            config.target = target;
        }
        if let Some(output_root) = &self.output_root {
            config.output_root = Some(output_root.clone());
        }
        if self.no_localization {
            config.localize = false;
        }
        if self.delete {
            config.delete = true;
        }
        if let Some(before) = &self.before_render {
            config.before_render = Some(before.clone());
        }
        if let Some(after) = &self.after_render {
            config.after_render = Some(after.clone());
        }
        config.ignore_assets.extend(
            self.ignore_assets
                .iter()
                .map(|name| name.trim())
                .filter(|name| !name.is_empty())
                .map(String::from),
        );
        if let Some(prefix) = &self.class_prefix {
            config.class_prefix = Some(prefix.clone());
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate sections, snippets, layouts and locale files from sources
    Build(BuildCommand),
    /// Initialize a new .themegenrc.json configuration file
    Init,
}
