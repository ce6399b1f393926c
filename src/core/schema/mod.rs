//! Schema definitions consumed by the localizer.
//!
//! ## Module Structure
//!
//! - `types`: section/block/preset/setting node types and their JSON mapping

pub mod types;

pub use types::*;

use anyhow::{Context, Result};

/// Parse a single section (or app block) definition.
pub fn parse_section(content: &str) -> Result<Section> {
    serde_json::from_str(content).context("Failed to parse section schema")
}

/// Parse the top-level settings schema.
pub fn parse_settings_schema(content: &str) -> Result<SettingsSchema> {
    serde_json::from_str(content).context("Failed to parse settings schema")
}
