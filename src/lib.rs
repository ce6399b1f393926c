//! Themegen - localized storefront template generator
//!
//! Themegen builds a theme (or theme app extension) output tree from section
//! and block sources: schemas are rewritten to translation references,
//! `<t>` spans in templates become translation lookups, utility classes can be
//! namespaced, and the generated files are synced with minimal writes.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Generation engine (pure, no I/O)
//! - `issues`: Issue type definitions and reporting
//! - `sources`: Reads source snapshots from disk
//! - `sync`: Persists artifacts to the output tree
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
pub mod sources;
pub mod sync;
pub mod utils;
