//! Generation engine.
//!
//! Pure, in-memory transforms over a source snapshot:
//!
//! - `normalize`: human text to slug keys
//! - `frequency`: which short texts are shared across the schema forest
//! - `localize`: schema trees rewritten to `t:` references
//! - `extract`: `<t>` spans in templates rewritten to translation lookups
//! - `classes`: namespacing of utility class tokens
//! - `locale`: nested locale JSON documents
//! - `pipeline`: one full pass producing [`Artifact`]s
//!
//! Nothing in here touches the file system or prints.

pub mod artifact;
pub mod classes;
pub mod extract;
pub mod frequency;
pub mod locale;
pub mod localize;
pub mod normalize;
pub mod pipeline;
pub mod schema;

pub use artifact::Artifact;
pub use normalize::{NormalizedKey, normalize};
pub use pipeline::{PassOptions, PassOutput, generate};
