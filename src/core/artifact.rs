use std::path::{Path, PathBuf};

/// A generated output file, relative to the output root.
///
/// Produced fresh each pass and never mutated afterwards; the synchronizer
/// only compares and persists it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    path: PathBuf,
    content: Vec<u8>,
    create_only: bool,
}

impl Artifact {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            create_only: false,
        }
    }

    /// An artifact written only when the target does not exist yet.
    pub fn seed(path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            create_only: true,
            ..Self::new(path, content)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn is_create_only(&self) -> bool {
        self.create_only
    }

    /// Content as text, when it is valid UTF-8.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }
}
