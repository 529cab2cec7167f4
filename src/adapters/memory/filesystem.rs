//! In-memory filesystem.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::ports::FileSystem;

/// Serves file contents from a map.
#[derive(Default)]
pub struct MemoryFileSystem {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryFileSystem {
    /// Creates an empty filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: Vec<u8>) -> Self {
        self.files.insert(path.into(), contents);
        self
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_file(&self, path: &Path) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| format!("No such file: {}", path.display()).into())
    }
}
