//! Live preview store writing previews to a temporary directory.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::ports::PreviewStore;
use crate::wizard::photos::SelectedFile;

/// Materializes each preview as a temp file and deletes it on revoke.
pub struct TempFilePreviewStore {
    dir: PathBuf,
}

impl TempFilePreviewStore {
    /// Stores previews under `<tmp>/neighborly-previews`.
    #[must_use]
    pub fn new() -> Self {
        Self::in_dir(std::env::temp_dir().join("neighborly-previews"))
    }

    /// Stores previews under `dir`.
    #[must_use]
    pub fn in_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(url: &str) -> Option<&Path> {
        url.strip_prefix("file://").map(Path::new)
    }
}

impl Default for TempFilePreviewStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewStore for TempFilePreviewStore {
    fn create(&self, file: &SelectedFile) -> std::io::Result<String> {
        std::fs::create_dir_all(&self.dir)?;
        let name: String = file
            .name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' { c } else { '_' })
            .collect();
        let path = self.dir.join(format!("{}-{name}", Uuid::new_v4()));
        std::fs::write(&path, &file.bytes)?;
        Ok(format!("file://{}", path.display()))
    }

    fn revoke(&self, url: &str) {
        let Some(path) = Self::path_for(url) else {
            tracing::warn!(url, "not a preview URL");
            return;
        };
        if let Err(e) = std::fs::remove_file(path) {
            tracing::warn!(url, error = %e, "failed to release preview");
        }
    }
}
