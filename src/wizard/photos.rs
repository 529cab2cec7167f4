//! Photo staging.
//!
//! Holds images the user selected but that have not been uploaded yet. Each
//! staged photo owns a preview acquired from the [`PreviewStore`]; the
//! preview is released when the photo is dropped, which covers explicit
//! removal, clearing after a submission, and teardown of the whole wizard.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::ports::{FileSystem, IdGenerator, PreviewStore};

/// Largest accepted photo, in bytes (10 MB).
pub const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

/// Photos allowed per request under the default policy.
pub const DEFAULT_PHOTO_CAP: usize = 4;

/// Image extensions recognized when the MIME type has to be guessed.
pub const IMAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("heic", "image/heic"),
];

/// Limits applied when staging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoPolicy {
    /// Maximum number of staged photos. `None` means unbounded.
    pub cap: Option<usize>,
    /// Maximum size per photo. `None` disables the size check.
    pub max_bytes: Option<usize>,
}

impl PhotoPolicy {
    /// At most `cap` photos of at most [`MAX_PHOTO_BYTES`] each.
    #[must_use]
    pub fn capped(cap: usize) -> Self {
        Self { cap: Some(cap), max_bytes: Some(MAX_PHOTO_BYTES) }
    }

    /// No count limit and no size check.
    #[must_use]
    pub fn unbounded() -> Self {
        Self { cap: None, max_bytes: None }
    }
}

impl Default for PhotoPolicy {
    fn default() -> Self {
        Self::capped(DEFAULT_PHOTO_CAP)
    }
}

/// A file chosen by the user, held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// File name as selected.
    pub name: String,
    /// MIME type.
    pub mime: String,
    /// Raw contents.
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    /// Wraps raw contents.
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), mime: mime.into(), bytes }
    }

    /// Reads a file from disk, guessing its MIME type from the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self, String> {
        let bytes =
            fs.read_file(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let mime = mime_for_name(&name);
        Ok(Self { name, mime: mime.to_string(), bytes })
    }

    /// Whether the MIME type is an image type.
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }

    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Guess a MIME type from a file name's extension.
#[must_use]
pub fn mime_for_name(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    IMAGE_EXTENSIONS
        .iter()
        .find(|(known, _)| *known == ext)
        .map_or("application/octet-stream", |(_, mime)| *mime)
}

/// An acquired preview URL, revoked exactly once when dropped.
pub struct PreviewHandle {
    url: String,
    store: Arc<dyn PreviewStore>,
}

impl PreviewHandle {
    /// Acquires a preview for `file`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot create the preview.
    pub fn acquire(store: &Arc<dyn PreviewStore>, file: &SelectedFile) -> std::io::Result<Self> {
        let url = store.create(file)?;
        Ok(Self { url, store: Arc::clone(store) })
    }

    /// The preview URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.store.revoke(&self.url);
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewHandle").field("url", &self.url).finish_non_exhaustive()
    }
}

/// A selected image waiting to be attached.
#[derive(Debug)]
pub struct StagedPhoto {
    /// Session-unique identifier.
    pub id: String,
    /// The selected file.
    pub file: SelectedFile,
    preview: PreviewHandle,
}

impl StagedPhoto {
    /// File name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.file.name
    }

    /// Preview URL.
    #[must_use]
    pub fn url(&self) -> &str {
        self.preview.url()
    }
}

/// The single summary message produced by a staging call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageMessage {
    /// Nothing was staged because the cap is already reached.
    CapacityReached {
        /// The active cap.
        cap: usize,
    },
    /// Some files were not images and were skipped.
    UnsupportedType {
        /// Names of the skipped files.
        rejected: Vec<String>,
    },
    /// Some files were over the size limit and were skipped.
    TooLarge {
        /// Names of the skipped files.
        rejected: Vec<String>,
        /// The active limit.
        max_bytes: usize,
    },
    /// More files than free slots; only the first ones were staged.
    Truncated {
        /// How many were staged.
        accepted: usize,
        /// How many were left out.
        dropped: usize,
    },
    /// No preview could be created for some files, so they were skipped.
    PreviewUnavailable {
        /// Names of the skipped files.
        rejected: Vec<String>,
    },
}

impl fmt::Display for StageMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageMessage::CapacityReached { cap } => {
                write!(f, "You can add at most {cap} photos. Remove one to add another.")
            }
            StageMessage::UnsupportedType { rejected } => {
                write!(f, "Only image files can be added (skipped: {}).", rejected.join(", "))
            }
            StageMessage::TooLarge { rejected, max_bytes } => write!(
                f,
                "Photos must be smaller than {} MB (skipped: {}).",
                max_bytes / (1024 * 1024),
                rejected.join(", ")
            ),
            StageMessage::Truncated { accepted, dropped } => write!(
                f,
                "Only {accepted} more photo(s) fit; {dropped} file(s) were not added."
            ),
            StageMessage::PreviewUnavailable { rejected } => {
                write!(f, "Could not prepare a preview (skipped: {}).", rejected.join(", "))
            }
        }
    }
}

/// Outcome of one staging call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageReport {
    /// IDs of the newly staged photos, in order.
    pub added: Vec<String>,
    /// At most one message describing what was left out.
    pub message: Option<StageMessage>,
}

/// Ordered list of staged photos under a [`PhotoPolicy`].
pub struct PhotoStaging {
    policy: PhotoPolicy,
    previews: Arc<dyn PreviewStore>,
    photos: Vec<StagedPhoto>,
}

impl PhotoStaging {
    /// Creates an empty staging area.
    #[must_use]
    pub fn new(policy: PhotoPolicy, previews: Arc<dyn PreviewStore>) -> Self {
        Self { policy, previews, photos: Vec::new() }
    }

    /// Stages image files, honoring the cap and size limit.
    ///
    /// Message precedence: capacity, then type, then size, then truncation,
    /// then files whose preview could not be created.
    pub fn stage(&mut self, files: Vec<SelectedFile>, ids: &dyn IdGenerator) -> StageReport {
        if files.is_empty() {
            return StageReport::default();
        }

        let (images, others): (Vec<_>, Vec<_>) =
            files.into_iter().partition(SelectedFile::is_image);

        let available = self.policy.cap.map(|cap| cap.saturating_sub(self.photos.len()));
        if let (Some(0), Some(cap)) = (available, self.policy.cap) {
            tracing::debug!(cap, "photo staging rejected: capacity reached");
            return StageReport {
                added: Vec::new(),
                message: Some(StageMessage::CapacityReached { cap }),
            };
        }

        let (mut accepted, oversized): (Vec<_>, Vec<_>) = match self.policy.max_bytes {
            Some(max) => images.into_iter().partition(|f| f.size() <= max),
            None => (images, Vec::new()),
        };

        let mut dropped = 0;
        if let Some(slots) = available {
            if accepted.len() > slots {
                dropped = accepted.len() - slots;
                accepted.truncate(slots);
            }
        }

        let mut added = Vec::with_capacity(accepted.len());
        let mut unpreviewable = Vec::new();
        for file in accepted {
            let preview = match PreviewHandle::acquire(&self.previews, &file) {
                Ok(preview) => preview,
                Err(e) => {
                    tracing::warn!(name = %file.name, error = %e, "failed to create photo preview");
                    unpreviewable.push(file.name);
                    continue;
                }
            };
            let id = ids.generate_id();
            added.push(id.clone());
            self.photos.push(StagedPhoto { id, file, preview });
        }

        let message = if !others.is_empty() {
            Some(StageMessage::UnsupportedType {
                rejected: others.into_iter().map(|f| f.name).collect(),
            })
        } else if !oversized.is_empty() {
            Some(StageMessage::TooLarge {
                rejected: oversized.into_iter().map(|f| f.name).collect(),
                max_bytes: self.policy.max_bytes.unwrap_or(MAX_PHOTO_BYTES),
            })
        } else if dropped > 0 {
            Some(StageMessage::Truncated { accepted: added.len(), dropped })
        } else if !unpreviewable.is_empty() {
            Some(StageMessage::PreviewUnavailable { rejected: unpreviewable })
        } else {
            None
        };

        if let Some(message) = &message {
            tracing::debug!(%message, staged = added.len(), "photo staging partially rejected");
        }
        StageReport { added, message }
    }

    /// Removes a staged photo and releases its preview.
    ///
    /// Returns `false` if no photo has that ID.
    pub fn unstage(&mut self, id: &str) -> bool {
        match self.photos.iter().position(|p| p.id == id) {
            Some(index) => {
                self.photos.remove(index);
                true
            }
            None => false,
        }
    }

    /// Drops every staged photo, releasing all previews.
    pub fn clear(&mut self) {
        self.photos.clear();
    }

    /// Staged photos in staging order.
    #[must_use]
    pub fn photos(&self) -> &[StagedPhoto] {
        &self.photos
    }

    /// Number of staged photos.
    #[must_use]
    pub fn len(&self) -> usize {
        self.photos.len()
    }

    /// Whether nothing is staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Free slots, or `None` when unbounded.
    #[must_use]
    pub fn remaining(&self) -> Option<usize> {
        self.policy.cap.map(|cap| cap.saturating_sub(self.photos.len()))
    }
}

/// The browse-for-files input. Its selection is cleared after every
/// hand-off so the same file can be chosen again.
#[derive(Debug, Default)]
pub struct FilePicker {
    selection: Vec<SelectedFile>,
}

impl FilePicker {
    /// Records the user's selection.
    pub fn select(&mut self, files: Vec<SelectedFile>) {
        self.selection = files;
    }

    /// Hands off the selection and resets the input.
    pub fn take(&mut self) -> Vec<SelectedFile> {
        std::mem::take(&mut self.selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{MemoryPreviewStore, SequentialIdGenerator};

    fn image(name: &str, size: usize) -> SelectedFile {
        SelectedFile::new(name, "image/jpeg", vec![0; size])
    }

    fn staging(policy: PhotoPolicy) -> (PhotoStaging, Arc<MemoryPreviewStore>) {
        let store = Arc::new(MemoryPreviewStore::new());
        let previews: Arc<dyn PreviewStore> = store.clone();
        (PhotoStaging::new(policy, previews), store)
    }

    #[test]
    fn stages_images_in_order() {
        let (mut staging, store) = staging(PhotoPolicy::default());
        let ids = SequentialIdGenerator::new("photo");

        let report = staging.stage(vec![image("a.jpg", 10), image("b.jpg", 10)], &ids);

        assert_eq!(report.added, vec!["photo-1", "photo-2"]);
        assert!(report.message.is_none());
        let names: Vec<&str> = staging.photos().iter().map(StagedPhoto::name).collect();
        assert_eq!(names, ["a.jpg", "b.jpg"]);
        assert_eq!(store.live_count(), 2);
    }

    #[test]
    fn truncates_to_available_slots() {
        let (mut staging, _store) = staging(PhotoPolicy::capped(4));
        let ids = SequentialIdGenerator::new("photo");
        staging.stage(vec![image("a.jpg", 1), image("b.jpg", 1)], &ids);

        let report = staging.stage(
            vec![image("c.jpg", 1), image("d.jpg", 1), image("e.jpg", 1)],
            &ids,
        );

        assert_eq!(report.added.len(), 2);
        assert_eq!(report.message, Some(StageMessage::Truncated { accepted: 2, dropped: 1 }));
        assert_eq!(staging.len(), 4);
        assert_eq!(staging.remaining(), Some(0));
    }

    #[test]
    fn full_staging_rejects_without_mutation() {
        let (mut staging, store) = staging(PhotoPolicy::capped(1));
        let ids = SequentialIdGenerator::new("photo");
        staging.stage(vec![image("a.jpg", 1)], &ids);

        let report = staging
            .stage(vec![image("b.jpg", 1), SelectedFile::new("c.txt", "text/plain", vec![])], &ids);

        assert!(report.added.is_empty());
        assert_eq!(report.message, Some(StageMessage::CapacityReached { cap: 1 }));
        assert_eq!(staging.len(), 1);
        assert_eq!(store.created_count(), 1);
    }

    #[test]
    fn type_message_wins_over_size_and_truncation() {
        let (mut staging, _store) = staging(PhotoPolicy::capped(1));
        let ids = SequentialIdGenerator::new("photo");

        let report = staging.stage(
            vec![
                SelectedFile::new("notes.pdf", "application/pdf", vec![1]),
                image("huge.jpg", MAX_PHOTO_BYTES + 1),
                image("a.jpg", 1),
                image("b.jpg", 1),
            ],
            &ids,
        );

        assert_eq!(report.added, vec!["photo-1"]);
        assert_eq!(
            report.message,
            Some(StageMessage::UnsupportedType { rejected: vec!["notes.pdf".into()] })
        );
    }

    #[test]
    fn size_message_wins_over_truncation() {
        let (mut staging, _store) = staging(PhotoPolicy::capped(1));
        let ids = SequentialIdGenerator::new("photo");

        let report = staging.stage(
            vec![image("huge.jpg", MAX_PHOTO_BYTES + 1), image("a.jpg", 1), image("b.jpg", 1)],
            &ids,
        );

        assert_eq!(report.added.len(), 1);
        assert_eq!(
            report.message,
            Some(StageMessage::TooLarge {
                rejected: vec!["huge.jpg".into()],
                max_bytes: MAX_PHOTO_BYTES
            })
        );
    }

    #[test]
    fn unbounded_policy_skips_cap_and_size() {
        let (mut staging, _store) = staging(PhotoPolicy::unbounded());
        let ids = SequentialIdGenerator::new("photo");
        let files: Vec<_> =
            (0..6).map(|i| image(&format!("{i}.jpg"), MAX_PHOTO_BYTES + 1)).collect();

        let report = staging.stage(files, &ids);

        assert_eq!(report.added.len(), 6);
        assert!(report.message.is_none());
        assert_eq!(staging.remaining(), None);
    }

    #[test]
    fn unstage_releases_preview_exactly_once() {
        let (mut staging, store) = staging(PhotoPolicy::default());
        let ids = SequentialIdGenerator::new("photo");
        staging.stage(vec![image("a.jpg", 1), image("b.jpg", 1)], &ids);
        let url = staging.photos()[0].url().to_string();

        assert!(staging.unstage("photo-1"));
        assert!(!staging.unstage("photo-1"));

        assert_eq!(staging.len(), 1);
        assert_eq!(store.revocations(&url), 1);
        assert_eq!(store.live_count(), 1);
    }

    #[test]
    fn teardown_releases_every_preview() {
        let (mut staging, store) = staging(PhotoPolicy::default());
        let ids = SequentialIdGenerator::new("photo");
        staging.stage(vec![image("a.jpg", 1), image("b.jpg", 1), image("c.jpg", 1)], &ids);
        staging.unstage("photo-2");

        drop(staging);

        assert_eq!(store.live_count(), 0);
        assert_eq!(store.created_count(), 3);
        assert!(store.double_revocations().is_empty());
    }

    struct BrokenPreviews;

    impl PreviewStore for BrokenPreviews {
        fn create(&self, file: &SelectedFile) -> std::io::Result<String> {
            if file.name.starts_with("broken") {
                return Err(std::io::Error::other("disk full"));
            }
            Ok(format!("blob:{}", file.name))
        }

        fn revoke(&self, _url: &str) {}
    }

    #[test]
    fn files_without_preview_are_reported() {
        let mut staging = PhotoStaging::new(PhotoPolicy::default(), Arc::new(BrokenPreviews));
        let ids = SequentialIdGenerator::new("photo");

        let report = staging.stage(vec![image("ok.jpg", 1), image("broken.jpg", 1)], &ids);

        assert_eq!(report.added, vec!["photo-1".to_string()]);
        assert_eq!(
            report.message,
            Some(StageMessage::PreviewUnavailable { rejected: vec!["broken.jpg".into()] })
        );
        assert_eq!(staging.len(), 1);
    }

    #[test]
    fn picker_resets_after_take() {
        let mut picker = FilePicker::default();
        picker.select(vec![image("a.jpg", 1)]);
        assert_eq!(picker.take().len(), 1);
        assert!(picker.take().is_empty());
    }

    #[test]
    fn mime_is_guessed_from_extension() {
        assert_eq!(mime_for_name("IMG_0001.JPG"), "image/jpeg");
        assert_eq!(mime_for_name("sink.webp"), "image/webp");
        assert_eq!(mime_for_name("notes.txt"), "application/octet-stream");
        assert_eq!(mime_for_name("README"), "application/octet-stream");
    }
}
