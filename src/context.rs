//! Service context bundling all port trait objects.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::adapters::memory::{
    FixedClock, FixedSession, MemoryFileSystem, MemoryPreviewStore, MemoryTaskApi,
    RecordingNavigator, SequentialIdGenerator, StaticCategoryApi,
};
use crate::config::Config;
use crate::ports::{
    CategoryApi, Clock, FileSystem, IdGenerator, Navigator, PreviewStore, Session, TaskApi,
};

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors wire up
/// different adapter implementations (live or in-memory); tests replace
/// individual fields.
pub struct ServiceContext {
    /// Task creation and photo attachment.
    pub tasks: Box<dyn TaskApi>,
    /// Category listing.
    pub categories: Box<dyn CategoryApi>,
    /// Whether the user is signed in.
    pub session: Box<dyn Session>,
    /// Redirects.
    pub navigator: Box<dyn Navigator>,
    /// Preview resources for staged photos.
    pub previews: Arc<dyn PreviewStore>,
    /// Reading photos from disk.
    pub fs: Box<dyn FileSystem>,
    /// Staged-photo identifiers.
    pub id_gen: Box<dyn IdGenerator>,
    /// Today's date.
    pub clock: Box<dyn Clock>,
}

impl ServiceContext {
    /// Creates a live context talking to the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn live(config: &Config) -> Result<Self, String> {
        use crate::adapters::live::clock::LiveClock;
        use crate::adapters::live::filesystem::LiveFileSystem;
        use crate::adapters::live::http::HttpApi;
        use crate::adapters::live::id_gen::LiveIdGenerator;
        use crate::adapters::live::navigator::TerminalNavigator;
        use crate::adapters::live::preview::TempFilePreviewStore;
        use crate::adapters::live::session::TokenSession;

        let api = HttpApi::new(config).map_err(|e| format!("Failed to set up API client: {e}"))?;

        Ok(Self {
            tasks: Box::new(api.clone()),
            categories: Box::new(api),
            session: Box::new(TokenSession::new(config.api_token.clone())),
            navigator: Box::new(TerminalNavigator::new()),
            previews: Arc::new(TempFilePreviewStore::new()),
            fs: Box::new(LiveFileSystem),
            id_gen: Box::new(LiveIdGenerator),
            clock: Box::new(LiveClock),
        })
    }

    /// Creates a fully in-memory context: authenticated, no categories,
    /// every task accepted, fixed date 2025-01-01.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            tasks: Box::new(MemoryTaskApi::new()),
            categories: Box::new(StaticCategoryApi::new(Vec::new())),
            session: Box::new(FixedSession(true)),
            navigator: Box::new(RecordingNavigator::new()),
            previews: Arc::new(MemoryPreviewStore::new()),
            fs: Box::new(MemoryFileSystem::new()),
            id_gen: Box::new(SequentialIdGenerator::new("photo")),
            clock: Box::new(FixedClock(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default())),
        }
    }
}
