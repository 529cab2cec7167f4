//! In-memory adapters for tests and scripted sessions.
//!
//! Each adapter records what it was asked to do behind a shared handle, so a
//! test can move the adapter into a [`crate::context::ServiceContext`] and
//! still inspect the calls afterwards.

pub mod categories;
pub mod clock;
pub mod filesystem;
pub mod id_gen;
pub mod navigator;
pub mod preview;
pub mod session;
pub mod tasks;

pub use categories::StaticCategoryApi;
pub use clock::FixedClock;
pub use filesystem::MemoryFileSystem;
pub use id_gen::SequentialIdGenerator;
pub use navigator::{Navigation, RecordingNavigator};
pub use preview::MemoryPreviewStore;
pub use session::FixedSession;
pub use tasks::{MemoryTaskApi, TaskCall};
