//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the wizard core and an external
//! system (backend API, navigation, session, previews, files, time, IDs).
//! Implementations live in `src/adapters/`.

pub mod categories;
pub mod clock;
pub mod filesystem;
pub mod id_gen;
pub mod navigator;
pub mod preview;
pub mod session;
pub mod tasks;

use std::future::Future;
use std::pin::Pin;

use crate::error::ApiError;

pub use categories::CategoryApi;
pub use clock::Clock;
pub use filesystem::FileSystem;
pub use id_gen::IdGenerator;
pub use navigator::{NavigateOptions, Navigator};
pub use preview::PreviewStore;
pub use session::Session;
pub use tasks::{NewTask, TaskApi};

/// Boxed future returned by async ports, keeping the traits dyn-compatible.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;
