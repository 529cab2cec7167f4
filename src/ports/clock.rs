//! Clock port for obtaining the current date.

use chrono::NaiveDate;

/// Provides today's date.
///
/// Abstracting time access lets relative deadlines ("today", "tomorrow")
/// resolve deterministically in tests.
pub trait Clock: Send + Sync {
    /// Returns the current local date.
    fn today(&self) -> NaiveDate;
}
