//! Session port.

/// Reports whether the current user is signed in.
pub trait Session: Send + Sync {
    /// `true` when requests can be created on the user's behalf.
    fn is_authenticated(&self) -> bool;
}
