//! ID generator port for staged-photo identifiers.

/// Generates identifiers unique within a wizard session.
pub trait IdGenerator: Send + Sync {
    /// Generates a new unique identifier string.
    fn generate_id(&self) -> String;
}
