//! Fixed session.

use crate::ports::Session;

/// A session whose authentication state never changes.
pub struct FixedSession(pub bool);

impl Session for FixedSession {
    fn is_authenticated(&self) -> bool {
        self.0
    }
}
