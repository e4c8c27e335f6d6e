//! Resolved caller identity.

use std::fmt::{Debug, Formatter};
use uuid::Uuid;

/// Stable identifier of a person that can own data projects.
pub type PersonId = Uuid;

/// The already-authenticated caller of a lifecycle operation.
///
/// Resolution from a session or request header happens outside core; the
/// lifecycle manager only ever receives this value as an explicit argument.
#[derive(Clone, PartialEq, Eq)]
pub struct Principal {
    pub person_id: PersonId,
    /// Opaque credential forwarded to the remote repository service.
    pub token: String,
}

impl Principal {
    pub fn new(person_id: PersonId, token: impl Into<String>) -> Self {
        Self {
            person_id,
            token: token.into(),
        }
    }
}

// Token stays out of debug output so principals can be logged safely.
impl Debug for Principal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Principal")
            .field("person_id", &self.person_id)
            .field("token", &"<redacted>")
            .finish()
    }
}
