//! Authenticated user as reported by the auth backend.

use serde::{Deserialize, Serialize};

/// The current user, visible to any page without explicit threading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
}
