//! Registered identities.
//!
//! [`StoredIdentity`] is the registry entry and carries the password hash.
//! [`Identity`] is the public projection held in a session; it never carries
//! the credential.

use serde::{Deserialize, Serialize};

use crate::types::{Email, PasswordHash, Role};

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

/// The identity a session is signed in as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl Identity {
    /// Role to display; identities without one are shown as [`Role::User`].
    #[must_use]
    pub fn display_role(&self) -> Role {
        self.role.unwrap_or_default()
    }

    /// Name to greet the identity with.
    #[must_use]
    pub fn display_name(&self) -> &str {
        let name = self.name.trim();
        if name.is_empty() { "User" } else { name }
    }
}

/// A registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredIdentity {
    pub name: String,
    pub email: Email,
    pub password_hash: PasswordHash,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl StoredIdentity {
    /// The public projection of this entry.
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity {
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}
