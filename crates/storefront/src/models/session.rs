//! Session state for a profile.
//!
//! At most one identity is current at a time. The session is an explicit
//! value: it is restored from the store once, passed to every identity-scoped
//! operation, and persisted by the auth service on login, signup and logout.

use shopfront_core::{Email, Identity};

use crate::store::{Store, StoreError, keys};

/// The signed-in identity of a profile, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    current: Option<Identity>,
}

impl Session {
    /// A session with nobody signed in.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { current: None }
    }

    /// A session signed in as `identity`.
    #[must_use]
    pub const fn signed_in(identity: Identity) -> Self {
        Self {
            current: Some(identity),
        }
    }

    /// Restore the persisted session. A malformed session reads as anonymous.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be read.
    pub fn restore(store: &Store) -> Result<Self, StoreError> {
        let current: Option<Identity> = store.get(keys::SESSION)?;
        if let Some(identity) = &current {
            tracing::debug!(email = %identity.email, "Restored session");
        }
        Ok(Self { current })
    }

    /// The current identity.
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        self.current.as_ref()
    }

    /// Email of the current identity.
    #[must_use]
    pub fn email(&self) -> Option<&Email> {
        self.current.as_ref().map(|identity| &identity.email)
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub(crate) fn set(&mut self, identity: Identity) {
        self.current = Some(identity);
    }

    pub(crate) fn clear(&mut self) -> Option<Identity> {
        self.current.take()
    }
}
