//! Local key-value persistence for one profile.
//!
//! Every persisted value is JSON text stored under a namespaced string key.
//! There are no transactions and no locking; callers that need atomicity
//! across keys (order placement) restore the previous value on failure.
//!
//! # Keys
//!
//! - `users` - registry of [`StoredIdentity`](shopfront_core::StoredIdentity)
//! - `session` - the current [`Identity`](shopfront_core::Identity)
//! - `cart:{email}` - an identity's cart
//! - `orders:{email}` - an identity's order history
//! - `reviews:{product_id}` - a product's reviews, newest first
//! - `wishlist:{email}` - an identity's wishlisted product ids
//!
//! # Backends
//!
//! - [`MemoryStore`] - process-local map, for tests and ephemeral profiles
//! - [`FileStore`] - one JSON file per key inside a profile directory

mod file;
mod memory;

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors from the persistence boundary.
///
/// Malformed stored JSON is not an error; it reads as absent.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a key failed.
    #[error("store I/O error on key {key:?}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The profile directory could not be prepared.
    #[error("cannot open profile directory {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A value could not be encoded as JSON.
    #[error("cannot encode value for key {key:?}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Raw string-keyed storage of JSON text.
pub trait KeyValueStore: Send + Sync {
    /// Read the text stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the backend fails to read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the backend fails to write.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the backend fails to delete.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Key names.
pub mod keys {
    use shopfront_core::{Email, ProductId};

    /// Registry of every signed-up identity.
    pub const USERS: &str = "users";

    /// The current identity of this profile.
    pub const SESSION: &str = "session";

    #[must_use]
    pub fn cart(email: &Email) -> String {
        format!("cart:{email}")
    }

    #[must_use]
    pub fn orders(email: &Email) -> String {
        format!("orders:{email}")
    }

    #[must_use]
    pub fn reviews(product_id: ProductId) -> String {
        format!("reviews:{product_id}")
    }

    #[must_use]
    pub fn wishlist(email: &Email) -> String {
        format!("wishlist:{email}")
    }
}

/// Typed JSON access over a [`KeyValueStore`].
///
/// Cheaply cloneable; clones share the backend.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

impl Store {
    /// Wrap an existing backend.
    #[must_use]
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// A fresh, empty in-memory store.
    #[must_use]
    pub fn memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Open (creating if needed) a file-backed profile at `dir`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Open` if the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        Ok(Self::new(Arc::new(FileStore::open(dir)?)))
    }

    /// The underlying raw store.
    #[must_use]
    pub fn raw(&self) -> &dyn KeyValueStore {
        self.backend.as_ref()
    }

    /// Read and decode the value under `key`.
    ///
    /// Missing keys and text that does not decode as `T` both read as `None`;
    /// the latter is logged at WARN.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the backend fails to read.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(text) = self.backend.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&text) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key, error = %e, "Ignoring malformed stored value");
                Ok(None)
            }
        }
    }

    /// Like [`get`](Self::get), with `T::default()` for absent values.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the backend fails to read.
    pub fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, StoreError> {
        Ok(self.get(key)?.unwrap_or_default())
    }

    /// Encode `value` as JSON and store it under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Encode` if encoding fails or `StoreError::Io` if
    /// the backend fails to write.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let text = serde_json::to_string(value).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.backend.set(key, &text)
    }

    /// Delete `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the backend fails to delete.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.backend.remove(key)
    }

    /// Restore `key` to a previously read raw value.
    pub(crate) fn restore(&self, key: &str, previous: Option<&str>) -> Result<(), StoreError> {
        match previous {
            Some(text) => self.backend.set(key, text),
            None => self.backend.remove(key),
        }
    }
}
