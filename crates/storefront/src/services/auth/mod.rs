//! Authentication service.
//!
//! Signup, login and logout against the identity registry in the store.
//! Passwords are hashed with Argon2id; only the PHC hash is persisted.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::instrument;

use shopfront_core::{Email, Identity, MIN_PASSWORD_LEN, StoredIdentity};

use crate::models::Session;
use crate::store::{Store, keys};

/// Authentication service.
///
/// Every successful signup, login or logout updates the given [`Session`] and
/// persists (or removes) the `session` key before returning.
pub struct AuthService<'a> {
    store: &'a Store,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Register a new identity and sign in as it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidName` if the name is blank.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password is too short.
    /// Returns `AuthError::DuplicateIdentity` if the email is already registered.
    #[instrument(skip(self, session, password))]
    pub fn signup(
        &self,
        session: &mut Session,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Identity, AuthError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::InvalidName);
        }
        let email = Email::parse(email)?;
        validate_password(password)?;

        let mut users = self.registry()?;
        if users.iter().any(|u| u.email == email) {
            return Err(AuthError::DuplicateIdentity);
        }

        let stored = StoredIdentity {
            name: name.to_string(),
            email,
            password_hash: shopfront_core::PasswordHash::new(hash_password(password)?),
            role: None,
        };
        let identity = stored.identity();
        users.push(stored);
        self.store.set(keys::USERS, &users)?;

        self.start_session(session, identity.clone())?;
        tracing::info!(email = %identity.email, "Identity registered");
        Ok(identity)
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if no identity matches both.
    #[instrument(skip(self, session, password))]
    pub fn login(
        &self,
        session: &mut Session,
        email: &str,
        password: &str,
    ) -> Result<Identity, AuthError> {
        // A malformed email cannot match any registry entry
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let users = self.registry()?;
        let stored = users
            .iter()
            .find(|u| u.email == email)
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, stored.password_hash.as_str())?;

        let identity = stored.identity();
        self.start_session(session, identity.clone())?;
        tracing::info!(email = %identity.email, "Logged in");
        Ok(identity)
    }

    /// Sign out. Carts, orders and wishlists of the identity are kept.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the session key cannot be removed.
    #[instrument(skip(self, session))]
    pub fn logout(&self, session: &mut Session) -> Result<(), AuthError> {
        self.store.remove(keys::SESSION)?;
        if let Some(identity) = session.clear() {
            tracing::info!(email = %identity.email, "Logged out");
        }
        Ok(())
    }

    /// The identity the session is signed in as.
    #[must_use]
    pub fn current_identity<'s>(&self, session: &'s Session) -> Option<&'s Identity> {
        session.identity()
    }

    fn registry(&self) -> Result<Vec<StoredIdentity>, AuthError> {
        Ok(self.store.get_or_default(keys::USERS)?)
    }

    fn start_session(&self, session: &mut Session, identity: Identity) -> Result<(), AuthError> {
        self.store.set(keys::SESSION, &identity)?;
        session.set(identity);
        Ok(())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Validate password strength.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
