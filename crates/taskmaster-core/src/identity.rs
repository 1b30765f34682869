//! Local-only identity provider.
//!
//! There is no account server. The first login for a username registers a
//! SHA-256 digest of the password in the key-value store; later logins must
//! present the same password. The active username is persisted so separate
//! CLI invocations share one session.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{AuthError, Result, ValidationError};
use crate::storage::{keys, KvStore};

/// A logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
}

/// Login form input.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Supplies the current user to the rest of the system.
pub trait IdentityProvider {
    fn current_user(&self) -> Result<Option<User>>;
    fn login(&self, credentials: &Credentials) -> Result<User>;
    fn logout(&self) -> Result<()>;
}

/// [`IdentityProvider`] backed by a [`KvStore`].
pub struct LocalIdentity<'a, S: KvStore> {
    store: &'a S,
}

impl<'a, S: KvStore> LocalIdentity<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Current user, or [`AuthError::NotLoggedIn`].
    ///
    /// # Errors
    /// Fails when nobody is logged in or the store cannot be read.
    pub fn require_user(&self) -> Result<User> {
        self.current_user()?
            .ok_or_else(|| AuthError::NotLoggedIn.into())
    }
}

/// Trim `username` and check it can name a storage namespace.
///
/// # Errors
/// Fails on a blank username or one containing `:`.
pub fn validate_username(username: &str) -> Result<&str, ValidationError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(ValidationError::Blank {
            field: "username".to_string(),
        });
    }
    if username.contains(':') {
        return Err(ValidationError::InvalidValue {
            field: "username".to_string(),
            message: "must not contain ':'".to_string(),
        });
    }
    Ok(username)
}

fn digest(username: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(username.as_bytes());
    hasher.update([0u8]);
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

impl<S: KvStore> IdentityProvider for LocalIdentity<'_, S> {
    fn current_user(&self) -> Result<Option<User>> {
        Ok(self
            .store
            .get(keys::CURRENT_USER)?
            .filter(|name| !name.is_empty())
            .map(|username| User { username }))
    }

    fn login(&self, credentials: &Credentials) -> Result<User> {
        let username = validate_username(&credentials.username)?;
        if credentials.password.is_empty() {
            return Err(ValidationError::Blank {
                field: "password".to_string(),
            }
            .into());
        }

        let presented = digest(username, &credentials.password);
        let key = keys::credentials(username);
        match self.store.get(&key)? {
            Some(stored) if stored != presented => {
                tracing::warn!(username, "rejected login");
                return Err(AuthError::InvalidCredentials {
                    username: username.to_string(),
                }
                .into());
            }
            Some(_) => {}
            None => {
                self.store.set(&key, &presented)?;
                tracing::info!(username, "registered new local user");
            }
        }

        self.store.set(keys::CURRENT_USER, username)?;
        tracing::info!(username, "logged in");
        Ok(User {
            username: username.to_string(),
        })
    }

    fn logout(&self) -> Result<()> {
        self.store.remove(keys::CURRENT_USER)?;
        Ok(())
    }
}
