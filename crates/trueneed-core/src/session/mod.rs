//! Session store: access/refresh tokens, the cached profile, and the theme
//! preference.
//!
//! [`SessionStore`] is passed explicitly to the client and the auth facade.
//! Concurrent writers are not coordinated; the last write wins.

mod backend;

use std::{fmt, io};
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use backend::{FileStore, KeyValueStore, MemoryStore};

use crate::config::paths;
use crate::profile::UserProfile;
use crate::theme::Theme;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const USER_KEY: &str = "user";
pub const THEME_KEY: &str = "theme";

/// Token storage failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access session file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Session file {} is not valid JSON: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode stored value for {key}: {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Access/refresh token pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access: String,
    pub refresh: String,
}

impl Session {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }
}

/// Shared handle over a [`KeyValueStore`]. Clones share the same backend.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Opens the file-backed store at `<home>/state.json`.
    pub fn open_default() -> Self {
        Self::new(FileStore::new(paths::state_path()))
    }

    /// # Errors
    /// Returns an error if the backend cannot be read.
    pub fn access_token(&self) -> Result<Option<String>, StoreError> {
        self.backend.get(ACCESS_TOKEN_KEY)
    }

    /// # Errors
    /// Returns an error if the backend cannot be read.
    pub fn refresh_token(&self) -> Result<Option<String>, StoreError> {
        self.backend.get(REFRESH_TOKEN_KEY)
    }

    /// Both tokens, when both are stored.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be read.
    pub fn session(&self) -> Result<Option<Session>, StoreError> {
        Ok(self
            .access_token()?
            .zip(self.refresh_token()?)
            .map(|(access, refresh)| Session { access, refresh }))
    }

    /// # Errors
    /// Returns an error if the backend cannot be written.
    pub fn set_tokens(&self, session: &Session) -> Result<(), StoreError> {
        self.backend.set(ACCESS_TOKEN_KEY, &session.access)?;
        self.backend.set(REFRESH_TOKEN_KEY, &session.refresh)
    }

    /// Replaces the access token in place, keeping the refresh token.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be written.
    pub fn set_access_token(&self, access: &str) -> Result<(), StoreError> {
        self.backend.set(ACCESS_TOKEN_KEY, access)
    }

    /// # Errors
    /// Returns an error if the backend cannot be written.
    pub fn set_refresh_token(&self, refresh: &str) -> Result<(), StoreError> {
        self.backend.set(REFRESH_TOKEN_KEY, refresh)
    }

    /// Cached profile. An undecodable entry reads as absent.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be read.
    pub fn user(&self) -> Result<Option<UserProfile>, StoreError> {
        let Some(raw) = self.backend.get(USER_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(err) => {
                tracing::warn!(error = %err, "ignoring undecodable cached user profile");
                Ok(None)
            }
        }
    }

    /// Overwrites the cached profile wholesale.
    ///
    /// # Errors
    /// Returns an error if the profile cannot be encoded or written.
    pub fn set_user(&self, user: &UserProfile) -> Result<(), StoreError> {
        let raw = serde_json::to_string(user).map_err(|source| StoreError::Encode {
            key: USER_KEY,
            source,
        })?;
        self.backend.set(USER_KEY, &raw)
    }

    /// Removes tokens and the cached profile. The theme preference stays.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be written.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.backend.remove(ACCESS_TOKEN_KEY)?;
        self.backend.remove(REFRESH_TOKEN_KEY)?;
        self.backend.remove(USER_KEY)
    }

    /// Stored theme, or the default when unset or unrecognized.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be read.
    pub fn theme(&self) -> Result<Theme, StoreError> {
        Ok(self
            .backend
            .get(THEME_KEY)?
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default())
    }

    /// # Errors
    /// Returns an error if the backend cannot be written.
    pub fn set_theme(&self, theme: Theme) -> Result<(), StoreError> {
        self.backend.set(THEME_KEY, theme.as_str())
    }

    /// Returns the signed-in profile at startup.
    ///
    /// A profile with neither token is stale: it is removed and `None` is
    /// returned. A profile with at least one token is kept.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be read or written.
    pub fn restore(&self) -> Result<Option<UserProfile>, StoreError> {
        let Some(user) = self.user()? else {
            return Ok(None);
        };

        if self.access_token()?.is_some() || self.refresh_token()?.is_some() {
            return Ok(Some(user));
        }

        tracing::info!("discarding cached profile without tokens");
        self.backend.remove(USER_KEY)?;
        Ok(None)
    }
}
