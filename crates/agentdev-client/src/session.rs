//! Persisted login session.
//!
//! The session lives in memory and in a JSON file so that separate CLI
//! invocations share one login. Writes go through the persistence crate's
//! atomic write.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use agentdev_models::User;
use agentdev_persistence::{atomic, atomic_write_json, read_json_optional, PersistenceError};

use crate::error::Result;

/// Tokens and the user they were issued to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

/// File-backed holder of the current session.
pub struct SessionStore {
    path: PathBuf,
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    /// Opens the store, loading any session already saved at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self {
            path: path.into(),
            current: RwLock::new(None),
        };
        store.load()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-reads the session file.
    ///
    /// An unreadable or corrupt file counts as logged out and is removed.
    pub fn load(&self) -> Result<Option<Session>> {
        let session: Option<Session> = match read_json_optional(&self.path) {
            Ok(session) => session,
            Err(e @ (PersistenceError::Serialize(_) | PersistenceError::InvalidData(_))) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Discarding unreadable session file"
                );
                atomic::remove_file(&self.path)?;
                None
            }
            Err(e) => return Err(e.into()),
        };
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = session.clone();
        Ok(session)
    }

    /// Stores a new session in memory and on disk.
    pub fn login(&self, session: Session) -> Result<()> {
        atomic_write_json(&self.path, &session)?;
        debug!(user_id = %session.user.user_id, path = %self.path.display(), "Session saved");
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = Some(session);
        Ok(())
    }

    /// Forgets the session and deletes the file.
    pub fn logout(&self) -> Result<()> {
        {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            *current = None;
        }
        if atomic::remove_file(&self.path)? {
            debug!(path = %self.path.display(), "Session removed");
        }
        Ok(())
    }

    pub fn current(&self) -> Option<Session> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.current().map(|s| s.access_token)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
