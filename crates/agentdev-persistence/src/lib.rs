//! Persistence layer for AgentDev.
//!
//! Every record is a JSON file written atomically (write to a temp file in
//! the same directory, then rename), so a crash never leaves a torn record.
//!
//! # Example
//!
//! ```no_run
//! use agentdev_persistence::Storage;
//! use agentdev_models::Project;
//!
//! let storage = Storage::new("/home/user/.agentdev/data");
//!
//! let project = Project::new("Dashboard", "user_123");
//! storage.projects.save(&project).unwrap();
//!
//! let loaded = storage.projects.load(project.project_id.as_str()).unwrap();
//! ```

pub mod atomic;
pub mod error;
pub mod message_store;
pub mod record_store;

use std::path::{Path, PathBuf};

use agentdev_models::{Agent, Artifact, Channel, Project};

pub use atomic::{atomic_write, atomic_write_json, read_json, read_json_optional};
pub use error::{PersistenceError, Result};
pub use message_store::MessageStore;
pub use record_store::{Record, RecordStore};

/// All stores rooted at one data directory.
pub struct Storage {
    root: PathBuf,
    pub projects: RecordStore<Project>,
    pub agents: RecordStore<Agent>,
    pub channels: RecordStore<Channel>,
    pub artifacts: RecordStore<Artifact>,
    pub messages: MessageStore,
}

impl Storage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            projects: RecordStore::new(&root),
            agents: RecordStore::new(&root),
            channels: RecordStore::new(&root),
            artifacts: RecordStore::new(&root),
            messages: MessageStore::new(&root),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes and removes a probe file to prove the data directory is writable.
    pub fn health_check(&self) -> Result<()> {
        let probe = self.root.join(".health-probe");
        atomic_write(&probe, b"ok")?;
        atomic::remove_file(&probe)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_health_check_on_fresh_dir() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().join("data"));

        storage.health_check().unwrap();
        assert!(!storage.root().join(".health-probe").exists());
    }

    #[test]
    fn test_health_check_fails_when_root_is_a_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, "x").unwrap();

        let storage = Storage::new(&file);
        assert!(storage.health_check().is_err());
    }

    #[test]
    fn test_stores_use_separate_directories() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path());

        let project = Project::new("p", "user_123");
        let agent = Agent::new("a", "pm");
        storage.projects.save(&project).unwrap();
        storage.agents.save(&agent).unwrap();

        assert!(dir.path().join("projects").is_dir());
        assert!(dir.path().join("agents").is_dir());
        assert_eq!(storage.projects.list().unwrap().len(), 1);
        assert_eq!(storage.agents.list().unwrap().len(), 1);
    }
}
