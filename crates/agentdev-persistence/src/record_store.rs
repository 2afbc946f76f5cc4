//! Generic file-per-record store.

use std::marker::PhantomData;
use std::path::PathBuf;

use agentdev_models::{Agent, Artifact, Channel, Project};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::atomic::{
    atomic_write_json, ensure_dir, json_files, read_json, read_json_optional, record_file_name,
    remove_file,
};
use crate::error::{PersistenceError, Result};

/// A record that lives in its own JSON file under `{base}/{KIND}s/`.
pub trait Record: Serialize + DeserializeOwned {
    /// Singular kind name, used for the directory and in `NotFound` errors.
    const KIND: &'static str;

    fn record_id(&self) -> &str;
}

impl Record for Project {
    const KIND: &'static str = "project";

    fn record_id(&self) -> &str {
        self.project_id.as_str()
    }
}

impl Record for Agent {
    const KIND: &'static str = "agent";

    fn record_id(&self) -> &str {
        self.agent_id.as_str()
    }
}

impl Record for Channel {
    const KIND: &'static str = "channel";

    fn record_id(&self) -> &str {
        self.channel_id.as_str()
    }
}

impl Record for Artifact {
    const KIND: &'static str = "artifact";

    fn record_id(&self) -> &str {
        self.artifact_id.as_str()
    }
}

/// Stores records of one kind as individual JSON files:
/// ```text
/// base_path/
/// └── projects/
///     ├── proj-abc123.json
///     └── proj-def456.json
/// ```
pub struct RecordStore<T> {
    dir: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Record> RecordStore<T> {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            dir: base_path.into().join(format!("{}s", T::KIND)),
            _marker: PhantomData,
        }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn path_for(&self, id: &str) -> Result<PathBuf> {
        Ok(self.dir.join(record_file_name(id)?))
    }

    /// Creates or replaces a record.
    pub fn save(&self, record: &T) -> Result<()> {
        ensure_dir(&self.dir)?;
        atomic_write_json(&self.path_for(record.record_id())?, record)
    }

    pub fn load(&self, id: &str) -> Result<T> {
        self.load_optional(id)?
            .ok_or_else(|| PersistenceError::NotFound {
                kind: T::KIND,
                id: id.to_string(),
            })
    }

    pub fn load_optional(&self, id: &str) -> Result<Option<T>> {
        match self.path_for(id) {
            Ok(path) => read_json_optional(&path),
            // an ID that cannot name a file cannot have been saved
            Err(PersistenceError::InvalidData(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Loads every readable record. Corrupt files are skipped with a warning.
    pub fn list(&self) -> Result<Vec<T>> {
        let mut records = Vec::new();
        for path in json_files(&self.dir)? {
            match read_json::<T>(&path) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(kind = T::KIND, path = %path.display(), error = %e, "Skipping unreadable record");
                }
            }
        }
        Ok(records)
    }

    /// Deletes a record. Returns whether it existed.
    pub fn delete(&self, id: &str) -> Result<bool> {
        match self.path_for(id) {
            Ok(path) => remove_file(&path),
            Err(PersistenceError::InvalidData(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub fn exists(&self, id: &str) -> bool {
        self.path_for(id).map(|p| p.is_file()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentdev_models::{ProjectStatus, ProjectType};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load_project() {
        let dir = tempdir().unwrap();
        let store: RecordStore<Project> = RecordStore::new(dir.path());

        let mut project = Project::builder("Test Project", "user_123")
            .project_type(ProjectType::ApiService)
            .build();
        project.start();

        store.save(&project).unwrap();
        let loaded = store.load(project.project_id.as_str()).unwrap();

        assert_eq!(loaded.project_id, project.project_id);
        assert_eq!(loaded.name, "Test Project");
        assert_eq!(loaded.project_type, ProjectType::ApiService);
        assert_eq!(loaded.status, ProjectStatus::Active);
        assert!(dir
            .path()
            .join("projects")
            .join(format!("{}.json", project.project_id))
            .exists());
    }

    #[test]
    fn test_load_not_found() {
        let dir = tempdir().unwrap();
        let store: RecordStore<Agent> = RecordStore::new(dir.path());

        let err = store.load("agent-missing").unwrap_err();
        match err {
            PersistenceError::NotFound { kind, id } => {
                assert_eq!(kind, "agent");
                assert_eq!(id, "agent-missing");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(store.load_optional("agent-missing").unwrap().is_none());
    }

    #[test]
    fn test_traversal_ids_are_not_found() {
        let dir = tempdir().unwrap();
        let store: RecordStore<Project> = RecordStore::new(dir.path());

        assert!(store.load("../secrets").unwrap_err().is_not_found());
        assert!(!store.delete("../secrets").unwrap());
    }

    #[test]
    fn test_list_skips_corrupt_files() {
        let dir = tempdir().unwrap();
        let store: RecordStore<Channel> = RecordStore::new(dir.path());

        let channel = agentdev_models::Channel::new(
            "General Discussion",
            "proj-1",
            agentdev_models::ChannelType::General,
        );
        store.save(&channel).unwrap();
        fs::write(store.dir().join("broken.json"), "{").unwrap();

        let channels = store.list().unwrap();
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].channel_id, channel.channel_id);
    }

    #[test]
    fn test_list_empty_store() {
        let dir = tempdir().unwrap();
        let store: RecordStore<Artifact> = RecordStore::new(dir.path());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_delete_reports_existence() {
        let dir = tempdir().unwrap();
        let store: RecordStore<Project> = RecordStore::new(dir.path());
        let project = Project::new("Doomed", "user_123");

        store.save(&project).unwrap();
        assert!(store.exists(project.project_id.as_str()));
        assert!(store.delete(project.project_id.as_str()).unwrap());
        assert!(!store.delete(project.project_id.as_str()).unwrap());
        assert!(!store.exists(project.project_id.as_str()));
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempdir().unwrap();
        let store: RecordStore<Project> = RecordStore::new(dir.path());
        let mut project = Project::new("v1", "user_123");

        store.save(&project).unwrap();
        project.name = "v2".to_string();
        store.save(&project).unwrap();

        assert_eq!(store.list().unwrap().len(), 1);
        assert_eq!(store.load(project.project_id.as_str()).unwrap().name, "v2");
    }
}
