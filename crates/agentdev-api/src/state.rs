//! Application state shared across handlers.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use agentdev_agents::{builtin_agents, ResponderRegistry};
use agentdev_models::{Project, User, UserId};
use agentdev_persistence::{PersistenceError, Storage};

use crate::auth::{SessionManager, UserDirectory};
use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::rate_limit::RateLimiter;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: Arc<ApiConfig>,
    /// JSON record store.
    pub storage: Arc<Storage>,
    pub users: Arc<UserDirectory>,
    pub sessions: Arc<SessionManager>,
    /// Responders for agent participants in chat.
    pub responders: Arc<ResponderRegistry>,
    pub rate_limiter: RateLimiter,
    /// Write-through project cache, loaded from storage at startup.
    projects: Arc<RwLock<HashMap<String, Project>>>,
}

impl AppState {
    /// Opens the data directory from `config`, seeds built-in agents and loads projects.
    pub fn new(config: ApiConfig) -> std::result::Result<Self, PersistenceError> {
        let storage = Storage::new(&config.data_dir);
        Self::with_storage(config, storage)
    }

    pub fn with_storage(
        config: ApiConfig,
        storage: Storage,
    ) -> std::result::Result<Self, PersistenceError> {
        seed_agents(&storage)?;

        let projects: HashMap<String, Project> = storage
            .projects
            .list()?
            .into_iter()
            .map(|p| (p.project_id.as_str().to_string(), p))
            .collect();
        info!(
            data_dir = %storage.root().display(),
            projects = projects.len(),
            "Storage opened"
        );

        Ok(Self {
            users: Arc::new(UserDirectory::with_admin(&config.admin)),
            sessions: Arc::new(SessionManager::new(
                config.access_token_ttl,
                config.refresh_token_ttl,
            )),
            responders: Arc::new(ResponderRegistry::new()),
            rate_limiter: RateLimiter::new(config.rate_limit_per_minute),
            config: Arc::new(config),
            storage: Arc::new(storage),
            projects: Arc::new(RwLock::new(projects)),
        })
    }

    /// Gets a project by ID.
    pub async fn get_project(&self, id: &str) -> Option<Project> {
        let projects = self.projects.read().await;
        projects.get(id).cloned()
    }

    /// Gets a project, failing with 404.
    pub async fn require_project(&self, id: &str) -> Result<Project> {
        self.get_project(id)
            .await
            .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))
    }

    /// Gets a project the caller may see (owner or team member).
    pub async fn visible_project(&self, id: &str, user_id: &UserId) -> Result<Project> {
        let project = self.require_project(id).await?;
        if !project.is_visible_to(user_id) {
            return Err(ApiError::access_denied());
        }
        Ok(project)
    }

    /// Gets a project the caller owns.
    pub async fn owned_project(&self, id: &str, user_id: &UserId) -> Result<Project> {
        let project = self.require_project(id).await?;
        if !project.is_owned_by(user_id) {
            return Err(ApiError::access_denied());
        }
        Ok(project)
    }

    /// Saves a project to disk and cache.
    pub async fn save_project(&self, project: Project) -> Result<()> {
        let mut projects = self.projects.write().await;
        self.storage.projects.save(&project)?;
        projects.insert(project.project_id.as_str().to_string(), project);
        Ok(())
    }

    /// Applies `f` to a stored project under the write lock and persists the result.
    pub async fn update_project<F>(&self, id: &str, f: F) -> Result<Project>
    where
        F: FnOnce(&mut Project),
    {
        let mut projects = self.projects.write().await;
        let mut project = projects
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;
        f(&mut project);
        self.storage.projects.save(&project)?;
        projects.insert(id.to_string(), project.clone());
        Ok(project)
    }

    /// Removes a project by ID.
    pub async fn remove_project(&self, id: &str) -> Result<Option<Project>> {
        let mut projects = self.projects.write().await;
        self.storage.projects.delete(id)?;
        Ok(projects.remove(id))
    }

    /// Lists all projects.
    pub async fn list_projects(&self) -> Vec<Project> {
        let projects = self.projects.read().await;
        projects.values().cloned().collect()
    }

    /// Projects the user owns or belongs to.
    pub async fn visible_projects(&self, user_id: &UserId) -> Vec<Project> {
        let projects = self.projects.read().await;
        projects
            .values()
            .filter(|p| p.is_visible_to(user_id))
            .cloned()
            .collect()
    }

    pub fn user(&self, user_id: &UserId) -> Option<User> {
        self.users.get(user_id)
    }
}

/// Stores any built-in agent that is not on disk yet.
fn seed_agents(storage: &Storage) -> std::result::Result<(), PersistenceError> {
    for agent in builtin_agents() {
        if !storage.agents.exists(agent.agent_id.as_str()) {
            storage.agents.save(&agent)?;
            info!(agent_id = %agent.agent_id, "Seeded built-in agent");
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::tempdir;

    pub(crate) fn make_test_state() -> AppState {
        let dir = tempdir().unwrap();
        let path = dir.path().to_path_buf();
        std::mem::forget(dir);

        AppState::new(ApiConfig::default().with_data_dir(path).with_rate_limit(0)).unwrap()
    }

    #[tokio::test]
    async fn test_app_state_project_crud() {
        let state = make_test_state();

        // Initially empty
        assert!(state.list_projects().await.is_empty());

        let project = Project::new("test-project", "user_123");
        let project_id = project.project_id.as_str().to_string();
        state.save_project(project).await.unwrap();

        let retrieved = state.get_project(&project_id).await.unwrap();
        assert_eq!(retrieved.name, "test-project");
        assert!(state.storage.projects.exists(&project_id));

        let updated = state
            .update_project(&project_id, |p| p.name = "renamed".to_string())
            .await
            .unwrap();
        assert_eq!(updated.name, "renamed");
        assert_eq!(state.storage.projects.load(&project_id).unwrap().name, "renamed");

        let removed = state.remove_project(&project_id).await.unwrap().unwrap();
        assert_eq!(removed.name, "renamed");
        assert!(state.list_projects().await.is_empty());
        assert!(!state.storage.projects.exists(&project_id));
    }

    #[tokio::test]
    async fn test_projects_reload_from_disk() {
        let dir = tempdir().unwrap();
        let config = ApiConfig::default().with_data_dir(dir.path());

        let state = AppState::new(config.clone()).unwrap();
        state
            .save_project(Project::new("persisted", "user_123"))
            .await
            .unwrap();
        drop(state);

        let reopened = AppState::new(config).unwrap();
        let projects = reopened.list_projects().await;
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "persisted");
    }

    #[tokio::test]
    async fn test_builtin_agents_seeded_once() {
        let state = make_test_state();
        assert_eq!(state.storage.agents.list().unwrap().len(), 3);

        seed_agents(&state.storage).unwrap();
        assert_eq!(state.storage.agents.list().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_visibility_helpers() {
        let state = make_test_state();
        let mut project = Project::new("shared", "owner");
        project.team_members.push(UserId::from("member"));
        let id = project.project_id.as_str().to_string();
        state.save_project(project).await.unwrap();

        assert!(state.visible_project(&id, &UserId::from("member")).await.is_ok());
        assert!(matches!(
            state.owned_project(&id, &UserId::from("member")).await,
            Err(ApiError::Forbidden(_))
        ));
        assert!(matches!(
            state.visible_project(&id, &UserId::from("stranger")).await,
            Err(ApiError::Forbidden(_))
        ));
        assert!(matches!(
            state.require_project("proj-missing").await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let state = make_test_state();
        assert!(state.get_project("nonexistent").await.is_none());
    }
}
