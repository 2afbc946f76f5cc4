//! Authenticated client for the AgentDev REST API.
//!
//! [`SessionStore`] keeps the login on disk; [`ApiClient`] attaches the
//! bearer token to every call and forgets the session when the server
//! answers 401.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use agentdev_client::{ApiClient, NewProject, SessionStore};
//!
//! # async fn run() -> agentdev_client::Result<()> {
//! let store = Arc::new(SessionStore::open("/tmp/agentdev-session.json")?);
//! let client = ApiClient::new("http://localhost:8000", store)?;
//!
//! client.auth().login("admin@example.com", "password").await?;
//! let project = client.projects().create(&NewProject::new("Portal")).await?;
//! println!("created {}", project.project_id);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod session;
pub mod types;

pub use client::ApiClient;
pub use error::{ClientError, Result};
pub use session::{Session, SessionStore};
pub use types::{
    Ack, LoginResponse, NewAgent, NewArtifact, NewChannel, NewMessage, NewProject, ProjectPage,
    ServiceInfo,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use agentdev_api::{serve_listener, ApiConfig, AppState};
    use agentdev_models::{ProjectPatch, ProjectStatus};
    use tempfile::{tempdir, TempDir};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    struct Harness {
        client: ApiClient,
        state: AppState,
        session_path: std::path::PathBuf,
        shutdown: Option<oneshot::Sender<()>>,
        _dir: TempDir,
    }

    impl Drop for Harness {
        fn drop(&mut self) {
            if let Some(tx) = self.shutdown.take() {
                let _ = tx.send(());
            }
        }
    }

    async fn start() -> Harness {
        let dir = tempdir().unwrap();
        let config = ApiConfig::default()
            .with_data_dir(dir.path().join("data"))
            .with_rate_limit(0);
        let state = AppState::new(config).unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        let server_state = state.clone();
        tokio::spawn(async move {
            serve_listener(listener, server_state, async move {
                let _ = rx.await;
            })
            .await
            .unwrap();
        });

        let session_path = dir.path().join("session.json");
        let store = Arc::new(SessionStore::open(&session_path).unwrap());
        let client = ApiClient::new(&format!("http://{}", addr), store).unwrap();

        Harness {
            client,
            state,
            session_path,
            shutdown: Some(tx),
            _dir: dir,
        }
    }

    #[tokio::test]
    async fn test_login_flow_against_live_server() {
        let h = start().await;

        let info = h.client.service_info().await.unwrap();
        assert_eq!(info.name, "AgentDev Platform API");

        assert!(matches!(h.client.auth().me().await, Err(ClientError::NotLoggedIn)));

        let err = h
            .client
            .auth()
            .login("admin@example.com", "wrong")
            .await
            .unwrap_err();
        match err {
            ClientError::Unauthorized(msg) => assert_eq!(msg, "Invalid credentials"),
            other => panic!("expected Unauthorized, got {:?}", other),
        }

        let user = h
            .client
            .auth()
            .login("admin@example.com", "password")
            .await
            .unwrap();
        assert_eq!(user.user_id, "user_123");
        assert!(h.client.session_store().is_authenticated());
        assert!(h.session_path.exists());

        let me = h.client.auth().me().await.unwrap();
        assert_eq!(me.email, "admin@example.com");

        let old_token = h.client.session_store().access_token().unwrap();
        h.client.auth().refresh().await.unwrap();
        assert_ne!(h.client.session_store().access_token().unwrap(), old_token);

        h.client.auth().logout().await.unwrap();
        assert!(!h.client.session_store().is_authenticated());
        assert!(!h.session_path.exists());
    }

    #[tokio::test]
    async fn test_project_and_chat_calls() {
        let h = start().await;
        h.client
            .auth()
            .login("admin@example.com", "password")
            .await
            .unwrap();

        let err = h
            .client
            .projects()
            .create(&NewProject::new(""))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(422));

        let project = h
            .client
            .projects()
            .create(&NewProject::new("Portal").with_description("Customer portal"))
            .await
            .unwrap();
        let id = project.project_id.as_str().to_string();

        let page = h.client.projects().list(None, 1, 20).await.unwrap();
        assert_eq!(page.total, 1);
        let page = h
            .client
            .projects()
            .list(Some(ProjectStatus::Active), 1, 20)
            .await
            .unwrap();
        assert_eq!(page.total, 0);

        let patch = ProjectPatch {
            progress_percentage: Some(50.0),
            ..ProjectPatch::default()
        };
        let updated = h.client.projects().update(&id, &patch).await.unwrap();
        assert_eq!(updated.progress_percentage, 50.0);

        let started = h.client.projects().start(&id).await.unwrap();
        assert_eq!(started.status, ProjectStatus::Active);
        let stats = h.client.projects().stats().await.unwrap();
        assert_eq!(stats.active_projects, 1);

        let agents = h.client.agents().list(Some(id.as_str())).await.unwrap();
        assert_eq!(agents.len(), 3);

        let channels = h.client.messages().channels(Some(id.as_str())).await.unwrap();
        let channel_id = channels[0].channel_id.as_str().to_string();
        h.client
            .messages()
            .send(&NewMessage::new(&channel_id, "Please draft a plan"))
            .await
            .unwrap();
        let history = h
            .client
            .messages()
            .messages(&channel_id, Some(50), None)
            .await
            .unwrap();
        assert_eq!(history.len(), 2);
        assert!(history[1].is_from_agent());

        let artifacts = h
            .client
            .artifacts()
            .list(Some(id.as_str()), Some("project_plan"))
            .await
            .unwrap();
        assert_eq!(artifacts.len(), 1);

        let created = h
            .client
            .artifacts()
            .create(&NewArtifact::new(&id, "Notes", "document", "hello"))
            .await
            .unwrap();
        let fetched = h
            .client
            .artifacts()
            .get(created.artifact_id.as_str())
            .await
            .unwrap();
        assert_eq!(fetched.content, "hello");

        h.client.projects().delete(&id).await.unwrap();
        let err = h.client.projects().get(&id).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        // A 404 leaves the session alone.
        assert!(h.client.session_store().is_authenticated());
    }

    #[tokio::test]
    async fn test_401_clears_session() {
        let h = start().await;
        h.client
            .auth()
            .login("admin@example.com", "password")
            .await
            .unwrap();

        let token = h.client.session_store().access_token().unwrap();
        assert!(h.state.sessions.revoke(&token));

        let err = h.client.projects().list(None, 1, 20).await.unwrap_err();
        assert!(err.needs_login());
        assert!(!h.client.session_store().is_authenticated());
        assert!(!h.session_path.exists());
    }
}
