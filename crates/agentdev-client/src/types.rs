//! Wire types the client sends and receives that are not domain records.

use serde::{Deserialize, Serialize};

use agentdev_models::{
    ChannelType, Project, ProjectComplexity, ProjectType, User,
};

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct RefreshToken<'a> {
    pub refresh_token: &'a str,
}

/// Login and refresh response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user_info: User,
}

/// Plain acknowledgement such as the logout response.
#[derive(Debug, Clone, Deserialize)]
pub struct Ack {
    pub message: String,
}

/// `GET /` banner.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub environment: String,
    pub status: String,
}

/// One page of `GET /projects/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectPage {
    pub projects: Vec<Project>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub has_next: bool,
}

/// Fields for `POST /projects/`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewProject {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_type: Option<ProjectType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<ProjectComplexity>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub team_members: Vec<String>,
}

impl NewProject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Fields for `POST /agents/`.
#[derive(Debug, Clone, Serialize)]
pub struct NewAgent {
    pub name: String,
    pub agent_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<String>,
}

impl NewAgent {
    pub fn new(name: impl Into<String>, agent_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            agent_type: agent_type.into(),
            description: String::new(),
            project_id: None,
            capabilities: Vec::new(),
        }
    }
}

/// Fields for `POST /messages/channels`.
#[derive(Debug, Clone, Serialize)]
pub struct NewChannel {
    pub name: String,
    pub project_id: String,
    pub channel_type: ChannelType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub participants: Vec<String>,
}

/// Fields for `POST /messages/`.
#[derive(Debug, Clone, Serialize)]
pub struct NewMessage {
    pub channel_id: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_message_id: Option<String>,
}

impl NewMessage {
    pub fn new(channel_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            content: content.into(),
            parent_message_id: None,
        }
    }
}

/// Fields for `POST /artifacts/`.
#[derive(Debug, Clone, Serialize)]
pub struct NewArtifact {
    pub project_id: String,
    pub name: String,
    pub artifact_type: String,
    pub content_type: String,
    pub content: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl NewArtifact {
    pub fn new(
        project_id: impl Into<String>,
        name: impl Into<String>,
        artifact_type: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            name: name.into(),
            artifact_type: artifact_type.into(),
            content_type: "text/plain".to_string(),
            content: content.into(),
            description: String::new(),
            tags: Vec::new(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_project_omits_unset_fields() {
        let json = serde_json::to_value(NewProject::new("Portal")).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Portal"}));
    }

    #[test]
    fn test_new_artifact_defaults_to_text() {
        let artifact = NewArtifact::new("proj-1", "Notes", "document", "hello");
        assert_eq!(artifact.content_type, "text/plain");
        let json = serde_json::to_value(artifact.with_content_type("text/markdown")).unwrap();
        assert_eq!(json["content_type"], "text/markdown");
    }
}
