//! Request DTOs for the API.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agentdev_models::validation::{
    require_non_blank, validate_description, validate_email, validate_name,
};
use agentdev_models::{
    ChannelType, ProjectBuilder, ProjectComplexity, ProjectMetadata, ProjectRequirement,
    ProjectStatus, ProjectType, UserId, ValidationResult,
};

/// Login request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> ValidationResult {
        validate_email(&self.email)?;
        require_non_blank("password", &self.password)
    }
}

/// Refresh token request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Create project request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub project_type: ProjectType,
    #[serde(default)]
    pub complexity: ProjectComplexity,
    #[serde(default)]
    pub requirements: Vec<ProjectRequirement>,
    #[serde(default)]
    pub metadata: ProjectMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub team_members: Vec<UserId>,
    #[serde(default)]
    pub settings: HashMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,
}

impl CreateProjectRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> ValidationResult {
        validate_name("name", &self.name)?;
        validate_description(&self.description)
    }

    /// Builder for a draft project owned by `owner`.
    pub fn into_builder(self, owner: impl Into<UserId>) -> ProjectBuilder {
        ProjectBuilder::new(self.name.trim(), owner)
            .description(self.description)
            .project_type(self.project_type)
            .complexity(self.complexity)
            .requirements(self.requirements)
            .metadata(self.metadata)
            .deadline(self.deadline)
            .team_members(self.team_members)
            .settings(self.settings)
            .repository_url(self.repository_url)
    }
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    20
}

/// Project list query parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectListQuery {
    pub status: Option<ProjectStatus>,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for ProjectListQuery {
    fn default() -> Self {
        Self {
            status: None,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

/// Create agent request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAgentRequest {
    pub name: String,
    pub agent_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default)]
    pub capabilities: Vec<String>,
}

/// Agent list query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentListQuery {
    pub project_id: Option<String>,
}

/// Channel list query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelListQuery {
    pub project_id: Option<String>,
}

/// Create channel request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChannelRequest {
    pub name: String,
    pub project_id: String,
    #[serde(default)]
    pub channel_type: ChannelType,
    /// Extra user or agent IDs; the caller is always added.
    #[serde(default)]
    pub participants: Vec<String>,
}

fn default_message_limit() -> usize {
    50
}

/// Message history query parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageListQuery {
    #[serde(default = "default_message_limit")]
    pub limit: usize,
    /// Only messages older than this message ID.
    pub before: Option<String>,
}

impl Default for MessageListQuery {
    fn default() -> Self {
        Self {
            limit: default_message_limit(),
            before: None,
        }
    }
}

fn default_text() -> String {
    "text".to_string()
}

/// Send message request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub channel_id: String,
    pub content: String,
    #[serde(default = "default_text")]
    pub message_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_message_id: Option<String>,
    #[serde(default)]
    pub attachments: Vec<String>,
}

impl SendMessageRequest {
    pub fn new(channel_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            content: content.into(),
            message_type: default_text(),
            parent_message_id: None,
            attachments: Vec::new(),
        }
    }
}

/// Artifact list query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtifactListQuery {
    pub project_id: Option<String>,
    pub artifact_type: Option<String>,
}

fn default_content_type() -> String {
    "text/plain".to_string()
}

/// Create artifact request. Content is stored inline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateArtifactRequest {
    pub project_id: String,
    pub name: String,
    pub artifact_type: String,
    #[serde(default = "default_content_type")]
    pub content_type: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CreateArtifactRequest {
    pub fn validate(&self) -> ValidationResult {
        validate_name("name", &self.name)?;
        require_non_blank("artifact_type", &self.artifact_type)?;
        validate_description(&self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_project_request_defaults() {
        let req: CreateProjectRequest = serde_json::from_str(r#"{"name": "Dashboard"}"#).unwrap();
        assert_eq!(req.name, "Dashboard");
        assert_eq!(req.project_type, ProjectType::WebApplication);
        assert_eq!(req.complexity, ProjectComplexity::Medium);
        assert!(req.team_members.is_empty());
    }

    #[test]
    fn test_create_project_request_validation() {
        assert!(CreateProjectRequest::new("ok").validate().is_ok());

        let err = CreateProjectRequest::new("   ").validate().unwrap_err();
        assert_eq!(err.field, "name");

        let mut req = CreateProjectRequest::new("ok");
        req.description = "x".repeat(1001);
        assert_eq!(req.validate().unwrap_err().field, "description");
    }

    #[test]
    fn test_into_builder_trims_name_and_sets_owner() {
        let project = CreateProjectRequest::new("  Portal  ")
            .into_builder("user_123")
            .build();
        assert_eq!(project.name, "Portal");
        assert_eq!(project.user_id, "user_123");
        assert_eq!(project.status, ProjectStatus::Draft);
    }

    #[test]
    fn test_login_request_validation() {
        let ok = LoginRequest {
            email: "admin@example.com".into(),
            password: "password".into(),
        };
        assert!(ok.validate().is_ok());

        let bad = LoginRequest {
            email: "not-an-email".into(),
            password: "password".into(),
        };
        assert_eq!(bad.validate().unwrap_err().field, "email");
    }

    #[test]
    fn test_query_defaults() {
        let query: ProjectListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 20);

        let query: MessageListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.limit, 50);
        assert!(query.before.is_none());
    }

    #[test]
    fn test_artifact_request_default_content_type() {
        let req: CreateArtifactRequest = serde_json::from_str(
            r#"{"project_id": "proj-1", "name": "Notes", "artifact_type": "document"}"#,
        )
        .unwrap();
        assert_eq!(req.content_type, "text/plain");
        assert!(req.validate().is_ok());
    }
}
