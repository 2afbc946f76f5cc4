//! AI agents that can be assigned to projects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{AgentId, ProjectId};
use crate::validation::{require_non_blank, validate_description, validate_name, ValidationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    #[default]
    Active,
    Inactive,
}

/// An agent record. Agents without a project are global and visible everywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub agent_id: AgentId,
    pub name: String,
    /// Free-form type such as `pm`, `architect` or `security`.
    pub agent_type: String,
    #[serde(default)]
    pub status: AgentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ProjectId>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub capabilities: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Agent {
    pub fn new(name: impl Into<String>, agent_type: impl Into<String>) -> Self {
        Self {
            agent_id: AgentId::new(),
            name: name.into(),
            agent_type: agent_type.into(),
            status: AgentStatus::Active,
            project_id: None,
            description: String::new(),
            capabilities: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_id(mut self, agent_id: impl Into<AgentId>) -> Self {
        self.agent_id = agent_id.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_capabilities<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities = capabilities.into_iter().map(Into::into).collect();
        self
    }

    pub fn for_project(mut self, project_id: Option<ProjectId>) -> Self {
        self.project_id = project_id;
        self
    }

    pub fn is_global(&self) -> bool {
        self.project_id.is_none()
    }

    /// True if the agent belongs to `project_id` or is global.
    pub fn serves(&self, project_id: &ProjectId) -> bool {
        self.project_id.as_ref().map_or(true, |p| p == project_id)
    }

    pub fn validate(&self) -> ValidationResult {
        validate_name("name", &self.name)?;
        require_non_blank("agent_type", &self.agent_type)?;
        validate_description(&self.description)
    }
}
