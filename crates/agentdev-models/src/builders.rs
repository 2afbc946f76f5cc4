//! Builder patterns for complex types.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::ids::UserId;
use crate::project::{
    Project, ProjectComplexity, ProjectMetadata, ProjectRequirement, ProjectType,
};

/// Builder for creating Project instances with a fluent API.
#[derive(Debug, Clone)]
pub struct ProjectBuilder {
    name: String,
    owner: UserId,
    description: String,
    project_type: ProjectType,
    complexity: ProjectComplexity,
    requirements: Vec<ProjectRequirement>,
    metadata: ProjectMetadata,
    deadline: Option<DateTime<Utc>>,
    team_members: Vec<UserId>,
    settings: HashMap<String, serde_json::Value>,
    repository_url: Option<String>,
}

impl ProjectBuilder {
    /// Creates a new ProjectBuilder with required fields.
    pub fn new(name: impl Into<String>, owner: impl Into<UserId>) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
            description: String::new(),
            project_type: ProjectType::default(),
            complexity: ProjectComplexity::default(),
            requirements: Vec::new(),
            metadata: ProjectMetadata::default(),
            deadline: None,
            team_members: Vec::new(),
            settings: HashMap::new(),
            repository_url: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn project_type(mut self, project_type: ProjectType) -> Self {
        self.project_type = project_type;
        self
    }

    pub fn complexity(mut self, complexity: ProjectComplexity) -> Self {
        self.complexity = complexity;
        self
    }

    pub fn requirements(mut self, requirements: Vec<ProjectRequirement>) -> Self {
        self.requirements = requirements;
        self
    }

    pub fn metadata(mut self, metadata: ProjectMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn deadline(mut self, deadline: Option<DateTime<Utc>>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Adds a team member. The owner is never duplicated into the team.
    pub fn team_member(mut self, user_id: impl Into<UserId>) -> Self {
        let user_id = user_id.into();
        if user_id != self.owner && !self.team_members.contains(&user_id) {
            self.team_members.push(user_id);
        }
        self
    }

    pub fn team_members(self, members: impl IntoIterator<Item = UserId>) -> Self {
        members.into_iter().fold(self, |b, m| b.team_member(m))
    }

    /// Adds a settings value.
    pub fn with_setting(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    pub fn settings(mut self, settings: HashMap<String, serde_json::Value>) -> Self {
        self.settings.extend(settings);
        self
    }

    pub fn repository_url(mut self, url: Option<String>) -> Self {
        self.repository_url = url;
        self
    }

    /// Builds the Project in `draft` status.
    pub fn build(self) -> Project {
        let mut project = Project::new(self.name, self.owner);
        project.description = self.description;
        project.project_type = self.project_type;
        project.complexity = self.complexity;
        project.requirements = self.requirements;
        project.metadata = self.metadata;
        project.deadline = self.deadline;
        project.team_members = self.team_members;
        project.settings = self.settings;
        project.repository_url = self.repository_url;
        project
    }
}

impl Project {
    /// Creates a builder for a new project.
    pub fn builder(name: impl Into<String>, owner: impl Into<UserId>) -> ProjectBuilder {
        ProjectBuilder::new(name, owner)
    }
}
