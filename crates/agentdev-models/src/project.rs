//! Project types.
//!
//! A project is owned by one user, may be shared with team members, and
//! carries requirements, metadata and progress counters shown on the
//! dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::ids::{AgentId, ChannelId, ProjectId, UserId};
use crate::validation::{
    validate_description, validate_name, validate_percentage, ValidationResult,
};

/// Lifecycle status of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Draft,
    Active,
    Paused,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Draft => "draft",
            ProjectStatus::Active => "active",
            ProjectStatus::Paused => "paused",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(ProjectStatus::Draft),
            "active" => Ok(ProjectStatus::Active),
            "paused" => Ok(ProjectStatus::Paused),
            "completed" => Ok(ProjectStatus::Completed),
            "cancelled" => Ok(ProjectStatus::Cancelled),
            other => Err(format!("unknown project status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    #[default]
    WebApplication,
    MobileApp,
    ApiService,
    DataPipeline,
    Infrastructure,
    Other,
}

impl ProjectType {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectType::WebApplication => "web_application",
            ProjectType::MobileApp => "mobile_app",
            ProjectType::ApiService => "api_service",
            ProjectType::DataPipeline => "data_pipeline",
            ProjectType::Infrastructure => "infrastructure",
            ProjectType::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectComplexity {
    Low,
    #[default]
    Medium,
    High,
    Enterprise,
}

fn default_priority() -> String {
    "medium".to_string()
}

fn default_category() -> String {
    "functional".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

/// A single requirement attached to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRequirement {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default = "default_priority")]
    pub priority: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub acceptance_criteria: Vec<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectMetadata {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub target_audience: String,
    #[serde(default)]
    pub business_goals: Vec<String>,
    #[serde(default)]
    pub constraints: Vec<String>,
    #[serde(default)]
    pub success_criteria: Vec<String>,
}

/// A project tracked by the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub project_id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Owner.
    pub user_id: UserId,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub project_type: ProjectType,
    #[serde(default)]
    pub complexity: ProjectComplexity,

    #[serde(default)]
    pub requirements: Vec<ProjectRequirement>,
    #[serde(default)]
    pub metadata: ProjectMetadata,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,

    #[serde(default)]
    pub progress_percentage: f64,
    #[serde(default)]
    pub total_tasks: u32,
    #[serde(default)]
    pub completed_tasks: u32,

    #[serde(default)]
    pub assigned_agents: Vec<AgentId>,
    #[serde(default)]
    pub active_agents: Vec<AgentId>,

    #[serde(default)]
    pub team_members: Vec<UserId>,
    #[serde(default)]
    pub channels: Vec<ChannelId>,

    #[serde(default)]
    pub settings: HashMap<String, serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,
    #[serde(default = "default_branch")]
    pub repository_branch: String,
}

impl Project {
    /// Creates a draft project owned by `owner`.
    pub fn new(name: impl Into<String>, owner: impl Into<UserId>) -> Self {
        let now = Utc::now();
        Self {
            project_id: ProjectId::new(),
            name: name.into(),
            description: String::new(),
            user_id: owner.into(),
            status: ProjectStatus::Draft,
            project_type: ProjectType::default(),
            complexity: ProjectComplexity::default(),
            requirements: Vec::new(),
            metadata: ProjectMetadata::default(),
            created_at: now,
            updated_at: now,
            started_at: None,
            completed_at: None,
            deadline: None,
            progress_percentage: 0.0,
            total_tasks: 0,
            completed_tasks: 0,
            assigned_agents: Vec::new(),
            active_agents: Vec::new(),
            team_members: Vec::new(),
            channels: Vec::new(),
            settings: HashMap::new(),
            repository_url: None,
            repository_branch: default_branch(),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    /// Owner or team member.
    pub fn is_visible_to(&self, user_id: &UserId) -> bool {
        self.is_owned_by(user_id) || self.team_members.contains(user_id)
    }

    /// Moves the project to `active` and stamps `started_at`.
    pub fn start(&mut self) {
        let now = Utc::now();
        self.status = ProjectStatus::Active;
        self.started_at = Some(now);
        self.updated_at = now;
    }

    /// Moves the project to `completed`, stamps `completed_at` and fills progress.
    pub fn complete(&mut self) {
        let now = Utc::now();
        self.status = ProjectStatus::Completed;
        self.completed_at = Some(now);
        self.progress_percentage = 100.0;
        self.updated_at = now;
    }

    pub fn add_channel(&mut self, channel_id: ChannelId) {
        if !self.channels.contains(&channel_id) {
            self.channels.push(channel_id);
            self.touch();
        }
    }

    /// Applies a partial update. Unset fields are left alone.
    pub fn apply(&mut self, patch: ProjectPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(project_type) = patch.project_type {
            self.project_type = project_type;
        }
        if let Some(complexity) = patch.complexity {
            self.complexity = complexity;
        }
        if let Some(requirements) = patch.requirements {
            self.requirements = requirements;
        }
        if let Some(metadata) = patch.metadata {
            self.metadata = metadata;
        }
        if let Some(deadline) = patch.deadline {
            self.deadline = Some(deadline);
        }
        if let Some(team_members) = patch.team_members {
            self.team_members = team_members;
        }
        if let Some(settings) = patch.settings {
            self.settings = settings;
        }
        if let Some(progress) = patch.progress_percentage {
            self.progress_percentage = progress;
        }
        if let Some(url) = patch.repository_url {
            self.repository_url = Some(url);
        }
        if let Some(branch) = patch.repository_branch {
            self.repository_branch = branch;
        }
        self.touch();
    }

    pub fn validate(&self) -> ValidationResult {
        validate_name("name", &self.name)?;
        validate_description(&self.description)?;
        validate_percentage("progress_percentage", self.progress_percentage)
    }
}

/// Partial project update; `None` means "leave unchanged".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<ProjectType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<ProjectComplexity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Vec<ProjectRequirement>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ProjectMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_members: Option<Vec<UserId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<HashMap<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_branch: Option<String>,
}

impl ProjectPatch {
    /// Validates only the fields that are set.
    pub fn validate(&self) -> ValidationResult {
        if let Some(name) = &self.name {
            validate_name("name", name)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        if let Some(progress) = self.progress_percentage {
            validate_percentage("progress_percentage", progress)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.project_type.is_none()
            && self.complexity.is_none()
            && self.requirements.is_none()
            && self.metadata.is_none()
            && self.deadline.is_none()
            && self.team_members.is_none()
            && self.settings.is_none()
            && self.progress_percentage.is_none()
            && self.repository_url.is_none()
            && self.repository_branch.is_none()
    }
}

/// Aggregate counters for the dashboard summary.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectStats {
    pub total_projects: usize,
    pub active_projects: usize,
    pub completed_projects: usize,
    pub draft_projects: usize,
    pub total_tasks: u64,
    pub completed_tasks: u64,
    pub average_completion_rate: f64,
}

impl ProjectStats {
    pub fn collect<'a>(projects: impl IntoIterator<Item = &'a Project>) -> Self {
        let mut stats = ProjectStats::default();
        for project in projects {
            stats.total_projects += 1;
            match project.status {
                ProjectStatus::Active => stats.active_projects += 1,
                ProjectStatus::Completed => stats.completed_projects += 1,
                ProjectStatus::Draft => stats.draft_projects += 1,
                ProjectStatus::Paused | ProjectStatus::Cancelled => {}
            }
            stats.total_tasks += u64::from(project.total_tasks);
            stats.completed_tasks += u64::from(project.completed_tasks);
        }
        if stats.total_tasks > 0 {
            stats.average_completion_rate =
                stats.completed_tasks as f64 / stats.total_tasks as f64 * 100.0;
        }
        stats
    }
}
