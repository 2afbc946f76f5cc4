//! Artifacts produced by users and agents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ArtifactId, ProjectId};
use crate::validation::{require_non_blank, validate_description, validate_name, ValidationResult};

/// Content types accepted for upload.
pub const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "application/pdf",
    "text/plain",
    "application/json",
    "text/markdown",
    "application/zip",
    "image/png",
    "image/jpeg",
];

pub fn is_allowed_content_type(content_type: &str) -> bool {
    ALLOWED_CONTENT_TYPES.contains(&content_type)
}

/// File extension for a content type; unknown types map to `bin`.
pub fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "application/pdf" => "pdf",
        "text/plain" => "txt",
        "application/json" => "json",
        "text/markdown" => "md",
        "application/zip" => "zip",
        "image/png" => "png",
        "image/jpeg" => "jpg",
        _ => "bin",
    }
}

/// Lowercase ASCII slug: runs of anything other than letters and digits become `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("artifact");
    }
    slug
}

fn default_version() -> String {
    "1.0".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub artifact_id: ArtifactId,
    pub name: String,
    pub artifact_type: String,
    pub project_id: ProjectId,
    pub file_path: String,
    pub file_size: u64,
    pub content_type: String,
    #[serde(default)]
    pub content: String,
    /// User or agent ID.
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Artifact {
    pub fn new(
        project_id: impl Into<ProjectId>,
        name: impl Into<String>,
        artifact_type: impl Into<String>,
        content_type: impl Into<String>,
        content: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Self {
        let project_id = project_id.into();
        let name = name.into();
        let content_type = content_type.into();
        let content = content.into();
        let now = Utc::now();
        Self {
            artifact_id: ArtifactId::new(),
            file_path: format!(
                "artifacts/{}/{}.{}",
                project_id,
                slugify(&name),
                extension_for(&content_type)
            ),
            file_size: content.len() as u64,
            name,
            artifact_type: artifact_type.into(),
            project_id,
            content_type,
            content,
            created_by: created_by.into(),
            agent_name: None,
            created_at: now,
            updated_at: now,
            version: default_version(),
            description: String::new(),
            tags: Vec::new(),
        }
    }

    pub fn with_agent_name(mut self, agent_name: impl Into<String>) -> Self {
        self.agent_name = Some(agent_name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn validate(&self) -> ValidationResult {
        validate_name("name", &self.name)?;
        require_non_blank("artifact_type", &self.artifact_type)?;
        validate_description(&self.description)
    }
}
