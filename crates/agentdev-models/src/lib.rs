//! Core data models for AgentDev.
//!
//! This crate provides the record types shared by the API server, the
//! client and the CLI: users, projects, agents, chat messages and
//! artifacts, plus the validation rules they share.

pub mod agent;
pub mod artifact;
pub mod builders;
pub mod ids;
pub mod message;
pub mod project;
pub mod user;
pub mod validation;

// Re-export main types
pub use agent::{Agent, AgentStatus};
pub use artifact::{
    extension_for, is_allowed_content_type, slugify, Artifact, ALLOWED_CONTENT_TYPES,
};
pub use builders::ProjectBuilder;
pub use ids::{AgentId, ArtifactId, ChannelId, MessageId, ProjectId, UserId};
pub use message::{Channel, ChannelType, Message, SenderKind};
pub use project::{
    Project, ProjectComplexity, ProjectMetadata, ProjectPatch, ProjectRequirement,
    ProjectStats, ProjectStatus, ProjectType,
};
pub use user::{Role, User};
pub use validation::{ValidationError, ValidationResult};
