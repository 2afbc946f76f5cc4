//! Chat channels and messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ChannelId, MessageId, ProjectId};
use crate::validation::{require_non_blank, validate_name, ValidationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChannelType {
    #[default]
    General,
    Agent,
    Direct,
}

/// A conversation inside a project. Participants are user or agent IDs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub channel_id: ChannelId,
    pub name: String,
    pub project_id: ProjectId,
    #[serde(default)]
    pub channel_type: ChannelType,
    #[serde(default)]
    pub participants: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Channel {
    pub fn new(
        name: impl Into<String>,
        project_id: impl Into<ProjectId>,
        channel_type: ChannelType,
    ) -> Self {
        Self {
            channel_id: ChannelId::new(),
            name: name.into(),
            project_id: project_id.into(),
            channel_type,
            participants: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_participant(mut self, participant: impl Into<String>) -> Self {
        let participant = participant.into();
        if !self.participants.contains(&participant) {
            self.participants.push(participant);
        }
        self
    }

    pub fn validate(&self) -> ValidationResult {
        validate_name("name", &self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SenderKind {
    #[default]
    User,
    Agent,
}

fn default_message_type() -> String {
    "text".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: MessageId,
    pub channel_id: ChannelId,
    pub sender_id: String,
    pub sender_name: String,
    #[serde(default)]
    pub sender_kind: SenderKind,
    pub content: String,
    #[serde(default = "default_message_type")]
    pub message_type: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_message_id: Option<MessageId>,
    #[serde(default)]
    pub attachments: Vec<String>,
    /// Set on agent messages so the dashboard can label them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
}

impl Message {
    fn base(
        channel_id: ChannelId,
        sender_id: String,
        sender_name: String,
        sender_kind: SenderKind,
        content: String,
    ) -> Self {
        Self {
            message_id: MessageId::new(),
            channel_id,
            sender_id,
            sender_name,
            sender_kind,
            content,
            message_type: default_message_type(),
            timestamp: Utc::now(),
            parent_message_id: None,
            attachments: Vec::new(),
            agent_name: None,
        }
    }

    pub fn from_user(
        channel_id: impl Into<ChannelId>,
        user_id: impl Into<String>,
        user_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::base(
            channel_id.into(),
            user_id.into(),
            user_name.into(),
            SenderKind::User,
            content.into(),
        )
    }

    pub fn from_agent(
        channel_id: impl Into<ChannelId>,
        agent_id: impl Into<String>,
        agent_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let agent_name = agent_name.into();
        let mut message = Self::base(
            channel_id.into(),
            agent_id.into(),
            agent_name.clone(),
            SenderKind::Agent,
            content.into(),
        );
        message.agent_name = Some(agent_name);
        message
    }

    pub fn with_type(mut self, message_type: impl Into<String>) -> Self {
        self.message_type = message_type.into();
        self
    }

    pub fn in_reply_to(mut self, parent: Option<MessageId>) -> Self {
        self.parent_message_id = parent;
        self
    }

    pub fn with_attachments(mut self, attachments: Vec<String>) -> Self {
        self.attachments = attachments;
        self
    }

    pub fn is_from_agent(&self) -> bool {
        self.sender_kind == SenderKind::Agent
    }

    pub fn validate(&self) -> ValidationResult {
        require_non_blank("content", &self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message() {
        let msg = Message::from_user("chan-1", "user_123", "Admin User", "hello");

        assert!(msg.message_id.as_str().starts_with("msg-"));
        assert_eq!(msg.sender_kind, SenderKind::User);
        assert_eq!(msg.message_type, "text");
        assert!(msg.agent_name.is_none());
        assert!(!msg.is_from_agent());
    }

    #[test]
    fn test_agent_message_carries_agent_name() {
        let msg = Message::from_agent("chan-1", "agent_pm_001", "Project Manager Agent", "hi");

        assert!(msg.is_from_agent());
        assert_eq!(msg.agent_name.as_deref(), Some("Project Manager Agent"));
        assert_eq!(msg.sender_name, "Project Manager Agent");
    }

    #[test]
    fn test_empty_content_rejected() {
        let msg = Message::from_user("chan-1", "u", "U", "  ");
        assert_eq!(msg.validate().unwrap_err().field, "content");
    }

    #[test]
    fn test_channel_participants_deduplicated() {
        let channel = Channel::new("General Discussion", "proj-1", ChannelType::General)
            .with_participant("user_123")
            .with_participant("agent_pm_001")
            .with_participant("user_123");

        assert_eq!(channel.participants, vec!["user_123", "agent_pm_001"]);
        assert!(channel.validate().is_ok());
    }

    #[test]
    fn test_message_defaults_on_deserialize() {
        let json = r#"{
            "message_id": "msg-1",
            "channel_id": "chan-1",
            "sender_id": "user_123",
            "sender_name": "Admin User",
            "content": "hello",
            "timestamp": "2024-01-01T00:00:00Z"
        }"#;
        let msg: Message = serde_json::from_str(json).unwrap();

        assert_eq!(msg.message_type, "text");
        assert_eq!(msg.sender_kind, SenderKind::User);
        assert!(msg.attachments.is_empty());
    }
}
