//! Core traits for agent responders.
//!
//! A `Responder` answers a chat message on behalf of one agent type. The API
//! calls every responder whose agent participates in a channel and stores the
//! replies as agent messages.

use serde::{Deserialize, Serialize};

/// What a responder sees of the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponderInput {
    pub project_name: String,
    /// Wire name of the project type, e.g. `web_application`.
    pub project_type: String,
    pub message: String,
}

impl ResponderInput {
    pub fn new(
        project_name: impl Into<String>,
        project_type: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            project_type: project_type.into(),
            message: message.into(),
        }
    }

    /// Case-insensitive keyword check against the message.
    pub fn mentions(&self, keyword: &str) -> bool {
        self.message
            .to_lowercase()
            .contains(&keyword.to_lowercase())
    }
}

/// A structured document attached to a reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyArtifact {
    /// e.g. `project_plan`, `risk_assessment`.
    #[serde(rename = "type")]
    pub artifact_type: String,
    pub title: String,
    pub content: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AgentReply {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<ReplyArtifact>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub next_actions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggested_actions: Vec<String>,
}

impl AgentReply {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    /// Renders the reply as chat text: the message followed by bullet sections.
    pub fn to_text(&self) -> String {
        let mut text = self.message.clone();
        let sections = [
            ("I can help with", &self.capabilities),
            ("Suggested actions", &self.suggested_actions),
            ("Next actions", &self.next_actions),
        ];
        for (heading, items) in sections {
            if items.is_empty() {
                continue;
            }
            text.push_str("\n\n");
            text.push_str(heading);
            text.push(':');
            for item in items {
                text.push_str("\n- ");
                text.push_str(item);
            }
        }
        if !self.artifacts.is_empty() {
            text.push_str("\n\nAttached: ");
            let titles: Vec<&str> = self.artifacts.iter().map(|a| a.title.as_str()).collect();
            text.push_str(&titles.join(", "));
        }
        text
    }
}

/// Trait for agent responders.
///
/// Implementations must be deterministic: the same input always produces
/// the same reply.
pub trait Responder: Send + Sync {
    /// Agent type this responder answers for (`pm`, `architect`, ...).
    fn agent_type(&self) -> &str;

    fn respond(&self, input: &ResponderInput) -> AgentReply;
}
