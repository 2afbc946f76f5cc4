//! Architect and security responders.

use crate::pm::strings;
use crate::traits::{AgentReply, Responder, ResponderInput};

#[derive(Debug, Default, Clone)]
pub struct ArchitectResponder;

impl ArchitectResponder {
    pub fn new() -> Self {
        Self
    }
}

impl Responder for ArchitectResponder {
    fn agent_type(&self) -> &str {
        "architect"
    }

    fn respond(&self, input: &ResponderInput) -> AgentReply {
        AgentReply {
            message: format!(
                "Hello! I'm the Software Architect Agent for '{}'. I can review the design of this {} and help choose its technology stack.",
                input.project_name, input.project_type
            ),
            capabilities: strings(&[
                "System design",
                "Technology selection",
                "Architecture review",
            ]),
            suggested_actions: strings(&[
                "Draft a system architecture",
                "Compare technology options",
                "Review the current architecture",
            ]),
            ..Default::default()
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct SecurityResponder;

impl SecurityResponder {
    pub fn new() -> Self {
        Self
    }
}

impl Responder for SecurityResponder {
    fn agent_type(&self) -> &str {
        "security"
    }

    fn respond(&self, input: &ResponderInput) -> AgentReply {
        AgentReply {
            message: format!(
                "Hello! I'm the Security Agent for '{}'. I can review its security posture and check compliance requirements.",
                input.project_name
            ),
            capabilities: strings(&[
                "Security review",
                "Vulnerability assessment",
                "Compliance check",
            ]),
            suggested_actions: strings(&[
                "Run a security review",
                "Assess known vulnerabilities",
                "Check compliance requirements",
            ]),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_architect_reply() {
        let input = ResponderInput::new("Shop", "api_service", "thoughts?");
        let reply = ArchitectResponder::new().respond(&input);

        assert!(reply.message.contains("'Shop'"));
        assert!(reply.message.contains("api_service"));
        assert_eq!(
            reply.capabilities,
            vec!["System design", "Technology selection", "Architecture review"]
        );
    }

    #[test]
    fn test_security_reply() {
        let input = ResponderInput::new("Shop", "api_service", "is it safe?");
        let reply = SecurityResponder::new().respond(&input);

        assert!(reply.message.starts_with("Hello! I'm the Security Agent for 'Shop'"));
        assert!(reply.capabilities.contains(&"Vulnerability assessment".to_string()));
        assert!(reply.artifacts.is_empty());
    }
}
