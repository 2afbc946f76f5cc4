//! Responder registry and the seeded agent records.

use std::collections::HashMap;
use std::sync::Arc;

use agentdev_models::Agent;

use crate::pm::PmResponder;
use crate::specialists::{ArchitectResponder, SecurityResponder};
use crate::traits::Responder;

/// Registry for agent responders, keyed by agent type.
///
/// Responders are stored as `Arc<dyn Responder>` so handlers can share them
/// across tasks.
///
/// # Example
///
/// ```
/// use agentdev_agents::{ResponderInput, ResponderRegistry};
///
/// let registry = ResponderRegistry::new();
///
/// if let Some(pm) = registry.get("pm") {
///     let reply = pm.respond(&ResponderInput::new("Shop", "web_application", "plan it"));
///     println!("{}", reply.message);
/// }
/// ```
pub struct ResponderRegistry {
    responders: HashMap<String, Arc<dyn Responder>>,
}

impl ResponderRegistry {
    /// Creates a registry with all built-in responders.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(PmResponder::new()));
        registry.register(Arc::new(ArchitectResponder::new()));
        registry.register(Arc::new(SecurityResponder::new()));
        registry
    }

    pub fn empty() -> Self {
        Self {
            responders: HashMap::new(),
        }
    }

    /// Registers a responder, replacing any existing one for the same type.
    pub fn register(&mut self, responder: Arc<dyn Responder>) {
        self.responders
            .insert(responder.agent_type().to_string(), responder);
    }

    pub fn get(&self, agent_type: &str) -> Option<Arc<dyn Responder>> {
        self.responders.get(agent_type).cloned()
    }

    /// Registered agent types, sorted.
    pub fn list(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.responders.keys().map(|s| s.as_str()).collect();
        types.sort_unstable();
        types
    }

    pub fn len(&self) -> usize {
        self.responders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responders.is_empty()
    }
}

impl Default for ResponderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// ID of the seeded project manager agent, added to every new project's
/// general channel.
pub const PM_AGENT_ID: &str = "agent_pm_001";

/// The three global agents every installation starts with.
pub fn builtin_agents() -> Vec<Agent> {
    vec![
        Agent::new("Project Manager Agent", "pm")
            .with_id(PM_AGENT_ID)
            .with_description("AI-powered project management agent")
            .with_capabilities(["project_planning", "task_management", "risk_assessment"]),
        Agent::new("Software Architect Agent", "architect")
            .with_id("agent_arch_001")
            .with_description("AI-powered software architecture agent")
            .with_capabilities(["system_design", "technology_selection", "architecture_review"]),
        Agent::new("Security Agent", "security")
            .with_id("agent_sec_001")
            .with_description("AI-powered security analysis agent")
            .with_capabilities(["security_review", "vulnerability_assessment", "compliance_check"]),
    ]
}
