//! Project manager responder.

use serde_json::json;

use crate::traits::{AgentReply, ReplyArtifact, Responder, ResponderInput};

/// Answers planning and risk questions with canned documents.
#[derive(Debug, Default, Clone)]
pub struct PmResponder;

impl PmResponder {
    pub fn new() -> Self {
        Self
    }

    fn plan(&self, input: &ResponderInput) -> AgentReply {
        let content = json!({
            "phases": [
                {
                    "name": "Requirements Analysis",
                    "duration": "1 week",
                    "tasks": ["Gather requirements", "Stakeholder interviews", "Create user stories"]
                },
                {
                    "name": "Design Phase",
                    "duration": "2 weeks",
                    "tasks": ["System architecture", "UI/UX design", "Database design"]
                },
                {
                    "name": "Development",
                    "duration": "4 weeks",
                    "tasks": ["Frontend development", "Backend development", "Integration"]
                },
                {
                    "name": "Testing & Deployment",
                    "duration": "1 week",
                    "tasks": ["Unit testing", "Integration testing", "Deployment setup"]
                }
            ],
            "total_duration": "8 weeks",
            "team_size": "3-5 developers"
        });

        AgentReply {
            message: format!(
                "I'll create a comprehensive project plan for '{}'. Based on the {} type, I recommend the following phases:",
                input.project_name, input.project_type
            ),
            artifacts: vec![ReplyArtifact {
                artifact_type: "project_plan".to_string(),
                title: "Project Plan".to_string(),
                content,
            }],
            next_actions: strings(&[
                "Review and approve the project plan",
                "Assign team members to phases",
                "Set up project tracking tools",
            ]),
            ..Default::default()
        }
    }

    fn risks(&self, input: &ResponderInput) -> AgentReply {
        let content = json!({
            "high_risks": [
                {
                    "risk": "Scope creep",
                    "probability": "High",
                    "impact": "High",
                    "mitigation": "Clear requirement documentation and change control process"
                },
                {
                    "risk": "Technical complexity",
                    "probability": "Medium",
                    "impact": "High",
                    "mitigation": "Proof of concept and technical spikes"
                }
            ],
            "medium_risks": [
                {
                    "risk": "Resource availability",
                    "probability": "Medium",
                    "impact": "Medium",
                    "mitigation": "Cross-training and backup resources"
                }
            ]
        });

        AgentReply {
            message: format!(
                "I've identified potential risks for the {} project:",
                input.project_name
            ),
            artifacts: vec![ReplyArtifact {
                artifact_type: "risk_assessment".to_string(),
                title: "Risk Assessment".to_string(),
                content,
            }],
            next_actions: strings(&[
                "Implement risk mitigation strategies",
                "Set up regular risk review meetings",
                "Create contingency plans",
            ]),
            ..Default::default()
        }
    }

    fn greeting(&self, input: &ResponderInput) -> AgentReply {
        AgentReply {
            message: format!(
                "Hello! I'm the PM Agent for '{}'. I can help you with project planning, risk assessment, resource allocation, and progress tracking. What would you like to work on?",
                input.project_name
            ),
            capabilities: strings(&[
                "Project planning and scheduling",
                "Risk assessment and mitigation",
                "Resource allocation",
                "Progress tracking and reporting",
                "Stakeholder communication",
                "Change management",
            ]),
            suggested_actions: strings(&[
                "Create project plan",
                "Assess project risks",
                "Define team structure",
                "Set up project milestones",
            ]),
            ..Default::default()
        }
    }
}

impl Responder for PmResponder {
    fn agent_type(&self) -> &str {
        "pm"
    }

    fn respond(&self, input: &ResponderInput) -> AgentReply {
        if input.mentions("plan") || input.mentions("schedule") {
            self.plan(input)
        } else if input.mentions("risk") {
            self.risks(input)
        } else {
            self.greeting(input)
        }
    }
}

pub(crate) fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
