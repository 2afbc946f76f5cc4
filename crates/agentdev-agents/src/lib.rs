//! Built-in agent responders.
//!
//! Agents in AgentDev answer chat messages through the `Responder` trait.
//! Replies are deterministic and offline; each responder produces a text
//! message plus optional structured artifacts (project plans, risk
//! assessments) that the API stores alongside the conversation.
//!
//! # Key Concepts
//!
//! - **Responder**: Trait that every agent type implements
//! - **ResponderRegistry**: Looks up responders by agent type
//! - **builtin_agents**: The agent records seeded on first start
//!
//! # Example
//!
//! ```
//! use agentdev_agents::{ResponderInput, ResponderRegistry};
//!
//! let registry = ResponderRegistry::new();
//! let pm = registry.get("pm").unwrap();
//!
//! let reply = pm.respond(&ResponderInput::new("Shop", "web_application", "Any risks?"));
//! assert_eq!(reply.artifacts[0].artifact_type, "risk_assessment");
//! ```

pub mod pm;
pub mod registry;
pub mod specialists;
pub mod traits;

pub use pm::PmResponder;
pub use registry::{builtin_agents, ResponderRegistry, PM_AGENT_ID};
pub use specialists::{ArchitectResponder, SecurityResponder};
pub use traits::{AgentReply, ReplyArtifact, Responder, ResponderInput};
