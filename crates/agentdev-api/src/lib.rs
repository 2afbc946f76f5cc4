//! REST API for the AgentDev platform.
//!
//! This crate serves the dashboard backend:
//! - Bearer-token login, refresh and logout
//! - Project CRUD with owner/team access checks
//! - Agent registry and chat channels where built-in agents reply
//! - Artifacts produced by users and agents
//!
//! # Example
//!
//! ```no_run
//! use agentdev_api::{serve, ApiConfig, AppState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApiConfig::from_env();
//!     let state = AppState::new(config.clone())?;
//!
//!     serve(config, state).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod rate_limit;
pub mod router;
pub mod state;
pub mod types;

pub use auth::{SessionManager, TokenPair, UserDirectory};
pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use extract::AuthUser;
pub use router::{create_router, serve, serve_listener, serve_with_shutdown};
pub use state::AppState;
