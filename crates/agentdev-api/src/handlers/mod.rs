//! API request handlers.

pub mod agents;
pub mod artifacts;
pub mod auth;
pub mod health;
pub mod messages;
pub mod projects;

pub use agents::*;
pub use artifacts::*;
pub use auth::*;
pub use health::*;
pub use messages::*;
pub use projects::*;
