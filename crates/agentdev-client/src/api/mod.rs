//! Endpoint groups, one per resource.

mod agents;
mod artifacts;
mod auth;
mod messages;
mod projects;

pub use agents::AgentsApi;
pub use artifacts::ArtifactsApi;
pub use auth::AuthApi;
pub use messages::MessagesApi;
pub use projects::ProjectsApi;
