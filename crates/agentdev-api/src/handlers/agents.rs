//! Agent handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use agentdev_models::{Agent, ProjectId, Role};

use crate::error::{ApiError, Result};
use crate::extract::{ApiJson, ApiQuery, AuthUser};
use crate::state::AppState;
use crate::types::{AgentListQuery, CreateAgentRequest};

/// GET /api/v1/agents/ - Agents serving a project (plus global agents), or all agents.
pub async fn list_agents(
    State(state): State<AppState>,
    _auth: AuthUser,
    ApiQuery(query): ApiQuery<AgentListQuery>,
) -> Result<Json<Vec<Agent>>> {
    let project_id = query.project_id.map(ProjectId::from);
    let mut agents: Vec<Agent> = state
        .storage
        .agents
        .list()?
        .into_iter()
        .filter(|a| project_id.as_ref().map_or(true, |id| a.serves(id)))
        .collect();
    agents.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.agent_id.cmp(&b.agent_id))
    });
    Ok(Json(agents))
}

/// POST /api/v1/agents/ - Requires the developer role.
pub async fn create_agent(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<CreateAgentRequest>,
) -> Result<(StatusCode, Json<Agent>)> {
    auth.require(Role::Developer)?;

    let project_id = req.project_id.map(ProjectId::from);
    let agent = Agent::new(req.name.trim(), req.agent_type.trim())
        .with_description(req.description)
        .with_capabilities(req.capabilities)
        .for_project(project_id.clone());
    agent.validate()?;

    if let Some(project_id) = &project_id {
        state
            .visible_project(project_id.as_str(), &auth.user.user_id)
            .await?;
    }

    state.storage.agents.save(&agent)?;
    info!(
        agent_id = %agent.agent_id,
        agent_type = %agent.agent_type,
        user_id = %auth.user.user_id,
        "Agent created"
    );
    Ok((StatusCode::CREATED, Json(agent)))
}

/// GET /api/v1/agents/:id
pub async fn get_agent(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Agent>> {
    state
        .storage
        .agents
        .load_optional(&id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Agent not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::make_test_state;
    use agentdev_models::{AgentStatus, Project, User};

    fn auth(role: Role) -> AuthUser {
        AuthUser {
            user: User::new("user_123", "admin@example.com", "Admin User", role),
            token: "test-token".to_string(),
        }
    }

    fn request(name: &str, agent_type: &str, project_id: Option<&str>) -> CreateAgentRequest {
        CreateAgentRequest {
            name: name.to_string(),
            agent_type: agent_type.to_string(),
            description: String::new(),
            project_id: project_id.map(String::from),
            capabilities: vec!["testing".to_string()],
        }
    }

    #[tokio::test]
    async fn test_builtin_agents_listed() {
        let state = make_test_state();
        let Json(agents) = list_agents(
            State(state),
            auth(Role::User),
            ApiQuery(AgentListQuery::default()),
        )
        .await
        .unwrap();

        let ids: Vec<&str> = agents.iter().map(|a| a.agent_id.as_str()).collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.contains(&"agent_pm_001"));
    }

    #[tokio::test]
    async fn test_create_agent_requires_developer() {
        let state = make_test_state();
        let result = create_agent(
            State(state),
            auth(Role::User),
            ApiJson(request("QA", "qa", None)),
        )
        .await;
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_create_agent_validation_and_unknown_project() {
        let state = make_test_state();

        let result = create_agent(
            State(state.clone()),
            auth(Role::Developer),
            ApiJson(request("QA", "  ", None)),
        )
        .await;
        match result {
            Err(ApiError::Validation { field, .. }) => assert_eq!(field, "agent_type"),
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }

        let result = create_agent(
            State(state),
            auth(Role::Developer),
            ApiJson(request("QA", "qa", Some("proj-missing"))),
        )
        .await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_project_filter_includes_global_agents() {
        let state = make_test_state();
        let project = Project::new("p", "user_123");
        let pid = project.project_id.as_str().to_string();
        state.save_project(project).await.unwrap();

        let (status, Json(agent)) = create_agent(
            State(state.clone()),
            auth(Role::Admin),
            ApiJson(request("QA", "qa", Some(&pid))),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(agent.status, AgentStatus::Active);

        let Json(agents) = list_agents(
            State(state.clone()),
            auth(Role::User),
            ApiQuery(AgentListQuery {
                project_id: Some(pid),
            }),
        )
        .await
        .unwrap();
        assert_eq!(agents.len(), 4);

        let Json(agents) = list_agents(
            State(state),
            auth(Role::User),
            ApiQuery(AgentListQuery {
                project_id: Some("proj-other".to_string()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(agents.len(), 3);
        assert!(agents.iter().all(Agent::is_global));
    }

    #[tokio::test]
    async fn test_get_agent() {
        let state = make_test_state();
        let Json(agent) = get_agent(
            State(state.clone()),
            auth(Role::User),
            Path("agent_pm_001".to_string()),
        )
        .await
        .unwrap();
        assert_eq!(agent.agent_type, "pm");

        let result = get_agent(State(state), auth(Role::User), Path("agent-nope".to_string())).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
