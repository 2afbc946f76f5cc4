//! Project handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use agentdev_agents::PM_AGENT_ID;
use agentdev_models::{Channel, ChannelType, Project, ProjectPatch, ProjectStats};

use crate::error::{ApiError, Result};
use crate::extract::{ApiJson, ApiQuery, AuthUser};
use crate::state::AppState;
use crate::types::{CreateProjectRequest, ProjectListQuery, ProjectListResponse};

/// Largest page a client may request.
pub const MAX_PAGE_SIZE: usize = 100;

/// POST /api/v1/projects/ - Create a draft project owned by the caller.
///
/// A "General Discussion" channel with the owner, team members and the PM
/// agent is created alongside it.
pub async fn create_project(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<CreateProjectRequest>,
) -> Result<(StatusCode, Json<Project>)> {
    req.validate()?;

    let mut project = req.into_builder(auth.user.user_id.clone()).build();
    project.validate()?;

    let mut channel = Channel::new(
        "General Discussion",
        project.project_id.clone(),
        ChannelType::General,
    )
    .with_participant(project.user_id.as_str());
    for member in &project.team_members {
        channel = channel.with_participant(member.as_str());
    }
    channel = channel.with_participant(PM_AGENT_ID);

    state.storage.channels.save(&channel)?;
    project.add_channel(channel.channel_id.clone());
    state.save_project(project.clone()).await?;

    info!(
        project_id = %project.project_id,
        user_id = %auth.user.user_id,
        "Project created"
    );
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects/ - Visible projects, newest first, one page at a time.
pub async fn list_projects(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<ProjectListQuery>,
) -> Result<Json<ProjectListResponse>> {
    if query.page < 1 {
        return Err(ApiError::validation("page", "must be at least 1"));
    }
    if query.page_size < 1 || query.page_size > MAX_PAGE_SIZE {
        return Err(ApiError::validation(
            "page_size",
            format!("must be between 1 and {}", MAX_PAGE_SIZE),
        ));
    }

    let mut projects: Vec<Project> = state
        .visible_projects(&auth.user.user_id)
        .await
        .into_iter()
        .filter(|p| query.status.map_or(true, |s| p.status == s))
        .collect();
    projects.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.project_id.cmp(&b.project_id))
    });

    Ok(Json(ProjectListResponse::paginate(
        projects,
        query.page,
        query.page_size,
    )))
}

/// GET /api/v1/projects/stats/summary - Counters over the caller's own projects.
pub async fn project_stats(State(state): State<AppState>, auth: AuthUser) -> Json<ProjectStats> {
    let projects = state.list_projects().await;
    let stats = ProjectStats::collect(projects.iter().filter(|p| p.is_owned_by(&auth.user.user_id)));
    Json(stats)
}

/// GET /api/v1/projects/:id
pub async fn get_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Project>> {
    let project = state.visible_project(&id, &auth.user.user_id).await?;
    Ok(Json(project))
}

/// PUT /api/v1/projects/:id - Partial update, owner only.
pub async fn update_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<ProjectPatch>,
) -> Result<Json<Project>> {
    state.owned_project(&id, &auth.user.user_id).await?;
    patch.validate()?;

    let project = state.update_project(&id, |p| p.apply(patch)).await?;
    info!(project_id = %id, user_id = %auth.user.user_id, "Project updated");
    Ok(Json(project))
}

/// DELETE /api/v1/projects/:id - Owner only. Removes channels, messages and artifacts too.
pub async fn delete_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let project = state.owned_project(&id, &auth.user.user_id).await?;

    for channel in state.storage.channels.list()? {
        if channel.project_id == project.project_id {
            state.storage.messages.delete_channel(&channel.channel_id)?;
            state.storage.channels.delete(channel.channel_id.as_str())?;
        }
    }
    for artifact in state.storage.artifacts.list()? {
        if artifact.project_id == project.project_id {
            state.storage.artifacts.delete(artifact.artifact_id.as_str())?;
        }
    }
    state.remove_project(&id).await?;

    info!(project_id = %id, user_id = %auth.user.user_id, "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/projects/:id/start
pub async fn start_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Project>> {
    state.owned_project(&id, &auth.user.user_id).await?;
    let project = state.update_project(&id, Project::start).await?;
    info!(project_id = %id, "Project started");
    Ok(Json(project))
}

/// POST /api/v1/projects/:id/complete
pub async fn complete_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Project>> {
    state.owned_project(&id, &auth.user.user_id).await?;
    let project = state.update_project(&id, Project::complete).await?;
    info!(project_id = %id, "Project completed");
    Ok(Json(project))
}
