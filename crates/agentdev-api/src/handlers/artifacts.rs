//! Artifact handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use agentdev_models::{is_allowed_content_type, Artifact, ProjectId, ALLOWED_CONTENT_TYPES};

use crate::error::{ApiError, Result};
use crate::extract::{ApiJson, ApiQuery, AuthUser};
use crate::state::AppState;
use crate::types::{ArtifactListQuery, CreateArtifactRequest};

/// GET /api/v1/artifacts/ - Artifacts of visible projects, newest first.
pub async fn list_artifacts(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<ArtifactListQuery>,
) -> Result<Json<Vec<Artifact>>> {
    let visible: Vec<ProjectId> = state
        .visible_projects(&auth.user.user_id)
        .await
        .into_iter()
        .map(|p| p.project_id)
        .collect();

    let mut artifacts: Vec<Artifact> = state
        .storage
        .artifacts
        .list()?
        .into_iter()
        .filter(|a| visible.contains(&a.project_id))
        .filter(|a| {
            query
                .project_id
                .as_deref()
                .map_or(true, |id| a.project_id == id)
        })
        .filter(|a| {
            query
                .artifact_type
                .as_deref()
                .map_or(true, |t| a.artifact_type == t)
        })
        .collect();
    artifacts.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.artifact_id.cmp(&b.artifact_id))
    });
    Ok(Json(artifacts))
}

/// GET /api/v1/artifacts/:id
pub async fn get_artifact(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Artifact>> {
    let artifact = state
        .storage
        .artifacts
        .load_optional(&id)?
        .ok_or_else(|| ApiError::NotFound("Artifact not found".to_string()))?;
    state
        .visible_project(artifact.project_id.as_str(), &auth.user.user_id)
        .await?;
    Ok(Json(artifact))
}

/// POST /api/v1/artifacts/ - Store an artifact with inline content.
pub async fn create_artifact(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<CreateArtifactRequest>,
) -> Result<(StatusCode, Json<Artifact>)> {
    req.validate()?;

    if !is_allowed_content_type(&req.content_type) {
        return Err(ApiError::UnsupportedMediaType(format!(
            "Content type {} is not allowed; expected one of: {}",
            req.content_type,
            ALLOWED_CONTENT_TYPES.join(", ")
        )));
    }
    let max = state.config.max_artifact_bytes;
    if req.content.len() as u64 > max {
        return Err(ApiError::PayloadTooLarge(format!(
            "Artifact exceeds the {} byte limit",
            max
        )));
    }

    let project = state
        .visible_project(&req.project_id, &auth.user.user_id)
        .await?;

    let artifact = Artifact::new(
        project.project_id,
        req.name.trim(),
        req.artifact_type.trim(),
        req.content_type,
        req.content,
        auth.user.user_id.as_str(),
    )
    .with_description(req.description)
    .with_tags(req.tags);
    state.storage.artifacts.save(&artifact)?;

    info!(
        artifact_id = %artifact.artifact_id,
        project_id = %artifact.project_id,
        size = artifact.file_size,
        "Artifact created"
    );
    Ok((StatusCode::CREATED, Json(artifact)))
}
