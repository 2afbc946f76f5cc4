//! Channel and chat message handlers.
//!
//! When a user posts into a channel, every active agent participant with a
//! registered responder answers. Replies and the artifacts they carry are
//! stored before the user's message is returned.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Duration;
use tracing::{debug, info, warn};

use agentdev_agents::{AgentReply, ResponderInput};
use agentdev_models::{
    Agent, AgentStatus, Artifact, Channel, ChannelId, Message, MessageId, Project,
};

use crate::error::{ApiError, Result};
use crate::extract::{ApiJson, ApiQuery, AuthUser};
use crate::state::AppState;
use crate::types::{
    ChannelListQuery, CreateChannelRequest, MessageListQuery, SendMessageRequest,
};

/// Largest history page.
pub const MAX_MESSAGE_LIMIT: usize = 200;

/// Loads a channel and checks the caller can see its project.
async fn visible_channel(
    state: &AppState,
    channel_id: &str,
    auth: &AuthUser,
) -> Result<(Channel, Project)> {
    let channel = state
        .storage
        .channels
        .load_optional(channel_id)?
        .ok_or_else(|| ApiError::NotFound("Channel not found".to_string()))?;
    let project = state
        .visible_project(channel.project_id.as_str(), &auth.user.user_id)
        .await?;
    Ok((channel, project))
}

/// GET /api/v1/messages/channels - Channels of visible projects.
pub async fn list_channels(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<ChannelListQuery>,
) -> Result<Json<Vec<Channel>>> {
    let visible: Vec<Project> = match &query.project_id {
        Some(id) => vec![state.visible_project(id, &auth.user.user_id).await?],
        None => state.visible_projects(&auth.user.user_id).await,
    };

    let mut channels: Vec<Channel> = state
        .storage
        .channels
        .list()?
        .into_iter()
        .filter(|c| visible.iter().any(|p| p.project_id == c.project_id))
        .collect();
    channels.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.channel_id.cmp(&b.channel_id))
    });
    Ok(Json(channels))
}

/// POST /api/v1/messages/channels
pub async fn create_channel(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<CreateChannelRequest>,
) -> Result<(StatusCode, Json<Channel>)> {
    let project = state
        .visible_project(&req.project_id, &auth.user.user_id)
        .await?;

    let mut channel = Channel::new(req.name.trim(), project.project_id.clone(), req.channel_type)
        .with_participant(auth.user.user_id.as_str());
    for participant in req.participants {
        channel = channel.with_participant(participant);
    }
    channel.validate()?;

    state.storage.channels.save(&channel)?;
    let channel_id = channel.channel_id.clone();
    state
        .update_project(project.project_id.as_str(), |p| p.add_channel(channel_id))
        .await?;

    info!(
        channel_id = %channel.channel_id,
        project_id = %project.project_id,
        "Channel created"
    );
    Ok((StatusCode::CREATED, Json(channel)))
}

/// GET /api/v1/messages/:channel_id - The `limit` messages before `before`, oldest first.
pub async fn list_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(channel_id): Path<String>,
    ApiQuery(query): ApiQuery<MessageListQuery>,
) -> Result<Json<Vec<Message>>> {
    if query.limit < 1 || query.limit > MAX_MESSAGE_LIMIT {
        return Err(ApiError::validation(
            "limit",
            format!("must be between 1 and {}", MAX_MESSAGE_LIMIT),
        ));
    }
    let (channel, _) = visible_channel(&state, &channel_id, &auth).await?;

    let mut messages = state.storage.messages.list_channel(&channel.channel_id)?;
    if let Some(before) = &query.before {
        let cut = messages
            .iter()
            .position(|m| m.message_id == before.as_str())
            .ok_or_else(|| ApiError::NotFound("Message not found".to_string()))?;
        messages.truncate(cut);
    }
    let skip = messages.len().saturating_sub(query.limit);
    Ok(Json(messages.split_off(skip)))
}

/// POST /api/v1/messages/ - Post as the caller; agent participants reply.
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<SendMessageRequest>,
) -> Result<(StatusCode, Json<Message>)> {
    let (channel, project) = visible_channel(&state, &req.channel_id, &auth).await?;

    let message = Message::from_user(
        channel.channel_id.clone(),
        auth.user.user_id.as_str(),
        auth.user.name.as_str(),
        req.content,
    )
    .with_type(req.message_type)
    .in_reply_to(req.parent_message_id.map(MessageId::from))
    .with_attachments(req.attachments);
    message.validate()?;

    state.storage.messages.append(&message)?;
    debug!(
        channel_id = %channel.channel_id,
        message_id = %message.message_id,
        user_id = %auth.user.user_id,
        "Message stored"
    );

    let replies = agent_replies(&state, &channel, &project, &message)?;
    for (i, (agent, reply)) in replies.into_iter().enumerate() {
        store_reply(&state, &channel.channel_id, &project, &message, &agent, reply, i)?;
    }

    Ok((StatusCode::CREATED, Json(message)))
}

/// Asks every active agent participant with a responder to answer `message`.
fn agent_replies(
    state: &AppState,
    channel: &Channel,
    project: &Project,
    message: &Message,
) -> Result<Vec<(Agent, AgentReply)>> {
    let input = ResponderInput::new(
        project.name.as_str(),
        project.project_type.as_str(),
        message.content.as_str(),
    );

    let mut replies = Vec::new();
    for participant in &channel.participants {
        let Some(agent) = state.storage.agents.load_optional(participant)? else {
            continue;
        };
        if agent.status != AgentStatus::Active {
            continue;
        }
        let Some(responder) = state.responders.get(&agent.agent_type) else {
            warn!(agent_id = %agent.agent_id, agent_type = %agent.agent_type, "No responder for agent");
            continue;
        };
        replies.push((agent, responder.respond(&input)));
    }
    Ok(replies)
}

/// Stores the reply's artifacts and then the reply itself, ordered after `parent`.
fn store_reply(
    state: &AppState,
    channel_id: &ChannelId,
    project: &Project,
    parent: &Message,
    agent: &Agent,
    reply: AgentReply,
    index: usize,
) -> Result<()> {
    let mut attachments = Vec::with_capacity(reply.artifacts.len());
    for item in &reply.artifacts {
        let content = serde_json::to_string_pretty(&item.content)
            .map_err(|e| ApiError::Internal(format!("Failed to encode artifact: {}", e)))?;
        let artifact = Artifact::new(
            project.project_id.clone(),
            item.title.as_str(),
            item.artifact_type.as_str(),
            "application/json",
            content,
            agent.agent_id.as_str(),
        )
        .with_agent_name(agent.name.as_str());
        state.storage.artifacts.save(&artifact)?;
        info!(
            artifact_id = %artifact.artifact_id,
            agent_id = %agent.agent_id,
            project_id = %project.project_id,
            "Agent artifact stored"
        );
        attachments.push(artifact.artifact_id.as_str().to_string());
    }

    let mut message = Message::from_agent(
        channel_id.clone(),
        agent.agent_id.as_str(),
        agent.name.as_str(),
        reply.to_text(),
    )
    .in_reply_to(Some(parent.message_id.clone()))
    .with_attachments(attachments);
    message.timestamp = parent.timestamp + Duration::milliseconds(index as i64 + 1);

    state.storage.messages.append(&message)?;
    Ok(())
}
