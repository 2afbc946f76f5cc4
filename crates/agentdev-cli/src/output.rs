//! Plain-text rendering of records for table output.

use std::fmt::Write;

use agentdev_models::{Agent, Artifact, Channel, Message, Project, ProjectStats, User};

pub fn user_line(user: &User) -> String {
    format!("{} <{}> ({}, {})", user.name, user.email, user.role, user.user_id)
}

pub fn project_table(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "No projects found.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<36}  {:<24}  {:<10}  {:>8}  CREATED",
        "ID", "NAME", "STATUS", "PROGRESS"
    );
    let _ = writeln!(out, "{}", "-".repeat(100));
    for project in projects {
        let _ = writeln!(
            out,
            "{:<36}  {:<24}  {:<10}  {:>7.0}%  {}",
            project.project_id,
            truncate(&project.name, 24),
            project.status,
            project.progress_percentage,
            project.created_at.format("%Y-%m-%d %H:%M")
        );
    }
    out
}

pub fn project_detail(project: &Project) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Project: {} ({})", project.name, project.project_id);
    let _ = writeln!(out, "  Status: {}", project.status);
    let _ = writeln!(out, "  Type: {}", project.project_type.as_str());
    if !project.description.is_empty() {
        let _ = writeln!(out, "  Description: {}", project.description);
    }
    let _ = writeln!(
        out,
        "  Progress: {:.0}% ({}/{} tasks)",
        project.progress_percentage, project.completed_tasks, project.total_tasks
    );
    let _ = writeln!(out, "  Owner: {}", project.user_id);
    if !project.team_members.is_empty() {
        let members: Vec<&str> = project.team_members.iter().map(|m| m.as_str()).collect();
        let _ = writeln!(out, "  Team: {}", members.join(", "));
    }
    let _ = writeln!(out, "  Channels: {}", project.channels.len());
    let _ = writeln!(out, "  Created: {}", project.created_at);
    if let Some(started) = project.started_at {
        let _ = writeln!(out, "  Started: {}", started);
    }
    if let Some(completed) = project.completed_at {
        let _ = writeln!(out, "  Completed: {}", completed);
    }
    out
}

pub fn stats_summary(stats: &ProjectStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Projects: {}", stats.total_projects);
    let _ = writeln!(
        out,
        "  Active: {}  Completed: {}  Draft: {}",
        stats.active_projects, stats.completed_projects, stats.draft_projects
    );
    let _ = writeln!(
        out,
        "Tasks: {}/{} done ({:.1}% average completion)",
        stats.completed_tasks, stats.total_tasks, stats.average_completion_rate
    );
    out
}

pub fn agent_table(agents: &[Agent]) -> String {
    if agents.is_empty() {
        return "No agents found.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<24}  {:<24}  {:<16}  {:<8}  SCOPE",
        "ID", "NAME", "TYPE", "STATUS"
    );
    let _ = writeln!(out, "{}", "-".repeat(90));
    for agent in agents {
        let scope = agent
            .project_id
            .as_ref()
            .map(|p| p.to_string())
            .unwrap_or_else(|| "global".to_string());
        let _ = writeln!(
            out,
            "{:<24}  {:<24}  {:<16}  {:<8}  {}",
            truncate(agent.agent_id.as_str(), 24),
            truncate(&agent.name, 24),
            truncate(&agent.agent_type, 16),
            format!("{:?}", agent.status).to_lowercase(),
            scope
        );
    }
    out
}

pub fn agent_detail(agent: &Agent) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Agent: {} ({})", agent.name, agent.agent_id);
    let _ = writeln!(out, "  Type: {}", agent.agent_type);
    let _ = writeln!(out, "  Status: {}", format!("{:?}", agent.status).to_lowercase());
    if !agent.description.is_empty() {
        let _ = writeln!(out, "  Description: {}", agent.description);
    }
    if !agent.capabilities.is_empty() {
        let _ = writeln!(out, "  Capabilities: {}", agent.capabilities.join(", "));
    }
    let _ = writeln!(out, "  Created: {}", agent.created_at);
    out
}

pub fn channel_table(channels: &[Channel]) -> String {
    if channels.is_empty() {
        return "No channels found.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "{:<36}  {:<24}  {:<36}  MEMBERS", "ID", "NAME", "PROJECT");
    let _ = writeln!(out, "{}", "-".repeat(110));
    for channel in channels {
        let _ = writeln!(
            out,
            "{:<36}  {:<24}  {:<36}  {}",
            channel.channel_id,
            truncate(&channel.name, 24),
            channel.project_id,
            channel.participants.len()
        );
    }
    out
}

/// One line per message, agent messages tagged with the agent name.
pub fn message_lines(messages: &[Message]) -> String {
    if messages.is_empty() {
        return "No messages yet.\n".to_string();
    }

    let mut out = String::new();
    for message in messages {
        let sender = match &message.agent_name {
            Some(agent) => format!("{} [agent]", agent),
            None => message.sender_name.clone(),
        };
        let _ = writeln!(
            out,
            "[{}] {}: {}",
            message.timestamp.format("%Y-%m-%d %H:%M:%S"),
            sender,
            message.content
        );
    }
    out
}

pub fn artifact_table(artifacts: &[Artifact]) -> String {
    if artifacts.is_empty() {
        return "No artifacts found.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<36}  {:<28}  {:<20}  {:>8}  AUTHOR",
        "ID", "NAME", "TYPE", "BYTES"
    );
    let _ = writeln!(out, "{}", "-".repeat(110));
    for artifact in artifacts {
        let _ = writeln!(
            out,
            "{:<36}  {:<28}  {:<20}  {:>8}  {}",
            artifact.artifact_id,
            truncate(&artifact.name, 28),
            truncate(&artifact.artifact_type, 20),
            artifact.file_size,
            artifact.agent_name.as_deref().unwrap_or(&artifact.created_by)
        );
    }
    out
}

pub fn artifact_detail(artifact: &Artifact) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Artifact: {} ({})", artifact.name, artifact.artifact_id);
    let _ = writeln!(out, "  Type: {}", artifact.artifact_type);
    let _ = writeln!(out, "  Project: {}", artifact.project_id);
    let _ = writeln!(
        out,
        "  Author: {}",
        artifact.agent_name.as_deref().unwrap_or(&artifact.created_by)
    );
    let _ = writeln!(out, "  Created: {}", artifact.created_at);
    let _ = writeln!(out, "  {} ({} bytes)", artifact.content_type, artifact.file_size);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", artifact.content);
    out
}

/// Truncates a string to `max_len` characters, adding "..." if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
