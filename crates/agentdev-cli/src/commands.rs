//! Command handlers for CLI subcommands.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use agentdev_api::{serve_with_shutdown, ApiConfig, AppState};
use agentdev_client::{
    ApiClient, ClientError, NewAgent, NewArtifact, NewMessage, NewProject, SessionStore,
};
use agentdev_models::ProjectPatch;
use agentdev_persistence::PersistenceError;

use crate::cli::{
    AgentsCommand, ArtifactsCommand, ChatCommand, Cli, Commands, OutputFormat, ProjectsCommand,
};
use crate::output;

/// Projects shown on the dashboard.
const RECENT_PROJECTS: usize = 5;

/// History fetched after sending, to pick up the agent replies.
const REPLY_WINDOW: usize = 50;

/// Errors reported to the user by a command.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Rejected locally before any request was made.
    #[error("{0}")]
    Invalid(String),

    #[error("Not logged in. Run `agentdev login` first")]
    NotLoggedIn,

    /// The server answered 401 and the stored session was cleared.
    #[error("Session expired, please log in again")]
    SessionExpired,

    #[error("Login failed: {0}")]
    LoginFailed(String),

    #[error("{0}")]
    Client(ClientError),

    #[error("server error: {0}")]
    Server(#[source] std::io::Error),

    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ClientError> for CommandError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Unauthorized(_) => CommandError::SessionExpired,
            ClientError::NotLoggedIn => CommandError::NotLoggedIn,
            other => CommandError::Client(other),
        }
    }
}

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Everything a dashboard command needs: the API client and the output format.
pub struct Context {
    pub client: ApiClient,
    pub format: OutputFormat,
}

impl Context {
    pub fn new(server: &str, session_file: PathBuf, format: OutputFormat) -> Result<Self> {
        let store = Arc::new(SessionStore::open(session_file)?);
        Ok(Self {
            client: ApiClient::new(server, store)?,
            format,
        })
    }

    fn require_login(&self) -> Result<()> {
        if self.client.session_store().is_authenticated() {
            Ok(())
        } else {
            Err(CommandError::NotLoggedIn)
        }
    }

    /// Prints `value` as pretty JSON or through the table renderer.
    fn emit<T, F>(&self, value: &T, table: F) -> Result<()>
    where
        T: Serialize + ?Sized,
        F: FnOnce(&T) -> String,
    {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
            OutputFormat::Table => print!("{}", table(value)),
        }
        Ok(())
    }

    /// Prints a confirmation line in table mode only.
    fn note(&self, text: &str) {
        if self.format == OutputFormat::Table {
            println!("{}", text);
        }
    }
}

/// Execute the parsed command line.
pub async fn execute(cli: Cli) -> Result<()> {
    let session_file = cli.session_file();
    match cli.command {
        Commands::Serve {
            host,
            port,
            data_dir,
        } => cmd_serve(host, port, data_dir).await,
        command => {
            let ctx = Context::new(&cli.server, session_file, cli.format)?;
            run(&ctx, command).await
        }
    }
}

/// Execute a command against the server behind `ctx`.
pub async fn run(ctx: &Context, command: Commands) -> Result<()> {
    match command {
        Commands::Serve {
            host,
            port,
            data_dir,
        } => cmd_serve(host, port, data_dir).await,
        Commands::Login { email, password } => cmd_login(ctx, &email, &password).await,
        Commands::Logout => cmd_logout(ctx).await,
        Commands::Whoami => cmd_whoami(ctx).await,
        Commands::Dashboard => cmd_dashboard(ctx).await,
        Commands::Projects { command } => cmd_projects(ctx, command).await,
        Commands::Agents { command } => cmd_agents(ctx, command).await,
        Commands::Chat { command } => cmd_chat(ctx, command).await,
        Commands::Artifacts { command } => cmd_artifacts(ctx, command).await,
    }
}

async fn cmd_serve(
    host: Option<String>,
    port: Option<u16>,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let mut config = ApiConfig::from_env();
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(data_dir) = data_dir {
        config.data_dir = data_dir;
    }

    let state = AppState::new(config.clone())?;

    println!("AgentDev API on http://{}", config.bind_address());
    println!("  Data: {}", config.data_dir.display());
    println!("  Press Ctrl+C to stop");

    serve_with_shutdown(config, state, shutdown_signal())
        .await
        .map_err(CommandError::Server)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "Cannot listen for Ctrl-C, serving until killed");
            std::future::pending::<()>().await
        }
    }
}

async fn cmd_login(ctx: &Context, email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(CommandError::Invalid(
            "Email and password are required".to_string(),
        ));
    }

    match ctx.client.auth().login(email.trim(), password).await {
        Ok(user) => {
            info!(user_id = %user.user_id, "Logged in");
            ctx.emit(&user, |u| format!("Logged in as {}\n", output::user_line(u)))
        }
        Err(ClientError::Unauthorized(message)) => Err(CommandError::LoginFailed(message)),
        Err(e) => Err(e.into()),
    }
}

async fn cmd_logout(ctx: &Context) -> Result<()> {
    ctx.client.auth().logout().await?;
    ctx.note("Logged out.");
    Ok(())
}

async fn cmd_whoami(ctx: &Context) -> Result<()> {
    ctx.require_login()?;
    let user = ctx.client.auth().me().await?;
    ctx.emit(&user, |u| format!("{}\n", output::user_line(u)))
}

async fn cmd_dashboard(ctx: &Context) -> Result<()> {
    ctx.require_login()?;
    let projects = ctx.client.projects();
    let stats = projects.stats().await?;
    let recent = projects.list(None, 1, RECENT_PROJECTS).await?;

    match ctx.format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "stats": stats,
                "recent_projects": recent.projects,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Table => {
            print!("{}", output::stats_summary(&stats));
            println!();
            println!("Recent projects:");
            print!("{}", output::project_table(&recent.projects));
        }
    }
    Ok(())
}

/// Trims a project name, rejecting a missing or blank one.
pub fn require_project_name(name: Option<&str>) -> Result<String> {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(CommandError::Invalid("Project name is required".to_string())),
    }
}

async fn cmd_projects(ctx: &Context, command: ProjectsCommand) -> Result<()> {
    // Local validation comes before the session check and any request.
    if let ProjectsCommand::Create { name, .. } = &command {
        require_project_name(name.as_deref())?;
    }
    ctx.require_login()?;
    let api = ctx.client.projects();

    match command {
        ProjectsCommand::List {
            status,
            page,
            page_size,
        } => {
            let result = api.list(status, page, page_size).await?;
            ctx.emit(&result, |p| {
                let mut text = output::project_table(&p.projects);
                text.push_str(&format!("\nPage {} ({} total)\n", p.page, p.total));
                if p.has_next {
                    text.push_str(&format!("More: --page {}\n", p.page + 1));
                }
                text
            })
        }
        ProjectsCommand::Show { id } => {
            let project = api.get(&id).await?;
            ctx.emit(&project, output::project_detail)
        }
        ProjectsCommand::Create {
            name,
            description,
            members,
        } => {
            let mut new = NewProject::new(require_project_name(name.as_deref())?);
            new.description = description.unwrap_or_default();
            new.team_members = members;

            let project = api.create(&new).await?;
            info!(project_id = %project.project_id, "Project created");
            ctx.note("Created project.");
            ctx.emit(&project, output::project_detail)
        }
        ProjectsCommand::Update {
            id,
            name,
            description,
            status,
            progress,
        } => {
            let patch = ProjectPatch {
                name: name.map(|n| require_project_name(Some(n.as_str()))).transpose()?,
                description,
                status,
                progress_percentage: progress,
                ..ProjectPatch::default()
            };
            if patch.is_empty() {
                return Err(CommandError::Invalid("Nothing to update".to_string()));
            }

            let project = api.update(&id, &patch).await?;
            ctx.emit(&project, output::project_detail)
        }
        ProjectsCommand::Delete { id } => {
            api.delete(&id).await?;
            ctx.note(&format!("Deleted project {}", id));
            Ok(())
        }
        ProjectsCommand::Start { id } => {
            let project = api.start(&id).await?;
            ctx.emit(&project, output::project_detail)
        }
        ProjectsCommand::Complete { id } => {
            let project = api.complete(&id).await?;
            ctx.emit(&project, output::project_detail)
        }
        ProjectsCommand::Stats => {
            let stats = api.stats().await?;
            ctx.emit(&stats, output::stats_summary)
        }
    }
}

async fn cmd_agents(ctx: &Context, command: AgentsCommand) -> Result<()> {
    ctx.require_login()?;
    let api = ctx.client.agents();

    match command {
        AgentsCommand::List { project } => {
            let agents = api.list(project.as_deref()).await?;
            ctx.emit(agents.as_slice(), output::agent_table)
        }
        AgentsCommand::Show { id } => {
            let agent = api.get(&id).await?;
            ctx.emit(&agent, output::agent_detail)
        }
        AgentsCommand::Create {
            name,
            agent_type,
            description,
            project,
            capabilities,
        } => {
            let mut new = NewAgent::new(name, agent_type);
            new.description = description.unwrap_or_default();
            new.project_id = project;
            new.capabilities = capabilities;

            let agent = api.create(&new).await?;
            ctx.emit(&agent, output::agent_detail)
        }
    }
}

async fn cmd_chat(ctx: &Context, command: ChatCommand) -> Result<()> {
    ctx.require_login()?;
    let api = ctx.client.messages();

    match command {
        ChatCommand::Channels { project } => {
            let channels = api.channels(project.as_deref()).await?;
            ctx.emit(channels.as_slice(), output::channel_table)
        }
        ChatCommand::History {
            channel,
            limit,
            before,
        } => {
            let messages = api.messages(&channel, limit, before.as_deref()).await?;
            ctx.emit(messages.as_slice(), output::message_lines)
        }
        ChatCommand::Send { channel, message } => {
            let sent = api.send(&NewMessage::new(channel.as_str(), message)).await?;
            let history = api.messages(&channel, Some(REPLY_WINDOW), None).await?;

            let mut exchange = vec![sent.clone()];
            exchange.extend(
                history
                    .into_iter()
                    .filter(|m| m.parent_message_id.as_ref() == Some(&sent.message_id)),
            );
            ctx.emit(exchange.as_slice(), output::message_lines)
        }
    }
}

async fn cmd_artifacts(ctx: &Context, command: ArtifactsCommand) -> Result<()> {
    ctx.require_login()?;
    let api = ctx.client.artifacts();

    match command {
        ArtifactsCommand::List {
            project,
            artifact_type,
        } => {
            let artifacts = api
                .list(project.as_deref(), artifact_type.as_deref())
                .await?;
            ctx.emit(artifacts.as_slice(), output::artifact_table)
        }
        ArtifactsCommand::Show { id } => {
            let artifact = api.get(&id).await?;
            ctx.emit(&artifact, output::artifact_detail)
        }
        ArtifactsCommand::Create {
            project,
            name,
            artifact_type,
            content,
            file,
            content_type,
            description,
        } => {
            let content = match (content, file) {
                (Some(content), _) => content,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .map_err(|source| CommandError::ReadFile { path, source })?,
                (None, None) => {
                    return Err(CommandError::Invalid(
                        "Either --content or --file is required".to_string(),
                    ))
                }
            };

            let mut new = NewArtifact::new(project, name, artifact_type, content)
                .with_content_type(content_type);
            new.description = description.unwrap_or_default();

            let artifact = api.create(&new).await?;
            ctx.emit(&artifact, output::artifact_detail)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentdev_api::serve_listener;
    use tempfile::{tempdir, TempDir};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    struct Harness {
        ctx: Context,
        state: AppState,
        session_path: PathBuf,
        shutdown: Option<oneshot::Sender<()>>,
        _dir: TempDir,
    }

    impl Drop for Harness {
        fn drop(&mut self) {
            if let Some(tx) = self.shutdown.take() {
                let _ = tx.send(());
            }
        }
    }

    async fn start() -> Harness {
        let dir = tempdir().unwrap();
        let config = ApiConfig::default()
            .with_data_dir(dir.path().join("data"))
            .with_rate_limit(0);
        let state = AppState::new(config).unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        let server_state = state.clone();
        tokio::spawn(async move {
            serve_listener(listener, server_state, async move {
                let _ = rx.await;
            })
            .await
            .unwrap();
        });

        let session_path = dir.path().join("session.json");
        let ctx = Context::new(
            &format!("http://{}", addr),
            session_path.clone(),
            OutputFormat::Table,
        )
        .unwrap();

        Harness {
            ctx,
            state,
            session_path,
            shutdown: Some(tx),
            _dir: dir,
        }
    }

    fn offline_context(dir: &TempDir) -> Context {
        // Nothing listens on the discard port; any request would fail.
        Context::new(
            "http://127.0.0.1:9",
            dir.path().join("session.json"),
            OutputFormat::Table,
        )
        .unwrap()
    }

    async fn login(ctx: &Context) {
        run(
            ctx,
            Commands::Login {
                email: "admin@example.com".to_string(),
                password: "password".to_string(),
            },
        )
        .await
        .unwrap();
    }

    #[test]
    fn test_require_project_name() {
        assert_eq!(require_project_name(Some("  Portal ")).unwrap(), "Portal");
        for name in [None, Some(""), Some("   ")] {
            match require_project_name(name) {
                Err(CommandError::Invalid(msg)) => assert_eq!(msg, "Project name is required"),
                other => panic!("expected Invalid, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_client_error_mapping() {
        let err: CommandError = ClientError::Unauthorized("Token expired".into()).into();
        assert!(matches!(err, CommandError::SessionExpired));
        assert_eq!(err.to_string(), "Session expired, please log in again");

        let err: CommandError = ClientError::NotLoggedIn.into();
        assert!(matches!(err, CommandError::NotLoggedIn));

        let err: CommandError = ClientError::Api {
            status: 404,
            message: "Project not found".into(),
        }
        .into();
        assert_eq!(err.to_string(), "API error 404: Project not found");
    }

    #[tokio::test]
    async fn test_create_without_name_fails_before_any_request() {
        let dir = tempdir().unwrap();
        let ctx = offline_context(&dir);

        let result = run(
            &ctx,
            Commands::Projects {
                command: ProjectsCommand::Create {
                    name: None,
                    description: Some("No name".to_string()),
                    members: Vec::new(),
                },
            },
        )
        .await;

        match result {
            Err(CommandError::Invalid(msg)) => assert_eq!(msg, "Project name is required"),
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_commands_need_login() {
        let dir = tempdir().unwrap();
        let ctx = offline_context(&dir);

        let result = run(&ctx, Commands::Whoami).await;
        assert!(matches!(result, Err(CommandError::NotLoggedIn)));

        let result = run(
            &ctx,
            Commands::Projects {
                command: ProjectsCommand::Stats,
            },
        )
        .await;
        assert!(matches!(result, Err(CommandError::NotLoggedIn)));
    }

    #[tokio::test]
    async fn test_login_requires_credentials() {
        let dir = tempdir().unwrap();
        let ctx = offline_context(&dir);

        let result = run(
            &ctx,
            Commands::Login {
                email: " ".to_string(),
                password: "password".to_string(),
            },
        )
        .await;
        assert!(matches!(result, Err(CommandError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_login_recovers_from_corrupt_session_file() {
        let h = start().await;
        std::fs::write(&h.session_path, b"\0garbage").unwrap();

        let ctx = Context::new(
            h.ctx.client.base_url().as_str(),
            h.session_path.clone(),
            OutputFormat::Table,
        )
        .unwrap();
        assert!(matches!(
            run(&ctx, Commands::Whoami).await,
            Err(CommandError::NotLoggedIn)
        ));

        login(&ctx).await;
        run(&ctx, Commands::Whoami).await.unwrap();
    }

    #[tokio::test]
    async fn test_bad_credentials() {
        let h = start().await;

        let result = run(
            &h.ctx,
            Commands::Login {
                email: "admin@example.com".to_string(),
                password: "nope".to_string(),
            },
        )
        .await;
        match result {
            Err(CommandError::LoginFailed(msg)) => assert_eq!(msg, "Invalid credentials"),
            other => panic!("expected LoginFailed, got {:?}", other),
        }
        assert!(!h.session_path.exists());
    }

    #[tokio::test]
    async fn test_dashboard_flow() {
        let h = start().await;
        login(&h.ctx).await;
        assert!(h.session_path.exists());

        run(&h.ctx, Commands::Whoami).await.unwrap();
        run(
            &h.ctx,
            Commands::Projects {
                command: ProjectsCommand::Create {
                    name: Some("Portal".to_string()),
                    description: Some("Customer portal".to_string()),
                    members: Vec::new(),
                },
            },
        )
        .await
        .unwrap();
        run(&h.ctx, Commands::Dashboard).await.unwrap();

        let page = h.ctx.client.projects().list(None, 1, 20).await.unwrap();
        assert_eq!(page.total, 1);
        let project_id = page.projects[0].project_id.to_string();

        run(
            &h.ctx,
            Commands::Projects {
                command: ProjectsCommand::Update {
                    id: project_id.clone(),
                    name: None,
                    description: None,
                    status: None,
                    progress: Some(25.0),
                },
            },
        )
        .await
        .unwrap();
        run(
            &h.ctx,
            Commands::Projects {
                command: ProjectsCommand::Start {
                    id: project_id.clone(),
                },
            },
        )
        .await
        .unwrap();

        let channels = h
            .ctx
            .client
            .messages()
            .channels(Some(project_id.as_str()))
            .await
            .unwrap();
        run(
            &h.ctx,
            Commands::Chat {
                command: ChatCommand::Send {
                    channel: channels[0].channel_id.to_string(),
                    message: "What are the risks?".to_string(),
                },
            },
        )
        .await
        .unwrap();

        run(
            &h.ctx,
            Commands::Artifacts {
                command: ArtifactsCommand::Create {
                    project: project_id.clone(),
                    name: "Notes".to_string(),
                    artifact_type: "document".to_string(),
                    content: Some("hello".to_string()),
                    file: None,
                    content_type: "text/plain".to_string(),
                    description: None,
                },
            },
        )
        .await
        .unwrap();
        let artifacts = h
            .ctx
            .client
            .artifacts()
            .list(Some(project_id.as_str()), None)
            .await
            .unwrap();
        // The uploaded note plus the PM's risk assessment.
        assert_eq!(artifacts.len(), 2);

        run(
            &h.ctx,
            Commands::Projects {
                command: ProjectsCommand::Delete { id: project_id },
            },
        )
        .await
        .unwrap();

        run(&h.ctx, Commands::Logout).await.unwrap();
        assert!(!h.session_path.exists());
    }

    #[tokio::test]
    async fn test_update_with_nothing_to_change() {
        let h = start().await;
        login(&h.ctx).await;

        let result = run(
            &h.ctx,
            Commands::Projects {
                command: ProjectsCommand::Update {
                    id: "proj-missing".to_string(),
                    name: None,
                    description: None,
                    status: None,
                    progress: None,
                },
            },
        )
        .await;
        assert!(matches!(result, Err(CommandError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_revoked_session_reports_expiry() {
        let h = start().await;
        login(&h.ctx).await;

        let token = h.ctx.client.session_store().access_token().unwrap();
        assert!(h.state.sessions.revoke(&token));

        let result = run(
            &h.ctx,
            Commands::Projects {
                command: ProjectsCommand::List {
                    status: None,
                    page: 1,
                    page_size: 20,
                },
            },
        )
        .await;
        assert!(matches!(result, Err(CommandError::SessionExpired)));
        assert!(!h.session_path.exists());
    }

    #[tokio::test]
    async fn test_artifact_from_missing_file() {
        let h = start().await;
        login(&h.ctx).await;

        let result = run(
            &h.ctx,
            Commands::Artifacts {
                command: ArtifactsCommand::Create {
                    project: "proj-1".to_string(),
                    name: "Notes".to_string(),
                    artifact_type: "document".to_string(),
                    content: None,
                    file: Some(PathBuf::from("/definitely/not/here.txt")),
                    content_type: "text/plain".to_string(),
                    description: None,
                },
            },
        )
        .await;
        assert!(matches!(result, Err(CommandError::ReadFile { .. })));
    }
}
