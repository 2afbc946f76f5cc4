//! Command-line interface definition using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use agentdev_models::ProjectStatus;

/// Server used when neither `--server` nor `AGENTDEV_SERVER` is given.
pub const DEFAULT_SERVER: &str = "http://localhost:8000";

/// AgentDev - projects, agents, chat and artifacts from the terminal
#[derive(Parser, Debug)]
#[command(name = "agentdev")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Base URL of the AgentDev API
    #[arg(long, env = "AGENTDEV_SERVER", default_value = DEFAULT_SERVER, global = true)]
    pub server: String,

    /// Where the login session is kept
    #[arg(long, env = "AGENTDEV_SESSION_FILE", global = true)]
    pub session_file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the API server
    Serve {
        /// Host to bind to (default: AGENTDEV_HOST or 127.0.0.1)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (default: AGENTDEV_PORT or 8000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Data directory (default: AGENTDEV_DATA_DIR or ~/.agentdev/data)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "AGENTDEV_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// End the session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Project summary and the most recent projects
    Dashboard,

    /// Manage projects
    Projects {
        #[command(subcommand)]
        command: ProjectsCommand,
    },

    /// Browse and register agents
    Agents {
        #[command(subcommand)]
        command: AgentsCommand,
    },

    /// Talk to agents in project channels
    Chat {
        #[command(subcommand)]
        command: ChatCommand,
    },

    /// Browse and upload artifacts
    Artifacts {
        #[command(subcommand)]
        command: ArtifactsCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProjectsCommand {
    /// List projects
    List {
        /// Only projects in this status
        #[arg(short, long)]
        status: Option<ProjectStatus>,

        #[arg(long, default_value_t = 1)]
        page: usize,

        #[arg(long, default_value_t = 20)]
        page_size: usize,
    },

    /// Show one project
    Show { id: String },

    /// Create a project
    Create {
        /// Project name (required)
        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        /// User ID to add to the team (repeatable)
        #[arg(long = "member")]
        members: Vec<String>,
    },

    /// Change fields of a project
    Update {
        id: String,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        status: Option<ProjectStatus>,

        /// Progress in percent (0-100)
        #[arg(long)]
        progress: Option<f64>,
    },

    /// Delete a project with its channels, messages and artifacts
    Delete { id: String },

    /// Mark a project active
    Start { id: String },

    /// Mark a project completed
    Complete { id: String },

    /// Totals over your projects
    Stats,
}

#[derive(Subcommand, Debug)]
pub enum AgentsCommand {
    /// List agents, optionally those serving one project
    List {
        #[arg(short, long)]
        project: Option<String>,
    },

    /// Show one agent
    Show { id: String },

    /// Register an agent (developer role)
    Create {
        #[arg(short, long)]
        name: String,

        #[arg(short = 't', long = "type")]
        agent_type: String,

        #[arg(short, long)]
        description: Option<String>,

        /// Limit the agent to one project
        #[arg(short, long)]
        project: Option<String>,

        /// Capability tag (repeatable)
        #[arg(long = "capability")]
        capabilities: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ChatCommand {
    /// List channels you can see
    Channels {
        #[arg(short, long)]
        project: Option<String>,
    },

    /// Show messages of a channel
    History {
        channel: String,

        #[arg(short, long)]
        limit: Option<usize>,

        /// Only messages older than this message ID
        #[arg(long)]
        before: Option<String>,
    },

    /// Send a message and print the agent replies
    Send { channel: String, message: String },
}

#[derive(Subcommand, Debug)]
pub enum ArtifactsCommand {
    /// List artifacts
    List {
        #[arg(short, long)]
        project: Option<String>,

        #[arg(short = 't', long = "type")]
        artifact_type: Option<String>,
    },

    /// Show one artifact including its content
    Show { id: String },

    /// Upload an artifact from inline text or a file
    Create {
        #[arg(short, long)]
        project: String,

        #[arg(short, long)]
        name: String,

        #[arg(short = 't', long = "type", default_value = "document")]
        artifact_type: String,

        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        content: Option<String>,

        #[arg(short, long)]
        file: Option<PathBuf>,

        #[arg(long, default_value = "text/plain")]
        content_type: String,

        #[arg(short, long)]
        description: Option<String>,
    },
}

/// Output format for listing and show commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Cli {
    /// Returns the session file path, using `~/.agentdev/session.json` if not specified.
    pub fn session_file(&self) -> PathBuf {
        self.session_file.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .map(|h| h.join(".agentdev"))
                .unwrap_or_else(|| PathBuf::from(".agentdev"))
                .join("session.json")
        })
    }

    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_serve() {
        let cli = Cli::parse_from(["agentdev", "serve", "--port", "9000"]);
        match cli.command {
            Commands::Serve {
                host,
                port,
                data_dir,
            } => {
                assert!(host.is_none());
                assert_eq!(port, Some(9000));
                assert!(data_dir.is_none());
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_parse_project_list() {
        let cli = Cli::parse_from([
            "agentdev",
            "--format",
            "json",
            "projects",
            "list",
            "--status",
            "active",
            "--page",
            "2",
        ]);
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Projects {
                command:
                    ProjectsCommand::List {
                        status,
                        page,
                        page_size,
                    },
            } => {
                assert_eq!(status, Some(ProjectStatus::Active));
                assert_eq!(page, 2);
                assert_eq!(page_size, 20);
            }
            _ => panic!("Expected projects list"),
        }
    }

    #[test]
    fn test_cli_create_without_name_parses() {
        // The name check happens in the command so it can report its own message.
        let cli = Cli::parse_from(["agentdev", "projects", "create"]);
        match cli.command {
            Commands::Projects {
                command: ProjectsCommand::Create { name, .. },
            } => assert!(name.is_none()),
            _ => panic!("Expected projects create"),
        }
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "agentdev",
            "chat",
            "send",
            "chan-1",
            "hello",
            "--server",
            "http://example.com:9000",
            "-vv",
        ]);
        assert_eq!(cli.server, "http://example.com:9000");
        assert_eq!(cli.log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_artifact_create_needs_content_or_file() {
        let result = Cli::try_parse_from([
            "agentdev", "artifacts", "create", "--project", "p", "--name", "n",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_session_file_default() {
        let cli = Cli::parse_from(["agentdev", "--session-file", "/tmp/s.json", "whoami"]);
        assert_eq!(cli.session_file(), PathBuf::from("/tmp/s.json"));
    }

    #[test]
    fn test_cli_help() {
        // Verify help can be generated without panic
        Cli::command().debug_assert();
    }
}
