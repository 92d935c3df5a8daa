//! CLI entrypoint and subcommand orchestration.

mod config;
mod daemon;
#[cfg(test)]
mod test_support;

use std::process::ExitCode;
use std::sync::Arc;

use agentbay::{
    AgentBay, ContextListParams, CreateSessionParams, DEFAULT_MAX_RESULTS, ListSessionParams,
    Session, SessionSummary,
};
use api::{ApiClient, HttpApiClient};
use clap::{Parser, Subcommand};
use proto::{ConfigError, ToolCall};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{AgentBayConfig, Config, state_dir};
use crate::daemon::PidFile;

/// Top-level command-line arguments.
#[derive(Parser)]
#[command(name = "agentbay")]
#[command(about = "AgentBay cloud session client", version)]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Enable debug logging to ~/.agentbay/logs/
    #[arg(long, default_value_t = false)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create, list and delete sessions
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },

    /// List, resolve, rename and delete persistent contexts
    Context {
        #[command(subcommand)]
        command: ContextCommands,
    },

    /// Invoke a raw MCP tool
    Tool {
        session_id: String,
        tool_name: String,
        /// Tool arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
    },

    /// Desktop mouse, keyboard and screen operations
    Computer {
        session_id: String,
        #[command(subcommand)]
        command: ComputerCommands,
    },

    /// Mobile touch input and UI inspection
    Mobile {
        session_id: String,
        #[command(subcommand)]
        command: MobileCommands,
    },

    /// File operations inside the session
    Fs {
        session_id: String,
        #[command(subcommand)]
        command: FsCommands,
    },

    /// Run a shell command inside the session
    Exec {
        session_id: String,
        command: String,
        #[arg(long, default_value_t = tools::command::DEFAULT_TIMEOUT_MS)]
        timeout_ms: u64,
    },

    /// Hold a session open until SIGINT/SIGTERM, then clean up
    Daemon,
}

#[derive(Subcommand)]
enum SessionCommands {
    Create {
        /// Label in key=value form (repeatable)
        #[arg(long = "label")]
        labels: Vec<String>,
        #[arg(long)]
        image_id: Option<String>,
        #[arg(long)]
        context_id: Option<String>,
    },
    List {
        #[arg(long = "label")]
        labels: Vec<String>,
        #[arg(long, default_value_t = DEFAULT_MAX_RESULTS)]
        max_results: u32,
        /// Cursor printed by the previous page
        #[arg(long)]
        next_token: Option<String>,
    },
    Delete {
        session_id: String,
    },
    /// Show labels, or replace them with --set
    Labels {
        session_id: String,
        #[arg(long = "set")]
        set: Vec<String>,
    },
}

#[derive(Subcommand)]
enum ContextCommands {
    List {
        #[arg(long, default_value_t = DEFAULT_MAX_RESULTS)]
        max_results: u32,
        #[arg(long)]
        next_token: Option<String>,
    },
    /// Resolve a context by name
    Get {
        name: String,
        /// Create the context if it does not exist
        #[arg(long, default_value_t = false)]
        create: bool,
    },
    Rename {
        name: String,
        new_name: String,
    },
    Delete {
        name: String,
    },
}

#[derive(Subcommand)]
enum ComputerCommands {
    Click {
        x: i32,
        y: i32,
        #[arg(long, default_value = "left")]
        button: String,
    },
    Move {
        x: i32,
        y: i32,
    },
    Screenshot,
    Cursor,
    ScreenSize,
    Type {
        text: String,
    },
}

#[derive(Subcommand)]
enum MobileCommands {
    Tap {
        x: i32,
        y: i32,
    },
    Swipe {
        start_x: i32,
        start_y: i32,
        end_x: i32,
        end_y: i32,
        #[arg(long, default_value_t = 300)]
        duration_ms: u64,
    },
    Screenshot,
    UiElements {
        /// Dump the full tree instead of clickable elements only
        #[arg(long, default_value_t = false)]
        all: bool,
        #[arg(long, default_value_t = 2000)]
        timeout_ms: u64,
    },
}

#[derive(Subcommand)]
enum FsCommands {
    Read {
        path: String,
    },
    Write {
        path: String,
        content: String,
        #[arg(long, default_value = "overwrite")]
        mode: String,
    },
    Ls {
        path: String,
    },
    Info {
        path: String,
    },
}

/// Printable command outcome.
struct Outcome {
    success: bool,
    body: Value,
}

impl Outcome {
    fn from_serialize(success: bool, value: &impl Serialize) -> anyhow::Result<Self> {
        Ok(Self {
            success,
            body: serde_json::to_value(value)?,
        })
    }
}

/// Client plus the transport used to attach to sessions by id.
struct Connection {
    agent_bay: AgentBay,
    client: Arc<dyn ApiClient>,
}

impl Connection {
    fn new(config: &AgentBayConfig) -> Result<Self, ConfigError> {
        if config.api_key.is_empty() {
            return Err(ConfigError::MissingField(
                "agentbay.api_key (set it in config.toml or AGENTBAY_API_KEY)".to_string(),
            ));
        }
        let sdk = config.sdk_config();
        debug!(
            region_id = %sdk.region_id,
            endpoint = %sdk.endpoint,
            timeout_ms = sdk.timeout_ms,
            "Connecting to AgentBay"
        );
        let client: Arc<dyn ApiClient> =
            Arc::new(HttpApiClient::new(&sdk.endpoint, sdk.timeout_ms));
        Ok(Self::with_client(config, client))
    }

    fn with_client(config: &AgentBayConfig, client: Arc<dyn ApiClient>) -> Self {
        let agent_bay = AgentBay::with_client(
            config.api_key.clone(),
            config.region_id.clone(),
            client.clone(),
        );
        Self { agent_bay, client }
    }

    /// Registered handle if known, otherwise a fresh handle for `session_id`.
    fn session(&self, session_id: &str) -> Arc<Session> {
        self.agent_bay.get(session_id).unwrap_or_else(|_| {
            Arc::new(Session::new(
                self.agent_bay.api_key(),
                self.client.clone(),
                session_id,
            ))
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // When --debug is passed, write debug-level logs to ~/.agentbay/logs/debug.YYYY-MM-DD.log
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    // WorkerGuard must outlive main() so buffered file writes are flushed on exit.
    let _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>;

    if cli.debug {
        let log_dir = state_dir().join("logs");
        std::fs::create_dir_all(&log_dir).ok();
        let appender = tracing_appender::rolling::daily(&log_dir, "debug.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        _file_guard = Some(guard);

        let console = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(console_filter);
        let file = fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_ansi(false)
            .with_filter(EnvFilter::new("debug,hyper_util=info,rustls=info,reqwest=info"));
        tracing_subscriber::registry()
            .with(console)
            .with(file)
            .init();
    } else {
        _file_guard = None;
        fmt()
            .with_env_filter(console_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    if cli.debug {
        info!(
            version = env!("CARGO_PKG_VERSION"),
            command = command_label(&cli.command),
            log_level = %cli.log_level,
            "========== agentbay session start =========="
        );
    }

    agentbay::config::load_dotenv();
    let config = Config::load(cli.config.as_deref())?;
    let conn = Connection::new(&config.agentbay)?;

    if let Commands::Daemon = cli.command {
        let pid_file = PidFile::new(PidFile::default_path());
        let failed =
            daemon::run(&conn.agent_bay, &config.daemon, &pid_file, daemon::wait_for_shutdown())
                .await?;
        if failed > 0 {
            warn!(failed, "Some sessions could not be released");
            return Ok(ExitCode::FAILURE);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let outcome = dispatch(&conn, cli.command).await?;
    println!("{}", serde_json::to_string_pretty(&outcome.body)?);
    Ok(if outcome.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn command_label(command: &Commands) -> &'static str {
    match command {
        Commands::Session { .. } => "session",
        Commands::Context { .. } => "context",
        Commands::Tool { .. } => "tool",
        Commands::Computer { .. } => "computer",
        Commands::Mobile { .. } => "mobile",
        Commands::Fs { .. } => "fs",
        Commands::Exec { .. } => "exec",
        Commands::Daemon => "daemon",
    }
}

/// Runs one non-daemon command and returns what to print.
async fn dispatch(conn: &Connection, command: Commands) -> anyhow::Result<Outcome> {
    match command {
        Commands::Session { command } => cmd_session(conn, command).await,
        Commands::Context { command } => cmd_context(conn, command).await,
        Commands::Tool {
            session_id,
            tool_name,
            args,
        } => {
            let call = build_tool_call(&tool_name, &args)?;
            let session = conn.session(&session_id);
            let result = tools::call_tool(session.as_ref(), call).await;
            Outcome::from_serialize(result.success, &result)
        }
        Commands::Computer {
            session_id,
            command,
        } => cmd_computer(&conn.session(&session_id), command).await,
        Commands::Mobile {
            session_id,
            command,
        } => cmd_mobile(&conn.session(&session_id), command).await,
        Commands::Fs {
            session_id,
            command,
        } => cmd_fs(&conn.session(&session_id), command).await,
        Commands::Exec {
            session_id,
            command,
            timeout_ms,
        } => {
            let session = conn.session(&session_id);
            let result = session.command().execute_command(&command, timeout_ms).await;
            Outcome::from_serialize(result.success, &result)
        }
        Commands::Daemon => anyhow::bail!("daemon is not a one-shot command"),
    }
}

async fn cmd_session(conn: &Connection, command: SessionCommands) -> anyhow::Result<Outcome> {
    match command {
        SessionCommands::Create {
            labels,
            image_id,
            context_id,
        } => {
            let labels = parse_label_args(&labels)?;
            let mut params = CreateSessionParams::new().with_labels(labels);
            if let Some(image_id) = image_id {
                params = params.with_image_id(image_id);
            }
            if let Some(context_id) = context_id {
                params = params.with_context_id(context_id);
            }
            let result = conn.agent_bay.create(params).await;
            let session = result
                .session
                .as_deref()
                .map(SessionSummary::from);
            Ok(Outcome {
                success: result.success,
                body: json!({
                    "request_id": result.request_id,
                    "success": result.success,
                    "error_message": result.error_message,
                    "session": session,
                }),
            })
        }
        SessionCommands::List {
            labels,
            max_results,
            next_token,
        } => {
            let mut params = ListSessionParams::new()
                .with_labels(parse_label_args(&labels)?)
                .with_max_results(max_results);
            if let Some(token) = next_token {
                params = params.with_next_token(token);
            }
            let result = conn.agent_bay.list_by_params(&params).await;
            let sessions: Vec<SessionSummary> = result
                .sessions
                .iter()
                .map(|s| SessionSummary::from(s.as_ref()))
                .collect();
            Ok(Outcome {
                success: result.success,
                body: json!({
                    "request_id": result.request_id,
                    "success": result.success,
                    "error_message": result.error_message,
                    "sessions": sessions,
                    "next_token": result.next_token,
                    "max_results": result.max_results,
                    "total_count": result.total_count,
                }),
            })
        }
        SessionCommands::Delete { session_id } => {
            let session = conn.session(&session_id);
            let result = conn.agent_bay.delete(&session).await;
            Outcome::from_serialize(result.success, &result)
        }
        SessionCommands::Labels { session_id, set } => {
            let session = conn.session(&session_id);
            if set.is_empty() {
                let result = session.get_labels().await;
                return Outcome::from_serialize(result.success, &result);
            }
            let labels = parse_label_args(&set)?;
            let result = session.set_labels(&labels).await;
            Outcome::from_serialize(result.success, &result)
        }
    }
}

async fn cmd_context(conn: &Connection, command: ContextCommands) -> anyhow::Result<Outcome> {
    let contexts = conn.agent_bay.context();
    match command {
        ContextCommands::List {
            max_results,
            next_token,
        } => {
            let mut params = ContextListParams::new().with_max_results(max_results);
            if let Some(token) = next_token {
                params = params.with_next_token(token);
            }
            let result = contexts.list(&params).await;
            Outcome::from_serialize(result.success, &result)
        }
        ContextCommands::Get { name, create } => {
            let result = contexts.get(&name, create).await;
            Outcome::from_serialize(result.success, &result)
        }
        ContextCommands::Rename { name, new_name } => {
            let found = contexts.get(&name, false).await;
            let Some(mut context) = found.context else {
                return Outcome::from_serialize(false, &found);
            };
            context.name = new_name;
            let result = contexts.update(&context).await;
            Outcome::from_serialize(result.success, &result)
        }
        ContextCommands::Delete { name } => {
            let found = contexts.get(&name, false).await;
            let Some(context) = found.context else {
                return Outcome::from_serialize(false, &found);
            };
            let result = contexts.delete(&context).await;
            Outcome::from_serialize(result.success, &result)
        }
    }
}

async fn cmd_computer(session: &Session, command: ComputerCommands) -> anyhow::Result<Outcome> {
    let computer = session.computer();
    match command {
        ComputerCommands::Click { x, y, button } => {
            let result = computer.click_mouse(x, y, &button).await;
            Outcome::from_serialize(result.success, &result)
        }
        ComputerCommands::Move { x, y } => {
            let result = computer.move_mouse(x, y).await;
            Outcome::from_serialize(result.success, &result)
        }
        ComputerCommands::Screenshot => {
            let result = computer.screenshot().await;
            Outcome::from_serialize(result.success, &result)
        }
        ComputerCommands::Cursor => {
            let result = computer.get_cursor_position().await;
            Outcome::from_serialize(result.success, &result)
        }
        ComputerCommands::ScreenSize => {
            let result = computer.get_screen_size().await;
            Outcome::from_serialize(result.success, &result)
        }
        ComputerCommands::Type { text } => {
            let result = computer.input_text(&text).await;
            Outcome::from_serialize(result.success, &result)
        }
    }
}

async fn cmd_mobile(session: &Session, command: MobileCommands) -> anyhow::Result<Outcome> {
    let mobile = session.mobile();
    match command {
        MobileCommands::Tap { x, y } => {
            let result = mobile.tap(x, y).await;
            Outcome::from_serialize(result.success, &result)
        }
        MobileCommands::Swipe {
            start_x,
            start_y,
            end_x,
            end_y,
            duration_ms,
        } => {
            let result = mobile
                .swipe(start_x, start_y, end_x, end_y, duration_ms)
                .await;
            Outcome::from_serialize(result.success, &result)
        }
        MobileCommands::Screenshot => {
            let result = mobile.screenshot().await;
            Outcome::from_serialize(result.success, &result)
        }
        MobileCommands::UiElements { all, timeout_ms } => {
            let result = if all {
                mobile.get_all_ui_elements(timeout_ms).await
            } else {
                mobile.get_clickable_ui_elements(timeout_ms).await
            };
            Outcome::from_serialize(result.success, &result)
        }
    }
}

async fn cmd_fs(session: &Session, command: FsCommands) -> anyhow::Result<Outcome> {
    let fs = session.file_system();
    match command {
        FsCommands::Read { path } => {
            let result = fs.read_file(&path).await;
            Outcome::from_serialize(result.success, &result)
        }
        FsCommands::Write {
            path,
            content,
            mode,
        } => {
            let result = fs.write_file(&path, &content, &mode).await;
            Outcome::from_serialize(result.success, &result)
        }
        FsCommands::Ls { path } => {
            let result = fs.list_directory(&path).await;
            Outcome::from_serialize(result.success, &result)
        }
        FsCommands::Info { path } => {
            let result = fs.get_file_info(&path).await;
            Outcome::from_serialize(result.success, &result)
        }
    }
}

fn parse_label_args(pairs: &[String]) -> anyhow::Result<proto::Labels> {
    proto::parse_labels(pairs.iter().map(String::as_str)).map_err(anyhow::Error::msg)
}

/// Builds a raw tool call from a JSON object string.
fn build_tool_call(tool_name: &str, args: &str) -> anyhow::Result<ToolCall> {
    let arguments = match serde_json::from_str::<Value>(args)? {
        Value::Object(map) => map,
        other => anyhow::bail!("--args must be a JSON object, got {other}"),
    };
    let mut call = ToolCall::new(tool_name);
    call.arguments = arguments;
    Ok(call)
}
