use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use briefly::data::format_short_date;
use briefly::ui::install_panic_hook;
use briefly::workspace::directory::preview;
use briefly::{util, App, Config, HttpApi, SessionApi, SessionId};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "briefly", version, about = "Chat with your meeting documents")]
struct Cli {
    /// Open this session directly instead of the session list
    #[arg(long, value_name = "ID")]
    session: Option<i64>,

    /// Backend base URL (overrides config and BRIEFLY_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Directory for config and logs (default ~/.briefly)
    #[arg(long, global = true, value_name = "PATH")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage sessions without opening the terminal UI
    Sessions {
        #[command(subcommand)]
        action: SessionsAction,
    },
}

#[derive(Subcommand, Debug)]
enum SessionsAction {
    /// List sessions, newest first
    List,
    /// Create a session
    Create {
        /// Session name, e.g. "Q4 Planning Meeting"
        name: String,
    },
}

fn init_logging() -> Result<()> {
    fs::create_dir_all(util::logs_dir())?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(util::log_file_path())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run_sessions(api: &dyn SessionApi, action: SessionsAction) -> Result<()> {
    match action {
        SessionsAction::List => {
            let sessions = api
                .list_sessions()
                .await
                .context("Failed to fetch sessions")?;
            if sessions.is_empty() {
                println!("{}", briefly::workspace::directory::NO_SESSIONS);
            }
            for session in &sessions {
                println!(
                    "{:>5}  {:<12}  {}",
                    session.id,
                    format_short_date(&session.created_at),
                    session.name
                );
                println!("       {}", preview(session));
            }
        }
        SessionsAction::Create { name } => {
            let name = name.trim();
            anyhow::ensure!(!name.is_empty(), "Session name is empty");
            let session = api
                .create_session(name)
                .await
                .context("Failed to create session")?;
            println!("Created session {} ({})", session.name, session.id);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    util::init_data_dir(cli.data_dir);
    init_logging()?;

    let mut config = Config::load();
    if let Some(url) = cli.api_url {
        config = config.with_api_url(url);
    }

    let api: Arc<dyn SessionApi> = Arc::new(HttpApi::new(&config.api)?);
    tracing::info!(api_url = %config.api.base_url, "Starting briefly");

    if let Some(Command::Sessions { action }) = cli.command {
        return run_sessions(api.as_ref(), action).await;
    }

    install_panic_hook();
    let mut app = App::new(config, api);
    if let Some(id) = cli.session {
        app.open_session(SessionId(id));
    }
    app.run().await
}
