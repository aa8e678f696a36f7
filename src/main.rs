use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{info, warn};
use docsum::client::render::{render_failure, render_summary, SummaryLength};
use docsum::client::{AdapterState, FileCandidate, HttpSummaryApi, SubmissionAdapter};
use docsum::utils::{init_logger, CLIENT_LOG_FILTER, SERVER_LOG_FILTER};
use docsum::{config::Config, routes::create_router, AppState};

#[derive(Parser)]
#[command(name = "docsum", version, about = "AI document summaries for PDFs and images")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the summarize HTTP handler (default)
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Summarize a local PDF or image through a running handler
    Summarize {
        /// Document to upload
        path: PathBuf,
        /// Summarize endpoint URL (overrides SUMMARIZE_ENDPOINT)
        #[arg(long)]
        endpoint: Option<String>,
        /// Key sent as bearer token and apikey header
        #[arg(long, env = "SUMMARIZE_API_KEY")]
        api_key: Option<String>,
        /// Summary length to print
        #[arg(long, value_enum, default_value_t = SummaryLength::All)]
        length: SummaryLength,
        /// Print the raw JSON result instead of formatted text
        #[arg(long)]
        json: bool,
        /// Seconds to wait for the handler
        #[arg(long, default_value_t = 180)]
        timeout: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            let _guard = init_logger(SERVER_LOG_FILTER, config.server.log_dir.as_deref());
            serve(config, port).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Summarize {
            path,
            endpoint,
            api_key,
            length,
            json,
            timeout,
        } => {
            let _guard = init_logger(CLIENT_LOG_FILTER, None);
            let endpoint = endpoint.unwrap_or_else(|| config.client.endpoint.clone());
            let mut api = HttpSummaryApi::new(endpoint, Duration::from_secs(timeout))?;
            if let Some(key) = api_key {
                api = api.with_api_key(key);
            }
            summarize(&api, path, length, json).await
        }
    }
}

async fn serve(config: Config, port: Option<u16>) -> anyhow::Result<()> {
    info!("Configuration loaded: {:?}", config.server);
    if config.llm.active_api_key().is_none() {
        warn!("LLM_API_KEY is not configured; every summarize request will fail");
    }

    let port = port.unwrap_or(config.server.port);
    let host: std::net::IpAddr = config.server.host.parse()?;
    let state = AppState::new(config)?;

    let app = create_router(state);

    let addr = SocketAddr::from((host, port));
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}

async fn summarize(
    api: &HttpSummaryApi,
    path: PathBuf,
    length: SummaryLength,
    json: bool,
) -> anyhow::Result<ExitCode> {
    let candidate = FileCandidate::from_path(&path)
        .await
        .map_err(|e| anyhow::anyhow!("Cannot open {}: {}", path.display(), e))?;

    let mut adapter = SubmissionAdapter::new();
    if let Err(e) = adapter.select_file(candidate) {
        eprintln!("{}: {}", e.title(), e.message());
        return Ok(ExitCode::FAILURE);
    }

    if let Some(file) = adapter.state().file() {
        eprintln!("Processing {} ({:.2} MB)...", file.name, file.size_mib());
    }

    match adapter.submit(api).await? {
        AdapterState::Result { summary, .. } => {
            if json {
                println!("{}", serde_json::to_string_pretty(summary)?);
            } else {
                print!("{}", render_summary(summary, length));
            }
            Ok(ExitCode::SUCCESS)
        }
        AdapterState::Error { failure, .. } => {
            eprintln!("{}", render_failure(failure));
            let detail = failure.message.trim_start_matches(failure.headline()).trim();
            if !detail.is_empty() {
                eprintln!("\n{}", detail);
            }
            Ok(ExitCode::FAILURE)
        }
        other => Err(anyhow::anyhow!("Unexpected adapter state: {:?}", other)),
    }
}
