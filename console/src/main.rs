use clap::Parser;
use cosign_http::{ClientConfig, ConsoleApi, FileStorage, GatewayClient, SessionStore};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;

use commands::Command;

const DEFAULT_FILTER: &str = "cosign_console=info,cosign_http=info,warn";

#[derive(Parser)]
#[command(name = "cosign-console")]
#[command(about = "Admin console for the SM2 co-signing service")]
struct Cli {
    /// Service base URL (overrides COSIGN_API_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Per-request timeout in milliseconds (overrides COSIGN_REQUEST_TIMEOUT_MS)
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Console home holding the session file and logs (overrides COSIGN_CONSOLE_HOME)
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

fn init_tracing(home: &std::path::Path) -> tracing_appender::non_blocking::WorkerGuard {
    let file_appender =
        tracing_appender::rolling::never(cosign_common::logs_dir(home), "console.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into());

    // stdout carries command output
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .init();

    guard
}

fn client_config(cli: &Cli) -> ClientConfig {
    let mut config = ClientConfig::from_env();
    if let Some(url) = &cli.base_url {
        config = config.with_base_url(url.clone());
    }
    if let Some(ms) = cli.timeout_ms {
        config = config.with_timeout_ms(ms);
    }
    config
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let home = cli.home.clone().unwrap_or_else(cosign_common::console_home);
    let home = cosign_common::init_structure(&home)?;
    let _guard = init_tracing(&home);

    let config = client_config(&cli);
    info!("=== cosign-console -> {} ===", config.base_url);

    let session = Arc::new(SessionStore::open(FileStorage::in_home(&home)));
    let gateway = GatewayClient::new(config, session)?;
    let watcher = commands::watch_navigation(gateway.navigator().subscribe());
    let api = ConsoleApi::new(gateway);

    let result = commands::execute(&api, cli.command).await;

    // Closing the last navigator handle ends the watcher once it has drained.
    drop(api);
    if let Err(e) = watcher.await {
        debug!("navigation watcher ended abnormally: {}", e);
    }
    result
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
