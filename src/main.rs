use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use tablecrm_cards::config;
use tablecrm_cards::handlers::{self, AppState};
use tablecrm_cards::tablecrm::TableCrmClient;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print an example config and exit
    #[arg(long)]
    print_example_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    if args.print_example_config {
        print!("{}", config::example());
        return Ok(());
    }

    let cfg = config::load(Some(&args.config))
        .with_context(|| format!("failed to load {}", args.config.display()))?;
    let addr = cfg.listen_addr()?;

    let client = TableCrmClient::from_config(&cfg)?;
    let placement = client.placement();
    let default_token = cfg.default_token();
    if default_token.is_none() {
        warn!("no default token configured; requests must carry their own");
    }
    let state = AppState::new(Arc::new(client), default_token);
    let app = handlers::router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(
        %addr,
        base_url = %cfg.tablecrm.base_url,
        placement = placement.as_str(),
        "serving product card API"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(?err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
