// src/main.rs

use std::str::FromStr;
use std::time::Duration;

use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use triad::api;
use triad::config::CONFIG;
use triad::state::{create_app_state, spawn_warmup};

#[derive(Parser, Debug)]
#[command(
    name = "triad",
    about = "Moderated conversational gateway with web-search fallback"
)]
struct Args {
    /// Bind address (overrides TRIAD_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides TRIAD_PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let level = Level::from_str(&CONFIG.log_level).unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting triad gateway");
    info!("Completion model: {}", CONFIG.completion_model);
    info!("Guard model: {}", CONFIG.guard_model);
    info!("Restricted topic: {}", CONFIG.restricted_topic);

    let state = create_app_state(&CONFIG)?;
    spawn_warmup(
        state.clone(),
        Duration::from_secs(CONFIG.warmup_retry_secs),
    );

    let app = api::routes(state);

    let host = args.host.unwrap_or_else(|| CONFIG.host.clone());
    let port = args.port.unwrap_or(CONFIG.port);
    let bind_address = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;

    info!("Server listening on http://{bind_address}");
    axum::serve(listener, app).await?;

    Ok(())
}
