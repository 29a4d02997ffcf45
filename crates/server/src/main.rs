//! RiskGuard server binary - loads §6 configuration, wires the store,
//! graph engine and orchestrator, and serves the HTTP surface.

mod bootstrap;
mod config;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use config::RiskGuardConfig;

#[derive(Parser, Debug)]
#[command(name = "riskguard-server")]
#[command(about = "RiskGuard - transaction fraud-scoring pipeline")]
struct Args {
    /// Override the listen address (defaults to `BIND_ADDR` env, then 0.0.0.0:8000)
    #[arg(long)]
    bind_addr: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(Level::INFO.into())
                .add_directive("riskguard_server=debug".parse().unwrap()),
        )
        .init();

    let args = Args::parse();
    let mut config = RiskGuardConfig::from_env();
    if let Some(bind_addr) = args.bind_addr {
        config.bind_addr = bind_addr;
    }

    info!(bind_addr = %config.bind_addr, testing = config.testing, "starting riskguard-server");

    let state = bootstrap::build_app_state(&config).await?;
    let app = riskguard_api::build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
