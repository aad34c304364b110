// src/main.rs

use clap::Parser;
use std::str::FromStr;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use tabula::config::CONFIG;
use tabula::orchestrator::Orchestrator;
use tabula::state::AppState;
use tabula::types::Address;

/// Run the delegation-and-update pipeline once for a wallet address and
/// print the resulting state as JSON. Operator tool; the dashboard consumes
/// the same AppState reactively.
#[derive(Parser)]
#[command(name = "tabula", version)]
struct Args {
    /// Wallet address to aggregate for. Omit to exercise the disconnected
    /// (idle) path.
    #[arg(long, env = "TABULA_ADDRESS")]
    address: Option<String>,

    /// Also print the update feed partitioned into priority buckets.
    #[arg(long)]
    grouped: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::from_str(&CONFIG.log_level).unwrap_or(Level::INFO))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Tabula pipeline");
    info!("Provider: {}", CONFIG.provider_base_url);

    let app_state = AppState::from_config()?;
    let address = args.address.map(Address::new);

    app_state.orchestrator.handle_address_change(address).await;

    let state = app_state.orchestrator.snapshot().await;
    println!("{}", serde_json::to_string_pretty(&state)?);

    if args.grouped {
        let grouped = Orchestrator::grouped_updates(&state.updates);
        println!("{}", serde_json::to_string_pretty(&grouped)?);
    }

    Ok(())
}
