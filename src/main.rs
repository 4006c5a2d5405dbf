//! Wallet Sentry - wallet trust-score analysis CLI
//!
//! Drives one analysis (or one assistant turn) through the orchestrator
//! against the remote scoring API.
//!
//! Usage:
//!   wallet_sentry <address> [network]
//!   wallet_sentry ask <question...>
//!
//! Environment:
//!   WALLET_API_BASE         - API origin, e.g. https://scoring.example.com
//!   WALLET_API_TIMEOUT_SECS - Per-request timeout (default: 10)

use std::sync::Arc;

use eyre::{eyre, Result};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use wallet_sentry::{
    AnalysisApi, AnalysisClient, AnalysisOrchestrator, AnalysisSnapshot, AssistantSession,
    ClientConfig, Network,
};

#[tokio::main]
async fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .compact()
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("Usage: wallet_sentry <address> [network]");
        eprintln!("       wallet_sentry ask <question...>");
        return Err(eyre!("missing arguments"));
    }

    let config = ClientConfig::default();
    if config.base_url.is_empty() {
        eprintln!("⚠️  WALLET_API_BASE not set, using same-origin relative URLs");
    }
    let api: Arc<dyn AnalysisApi> = Arc::new(AnalysisClient::new(config));

    if args[0] == "ask" {
        let question = args[1..].join(" ");
        return run_assistant(api, &question).await;
    }

    let address = args[0].clone();
    let network = match args.get(1) {
        Some(raw) => raw.parse::<Network>().map_err(|e| eyre!(e))?,
        None => Network::default(),
    };

    run_analysis(api, &address, network).await
}

async fn run_analysis(api: Arc<dyn AnalysisApi>, address: &str, network: Network) -> Result<()> {
    let orchestrator = AnalysisOrchestrator::new(api);
    orchestrator.subscribe(|snapshot: &AnalysisSnapshot| {
        tracing::debug!("state -> {:?} (loading: {})", snapshot.state, snapshot.is_loading);
    });

    orchestrator.set_address(address);
    orchestrator.set_network(network);
    orchestrator.submit().await;

    let snapshot = orchestrator.snapshot();
    if let Some(error) = snapshot.error {
        return Err(eyre!("analysis failed: {}", error));
    }

    let result = snapshot
        .result
        .ok_or_else(|| eyre!("no result published"))?;

    println!();
    println!("Wallet {} on {}", result.address, result.network.display_name());
    println!(
        "  Trust score:  {} ({} risk, {})",
        result.score,
        result.risk_level,
        result.risk_level.color_code()
    );
    println!("  Total value:  {}", result.total_value);
    println!("  Transactions: {} (avg {})", result.transaction_count, result.avg_transaction);
    println!("  Active since: {}", result.active_since);
    println!("  Last updated: {}", result.last_updated);

    if !result.metrics.is_empty() {
        println!("  Metrics:");
        for metric in &result.metrics {
            println!("    - {} [{}]: {}", metric.name, metric.score, metric.description);
        }
    }

    if !result.recent_transactions.is_empty() {
        println!("  Recent transactions:");
        for tx in &result.recent_transactions {
            println!(
                "    - {:?} {} ({}) at {}",
                tx.direction, tx.amount, tx.hash, tx.timestamp
            );
        }
    }

    for day in &result.activities {
        println!("  {}:", day.date);
        for event in &day.events {
            let marker = if event.highlight { "*" } else { "-" };
            println!("    {} [{}] {}", marker, event.time, event.description);
        }
    }

    Ok(())
}

async fn run_assistant(api: Arc<dyn AnalysisApi>, question: &str) -> Result<()> {
    let session = AssistantSession::new(api);

    if !session.ask(question).await {
        return Err(eyre!("empty question"));
    }

    for turn in session.turns() {
        println!("{:?}: {}", turn.role, turn.content);
    }

    Ok(())
}
