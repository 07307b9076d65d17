//! arena-ingest command-line entry point.
//!
//! Runs the ingestion pipeline for a player tag or refreshes the card
//! catalog. Command failures are reported as printed text; the exit
//! code stays zero so wrapping schedulers treat every run uniformly.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use arena_ingest::config::AppConfig;
use arena_ingest::gateway::ApiGateway;
use arena_ingest::service::IngestService;
use arena_ingest::storage::StatStore;
use arena_ingest::storage::postgres::PgStore;
use arena_ingest::verify::VerificationService;

#[derive(Debug, Parser)]
#[command(name = "arena-ingest", about = "Game-statistics ingestion and verification")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch and store player, clan, challenge, and battle-log data,
    /// then print threshold proofs over the stored rows.
    Ingest {
        /// Player tag, e.g. `#ABCDE123`.
        player_tag: String,

        /// Trophy threshold for the trophy proof.
        #[arg(long, default_value_t = 4000)]
        trophy_threshold: u32,

        /// Win/loss-ratio threshold (percent) for the ratio proof.
        #[arg(long, default_value_t = 60.0)]
        ratio_threshold: f64,
    },
    /// Fetch and store the card catalog.
    FetchCards,
}

/// Executes one command and returns the lines to print. Never fails:
/// every fault becomes a printed message.
async fn run(command: Command, service: &IngestService, store: Arc<dyn StatStore>) -> Vec<String> {
    let mut out = Vec::new();
    match command {
        Command::Ingest {
            player_tag,
            trophy_threshold,
            ratio_threshold,
        } => {
            let report = match service.ingest_player(&player_tag).await {
                Ok(report) => report,
                Err(err) => {
                    out.push(format!("Error: {err}"));
                    return out;
                }
            };
            out.push(report.summary());

            let verifier = VerificationService::new(store);
            match verifier
                .generate_trophy_proof(&report.player_tag, trophy_threshold)
                .await
            {
                Ok(trophy) => out.push(format!("trophy proof: {} ({})", trophy.proof, trophy.message)),
                Err(err) => out.push(format!("Error: {err}")),
            }
            match verifier
                .generate_win_loss_proof(&report.player_tag, ratio_threshold)
                .await
            {
                Ok(ratio) => out.push(format!("win/loss proof: {} ({})", ratio.proof, ratio.message)),
                Err(err) => out.push(format!("Error: {err}")),
            }
        }
        Command::FetchCards => match service.ingest_cards().await {
            Ok(cards) => out.push(format!(
                "cards: {} stored, {} skipped",
                cards.stored, cards.skipped
            )),
            Err(err) => out.push(format!("Error: {err}")),
        },
    }
    out
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    let store: Arc<dyn StatStore> = Arc::new(PgStore::connect(&config).await?);
    let gateway = ApiGateway::new(&config)?;
    let service = IngestService::new(gateway, Arc::clone(&store));

    for line in run(cli.command, &service, store).await {
        println!("{line}");
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use arena_ingest::storage::memory::MemoryStore;

    fn make_service(base_url: &str, store: Arc<MemoryStore>) -> IngestService {
        let config = AppConfig {
            api_base_url: base_url.to_string(),
            api_token: "test-token".to_string(),
            database_url: String::new(),
            database_max_connections: 1,
            database_connect_timeout_secs: 1,
        };
        let Ok(gateway) = ApiGateway::new(&config) else {
            panic!("gateway construction failed");
        };
        IngestService::new(gateway, store as Arc<dyn StatStore>)
    }

    #[tokio::test]
    async fn fetch_cards_failure_is_reported_as_text() {
        // Port 9 (discard) is almost certainly not listening.
        let store = Arc::new(MemoryStore::new());
        let service = make_service("http://127.0.0.1:9", Arc::clone(&store));

        let lines = run(Command::FetchCards, &service, store).await;
        assert_eq!(lines.len(), 1);
        assert!(lines.first().is_some_and(|l| l.starts_with("Error:")));
    }

    #[tokio::test]
    async fn invalid_tag_is_reported_as_text() {
        let store = Arc::new(MemoryStore::new());
        let service = make_service("http://127.0.0.1:9", Arc::clone(&store));

        let lines = run(
            Command::Ingest {
                player_tag: "ABCDE123".to_string(),
                trophy_threshold: 4000,
                ratio_threshold: 60.0,
            },
            &service,
            store,
        )
        .await;
        assert_eq!(lines.len(), 1);
        assert!(
            lines
                .first()
                .is_some_and(|l| l.contains("Player tag must start with #."))
        );
    }

    #[tokio::test]
    async fn unreachable_upstream_still_prints_summary_and_proofs() {
        let store = Arc::new(MemoryStore::new());
        let service = make_service("http://127.0.0.1:9", Arc::clone(&store));

        let lines = run(
            Command::Ingest {
                player_tag: "#ABCDE123".to_string(),
                trophy_threshold: 4000,
                ratio_threshold: 60.0,
            },
            &service,
            store,
        )
        .await;
        // Summary plus both proofs; the proofs report a missing player
        // rather than erroring.
        assert_eq!(lines.len(), 3);
        assert!(lines.first().is_some_and(|l| l.contains("failed")));
        assert!(lines.iter().any(|l| l.contains("trophy proof: false")));
    }
}
