//! Command surface for the launcher.
//!
//! Two modes:
//! - `live`: continuous tailing, printing recommendations as they arrive
//! - `replay`: consume a fixed canned log end-to-end and exit
//!
//! Both terminate with a process exit code as the machine-distinguishable
//! success/failure signal.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::broadcast::error::RecvError;
use tracing::info;
use tracing_subscriber::EnvFilter;

use arena_advisor::{
    CardKnowledge, Pipeline, PipelineConfig, PipelineStatus, PlayerId, TailerConfig,
};

#[derive(Parser)]
#[command(name = "arena-advisor")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Log-tailing match companion: watches, reconstructs, advises", long_about = None)]
struct Cli {
    /// Card metadata snapshot (JSON). Omit to run with degraded lookups.
    #[arg(long, global = true)]
    cards: Option<PathBuf>,

    /// The observing player's seat number in the log.
    #[arg(long, global = true, default_value = "1")]
    seat: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tail the client log continuously and print recommendations
    Live {
        /// Log file path (defaults to the platform location)
        log: Option<PathBuf>,

        /// Replay existing log content before following new appends
        #[arg(long)]
        from_start: bool,

        /// Durable replay cursor for crash recovery
        #[arg(long)]
        checkpoint: Option<PathBuf>,
    },

    /// Consume a canned log end-to-end and exit
    Replay {
        /// Canned log file
        log: PathBuf,
    },
}

fn load_knowledge(cards: Option<&PathBuf>) -> Result<Arc<CardKnowledge>> {
    match cards {
        Some(path) => {
            let store = CardKnowledge::load(path)
                .with_context(|| format!("loading card data from {}", path.display()))?;
            Ok(Arc::new(store))
        }
        None => {
            info!("no card data supplied; lookups will be degraded");
            Ok(Arc::new(CardKnowledge::empty()))
        }
    }
}

fn seats(local: u8) -> (PlayerId, PlayerId) {
    let local = PlayerId::new(local);
    let opponent = PlayerId::new(if local.raw() == 1 { 2 } else { 1 });
    (local, opponent)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let knowledge = load_knowledge(cli.cards.as_ref())?;
    let (local, opponent) = seats(cli.seat);

    match cli.command {
        Commands::Live {
            log,
            from_start,
            checkpoint,
        } => {
            let path = match log.or_else(arena_advisor::tailer::default_log_path) {
                Some(path) => path,
                None => bail!("no log path given and none found at the default locations"),
            };
            let config = PipelineConfig {
                tailer: TailerConfig {
                    from_start,
                    ..TailerConfig::default()
                },
                checkpoint_path: checkpoint,
                ..PipelineConfig::default()
            };

            info!(path = %path.display(), "starting live advisor");
            let handle = Pipeline::new(config, knowledge, local, opponent).start_live(path);

            let mut deliveries = handle.subscribe();
            let mut status = handle.status();
            loop {
                tokio::select! {
                    delivery = deliveries.recv() => {
                        match delivery {
                            Ok(delivery) => {
                                println!("-- snapshot {} --", delivery.seq);
                                for (i, rec) in delivery.recommendations.iter().enumerate() {
                                    println!(
                                        "  {}. {:?} (score {:.2}) {}",
                                        i + 1,
                                        rec.action.kind(),
                                        rec.score,
                                        rec.reasons.join("; ")
                                    );
                                }
                            }
                            // A slow console only misses deliveries, it
                            // does not end the session
                            Err(RecvError::Lagged(_)) => continue,
                            Err(RecvError::Closed) => break,
                        }
                    }
                    _ = status.changed() => {
                        if let PipelineStatus::Stalled { reason } = &*status.borrow() {
                            eprintln!("pipeline stalled: {reason}");
                        }
                    }
                    _ = tokio::signal::ctrl_c() => {
                        info!("stopping");
                        break;
                    }
                }
            }
            handle.stop().await?;
            Ok(())
        }

        Commands::Replay { log } => {
            let summary = Pipeline::new(PipelineConfig::default(), knowledge, local, opponent)
                .run_replay(&log)?;

            println!(
                "replay: {} lines, {} events, {} snapshots, {} parse errors",
                summary.lines, summary.events, summary.snapshots, summary.parse_errors
            );
            if let Some(seq) = summary.final_seq {
                println!("final version: {seq}");
            }
            for (i, rec) in summary.final_recommendations.iter().enumerate() {
                println!(
                    "  {}. {:?} (score {:.2}) {}",
                    i + 1,
                    rec.action.kind(),
                    rec.score,
                    rec.reasons.join("; ")
                );
            }
            Ok(())
        }
    }
}
