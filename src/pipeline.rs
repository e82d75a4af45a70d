//! Pipeline wiring: tailer → normalizer → reconstructor → evaluator →
//! scorer → bus.
//!
//! One-directional and strictly sequential past the tailer: the tailer is
//! the only blocking component and runs as its own task behind a bounded
//! channel; every downstream stage is a synchronous deterministic
//! transformation, which is what keeps the reconstructor's sequential
//! fold honest.
//!
//! ## Status signal
//!
//! Consumers can always distinguish "no recommendation yet" (the status
//! is `Waiting`/`Advancing` and the bus is simply quiet — normal between
//! decision points) from "the pipeline stalled" (`Stalled`, abnormal,
//! carries the reason). A stalled pipeline pauses; it resumes nothing on
//! its own and exits only on an explicit stop.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::bus::{AdviceBus, Delivery};
use crate::cards::CardKnowledge;
use crate::core::PlayerId;
use crate::engine::{rank, ScoreWeights, ScoredRecommendation};
use crate::error::PipelineError;
use crate::events::{RawLogLine, SeqNo};
use crate::normalizer::Normalizer;
use crate::rules::legal_actions;
use crate::state::{Checkpoint, Reconstructor};
use crate::tailer::{LogTailer, TailerConfig};

/// Pipeline tuning.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Bound of the tailer → normalizer channel (backpressure depth).
    pub channel_capacity: usize,
    /// Recommendations per delivery; the full order exists internally.
    pub max_recommendations: usize,
    pub weights: ScoreWeights,
    pub tailer: TailerConfig,
    /// Durable replay cursor. `None` disables checkpointing.
    pub checkpoint_path: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 64,
            max_recommendations: 5,
            weights: ScoreWeights::default(),
            tailer: TailerConfig::default(),
            checkpoint_path: None,
        }
    }
}

/// Observable pipeline state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PipelineStatus {
    Starting,
    /// Attached and healthy; no decision point yet. Normal.
    Waiting,
    /// Snapshots are flowing; carries the newest version.
    Advancing { seq: SeqNo },
    /// Abnormal: the run cannot make progress. Carries operator guidance.
    Stalled { reason: String },
    Stopped,
}

/// Counters from a replay run.
#[derive(Clone, Debug, Default)]
pub struct ReplaySummary {
    pub lines: usize,
    pub events: usize,
    pub snapshots: usize,
    pub parse_errors: usize,
    pub final_seq: Option<SeqNo>,
    /// Ranked recommendations at the final snapshot.
    pub final_recommendations: Vec<ScoredRecommendation>,
}

/// Handle to a running live pipeline.
pub struct AdvisorHandle {
    bus: AdviceBus,
    status: watch::Receiver<PipelineStatus>,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<Result<(), PipelineError>>,
}

impl AdvisorHandle {
    /// Subscribe to deliveries.
    #[must_use]
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Arc<Delivery>> {
        self.bus.subscribe()
    }

    /// Watch the status signal.
    #[must_use]
    pub fn status(&self) -> watch::Receiver<PipelineStatus> {
        self.status.clone()
    }

    /// Request a clean stop and wait for the pipeline to finish.
    ///
    /// In-flight normalizer fragments are discarded; no partial snapshot
    /// is emitted.
    pub async fn stop(self) -> Result<(), PipelineError> {
        let _ = self.shutdown.send(true);
        self.task.await.unwrap_or(Ok(()))
    }
}

/// The assembled advisor pipeline.
pub struct Pipeline {
    config: PipelineConfig,
    knowledge: Arc<CardKnowledge>,
    local: PlayerId,
    opponent: PlayerId,
}

impl Pipeline {
    #[must_use]
    pub fn new(
        config: PipelineConfig,
        knowledge: Arc<CardKnowledge>,
        local: PlayerId,
        opponent: PlayerId,
    ) -> Self {
        Self {
            config,
            knowledge,
            local,
            opponent,
        }
    }

    /// Start continuous tailing of `log_path`.
    #[must_use]
    pub fn start_live(self, log_path: PathBuf) -> AdvisorHandle {
        let bus = AdviceBus::with_capacity(self.config.channel_capacity);
        let (status_tx, status_rx) = watch::channel(PipelineStatus::Starting);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (line_tx, line_rx) = mpsc::channel(self.config.channel_capacity);

        let tailer = LogTailer::with_config(log_path, self.config.tailer.clone());
        let tailer_task = tailer.spawn(line_tx, shutdown_rx.clone());

        let bus_for_task = bus.clone();
        let task = tokio::spawn(self.run(line_rx, tailer_task, bus_for_task, status_tx, shutdown_rx));

        AdvisorHandle {
            bus,
            status: status_rx,
            shutdown: shutdown_tx,
            task,
        }
    }

    /// Consume a fixed canned log end-to-end and exit.
    pub fn run_replay(self, log_path: &std::path::Path) -> Result<ReplaySummary, PipelineError> {
        let text =
            std::fs::read_to_string(log_path).map_err(|source| PipelineError::ReplayInput {
                path: log_path.to_path_buf(),
                source,
            })?;

        let mut normalizer = Normalizer::new();
        let mut reconstructor = self.reconstructor()?;
        let mut summary = ReplaySummary::default();

        for raw in text.lines().filter(|l| !l.trim().is_empty()) {
            summary.lines += 1;
            let line = RawLogLine::new(crate::events::Epoch::default(), raw);
            let event = match normalizer.push_line(&line) {
                Ok(Some(event)) => event,
                Ok(None) => continue,
                Err(e) => {
                    debug!(error = %e, "recoverable parse error in replay");
                    summary.parse_errors += 1;
                    continue;
                }
            };
            summary.events += 1;
            if let Some(snapshot) = reconstructor.apply(&event)? {
                summary.snapshots += 1;
                summary.final_seq = Some(snapshot.seq);
                let actions = legal_actions(&snapshot, &self.knowledge);
                let mut ranked = rank(&actions, &snapshot, &self.knowledge, &self.config.weights);
                ranked.truncate(self.config.max_recommendations);
                summary.final_recommendations = ranked;
            }
        }

        if normalizer.flush() {
            debug!("incomplete fragment discarded at end of replay");
        }
        Ok(summary)
    }

    fn reconstructor(&self) -> Result<Reconstructor, PipelineError> {
        let mut reconstructor =
            Reconstructor::new(self.local, self.opponent, Arc::clone(&self.knowledge));
        if let Some(path) = &self.config.checkpoint_path {
            if let Ok(Some(cursor)) = Checkpoint::load(path) {
                info!(epoch = cursor.epoch.0, seq = cursor.seq.raw(), "resuming from checkpoint");
                reconstructor = reconstructor.resume_from(cursor.epoch, cursor.seq);
            }
        }
        Ok(reconstructor)
    }

    async fn run(
        self,
        mut lines: mpsc::Receiver<RawLogLine>,
        tailer_task: JoinHandle<Result<(), crate::error::SourceUnavailableError>>,
        bus: AdviceBus,
        status: watch::Sender<PipelineStatus>,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<(), PipelineError> {
        let mut normalizer = Normalizer::new();
        let mut reconstructor = self.reconstructor()?;
        let _ = status.send(PipelineStatus::Waiting);

        loop {
            let line = tokio::select! {
                line = lines.recv() => line,
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
            };
            let Some(line) = line else {
                // Tailer is gone: either clean shutdown or source failure
                break;
            };

            let event = match normalizer.push_line(&line) {
                Ok(Some(event)) => event,
                Ok(None) => continue,
                Err(e) => {
                    // Absorbed locally per the propagation policy
                    warn!(error = %e, "recoverable parse error, line skipped");
                    continue;
                }
            };

            let snapshot = match reconstructor.apply(&event) {
                Ok(Some(snapshot)) => snapshot,
                Ok(None) => continue,
                Err(violation) => {
                    let reason = violation.to_string();
                    warn!(reason = reason.as_str(), "invariant violation, halting run");
                    let _ = status.send(PipelineStatus::Stalled { reason });
                    return Err(violation.into());
                }
            };

            let actions = legal_actions(&snapshot, &self.knowledge);
            let mut ranked = rank(&actions, &snapshot, &self.knowledge, &self.config.weights);
            ranked.truncate(self.config.max_recommendations);

            bus.publish(Arc::new(Delivery {
                seq: snapshot.seq,
                snapshot: Arc::clone(&snapshot),
                recommendations: ranked,
            }));
            let _ = status.send(PipelineStatus::Advancing { seq: snapshot.seq });

            if let Some(path) = &self.config.checkpoint_path {
                if let Some((epoch, seq)) = reconstructor.last_applied() {
                    if let Err(e) = Checkpoint::new(epoch, seq).save(path) {
                        warn!(error = %e, "checkpoint write failed");
                    }
                }
            }
        }

        // Clean stop: discard incomplete fragments, emit nothing partial
        if normalizer.flush() {
            debug!("incomplete fragment discarded on stop");
        }

        // Unblock a tailer waiting on a full channel
        drop(lines);

        match tailer_task.await {
            Ok(Err(source)) => {
                // Source exhaustion pauses the pipeline; the operator
                // decides whether to stop it
                let _ = status.send(PipelineStatus::Stalled {
                    reason: source.to_string(),
                });
                let _ = shutdown.changed().await;
                let _ = status.send(PipelineStatus::Stopped);
                Err(source.into())
            }
            _ => {
                let _ = status.send(PipelineStatus::Stopped);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardData, CardId, CardType};
    use crate::core::ManaCost;

    fn knowledge() -> Arc<CardKnowledge> {
        let mut store = CardKnowledge::empty();
        store.register(CardData::new(CardId::new(1), "Forest", vec![CardType::Land]));
        store.register(
            CardData::new(CardId::new(2), "Grizzly Bears", vec![CardType::Creature])
                .with_cost(ManaCost::parse("{1}{G}").unwrap())
                .with_stats(2, 2),
        );
        Arc::new(store)
    }

    fn pipeline() -> Pipeline {
        Pipeline::new(
            PipelineConfig::default(),
            knowledge(),
            PlayerId::new(1),
            PlayerId::new(2),
        )
    }

    #[test]
    fn test_replay_counts_and_final_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("canned.log");
        std::fs::write(
            &path,
            concat!(
                "noise line\n",
                "[UnityCrossThreadLogger]{\"newTurn\": {\"turnNumber\": 1, \"activeSeat\": 1}}\n",
                "[UnityCrossThreadLogger]{\"lifeTotalChanged\": {\"seatId\": 2, \"lifeTotal\": 17}}\n",
            ),
        )
        .unwrap();

        let summary = pipeline().run_replay(&path).unwrap();

        assert_eq!(summary.lines, 3);
        assert_eq!(summary.events, 2);
        assert_eq!(summary.snapshots, 2);
        assert_eq!(summary.parse_errors, 0);
        assert_eq!(summary.final_seq, Some(SeqNo::new(1)));
        // PassPriority is always present
        assert!(!summary.final_recommendations.is_empty());
    }

    #[test]
    fn test_replay_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = pipeline().run_replay(&dir.path().join("absent.log"));
        assert!(matches!(result, Err(PipelineError::ReplayInput { .. })));
    }
}
