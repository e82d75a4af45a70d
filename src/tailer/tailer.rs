//! Log file follower.
//!
//! Polls the watched file for appended bytes and hands completed lines to
//! the normalizer through a bounded channel — an awaited `send` is the
//! backpressure: when the channel is full the tailer stops reading until
//! the pipeline catches up.
//!
//! ## Epochs
//!
//! The tailer owns the source-file-identity epoch. Truncation (size
//! shrinks below the cursor) and rotation (file identity changes under
//! the same path) both advance the epoch and reset the read cursor to
//! zero. Downstream, sequence monotonicity is scoped to the epoch, so a
//! replayed prefix never double-applies.
//!
//! ## Failure behavior
//!
//! A missing or locked file is retried with bounded backoff; only when
//! the retry budget is exhausted does the task finish with
//! `SourceUnavailableError`. The tailer never writes to the watched file.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::SourceUnavailableError;
use crate::events::{Epoch, RawLogLine};

/// Identity of a file incarnation, for rotation detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FileId(u64);

impl FileId {
    #[cfg(unix)]
    fn of(meta: &std::fs::Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;
        Self(meta.ino())
    }

    #[cfg(windows)]
    fn of(meta: &std::fs::Metadata) -> Self {
        use std::os::windows::fs::MetadataExt;
        Self(meta.creation_time())
    }

    #[cfg(not(any(unix, windows)))]
    fn of(_meta: &std::fs::Metadata) -> Self {
        Self(0)
    }
}

/// Tailer tuning.
#[derive(Clone, Debug)]
pub struct TailerConfig {
    /// How often to poll for appended bytes.
    pub poll_interval: Duration,
    /// Consecutive open/stat failures tolerated before giving up.
    pub retry_limit: u32,
    /// Read the file from offset zero instead of attaching at the end.
    /// Used by replay/catch-up; live operation attaches at the tail.
    pub from_start: bool,
}

impl Default for TailerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            retry_limit: 50,
            from_start: false,
        }
    }
}

/// Polling follower for one log file.
pub struct LogTailer {
    path: PathBuf,
    config: TailerConfig,
}

impl LogTailer {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            config: TailerConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(path: PathBuf, config: TailerConfig) -> Self {
        Self { path, config }
    }

    /// Spawn the follower task.
    ///
    /// Runs until `shutdown` flips true, the receiver side of `lines` is
    /// dropped, or the retry budget is exhausted.
    pub fn spawn(
        self,
        lines: mpsc::Sender<RawLogLine>,
        shutdown: watch::Receiver<bool>,
    ) -> JoinHandle<Result<(), SourceUnavailableError>> {
        tokio::spawn(self.run(lines, shutdown))
    }

    async fn run(
        self,
        lines: mpsc::Sender<RawLogLine>,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<(), SourceUnavailableError> {
        let mut epoch = Epoch::default();
        let mut cursor: u64 = 0;
        let mut identity: Option<FileId> = None;
        let mut carry = String::new();
        let mut misses: u32 = 0;

        info!(path = %self.path.display(), "tailer attached");

        loop {
            if *shutdown.borrow() {
                return Ok(());
            }

            match std::fs::metadata(&self.path) {
                Err(source) => {
                    misses += 1;
                    if misses > self.config.retry_limit {
                        return Err(SourceUnavailableError {
                            path: self.path.clone(),
                            attempts: misses,
                            source,
                        });
                    }
                    debug!(attempt = misses, "log source unavailable, backing off");
                    self.pause(&mut shutdown, misses).await;
                    continue;
                }
                Ok(meta) => {
                    misses = 0;
                    let id = FileId::of(&meta);
                    match identity {
                        None => {
                            identity = Some(id);
                            cursor = if self.config.from_start { 0 } else { meta.len() };
                        }
                        Some(prev) if prev != id => {
                            info!(path = %self.path.display(), "log rotated, starting new epoch");
                            identity = Some(id);
                            epoch = epoch.next();
                            cursor = 0;
                            carry.clear();
                        }
                        Some(_) if meta.len() < cursor => {
                            info!(
                                size = meta.len(),
                                cursor, "log truncated, starting new epoch"
                            );
                            epoch = epoch.next();
                            cursor = 0;
                            carry.clear();
                        }
                        Some(_) => {}
                    }

                    if meta.len() > cursor {
                        match self.read_from(cursor) {
                            Ok((bytes, text)) => {
                                cursor += bytes;
                                carry.push_str(&text);
                                while let Some(pos) = carry.find('\n') {
                                    let line: String =
                                        carry.drain(..=pos).collect::<String>();
                                    let line = line.trim_end_matches(['\n', '\r']);
                                    if line.is_empty() {
                                        continue;
                                    }
                                    let raw = RawLogLine::new(epoch, line);
                                    // Bounded send is the backpressure
                                    if lines.send(raw).await.is_err() {
                                        debug!("line receiver dropped, tailer stopping");
                                        return Ok(());
                                    }
                                }
                            }
                            Err(e) => {
                                warn!(error = %e, "read failed, will retry");
                            }
                        }
                        continue;
                    }
                }
            }

            self.pause(&mut shutdown, 1).await;
        }
    }

    /// Read everything after `cursor`. Returns (bytes consumed, text).
    fn read_from(&self, cursor: u64) -> std::io::Result<(u64, String)> {
        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(cursor))?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)?;
        let bytes = buf.len() as u64;
        // The vendor log is UTF-8; tolerate stray bytes instead of failing
        Ok((bytes, String::from_utf8_lossy(&buf).into_owned()))
    }

    /// Sleep one backoff period, waking early on shutdown.
    async fn pause(&self, shutdown: &mut watch::Receiver<bool>, factor: u32) {
        let backoff = self.config.poll_interval * factor.min(10);
        tokio::select! {
            _ = tokio::time::sleep(backoff) => {}
            _ = shutdown.changed() => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn test_config() -> TailerConfig {
        TailerConfig {
            poll_interval: Duration::from_millis(5),
            retry_limit: 3,
            from_start: true,
        }
    }

    async fn recv_line(rx: &mut mpsc::Receiver<RawLogLine>) -> RawLogLine {
        tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("timed out waiting for line")
            .expect("channel closed")
    }

    #[tokio::test]
    async fn test_reads_appended_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.log");
        std::fs::write(&path, "first\n").unwrap();

        let (tx, mut rx) = mpsc::channel(8);
        let (_stop_tx, stop_rx) = watch::channel(false);
        let handle = LogTailer::with_config(path.clone(), test_config()).spawn(tx, stop_rx);

        assert_eq!(recv_line(&mut rx).await.text, "first");

        let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "second").unwrap();
        drop(file);

        let line = recv_line(&mut rx).await;
        assert_eq!(line.text, "second");
        assert_eq!(line.epoch, Epoch::new(0));

        drop(rx);
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_partial_line_held_until_complete() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.log");
        std::fs::write(&path, "half").unwrap();

        let (tx, mut rx) = mpsc::channel(8);
        let (_stop_tx, stop_rx) = watch::channel(false);
        let handle = LogTailer::with_config(path.clone(), test_config()).spawn(tx, stop_rx);

        // No newline yet: nothing must arrive
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());

        let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, " now whole").unwrap();
        drop(file);

        assert_eq!(recv_line(&mut rx).await.text, "half now whole");

        drop(rx);
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_truncation_starts_new_epoch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.log");
        std::fs::write(&path, "old line\n").unwrap();

        let (tx, mut rx) = mpsc::channel(8);
        let (_stop_tx, stop_rx) = watch::channel(false);
        let handle = LogTailer::with_config(path.clone(), test_config()).spawn(tx, stop_rx);

        assert_eq!(recv_line(&mut rx).await.epoch, Epoch::new(0));

        // Shrink the file, then write fresh content
        std::fs::write(&path, "new\n").unwrap();

        let line = recv_line(&mut rx).await;
        assert_eq!(line.text, "new");
        assert_eq!(line.epoch, Epoch::new(1));

        drop(rx);
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_missing_source_exhausts_retry_budget() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never-exists.log");

        let (tx, _rx) = mpsc::channel(8);
        let (_stop_tx, stop_rx) = watch::channel(false);
        let handle = LogTailer::with_config(path, test_config()).spawn(tx, stop_rx);

        let err = handle.await.unwrap().unwrap_err();
        assert_eq!(err.attempts, 4);
    }

    #[tokio::test]
    async fn test_shutdown_stops_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.log");
        std::fs::write(&path, "line\n").unwrap();

        let (tx, mut rx) = mpsc::channel(8);
        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = LogTailer::with_config(path, test_config()).spawn(tx, stop_rx);

        let _ = recv_line(&mut rx).await;
        stop_tx.send(true).unwrap();
        handle.await.unwrap().unwrap();
    }
}
