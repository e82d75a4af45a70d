//! Durable replay cursor.
//!
//! Records how far the reconstruction got — the (epoch, sequence) of the
//! last applied event — so a restarted process can replay the log from
//! the start and let the monotonicity gate skip everything already
//! applied. Written with bincode: the cursor is tiny and read only by
//! this program.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::events::{Epoch, SeqNo};

/// The last durably applied position in the event stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub epoch: Epoch,
    pub seq: SeqNo,
}

impl Checkpoint {
    #[must_use]
    pub fn new(epoch: Epoch, seq: SeqNo) -> Self {
        Self { epoch, seq }
    }

    /// Persist the cursor.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let bytes = bincode::serialize(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, bytes)
    }

    /// Load a previously saved cursor. `Ok(None)` when none exists or the
    /// file is unreadable as a checkpoint — recovery then just replays
    /// from a fresh gate.
    pub fn load(path: &Path) -> std::io::Result<Option<Self>> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        Ok(bincode::deserialize(&bytes).ok())
    }
}
