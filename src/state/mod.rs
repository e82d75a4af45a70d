//! Match-state reconstruction: zones, player state, snapshots, and the
//! sequential event fold.
//!
//! ## Key Types
//!
//! - `Zone` / `ZoneSet`: card locations, with the tri-state hidden-hand
//!   model and opaque libraries
//! - `PlayerState`: one seat's reconstructed state
//! - `GameStateSnapshot`: immutable versioned aggregate
//! - `Reconstructor`: the strictly sequential fold with its per-epoch
//!   monotonicity gate
//! - `Checkpoint`: durable replay cursor for crash recovery

pub mod checkpoint;
pub mod player;
pub mod reconstructor;
pub mod snapshot;
pub mod zones;

pub use checkpoint::Checkpoint;
pub use player::{PlayerState, STARTING_LIFE};
pub use reconstructor::{apply_event, Reconstructor};
pub use snapshot::{GameStateSnapshot, StackEntry};
pub use zones::{CardPresence, HandSlot, LibraryZone, Zone, ZoneSet};
