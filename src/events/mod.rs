//! Domain events produced by the normalizer and folded by the
//! reconstructor.

pub mod event;

pub use event::{
    DomainEvent, Epoch, EventPayload, LifeChange, LifeTotal, ManaChange, PhaseChange, RawLogLine,
    SeqNo, StackEvent, TurnChange, ZoneChange,
};
