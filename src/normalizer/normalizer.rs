//! Line normalization: raw log text to typed domain events.
//!
//! Pure per-line mapping: most lines are non-gameplay noise and produce
//! nothing; a line carrying a structured payload produces exactly one
//! event. Sequence numbers are assigned here, in ingestion order, scoped
//! to the tailer's epoch — the vendor's own timestamps and ordering are
//! not trusted.
//!
//! ## Split payloads
//!
//! The client sometimes flushes a JSON payload across several writes. An
//! unbalanced payload opens a fragment buffer; continuation lines are
//! concatenated until the braces balance or the buffer budget is
//! exceeded, at which point the fragment is discarded with a
//! `RecoverableParseError`. The pipeline logs and moves on — a bad
//! payload never stalls reconstruction.

use regex::Regex;
use serde_json::Value;
use tracing::trace;

use crate::core::{ManaColor, ManaPool, Phase, PlayerId, Step};
use crate::cards::{CardId, InstanceId};
use crate::error::RecoverableParseError;
use crate::events::{
    DomainEvent, Epoch, EventPayload, LifeChange, LifeTotal, ManaChange, PhaseChange, RawLogLine,
    SeqNo, StackEvent, TurnChange, ZoneChange,
};
use crate::state::Zone;

/// Default cap on a buffered payload fragment.
const MAX_FRAGMENT_BYTES: usize = 64 * 1024;

/// Stateful line normalizer.
pub struct Normalizer {
    envelope: Regex,
    epoch: Epoch,
    next_seq: u64,
    fragment: Option<String>,
    max_fragment: usize,
}

impl Normalizer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            envelope: Regex::new(r"^\[UnityCrossThreadLogger\]").expect("static regex"),
            epoch: Epoch::default(),
            next_seq: 0,
            fragment: None,
            max_fragment: MAX_FRAGMENT_BYTES,
        }
    }

    /// Override the fragment budget (tests).
    #[must_use]
    pub fn with_fragment_budget(mut self, bytes: usize) -> Self {
        self.max_fragment = bytes;
        self
    }

    /// Feed one raw line. Returns at most one event.
    pub fn push_line(
        &mut self,
        line: &RawLogLine,
    ) -> Result<Option<DomainEvent>, RecoverableParseError> {
        if line.epoch != self.epoch {
            // New file incarnation: sequence numbering restarts and any
            // half-read payload from the old incarnation is meaningless
            self.epoch = line.epoch;
            self.next_seq = 0;
            self.fragment = None;
        }

        if let Some(mut fragment) = self.fragment.take() {
            fragment.push_str(&line.text);
            if fragment.len() > self.max_fragment {
                return Err(RecoverableParseError::FragmentOverflow {
                    limit: self.max_fragment,
                });
            }
            return match balanced_prefix(&fragment) {
                Some(json) => self.parse_payload(json),
                None => {
                    self.fragment = Some(fragment);
                    Ok(None)
                }
            };
        }

        if !self.envelope.is_match(&line.text) {
            return Ok(None);
        }
        let Some(start) = line.text.find('{') else {
            // Marker line without a structured payload: noise
            return Ok(None);
        };
        let payload = &line.text[start..];
        match balanced_prefix(payload) {
            Some(json) => self.parse_payload(json),
            None => {
                trace!("payload split across writes, buffering");
                self.fragment = Some(payload.to_string());
                Ok(None)
            }
        }
    }

    /// Discard any in-flight fragment. Called on clean stop; returns true
    /// if an incomplete payload was dropped.
    pub fn flush(&mut self) -> bool {
        self.fragment.take().is_some()
    }

    /// Whether a fragment is currently buffered.
    #[must_use]
    pub fn has_fragment(&self) -> bool {
        self.fragment.is_some()
    }

    fn parse_payload(
        &mut self,
        json: &str,
    ) -> Result<Option<DomainEvent>, RecoverableParseError> {
        let value: Value = serde_json::from_str(json)?;
        let payload = map_payload(&value);
        let seq = SeqNo::new(self.next_seq);
        self.next_seq += 1;
        Ok(Some(DomainEvent::new(seq, self.epoch, payload)))
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// The JSON prefix forming one complete object, or `None` while braces
/// remain unbalanced. String contents and escapes are respected.
fn balanced_prefix(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&text[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Map a parsed payload object onto the closed event set.
fn map_payload(value: &Value) -> EventPayload {
    // Some payloads arrive wrapped in the client-event envelope
    let body = value.get("greToClientEvent").unwrap_or(value);
    let Some(object) = body.as_object() else {
        return EventPayload::Unknown {
            label: "non-object".to_string(),
        };
    };

    if let Some(zt) = object.get("zoneTransfer") {
        if let Some(payload) = map_zone_transfer(zt) {
            return payload;
        }
        return unknown("zoneTransfer");
    }
    if let Some(lc) = object.get("lifeTotalChanged") {
        if let Some(payload) = map_life_change(lc) {
            return payload;
        }
        return unknown("lifeTotalChanged");
    }
    if let Some(ps) = object.get("phaseStep") {
        if let Some(payload) = map_phase_step(ps) {
            return payload;
        }
        return unknown("phaseStep");
    }
    if let Some(nt) = object.get("newTurn") {
        if let Some(payload) = map_new_turn(nt) {
            return payload;
        }
        return unknown("newTurn");
    }
    if let Some(mp) = object.get("manaPool") {
        if let Some(payload) = map_mana_pool(mp) {
            return payload;
        }
        return unknown("manaPool");
    }
    if let Some(sp) = object.get("stackPush") {
        return EventPayload::Stack(StackEvent::Push {
            instance: sp
                .get("instanceId")
                .and_then(Value::as_u64)
                .map(|n| InstanceId::new(n as u32)),
            card: sp
                .get("grpId")
                .and_then(Value::as_u64)
                .map(|n| CardId::new(n as u32)),
        });
    }
    if object.contains_key("stackPop") {
        return EventPayload::Stack(StackEvent::Pop);
    }

    // Well-formed but unrecognized: preserved, not dropped
    let label = object
        .keys()
        .next()
        .cloned()
        .unwrap_or_else(|| "empty".to_string());
    EventPayload::Unknown { label }
}

fn unknown(label: &str) -> EventPayload {
    EventPayload::Unknown {
        label: label.to_string(),
    }
}

fn map_zone_transfer(value: &Value) -> Option<EventPayload> {
    let instance = value.get("instanceId")?.as_u64()? as u32;
    let to = Zone::from_log_token(value.get("toZone")?.as_str()?)?;
    let owner = value.get("ownerSeatId")?.as_u64()? as u8;
    let from = value
        .get("fromZone")
        .and_then(Value::as_str)
        .and_then(Zone::from_log_token);
    Some(EventPayload::ZoneChange(ZoneChange {
        instance: InstanceId::new(instance),
        card: value
            .get("grpId")
            .and_then(Value::as_u64)
            .map(|n| CardId::new(n as u32)),
        from,
        to,
        owner: PlayerId::new(owner),
        visible: value
            .get("visibility")
            .and_then(Value::as_str)
            .map_or(true, |v| v == "Visible"),
        position: value
            .get("position")
            .and_then(Value::as_u64)
            .map(|n| n as usize),
    }))
}

fn map_life_change(value: &Value) -> Option<EventPayload> {
    let seat = value.get("seatId")?.as_u64()? as u8;
    // The payload shape declares absolute vs delta; never guessed
    let total = if let Some(total) = value.get("lifeTotal").and_then(Value::as_i64) {
        LifeTotal::Absolute(total as i32)
    } else if let Some(delta) = value.get("delta").and_then(Value::as_i64) {
        LifeTotal::Delta(delta as i32)
    } else {
        return None;
    };
    Some(EventPayload::LifeChange(LifeChange {
        player: PlayerId::new(seat),
        value: total,
    }))
}

fn map_phase_step(value: &Value) -> Option<EventPayload> {
    let phase = Phase::from_log_token(value.get("phase")?.as_str()?)?;
    let active = value.get("activeSeat")?.as_u64()? as u8;
    Some(EventPayload::PhaseChange(PhaseChange {
        phase,
        step: value
            .get("step")
            .and_then(Value::as_str)
            .and_then(Step::from_log_token),
        active: PlayerId::new(active),
    }))
}

fn map_new_turn(value: &Value) -> Option<EventPayload> {
    let turn = value.get("turnNumber")?.as_u64()? as u32;
    let active = value.get("activeSeat")?.as_u64()? as u8;
    Some(EventPayload::TurnChange(TurnChange {
        turn,
        active: PlayerId::new(active),
    }))
}

fn map_mana_pool(value: &Value) -> Option<EventPayload> {
    let seat = value.get("seatId")?.as_u64()? as u8;
    let amounts = value.get("mana")?.as_object()?;
    let mut pool = ManaPool::empty();
    for (key, color) in [
        ("white", ManaColor::White),
        ("blue", ManaColor::Blue),
        ("black", ManaColor::Black),
        ("red", ManaColor::Red),
        ("green", ManaColor::Green),
        ("colorless", ManaColor::Colorless),
    ] {
        if let Some(n) = amounts.get(key).and_then(Value::as_u64) {
            pool.set_amount(color, n.min(255) as u8);
        }
    }
    Some(EventPayload::ManaChange(ManaChange {
        player: PlayerId::new(seat),
        pool,
    }))
}
