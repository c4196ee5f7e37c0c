//! Combat log: a cast-complete subscriber that records every resolved cast.

use std::cell::RefCell;
use std::fmt::Write as _;
use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;

use crate::combat::object::CombatTree;
use crate::core::encounter::Encounter;
use crate::core::packet::CombatPacket;

/// One target of a resolved cast, with its HP after the effects ran.
#[derive(Debug, Clone, Serialize)]
pub struct TargetState {
    pub npc: String,
    pub hp_after: f32,
}

/// One resolved cast as observed by the log subscriber.
#[derive(Debug, Clone, Serialize)]
pub struct CombatLogEntry {
    /// The source's time alive when the cast resolved, equal to the
    /// encounter clock at the start of the resolving tick.
    pub timestamp: Duration,
    pub source: String,
    pub spell: String,
    pub hits: Vec<TargetState>,
}

/// Ordered record of every cast that resolved in one encounter.
#[derive(Debug, Default)]
pub struct CombatLog {
    entries: Vec<CombatLogEntry>,
}

impl CombatLog {
    /// Creates a log and subscribes it to `encounter`'s cast-complete hook.
    /// The returned handle stays readable while the encounter runs.
    pub fn attach(encounter: &mut Encounter) -> Rc<RefCell<CombatLog>> {
        let log = Rc::new(RefCell::new(CombatLog::default()));
        let sink = Rc::clone(&log);
        encounter.on_cast_complete(Box::new(move |packet, tree| {
            sink.borrow_mut().record(packet, tree);
        }));
        log
    }

    fn record(&mut self, packet: &CombatPacket, tree: &CombatTree) {
        let Some(source) = packet.source else {
            return;
        };
        let spell = packet
            .spell
            .as_ref()
            .map(|spell| spell.spell_id().to_string())
            .unwrap_or_default();
        self.entries.push(CombatLogEntry {
            timestamp: tree.node(source).time_alive(),
            source: tree.node(source).npc_id.clone(),
            spell,
            hits: packet
                .targets
                .iter()
                .map(|&target| TargetState {
                    npc: tree.node(target).npc_id.clone(),
                    hp_after: tree.node(target).resources.current_hp(),
                })
                .collect(),
        });
    }

    pub fn entries(&self) -> &[CombatLogEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Human-readable transcript, one line per resolved cast.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for entry in &self.entries {
            let _ = write!(
                text,
                "[{:>5.1}s] {} casts {}",
                entry.timestamp.as_secs_f32(),
                entry.source,
                entry.spell
            );
            if entry.hits.is_empty() {
                text.push_str(" (no targets)");
            } else {
                let hits: Vec<String> = entry
                    .hits
                    .iter()
                    .map(|hit| format!("{} ({:.0} HP)", hit.npc, hit.hp_after))
                    .collect();
                let _ = write!(text, " -> {}", hits.join(", "));
            }
            text.push('\n');
        }
        text
    }
}
