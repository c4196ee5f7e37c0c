//! Pooled records of in-flight cast resolutions.

use std::sync::Arc;

use crate::combat::object::ObjectId;
use crate::core::constants::DEFAULT_PACKET_POOL_SIZE;
use crate::spells::types::Spell;

/// Transient description of one cast resolving right now: who casts what at
/// whom, and whether the attempt was accepted.
///
/// A packet is owned by the [`PacketPool`] between uses and borrowed by the
/// encounter for the duration of one cast resolution; it is reset before it
/// returns to the pool, so no references leak across casts.
pub struct CombatPacket {
    pub source: Option<ObjectId>,
    pub spell: Option<Arc<dyn Spell>>,
    pub targets: Vec<ObjectId>,
    pub success: bool,
}

impl CombatPacket {
    fn new() -> Self {
        Self {
            source: None,
            spell: None,
            targets: Vec::new(),
            success: false,
        }
    }

    /// Clears every field for reuse. The target list keeps its capacity.
    pub fn reset(&mut self) {
        self.source = None;
        self.spell = None;
        self.targets.clear();
        self.success = false;
    }
}

/// Reusable packet store.
///
/// Casts resolve on the hot path every tick; packets are recycled instead of
/// reallocated. The tick loop is one synchronous call; no locking.
pub struct PacketPool {
    pool: Vec<CombatPacket>,
}

impl Default for PacketPool {
    fn default() -> Self {
        Self::new(DEFAULT_PACKET_POOL_SIZE)
    }
}

impl PacketPool {
    pub fn new(size: usize) -> Self {
        Self {
            pool: (0..size).map(|_| CombatPacket::new()).collect(),
        }
    }

    /// Pops a pooled, reset packet, or allocates a new one when the pool has
    /// run dry.
    pub fn request(&mut self) -> CombatPacket {
        self.pool.pop().unwrap_or_else(CombatPacket::new)
    }

    /// Resets `packet` and returns it to the pool.
    pub fn release(&mut self, mut packet: CombatPacket) {
        packet.reset();
        self.pool.push(packet);
    }

    pub fn available(&self) -> usize {
        self.pool.len()
    }
}
