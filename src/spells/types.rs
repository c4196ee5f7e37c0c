//! Spell catalog entries.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::spells::effects::SpellEffect;
use crate::spells::targeting::{EmptyTargeting, TargetingStrategy};

pub const DEFAULT_MAX_RANGE: f32 = 99_999.0;

pub const EMPTY_SPELL_ID: &str = "spell_empty";

/// Advisory metadata describing how a spell behaves. The engine never
/// enforces these; they exist for drivers, logs, and future cast validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpellFlag {
    Casting,
    Channeling,
    Damage,
    Heal,
    OverTime,
    AoE,
    Tankable,
    Soakable,
    DistanceFalloff,
    Avoidable,
    FriendlyFire,
}

/// Cost and timing envelope of a catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpellDetails {
    pub range: f32,
    pub cast_delay: Duration,
    pub cast_time: Duration,
    pub duration: Duration,
    pub cooldown: Duration,
    pub gcd_modifier: f32,
    pub spell_modifier: f32,
    /// Flat HP cost. Reserved for the cast-validation extension point.
    pub hp_cost: f32,
    pub flags: Vec<SpellFlag>,
}

impl Default for SpellDetails {
    fn default() -> Self {
        Self {
            range: DEFAULT_MAX_RANGE,
            cast_delay: Duration::ZERO,
            cast_time: Duration::ZERO,
            duration: Duration::ZERO,
            cooldown: Duration::ZERO,
            gcd_modifier: 1.0,
            spell_modifier: 1.0,
            hp_cost: 0.0,
            flags: Vec::new(),
        }
    }
}

/// An immutable, shareable spell definition: a stable id, a targeting
/// strategy, timing details, and an ordered effect list.
///
/// Many scheduled casts may reference one entry; entries are never mutated
/// after construction, which is why every accessor takes `&self` and the
/// engine shares them as `Arc<dyn Spell>`.
pub trait Spell: Send + Sync {
    /// Stable id, unique within a [`crate::spells::registry::SpellRegistry`].
    fn spell_id(&self) -> &str;

    fn targeting(&self) -> Box<dyn TargetingStrategy>;

    fn details(&self) -> SpellDetails {
        SpellDetails::default()
    }

    /// Effects in declared order; the encounter runs them left to right.
    fn effects(&self) -> Vec<Box<dyn SpellEffect>>;
}

/// Placeholder entry: resolves no targets and performs no effects. Fallback
/// wherever a spell lookup comes up empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptySpell;

impl Spell for EmptySpell {
    fn spell_id(&self) -> &str {
        EMPTY_SPELL_ID
    }

    fn targeting(&self) -> Box<dyn TargetingStrategy> {
        Box::new(EmptyTargeting)
    }

    fn effects(&self) -> Vec<Box<dyn SpellEffect>> {
        Vec::new()
    }
}
