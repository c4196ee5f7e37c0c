//! Built-in spell catalog.
//!
//! The concrete entries the shipped NPC templates cast. Each entry is a
//! zero-state type implementing [`Spell`]; `Default` is what lets the
//! registry mint fresh instances by id.

use std::sync::Arc;
use std::time::Duration;

use crate::npc::Whelp;
use crate::spells::effects::{CastSpell, DealDamage, SpawnChild, SpellEffect};
use crate::spells::registry::SpellRegistry;
use crate::spells::targeting::{TargetAllEnemies, TargetSelf, TargetingStrategy};
use crate::spells::types::{EmptySpell, Spell, SpellDetails, SpellFlag};

/// Two-step blast against every enemy: a 3-point shock followed by a 7-point
/// detonation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArcaneBlast;

impl Spell for ArcaneBlast {
    fn spell_id(&self) -> &str {
        "spell_arcane_blast"
    }

    fn targeting(&self) -> Box<dyn TargetingStrategy> {
        Box::new(TargetAllEnemies)
    }

    fn details(&self) -> SpellDetails {
        SpellDetails {
            flags: vec![SpellFlag::Damage, SpellFlag::AoE],
            ..SpellDetails::default()
        }
    }

    fn effects(&self) -> Vec<Box<dyn SpellEffect>> {
        vec![
            Box::new(DealDamage { amount: 3.0 }),
            Box::new(DealDamage { amount: 7.0 }),
        ]
    }
}

/// Schedules an [`ArcaneBlast`] on the caster at two, four, and nine
/// seconds, giving one opening cast a whole fight's worth of follow-ups.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoingRitual;

impl Spell for EchoingRitual {
    fn spell_id(&self) -> &str {
        "spell_echoing_ritual"
    }

    fn targeting(&self) -> Box<dyn TargetingStrategy> {
        Box::new(TargetSelf)
    }

    fn details(&self) -> SpellDetails {
        SpellDetails {
            flags: vec![SpellFlag::Damage, SpellFlag::OverTime],
            ..SpellDetails::default()
        }
    }

    fn effects(&self) -> Vec<Box<dyn SpellEffect>> {
        vec![
            Box::new(CastSpell {
                spell: Arc::new(ArcaneBlast),
                delay: Duration::from_secs(2),
            }),
            Box::new(CastSpell {
                spell: Arc::new(ArcaneBlast),
                delay: Duration::from_secs(4),
            }),
            Box::new(CastSpell {
                spell: Arc::new(ArcaneBlast),
                delay: Duration::from_secs(9),
            }),
        ]
    }
}

/// Summons two whelps under the caster.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummonBrood;

impl Spell for SummonBrood {
    fn spell_id(&self) -> &str {
        "spell_summon_brood"
    }

    fn targeting(&self) -> Box<dyn TargetingStrategy> {
        Box::new(TargetSelf)
    }

    fn effects(&self) -> Vec<Box<dyn SpellEffect>> {
        vec![
            Box::new(SpawnChild {
                template: Arc::new(Whelp),
            }),
            Box::new(SpawnChild {
                template: Arc::new(Whelp),
            }),
        ]
    }
}

/// Registers every built-in entry, the empty spell included, so follow-up
/// casts can always be re-instanced by id.
pub fn register_builtin_spells(registry: &mut SpellRegistry) {
    registry.register::<EmptySpell>();
    registry.register::<ArcaneBlast>();
    registry.register::<EchoingRitual>();
    registry.register::<SummonBrood>();
}
