//! NPC templates: spawn-time configurators for combat objects.
//!
//! A template is the single entry point `spawn_child` hands a freshly
//! created node to. It sets the node's identity, flags, starting resources,
//! and optionally schedules its opening cast. Templates with stat variance
//! roll it at construction, so one template instance always configures
//! identical units.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;

use crate::combat::object::CombatObject;
use crate::spells::library::{ArcaneBlast, EchoingRitual, SummonBrood};

/// Spawn-time configurator invoked by `CombatTree::spawn_child`.
pub trait NpcTemplate: Send + Sync {
    fn npc_id(&self) -> &str;

    fn configure(&self, node: &mut CombatObject);
}

/// Container at the top of an encounter's tree. Never targetable.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncounterRoot;

impl NpcTemplate for EncounterRoot {
    fn npc_id(&self) -> &str {
        "encounter_root"
    }

    fn configure(&self, node: &mut CombatObject) {
        node.npc_id = self.npc_id().to_string();
    }
}

/// Container for the player's side. Units spawned below inherit the flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerTeam;

impl NpcTemplate for PlayerTeam {
    fn npc_id(&self) -> &str {
        "player_team"
    }

    fn configure(&self, node: &mut CombatObject) {
        node.npc_id = self.npc_id().to_string();
        node.set_player_team(true);
    }
}

/// Container for the opposing side.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnemyTeam;

impl NpcTemplate for EnemyTeam {
    fn npc_id(&self) -> &str {
        "enemy_team"
    }

    fn configure(&self, node: &mut CombatObject) {
        node.npc_id = self.npc_id().to_string();
        node.set_player_team(false);
    }
}

/// Inert target practice. Stands there and takes it.
#[derive(Debug, Clone, Copy)]
pub struct TrainingDummy {
    max_hp: f32,
}

impl TrainingDummy {
    pub fn new(rng: &mut impl Rng) -> Self {
        Self {
            max_hp: rng.gen_range(24.0..28.0),
        }
    }
}

impl NpcTemplate for TrainingDummy {
    fn npc_id(&self) -> &str {
        "training_dummy"
    }

    fn configure(&self, node: &mut CombatObject) {
        node.npc_id = self.npc_id().to_string();
        node.set_targetable(true);
        node.resources.set_max_hp(self.max_hp);
    }
}

/// Frontline unit. Durable, opens with the echoing ritual.
#[derive(Debug, Clone, Copy)]
pub struct Vanguard {
    max_hp: f32,
}

impl Vanguard {
    pub fn new(rng: &mut impl Rng) -> Self {
        Self {
            max_hp: rng.gen_range(90.0..110.0),
        }
    }
}

impl NpcTemplate for Vanguard {
    fn npc_id(&self) -> &str {
        "vanguard"
    }

    fn configure(&self, node: &mut CombatObject) {
        node.npc_id = self.npc_id().to_string();
        node.set_targetable(true);
        node.resources.set_max_hp(self.max_hp);
        node.position.update(0.0, 0.0);
        node.schedule_spell(Arc::new(EchoingRitual));
    }
}

/// Caster unit. Fragile, opens with the echoing ritual.
#[derive(Debug, Clone, Copy)]
pub struct Acolyte {
    max_hp: f32,
}

impl Acolyte {
    pub fn new(rng: &mut impl Rng) -> Self {
        Self {
            max_hp: rng.gen_range(18.0..22.0),
        }
    }
}

impl NpcTemplate for Acolyte {
    fn npc_id(&self) -> &str {
        "acolyte"
    }

    fn configure(&self, node: &mut CombatObject) {
        node.npc_id = self.npc_id().to_string();
        node.set_targetable(true);
        node.resources.set_max_hp(self.max_hp);
        node.position.update(10.0, 0.0);
        node.schedule_spell(Arc::new(EchoingRitual));
    }
}

/// Summoner. Calls a brood of whelps at the start of the fight and lets them
/// do the work.
#[derive(Debug, Clone, Copy)]
pub struct Broodmother {
    max_hp: f32,
}

impl Broodmother {
    pub fn new(rng: &mut impl Rng) -> Self {
        Self {
            max_hp: rng.gen_range(26.0..30.0),
        }
    }
}

impl NpcTemplate for Broodmother {
    fn npc_id(&self) -> &str {
        "broodmother"
    }

    fn configure(&self, node: &mut CombatObject) {
        node.npc_id = self.npc_id().to_string();
        node.set_targetable(true);
        node.resources.set_max_hp(self.max_hp);
        node.position.update(12.0, 3.0);
        node.schedule_spell(Arc::new(SummonBrood));
    }
}

/// Summoned add. Spawns mid-fight under its summoner and fires one blast
/// shortly after entering.
#[derive(Debug, Clone, Copy, Default)]
pub struct Whelp;

impl NpcTemplate for Whelp {
    fn npc_id(&self) -> &str {
        "whelp"
    }

    fn configure(&self, node: &mut CombatObject) {
        node.npc_id = self.npc_id().to_string();
        node.set_targetable(true);
        node.resources.set_max_hp(8.0);
        node.schedule_spell(Arc::new(ArcaneBlast))
            .delay_activation(Duration::from_secs(1));
    }
}

/// Far more hit points than anything in a level can burn through. Exists to
/// lose against.
#[derive(Debug, Clone, Copy, Default)]
pub struct Colossus;

impl NpcTemplate for Colossus {
    fn npc_id(&self) -> &str {
        "colossus"
    }

    fn configure(&self, node: &mut CombatObject) {
        node.npc_id = self.npc_id().to_string();
        node.set_targetable(true);
        node.resources.set_max_hp(999.0);
        node.position.update(15.0, 0.0);
        node.schedule_spell(Arc::new(EchoingRitual));
    }
}
