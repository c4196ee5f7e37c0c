//! End-to-end tick behavior of the encounter engine.

use std::sync::Arc;
use std::time::Duration;

use skirmish::combat::{CastStatus, CombatObject};
use skirmish::core::Encounter;
use skirmish::npc::NpcTemplate;
use skirmish::spells::{
    DealDamage, Spell, SpellEffect, TargetAllEnemies, TargetingStrategy,
};

struct Unit {
    npc_id: &'static str,
    hp: f32,
}

impl NpcTemplate for Unit {
    fn npc_id(&self) -> &str {
        self.npc_id
    }

    fn configure(&self, node: &mut CombatObject) {
        node.npc_id = self.npc_id.to_string();
        node.set_targetable(true);
        node.resources.set_max_hp(self.hp);
    }
}

#[derive(Default)]
struct Smite;

impl Spell for Smite {
    fn spell_id(&self) -> &str {
        "spell_smite"
    }

    fn targeting(&self) -> Box<dyn TargetingStrategy> {
        Box::new(TargetAllEnemies)
    }

    fn effects(&self) -> Vec<Box<dyn SpellEffect>> {
        vec![Box::new(DealDamage { amount: 10.0 })]
    }
}

/// Spawns A on the player side and B on the enemy side, both targetable
/// with 100 max HP.
fn two_sided_encounter() -> (Encounter, skirmish::combat::ObjectId, skirmish::combat::ObjectId) {
    let mut encounter = Encounter::new();
    let a = encounter.spawn_player_unit(&Unit {
        npc_id: "unit_a",
        hp: 100.0,
    });
    let b = encounter.spawn_enemy_unit(&Unit {
        npc_id: "unit_b",
        hp: 100.0,
    });
    (encounter, a, b)
}

#[test]
fn test_due_cast_resolves_on_first_tick_and_prunes_on_second() {
    let (mut encounter, a, b) = two_sided_encounter();
    encounter
        .tree_mut()
        .node_mut(a)
        .schedule_spell(Arc::new(Smite));

    let first = encounter.process_tick();

    // The activation-0 cast resolved on the very first tick.
    assert_eq!(first.casts.len(), 1);
    assert_eq!(first.casts[0].spell_id, "spell_smite");
    assert_eq!(first.casts[0].targets, vec!["unit_b".to_string()]);
    assert_eq!(encounter.tree().node(b).resources.current_hp(), 90.0);
    assert_eq!(encounter.tree().node(a).resources.current_hp(), 100.0);

    // Still observable as Successful after the resolving tick.
    let casts = encounter.tree().node(a).scheduled_spells();
    assert_eq!(casts.len(), 1);
    assert_eq!(casts[0].status(), CastStatus::Successful);

    // The following tick prunes it and nothing re-executes.
    let second = encounter.process_tick();
    assert!(second.casts.is_empty());
    assert!(encounter.tree().node(a).scheduled_spells().is_empty());
    assert_eq!(encounter.tree().node(b).resources.current_hp(), 90.0);
}

#[test]
fn test_delayed_cast_waits_for_its_activation() {
    let (mut encounter, a, b) = two_sided_encounter();
    encounter
        .tree_mut()
        .node_mut(a)
        .schedule_spell(Arc::new(Smite))
        .delay_activation(Duration::from_secs(1));

    // Two ticks at 2 updates/sec bring the timer to exactly 1.0s.
    assert!(encounter.process_tick().casts.is_empty());
    assert!(encounter.process_tick().casts.is_empty());
    assert_eq!(encounter.tree().node(b).resources.current_hp(), 100.0);

    let third = encounter.process_tick();
    assert_eq!(third.casts.len(), 1);
    assert_eq!(encounter.tree().node(b).resources.current_hp(), 90.0);
}

#[test]
fn test_cast_executes_exactly_once() {
    let (mut encounter, a, b) = two_sided_encounter();
    encounter
        .tree_mut()
        .node_mut(a)
        .schedule_spell(Arc::new(Smite));

    for _ in 0..10 {
        encounter.process_tick();
    }
    assert_eq!(encounter.tree().node(b).resources.current_hp(), 90.0);
}

#[test]
fn test_paused_cast_never_becomes_ready() {
    let (mut encounter, a, b) = two_sided_encounter();
    encounter
        .tree_mut()
        .node_mut(a)
        .schedule_spell(Arc::new(Smite))
        .delay_activation(Duration::from_secs(1));
    if let Some(cast) = encounter.tree_mut().node_mut(a).spell_at_mut(0) {
        cast.set_paused(true);
    }

    for _ in 0..10 {
        encounter.process_tick();
    }
    assert_eq!(encounter.tree().node(b).resources.current_hp(), 100.0);
    assert_eq!(
        encounter.tree().node(a).scheduled_spells()[0].status(),
        CastStatus::NotStarted
    );

    // Unpausing lets the timer run again.
    if let Some(cast) = encounter.tree_mut().node_mut(a).spell_at_mut(0) {
        cast.set_paused(false);
    }
    for _ in 0..3 {
        encounter.process_tick();
    }
    assert_eq!(encounter.tree().node(b).resources.current_hp(), 90.0);
}

mod mid_tick_spawning {
    use super::*;
    use skirmish::spells::SpawnChild;

    /// Spawned mid-fight; opens with an immediately-due smite.
    struct Hatchling;

    impl NpcTemplate for Hatchling {
        fn npc_id(&self) -> &str {
            "hatchling"
        }

        fn configure(&self, node: &mut CombatObject) {
            node.npc_id = "hatchling".to_string();
            node.set_targetable(true);
            node.resources.set_max_hp(10.0);
            node.schedule_spell(Arc::new(Smite));
        }
    }

    #[derive(Default)]
    struct HatchEgg;

    impl Spell for HatchEgg {
        fn spell_id(&self) -> &str {
            "spell_hatch_egg"
        }

        fn targeting(&self) -> Box<dyn TargetingStrategy> {
            Box::new(skirmish::spells::TargetSelf)
        }

        fn effects(&self) -> Vec<Box<dyn SpellEffect>> {
            vec![Box::new(SpawnChild {
                template: Arc::new(Hatchling),
            })]
        }
    }

    #[test]
    fn test_nodes_spawned_mid_tick_act_on_the_next_tick() {
        let (mut encounter, a, b) = two_sided_encounter();
        encounter
            .tree_mut()
            .node_mut(a)
            .schedule_spell(Arc::new(HatchEgg));
        let before = encounter.tree().len();

        let first = encounter.process_tick();

        // The egg resolved and the hatchling exists, on the caster's team.
        assert_eq!(first.casts.len(), 1);
        assert_eq!(encounter.tree().len(), before + 1);
        let hatchling = encounter.find_by_npc_id("hatchling")[0];
        assert!(encounter.tree().node(hatchling).is_on_player_team());
        assert_eq!(encounter.tree().node(hatchling).parent(), Some(a));

        // Its activation-0 opening cast did not run in the spawning tick.
        assert_eq!(encounter.tree().node(b).resources.current_hp(), 100.0);

        // It runs on the next tick.
        let second = encounter.process_tick();
        assert_eq!(second.casts.len(), 1);
        assert_eq!(second.casts[0].source_npc, "hatchling");
        assert_eq!(encounter.tree().node(b).resources.current_hp(), 90.0);
    }
}

#[test]
fn test_clock_advances_by_fixed_interval() {
    let (mut encounter, _a, _b) = two_sided_encounter();
    assert_eq!(encounter.clock(), Duration::ZERO);

    let tick = encounter.process_tick();
    assert_eq!(tick.clock, Duration::from_millis(500));
    encounter.process_tick();
    assert_eq!(encounter.clock(), Duration::from_secs(1));
}

#[test]
fn test_alive_timers_track_ticks() {
    let (mut encounter, a, _b) = two_sided_encounter();
    for _ in 0..4 {
        encounter.process_tick();
    }
    assert_eq!(encounter.tree().node(a).time_alive(), Duration::from_secs(2));
    assert_eq!(
        encounter.tree().node(encounter.root()).time_alive(),
        Duration::from_secs(2)
    );
}
