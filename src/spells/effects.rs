//! Spell effects: the mutating steps of a resolving cast.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::combat::object::CombatTree;
use crate::core::packet::CombatPacket;
use crate::npc::NpcTemplate;
use crate::spells::registry::SpellRegistry;
use crate::spells::types::Spell;

/// World access handed to an executing effect: the participant tree it may
/// mutate and the registry it may mint fresh catalog entries from.
pub struct EffectContext<'a> {
    pub tree: &'a mut CombatTree,
    pub registry: &'a SpellRegistry,
}

/// A single side-effecting step applied to a resolved target set.
///
/// Effects mutate target state or grow the tree. The packet's source and
/// target identity are fixed before any effect runs and must not be touched.
pub trait SpellEffect: Send + Sync {
    fn effect_id(&self) -> &str;

    fn execute(&self, packet: &CombatPacket, ctx: &mut EffectContext<'_>);
}

/// Performs no mutation. Fallback wherever an effect lookup comes up empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyEffect;

impl SpellEffect for EmptyEffect {
    fn effect_id(&self) -> &str {
        "effect_empty"
    }

    fn execute(&self, _packet: &CombatPacket, _ctx: &mut EffectContext<'_>) {}
}

/// Reduces every target's current HP by a fixed amount. No clamping: overkill
/// damage leaves targets at negative HP.
#[derive(Debug, Clone, Copy)]
pub struct DealDamage {
    pub amount: f32,
}

impl SpellEffect for DealDamage {
    fn effect_id(&self) -> &str {
        "effect_deal_damage"
    }

    fn execute(&self, packet: &CombatPacket, ctx: &mut EffectContext<'_>) {
        debug!(
            amount = self.amount,
            targets = packet.targets.len(),
            "dealing damage"
        );
        for &target in &packet.targets {
            let node = ctx.tree.node_mut(target);
            node.resources.reduce_current_hp(self.amount);
            debug!(
                npc = %node.npc_id,
                hp = node.resources.current_hp(),
                "damage received"
            );
        }
    }
}

/// Spawns one configured child under every target, growing the tree
/// mid-tick. New nodes first participate in the next tick.
pub struct SpawnChild {
    pub template: Arc<dyn NpcTemplate>,
}

impl SpellEffect for SpawnChild {
    fn effect_id(&self) -> &str {
        "effect_spawn_child"
    }

    fn execute(&self, packet: &CombatPacket, ctx: &mut EffectContext<'_>) {
        debug!(
            npc = self.template.npc_id(),
            targets = packet.targets.len(),
            "spawning children"
        );
        for &target in &packet.targets {
            ctx.tree.spawn_child(target, self.template.as_ref());
        }
    }
}

/// Schedules a follow-up cast of `spell` on every target, delayed by the
/// same offset.
///
/// Instancing rule: a single target is handed this effect's own entry
/// instance, so repeat state carries across casts of the same chain. With
/// two or more targets, each receives a fresh instance minted through the
/// registry, so no two targets share one entry's cast progress.
pub struct CastSpell {
    pub spell: Arc<dyn Spell>,
    pub delay: Duration,
}

impl SpellEffect for CastSpell {
    fn effect_id(&self) -> &str {
        "effect_cast_spell"
    }

    fn execute(&self, packet: &CombatPacket, ctx: &mut EffectContext<'_>) {
        debug!(
            spell = self.spell.spell_id(),
            targets = packet.targets.len(),
            "scheduling follow-up cast"
        );
        if packet.targets.len() == 1 {
            let scheduled = ctx
                .tree
                .node_mut(packet.targets[0])
                .schedule_spell(Arc::clone(&self.spell));
            scheduled.delay_activation(self.delay);
        } else {
            for &target in &packet.targets {
                let spell = ctx.registry.create_instance(self.spell.spell_id());
                let scheduled = ctx.tree.node_mut(target).schedule_spell(spell);
                scheduled.delay_activation(self.delay);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::object::{CombatObject, ObjectId};
    use crate::core::packet::PacketPool;
    use crate::spells::targeting::{EmptyTargeting, TargetingStrategy};

    struct Dummy;

    impl NpcTemplate for Dummy {
        fn npc_id(&self) -> &str {
            "dummy"
        }

        fn configure(&self, node: &mut CombatObject) {
            node.npc_id = "dummy".to_string();
            node.set_targetable(true);
            node.resources.set_max_hp(100.0);
        }
    }

    #[derive(Default)]
    struct Spark;

    impl Spell for Spark {
        fn spell_id(&self) -> &str {
            "spell_spark"
        }

        fn targeting(&self) -> Box<dyn TargetingStrategy> {
            Box::new(EmptyTargeting)
        }

        fn effects(&self) -> Vec<Box<dyn SpellEffect>> {
            vec![Box::new(DealDamage { amount: 1.0 })]
        }
    }

    fn setup(target_count: usize) -> (CombatTree, SpellRegistry, Vec<ObjectId>) {
        let mut tree = CombatTree::new();
        let targets: Vec<ObjectId> = (0..target_count)
            .map(|_| tree.spawn_child(tree.root(), &Dummy))
            .collect();
        let mut registry = SpellRegistry::new();
        registry.register::<Spark>();
        (tree, registry, targets)
    }

    fn packet_for(targets: &[ObjectId]) -> CombatPacket {
        let mut packet = PacketPool::new(1).request();
        packet.targets.extend_from_slice(targets);
        packet
    }

    #[test]
    fn test_deal_damage_is_exact_and_unclamped() {
        let (mut tree, registry, targets) = setup(1);
        let packet = packet_for(&targets);
        let mut ctx = EffectContext {
            tree: &mut tree,
            registry: &registry,
        };

        DealDamage { amount: 30.0 }.execute(&packet, &mut ctx);
        assert_eq!(tree.node(targets[0]).resources.current_hp(), 70.0);

        let mut ctx = EffectContext {
            tree: &mut tree,
            registry: &registry,
        };
        DealDamage { amount: 100.0 }.execute(&packet, &mut ctx);
        assert_eq!(tree.node(targets[0]).resources.current_hp(), -30.0);
    }

    #[test]
    fn test_spawn_child_grows_tree_under_each_target() {
        let (mut tree, registry, targets) = setup(2);
        let packet = packet_for(&targets);
        let before = tree.len();

        let effect = SpawnChild {
            template: Arc::new(Dummy),
        };
        let mut ctx = EffectContext {
            tree: &mut tree,
            registry: &registry,
        };
        effect.execute(&packet, &mut ctx);

        assert_eq!(tree.len(), before + 2);
        assert_eq!(tree.node(targets[0]).children().len(), 1);
        assert_eq!(tree.node(targets[1]).children().len(), 1);
    }

    #[test]
    fn test_cast_spell_single_target_shares_the_entry() {
        let (mut tree, registry, targets) = setup(1);
        let packet = packet_for(&targets);
        let entry: Arc<dyn Spell> = Arc::new(Spark);
        let effect = CastSpell {
            spell: Arc::clone(&entry),
            delay: Duration::from_secs(2),
        };

        let mut ctx = EffectContext {
            tree: &mut tree,
            registry: &registry,
        };
        effect.execute(&packet, &mut ctx);
        let mut ctx = EffectContext {
            tree: &mut tree,
            registry: &registry,
        };
        effect.execute(&packet, &mut ctx);

        let casts = tree.node(targets[0]).scheduled_spells();
        assert_eq!(casts.len(), 2);
        // Both scheduled casts continue the same catalog-entry instance.
        assert!(Arc::ptr_eq(casts[0].spell(), &entry));
        assert!(Arc::ptr_eq(casts[1].spell(), &entry));
        assert_eq!(casts[0].activation(), Duration::from_secs(2));
    }

    #[test]
    fn test_cast_spell_multiple_targets_get_fresh_instances() {
        let (mut tree, registry, targets) = setup(3);
        let packet = packet_for(&targets);
        let entry: Arc<dyn Spell> = Arc::new(Spark);
        let effect = CastSpell {
            spell: Arc::clone(&entry),
            delay: Duration::from_secs(4),
        };

        let mut ctx = EffectContext {
            tree: &mut tree,
            registry: &registry,
        };
        effect.execute(&packet, &mut ctx);

        let mut seen: Vec<Arc<dyn Spell>> = vec![entry];
        for &target in &targets {
            let casts = tree.node(target).scheduled_spells();
            assert_eq!(casts.len(), 1);
            assert_eq!(casts[0].activation(), Duration::from_secs(4));
            // No scheduled instance aliases the effect's entry or another
            // target's instance.
            for previous in &seen {
                assert!(!Arc::ptr_eq(casts[0].spell(), previous));
            }
            seen.push(Arc::clone(casts[0].spell()));
        }
    }

    #[test]
    fn test_cast_spell_unknown_id_degrades_to_empty() {
        let (mut tree, _unused, targets) = setup(2);
        // Registry without Spark registered.
        let registry = SpellRegistry::new();
        let packet = packet_for(&targets);
        let effect = CastSpell {
            spell: Arc::new(Spark),
            delay: Duration::ZERO,
        };

        let mut ctx = EffectContext {
            tree: &mut tree,
            registry: &registry,
        };
        effect.execute(&packet, &mut ctx);

        for &target in &targets {
            let casts = tree.node(target).scheduled_spells();
            assert_eq!(casts.len(), 1);
            assert_eq!(casts[0].spell().spell_id(), "spell_empty");
        }
    }

    #[test]
    fn test_empty_effect_does_nothing() {
        let (mut tree, registry, targets) = setup(1);
        let packet = packet_for(&targets);
        let mut ctx = EffectContext {
            tree: &mut tree,
            registry: &registry,
        };
        EmptyEffect.execute(&packet, &mut ctx);
        assert_eq!(tree.node(targets[0]).resources.current_hp(), 100.0);
    }
}
