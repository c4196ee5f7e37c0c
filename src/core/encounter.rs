//! The encounter: fixed-timestep tick orchestration.
//!
//! One encounter owns its participant tree, spell registry, packet pool, and
//! clock. `process_tick` advances the whole simulation by one fixed step:
//!
//! 1. prune casts that finished on earlier ticks,
//! 2. refresh cast statuses so casts due now are ready this tick,
//! 3. snapshot the tree-wide list of ready casts,
//! 4. attempt each one; accepted casts resolve targets and run their
//!    effects through a pooled packet,
//! 5. advance the encounter clock, every node's alive-timer, and every
//!    pending cast's timer.
//!
//! The snapshot in step 3 is the traversal-mutation policy: nodes spawned
//! and casts scheduled while effects run first participate in the next tick.
//! The encounter has no end condition of its own; the owning loop decides
//! when to stop calling `process_tick`.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::combat::object::{CombatTree, ObjectId, SpellHandle};
use crate::core::constants::DEFAULT_UPDATES_PER_SECOND;
use crate::core::packet::{CombatPacket, PacketPool};
use crate::npc::{EncounterRoot, EnemyTeam, NpcTemplate, PlayerTeam};
use crate::spells::effects::EffectContext;
use crate::spells::library::register_builtin_spells;
use crate::spells::registry::SpellRegistry;
use crate::spells::types::Spell;

/// Synchronous observer invoked around every executed cast with the resolved
/// packet and the tree, in registration order.
pub type CastHook = Box<dyn FnMut(&CombatPacket, &CombatTree)>;

/// Record of one cast executed during a tick.
#[derive(Debug, Clone, Serialize)]
pub struct CastResolved {
    pub source_npc: String,
    pub spell_id: String,
    pub targets: Vec<String>,
    pub success: bool,
}

/// What happened during one call to [`Encounter::process_tick`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct TickResult {
    /// Encounter clock after this tick.
    pub clock: Duration,
    /// Casts executed this tick, in resolution order.
    pub casts: Vec<CastResolved>,
    /// Casts rejected by the validity check this tick.
    pub casts_failed: usize,
}

/// Orchestrates one combat encounter.
pub struct Encounter {
    tree: CombatTree,
    player_team: ObjectId,
    enemy_team: ObjectId,
    clock: Duration,
    updates_per_second: u32,
    update_interval: Duration,
    paused: bool,
    registry: SpellRegistry,
    pool: PacketPool,
    pre_cast_hooks: Vec<CastHook>,
    post_cast_hooks: Vec<CastHook>,
}

impl Default for Encounter {
    fn default() -> Self {
        Self::new()
    }
}

impl Encounter {
    pub fn new() -> Self {
        let mut tree = CombatTree::new();
        let root = tree.root();
        EncounterRoot.configure(tree.node_mut(root));
        let player_team = tree.spawn_child(root, &PlayerTeam);
        let enemy_team = tree.spawn_child(root, &EnemyTeam);

        let mut registry = SpellRegistry::new();
        register_builtin_spells(&mut registry);

        Self {
            tree,
            player_team,
            enemy_team,
            clock: Duration::ZERO,
            updates_per_second: DEFAULT_UPDATES_PER_SECOND,
            update_interval: Self::interval_for(DEFAULT_UPDATES_PER_SECOND),
            paused: false,
            registry,
            pool: PacketPool::default(),
            pre_cast_hooks: Vec::new(),
            post_cast_hooks: Vec::new(),
        }
    }

    pub fn tree(&self) -> &CombatTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut CombatTree {
        &mut self.tree
    }

    pub fn root(&self) -> ObjectId {
        self.tree.root()
    }

    pub fn player_team(&self) -> ObjectId {
        self.player_team
    }

    pub fn enemy_team(&self) -> ObjectId {
        self.enemy_team
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn update_interval(&self) -> Duration {
        self.update_interval
    }

    pub fn updates_per_second(&self) -> u32 {
        self.updates_per_second
    }

    pub fn set_updates_per_second(&mut self, updates_per_second: u32) {
        self.updates_per_second = updates_per_second.max(1);
        self.update_interval = Self::interval_for(self.updates_per_second);
    }

    fn interval_for(updates_per_second: u32) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(updates_per_second.max(1)))
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn registry(&self) -> &SpellRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SpellRegistry {
        &mut self.registry
    }

    /// Registers a subscriber invoked before a cast's effects run.
    pub fn on_cast_start(&mut self, hook: CastHook) {
        self.pre_cast_hooks.push(hook);
    }

    /// Registers a subscriber invoked after a cast's effects ran.
    pub fn on_cast_complete(&mut self, hook: CastHook) {
        self.post_cast_hooks.push(hook);
    }

    /// Spawns a configured unit under the player team container.
    pub fn spawn_player_unit(&mut self, template: &dyn NpcTemplate) -> ObjectId {
        self.tree.spawn_child(self.player_team, template)
    }

    /// Spawns a configured unit under the enemy team container.
    pub fn spawn_enemy_unit(&mut self, template: &dyn NpcTemplate) -> ObjectId {
        self.tree.spawn_child(self.enemy_team, template)
    }

    /// Every descendant of the tree root carrying `npc_id`.
    pub fn find_by_npc_id(&self, npc_id: &str) -> Vec<ObjectId> {
        self.tree.find_by_npc_id(self.tree.root(), npc_id)
    }

    /// Advances the whole encounter by one fixed step.
    pub fn process_tick(&mut self) -> TickResult {
        let mut result = TickResult {
            clock: self.clock,
            ..TickResult::default()
        };
        if self.paused {
            return result;
        }
        let root = self.tree.root();

        // 1. Drop casts that reached a terminal status on earlier ticks.
        self.tree
            .visit_descendants_mut(root, &mut |node| node.clear_finished_spells());

        // 2. Casts scheduled since the last tick with an already-due
        //    activation become ready now.
        self.tree
            .visit_descendants_mut(root, &mut |node| node.refresh_cast_statuses());

        // 3. Snapshot the ready list before anything executes.
        let ready = self.tree.find_matching_spells(root, |cast| cast.is_ready());

        // 4. Attempt each ready cast exactly once.
        for handle in ready {
            self.attempt_cast(handle, &mut result);
        }

        // 5. Advance all clocks.
        self.clock += self.update_interval;
        let interval = self.update_interval;
        self.tree
            .visit_descendants_mut(root, &mut |node| node.increment_time_alive(interval));
        self.tree
            .visit_descendants_mut(root, &mut |node| node.increment_spell_timers(interval));

        result.clock = self.clock;
        result
    }

    /// Extension point for resource, range, and line-of-sight checks; every
    /// cast is currently accepted.
    fn cast_requirements_met(_source: ObjectId, _spell: &dyn Spell, _tree: &CombatTree) -> bool {
        true
    }

    fn attempt_cast(&mut self, handle: SpellHandle, result: &mut TickResult) {
        let (source, spell) = {
            let Some(cast) = self.tree.node(handle.owner).spell_at(handle.index) else {
                return;
            };
            if !cast.is_ready() {
                return;
            }
            (cast.source(), Arc::clone(cast.spell()))
        };

        if Self::cast_requirements_met(source, spell.as_ref(), &self.tree) {
            if let Some(cast) = self.tree.node_mut(handle.owner).spell_at_mut(handle.index) {
                cast.mark_successful();
            }
            let record = self.cast_spell(source, spell);
            result.casts.push(record);
        } else {
            if let Some(cast) = self.tree.node_mut(handle.owner).spell_at_mut(handle.index) {
                cast.mark_failed();
            }
            result.casts_failed += 1;
        }
    }

    /// Resolves and executes one cast immediately: packet from the pool,
    /// targets from the entry's strategy, effects in declared order, hooks
    /// around the effects.
    pub fn cast_spell(&mut self, source: ObjectId, spell: Arc<dyn Spell>) -> CastResolved {
        let mut packet = self.pool.request();
        packet.source = Some(source);
        packet.spell = Some(Arc::clone(&spell));
        let targets = spell.targeting().execute(source, &self.tree);
        packet.targets.extend(targets);
        packet.success = true;

        debug!(
            npc = %self.tree.node(source).npc_id,
            spell = spell.spell_id(),
            targets = packet.targets.len(),
            "cast resolved"
        );

        for hook in &mut self.pre_cast_hooks {
            hook(&packet, &self.tree);
        }
        {
            let mut ctx = EffectContext {
                tree: &mut self.tree,
                registry: &self.registry,
            };
            for effect in spell.effects() {
                effect.execute(&packet, &mut ctx);
            }
        }
        for hook in &mut self.post_cast_hooks {
            hook(&packet, &self.tree);
        }

        let record = CastResolved {
            source_npc: self.tree.node(source).npc_id.clone(),
            spell_id: spell.spell_id().to_string(),
            targets: packet
                .targets
                .iter()
                .map(|&target| self.tree.node(target).npc_id.clone())
                .collect(),
            success: packet.success,
        };
        self.pool.release(packet);
        record
    }

    /// Looks up `spell_id` in the registry and casts the fresh instance from
    /// `source` immediately.
    pub fn cast_spell_by_id(&mut self, source: ObjectId, spell_id: &str) -> CastResolved {
        let spell = self.registry.create_instance(spell_id);
        self.cast_spell(source, spell)
    }
}
