//! The combat participant tree.
//!
//! Every participant of an encounter (team containers, units, units spawned
//! mid-fight) is a node in a single tree. Nodes live in an arena owned by
//! [`CombatTree`] and are addressed by copyable [`ObjectId`] handles. The
//! arena only grows: elimination is a resource state (HP at or below zero),
//! never a removal, so ids stay valid for the whole encounter.

use std::sync::Arc;
use std::time::Duration;

use crate::combat::scheduled::ScheduledSpell;
use crate::core::constants::{DEFAULT_NPC_ID, DEFAULT_POSITION_X, DEFAULT_POSITION_Y};
use crate::npc::NpcTemplate;
use crate::spells::types::Spell;

/// Index of a node in a [`CombatTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub(crate) usize);

impl ObjectId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Stable address of one scheduled cast: the owning node plus the cast's
/// position in that node's pending list. Handles stay valid until the next
/// prune; appending casts never shifts existing indices.
#[derive(Debug, Clone, Copy)]
pub struct SpellHandle {
    pub owner: ObjectId,
    pub index: usize,
}

/// Positional data for a unit or an area-based attack.
#[derive(Debug, Clone)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    /// Units can't see or interact cross-realm.
    pub realm: i32,
    pub affected_by_aoe: bool,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            x: DEFAULT_POSITION_X,
            y: DEFAULT_POSITION_Y,
            realm: 0,
            affected_by_aoe: true,
        }
    }
}

impl Position {
    pub fn update(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }
}

/// Hit point pool of one participant.
///
/// Current HP is unclamped: overkill drives it negative and
/// overhealing drives it past the maximum. Targeting eligibility is a flag
/// on the node, never derived from HP.
#[derive(Debug, Clone, Default)]
pub struct Resources {
    max_hp: f32,
    current_hp: f32,
}

impl Resources {
    pub fn max_hp(&self) -> f32 {
        self.max_hp
    }

    pub fn current_hp(&self) -> f32 {
        self.current_hp
    }

    /// Grants `hp` additional maximum HP and fills the same amount.
    pub fn set_max_hp(&mut self, hp: f32) {
        self.raise_max_hp(hp);
        self.increase_current_hp(hp);
    }

    pub fn raise_max_hp(&mut self, amount: f32) {
        self.max_hp += amount;
    }

    pub fn lower_max_hp(&mut self, amount: f32) {
        self.max_hp -= amount;
    }

    pub fn increase_current_hp(&mut self, healing: f32) {
        self.current_hp += healing;
    }

    pub fn reduce_current_hp(&mut self, damage: f32) {
        self.current_hp -= damage;
    }
}

/// A unit that is part of combat and addressable by spells.
pub struct CombatObject {
    id: ObjectId,
    pub npc_id: String,
    parent: Option<ObjectId>,
    children: Vec<ObjectId>,
    pub position: Position,
    pub resources: Resources,
    player_team: bool,
    targetable: bool,
    time_alive: Duration,
    scheduled_spells: Vec<ScheduledSpell>,
}

impl CombatObject {
    fn new(id: ObjectId, parent: Option<ObjectId>, player_team: bool) -> Self {
        Self {
            id,
            npc_id: DEFAULT_NPC_ID.to_string(),
            parent,
            children: Vec::new(),
            position: Position::default(),
            resources: Resources::default(),
            player_team,
            targetable: false,
            time_alive: Duration::ZERO,
            scheduled_spells: Vec::new(),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.npc_id == name
    }

    pub fn is_on_player_team(&self) -> bool {
        self.player_team
    }

    pub fn is_targetable(&self) -> bool {
        self.targetable
    }

    /// Spawn-time configuration. Both flags are fixed once the configurator
    /// has run; nothing in the engine flips them afterwards.
    pub fn set_player_team(&mut self, player_team: bool) {
        self.player_team = player_team;
    }

    pub fn set_targetable(&mut self, targetable: bool) {
        self.targetable = targetable;
    }

    pub fn time_alive(&self) -> Duration {
        self.time_alive
    }

    pub fn scheduled_spells(&self) -> &[ScheduledSpell] {
        &self.scheduled_spells
    }

    pub fn spell_at(&self, index: usize) -> Option<&ScheduledSpell> {
        self.scheduled_spells.get(index)
    }

    pub fn spell_at_mut(&mut self, index: usize) -> Option<&mut ScheduledSpell> {
        self.scheduled_spells.get_mut(index)
    }

    /// Wraps `spell` in a new [`ScheduledSpell`] owned by this node and
    /// appends it to the pending list.
    pub fn schedule_spell(&mut self, spell: Arc<dyn Spell>) -> &mut ScheduledSpell {
        let index = self.scheduled_spells.len();
        self.scheduled_spells.push(ScheduledSpell::new(self.id, spell));
        &mut self.scheduled_spells[index]
    }

    pub fn increment_time_alive(&mut self, delta: Duration) {
        self.time_alive += delta;
    }

    /// Advances every pending cast's timer and re-evaluates its readiness.
    pub fn increment_spell_timers(&mut self, delta: Duration) {
        for scheduled in &mut self.scheduled_spells {
            scheduled.increment_timer(delta);
            scheduled.update_cast_status();
        }
    }

    /// Re-evaluates readiness without advancing timers. Picks up casts that
    /// were scheduled since the last tick with an already-due activation.
    pub fn refresh_cast_statuses(&mut self) {
        for scheduled in &mut self.scheduled_spells {
            scheduled.update_cast_status();
        }
    }

    /// Drops every cast whose status is terminal.
    pub fn clear_finished_spells(&mut self) {
        self.scheduled_spells.retain(|scheduled| !scheduled.is_finished());
    }

    /// Predicate matching targetable members of the opposite team.
    pub fn member_of_enemy_team(&self) -> impl Fn(&CombatObject) -> bool {
        let team = self.player_team;
        move |other| other.player_team != team && other.targetable
    }

    /// Predicate matching targetable members of this node's own team.
    pub fn member_of_allied_team(&self) -> impl Fn(&CombatObject) -> bool {
        let team = self.player_team;
        move |other| other.player_team == team && other.targetable
    }
}

/// Arena of all participants in one encounter.
///
/// A fresh tree contains a single unconfigured root. The root has no parent
/// (`is_root()`), its team flag (false) is the inheritance baseline for
/// spawned subtrees, and it is never targetable.
pub struct CombatTree {
    nodes: Vec<CombatObject>,
}

impl Default for CombatTree {
    fn default() -> Self {
        Self::new()
    }
}

impl CombatTree {
    pub fn new() -> Self {
        let root = CombatObject::new(ObjectId(0), None, false);
        Self { nodes: vec![root] }
    }

    pub fn root(&self) -> ObjectId {
        ObjectId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: ObjectId) -> &CombatObject {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: ObjectId) -> &mut CombatObject {
        &mut self.nodes[id.0]
    }

    /// Creates a new child of `parent`, inheriting the parent's team flag as
    /// a baseline, then hands the node to `template` for configuration.
    pub fn spawn_child(&mut self, parent: ObjectId, template: &dyn NpcTemplate) -> ObjectId {
        let id = ObjectId(self.nodes.len());
        let inherited_team = self.nodes[parent.0].player_team;
        self.nodes[parent.0].children.push(id);
        self.nodes.push(CombatObject::new(id, Some(parent), inherited_team));
        template.configure(&mut self.nodes[id.0]);
        id
    }

    /// Applies `action` to the node at `id`, then to every descendant in
    /// pre-order (children in insertion order).
    pub fn visit_descendants(&self, id: ObjectId, action: &mut impl FnMut(&CombatObject)) {
        action(&self.nodes[id.0]);
        for index in 0..self.nodes[id.0].children.len() {
            let child = self.nodes[id.0].children[index];
            self.visit_descendants(child, action);
        }
    }

    /// Mutable pre-order visit. Each node's child list is snapshotted before
    /// descending, so growing the tree from inside `action` never affects
    /// the current pass; new nodes are visited from the next pass onwards.
    pub fn visit_descendants_mut(&mut self, id: ObjectId, action: &mut impl FnMut(&mut CombatObject)) {
        action(&mut self.nodes[id.0]);
        let children = self.nodes[id.0].children.clone();
        for child in children {
            self.visit_descendants_mut(child, action);
        }
    }

    /// Collects, in pre-order, every node at or below `id` satisfying
    /// `predicate`.
    pub fn find_matches(
        &self,
        id: ObjectId,
        predicate: impl Fn(&CombatObject) -> bool,
    ) -> Vec<ObjectId> {
        let mut matches = Vec::new();
        self.visit_descendants(id, &mut |node| {
            if predicate(node) {
                matches.push(node.id);
            }
        });
        matches
    }

    /// Collects handles to every scheduled cast at or below `id` satisfying
    /// `predicate`, in pre-order of the owning nodes.
    pub fn find_matching_spells(
        &self,
        id: ObjectId,
        predicate: impl Fn(&ScheduledSpell) -> bool,
    ) -> Vec<SpellHandle> {
        let mut matches = Vec::new();
        self.visit_descendants(id, &mut |node| {
            for (index, scheduled) in node.scheduled_spells.iter().enumerate() {
                if predicate(scheduled) {
                    matches.push(SpellHandle {
                        owner: node.id,
                        index,
                    });
                }
            }
        });
        matches
    }

    /// Every node at or below `start` whose npc id equals `npc_id`.
    pub fn find_by_npc_id(&self, start: ObjectId, npc_id: &str) -> Vec<ObjectId> {
        self.find_matches(start, |node| node.has_name(npc_id))
    }
}
