//! Target resolution strategies.

use crate::combat::object::{CombatTree, ObjectId};

/// Resolves the target set for a cast from the source and the whole tree.
///
/// Strategies are pure functions of the current tree state: no mutation,
/// and the returned order is the tree's pre-order.
pub trait TargetingStrategy: Send + Sync {
    fn execute(&self, source: ObjectId, tree: &CombatTree) -> Vec<ObjectId>;
}

/// Default for unconfigured casts: resolves nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyTargeting;

impl TargetingStrategy for EmptyTargeting {
    fn execute(&self, _source: ObjectId, _tree: &CombatTree) -> Vec<ObjectId> {
        Vec::new()
    }
}

/// The caster itself, and nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetSelf;

impl TargetingStrategy for TargetSelf {
    fn execute(&self, source: ObjectId, tree: &CombatTree) -> Vec<ObjectId> {
        let _ = tree;
        vec![source]
    }
}

/// Every targetable unit whose team flag differs from the source's,
/// regardless of which side the source is on.
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetAllEnemies;

impl TargetingStrategy for TargetAllEnemies {
    fn execute(&self, source: ObjectId, tree: &CombatTree) -> Vec<ObjectId> {
        let condition = tree.node(source).member_of_enemy_team();
        tree.find_matches(tree.root(), condition)
    }
}

/// Every targetable unit sharing the source's team flag, the source
/// included.
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetAllAllies;

impl TargetingStrategy for TargetAllAllies {
    fn execute(&self, source: ObjectId, tree: &CombatTree) -> Vec<ObjectId> {
        let condition = tree.node(source).member_of_allied_team();
        tree.find_matches(tree.root(), condition)
    }
}
