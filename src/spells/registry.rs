//! Id-keyed spell factory table.

use std::any::type_name;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::spells::types::{EmptySpell, Spell};

type SpellFactory = Box<dyn Fn() -> Arc<dyn Spell> + Send + Sync>;

struct Registration {
    factory: SpellFactory,
    type_name: &'static str,
}

/// String-keyed factory table minting fresh catalog-entry instances.
///
/// Needed whenever a cast must be cloned per target rather than shared.
/// Lookups never fail: unknown ids produce [`EmptySpell`].
#[derive(Default)]
pub struct SpellRegistry {
    entries: HashMap<String, Registration>,
}

impl SpellRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `S` under its own spell id.
    ///
    /// A later registration for the same id replaces the earlier one. Both
    /// collision kinds are reported as warnings, never errors: replacing a
    /// different implementation is the suspicious case, re-registering the
    /// identical one is merely redundant.
    pub fn register<S>(&mut self)
    where
        S: Spell + Default + 'static,
    {
        let id = S::default().spell_id().to_string();
        let name = type_name::<S>();
        if let Some(existing) = self.entries.get(&id) {
            if existing.type_name == name {
                warn!(spell = %id, "duplicate spell registration");
            } else {
                warn!(
                    spell = %id,
                    old = existing.type_name,
                    new = name,
                    "spell registration overwritten by a different implementation"
                );
            }
        }
        self.entries.insert(
            id,
            Registration {
                factory: Box::new(|| Arc::new(S::default()) as Arc<dyn Spell>),
                type_name: name,
            },
        );
    }

    /// A fresh instance of the entry registered under `id`, or the empty
    /// spell when the id is unknown.
    pub fn create_instance(&self, id: &str) -> Arc<dyn Spell> {
        match self.entries.get(id) {
            Some(entry) => (entry.factory)(),
            None => {
                debug!(spell = %id, "unknown spell id, substituting the empty spell");
                Arc::new(EmptySpell)
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spells::effects::SpellEffect;
    use crate::spells::targeting::{EmptyTargeting, TargetSelf, TargetingStrategy};
    use crate::spells::types::EMPTY_SPELL_ID;

    #[derive(Default)]
    struct Jolt;

    impl Spell for Jolt {
        fn spell_id(&self) -> &str {
            "spell_jolt"
        }

        fn targeting(&self) -> Box<dyn TargetingStrategy> {
            Box::new(EmptyTargeting)
        }

        fn effects(&self) -> Vec<Box<dyn SpellEffect>> {
            Vec::new()
        }
    }

    // Same id as Jolt, different implementation.
    #[derive(Default)]
    struct JoltRework;

    impl Spell for JoltRework {
        fn spell_id(&self) -> &str {
            "spell_jolt"
        }

        fn targeting(&self) -> Box<dyn TargetingStrategy> {
            Box::new(TargetSelf)
        }

        fn effects(&self) -> Vec<Box<dyn SpellEffect>> {
            Vec::new()
        }
    }

    #[test]
    fn test_create_instance_mints_fresh_instances() {
        let mut registry = SpellRegistry::new();
        registry.register::<Jolt>();

        let first = registry.create_instance("spell_jolt");
        let second = registry.create_instance("spell_jolt");
        assert_eq!(first.spell_id(), "spell_jolt");
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_unknown_id_yields_empty_spell() {
        let registry = SpellRegistry::new();
        let spell = registry.create_instance("spell_missing");
        assert_eq!(spell.spell_id(), EMPTY_SPELL_ID);
    }

    #[test]
    fn test_reregistration_overwrites() {
        let mut registry = SpellRegistry::new();
        registry.register::<Jolt>();
        registry.register::<JoltRework>();

        assert_eq!(registry.len(), 1);
        // The replacement's targeting resolves the source, proving the new
        // factory won.
        let spell = registry.create_instance("spell_jolt");
        let tree = crate::combat::object::CombatTree::new();
        let targets = spell.targeting().execute(tree.root(), &tree);
        assert_eq!(targets, vec![tree.root()]);
    }

    #[test]
    fn test_duplicate_registration_is_harmless() {
        let mut registry = SpellRegistry::new();
        registry.register::<Jolt>();
        registry.register::<Jolt>();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("spell_jolt"));
    }
}
