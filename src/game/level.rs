//! Level definitions for the game shell.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use serde::Serialize;

use crate::core::constants::DEFAULT_LEVEL_TIME_LIMIT;
use crate::npc::{Acolyte, Broodmother, Colossus, NpcTemplate, TrainingDummy, Vanguard};

/// Outcome of playing one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LevelResult {
    Won,
    Lost,
    Undecided,
    Quit,
}

/// Spawn table for one level: which units enter on each side, and how long
/// the fight may run before it counts as lost.
pub struct Level {
    pub name: String,
    pub player_units: Vec<Arc<dyn NpcTemplate>>,
    pub enemy_units: Vec<Arc<dyn NpcTemplate>>,
    pub time_limit: Duration,
}

impl Level {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            player_units: Vec::new(),
            enemy_units: Vec::new(),
            time_limit: DEFAULT_LEVEL_TIME_LIMIT,
        }
    }

    pub fn with_player_unit(mut self, template: Arc<dyn NpcTemplate>) -> Self {
        self.player_units.push(template);
        self
    }

    pub fn with_enemy_unit(mut self, template: Arc<dyn NpcTemplate>) -> Self {
        self.enemy_units.push(template);
        self
    }
}

/// Ordered catalog of levels the session walks through.
pub struct LevelCatalog {
    levels: Vec<Level>,
}

impl LevelCatalog {
    pub fn from_levels(levels: Vec<Level>) -> Self {
        Self { levels }
    }

    /// The shipped campaign. Unit stats are rolled once per catalog, so two
    /// catalogs built from the same seed fight identical battles.
    pub fn standard(rng: &mut impl Rng) -> Self {
        Self::from_levels(vec![
            Level::new("Training Grounds")
                .with_player_unit(Arc::new(Vanguard::new(rng)))
                .with_enemy_unit(Arc::new(TrainingDummy::new(rng))),
            Level::new("Brood Nest")
                .with_player_unit(Arc::new(Vanguard::new(rng)))
                .with_enemy_unit(Arc::new(Broodmother::new(rng))),
            Level::new("Ritual Chamber")
                .with_player_unit(Arc::new(Vanguard::new(rng)))
                .with_enemy_unit(Arc::new(Acolyte::new(rng)))
                .with_enemy_unit(Arc::new(Acolyte::new(rng))),
            // Designed to be unbeatable within the time limit.
            Level::new("The Colossus")
                .with_player_unit(Arc::new(Vanguard::new(rng)))
                .with_enemy_unit(Arc::new(Colossus)),
        ])
    }

    pub fn get(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_standard_catalog_shape() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let catalog = LevelCatalog::standard(&mut rng);

        assert_eq!(catalog.len(), 4);
        let first = catalog.get(0).unwrap();
        assert_eq!(first.name, "Training Grounds");
        assert_eq!(first.player_units.len(), 1);
        assert_eq!(first.enemy_units.len(), 1);
        assert_eq!(first.time_limit, DEFAULT_LEVEL_TIME_LIMIT);
        assert!(catalog.get(4).is_none());
    }
}
