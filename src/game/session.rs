//! The session loop: plays catalog levels in order until one is lost.

use std::fmt::Write as _;

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::core::encounter::Encounter;
use crate::game::level::{Level, LevelCatalog, LevelResult};
use crate::game::log::{CombatLog, CombatLogEntry};

/// Everything that happened in one level.
#[derive(Debug, Clone, Serialize)]
pub struct LevelOutcome {
    pub name: String,
    pub result: LevelResult,
    pub ticks: u32,
    pub casts_resolved: usize,
    pub log: Vec<CombatLogEntry>,
}

/// Full record of one session run.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub started_at: String,
    pub score: u32,
    pub levels: Vec<LevelOutcome>,
}

impl SessionReport {
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for outcome in &self.levels {
            let _ = writeln!(
                text,
                "=== {}: {:?} ({} ticks, {} casts)",
                outcome.name, outcome.result, outcome.ticks, outcome.casts_resolved
            );
            for entry in &outcome.log {
                let hits: Vec<String> = entry
                    .hits
                    .iter()
                    .map(|hit| format!("{} ({:.0} HP)", hit.npc, hit.hp_after))
                    .collect();
                let _ = writeln!(
                    text,
                    "  [{:>5.1}s] {} casts {}{}",
                    entry.timestamp.as_secs_f32(),
                    entry.source,
                    entry.spell,
                    if hits.is_empty() {
                        String::new()
                    } else {
                        format!(" -> {}", hits.join(", "))
                    }
                );
            }
        }
        let _ = writeln!(text, "Final score: {}", self.score);
        text
    }
}

/// Plays levels from a catalog in order. A win advances to the next level;
/// the first loss ends the run.
pub struct GameSession {
    catalog: LevelCatalog,
    current_level: usize,
    score: u32,
}

impl GameSession {
    pub fn new(catalog: LevelCatalog) -> Self {
        Self {
            catalog,
            current_level: 0,
            score: 0,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn play(&mut self) -> SessionReport {
        let mut report = SessionReport {
            started_at: Utc::now().to_rfc3339(),
            score: 0,
            levels: Vec::new(),
        };

        while let Some(level) = self.catalog.get(self.current_level) {
            let outcome = Self::play_level(level);
            let result = outcome.result;
            report.levels.push(outcome);
            match result {
                LevelResult::Won => {
                    self.score += 1;
                    self.current_level += 1;
                }
                _ => break,
            }
        }

        report.score = self.score;
        report
    }

    /// Builds an encounter from the level's spawn table and ticks it until a
    /// side is wiped or the time limit expires.
    pub fn play_level(level: &Level) -> LevelOutcome {
        let mut encounter = Encounter::new();
        for template in &level.player_units {
            encounter.spawn_player_unit(template.as_ref());
        }
        for template in &level.enemy_units {
            encounter.spawn_enemy_unit(template.as_ref());
        }
        let log = CombatLog::attach(&mut encounter);

        let mut ticks = 0u32;
        let mut casts_resolved = 0usize;
        let result = loop {
            match Self::evaluate(&encounter) {
                LevelResult::Undecided => {}
                decided => break decided,
            }
            if encounter.clock() >= level.time_limit {
                break LevelResult::Lost;
            }
            let tick = encounter.process_tick();
            casts_resolved += tick.casts.len();
            ticks += 1;
        };

        info!(level = %level.name, ?result, ticks, casts_resolved, "level finished");
        let log_entries = log.borrow().entries().to_vec();
        LevelOutcome {
            name: level.name.clone(),
            result,
            ticks,
            casts_resolved,
            log: log_entries,
        }
    }

    /// Decides the level from the tree: the player side loses when none of
    /// its fielded units has HP left, the enemy side loses when none of its
    /// units is standing. Defeated units stay in the tree; only their HP
    /// says they are out.
    fn evaluate(encounter: &Encounter) -> LevelResult {
        let tree = encounter.tree();
        let standing = |node: &crate::combat::object::CombatObject| {
            node.is_targetable() && node.resources.current_hp() > 0.0
        };

        let players_fielded = !tree
            .find_matches(encounter.player_team(), |node| node.is_targetable())
            .is_empty();
        let players_standing = !tree
            .find_matches(encounter.player_team(), &standing)
            .is_empty();
        let enemies_standing = !tree
            .find_matches(encounter.enemy_team(), &standing)
            .is_empty();

        if players_fielded && !players_standing {
            LevelResult::Lost
        } else if !enemies_standing {
            LevelResult::Won
        } else {
            LevelResult::Undecided
        }
    }
}
