//! Skirmish: a real-time combat encounter engine.
//!
//! The engine simulates one encounter as a tree of combat participants, each
//! able to schedule timed spell casts. A fixed-timestep tick loop finds casts
//! that are due, resolves their targets through a pluggable targeting
//! strategy, and applies an ordered chain of effects through a pooled combat
//! packet. The `game` module is the thin console shell that drives levels on
//! top of the engine; everything else is the engine itself.

pub mod build_info;
pub mod combat;
pub mod core;
pub mod game;
pub mod npc;
pub mod spells;
