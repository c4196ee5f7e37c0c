//! Encounter orchestration: tick loop, combat packets, constants.

pub mod constants;
pub mod encounter;
pub mod packet;

pub use constants::*;
pub use encounter::*;
pub use packet::*;
