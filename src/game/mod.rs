//! The console game shell: levels, the session loop, and the combat log.
//!
//! Everything here drives the encounter engine from the outside; the engine
//! itself never depends on this module.

pub mod level;
pub mod log;
pub mod session;

pub use level::*;
pub use log::*;
pub use session::*;
