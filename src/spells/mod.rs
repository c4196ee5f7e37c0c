//! Spell definitions: catalog entries, targeting, effects, and the registry.

pub mod effects;
pub mod library;
pub mod registry;
pub mod targeting;
pub mod types;

pub use effects::*;
pub use library::*;
pub use registry::*;
pub use targeting::*;
pub use types::*;
