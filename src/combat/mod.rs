//! Combat participants: the encounter tree and scheduled casts.

pub mod object;
pub mod scheduled;

pub use object::*;
pub use scheduled::*;
