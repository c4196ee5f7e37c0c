use std::time::Duration;

// Tick timing
pub const DEFAULT_UPDATES_PER_SECOND: u32 = 2;

// Packet pool
pub const DEFAULT_PACKET_POOL_SIZE: usize = 100;

// Combat objects
pub const DEFAULT_NPC_ID: &str = "default_npc_id";
pub const DEFAULT_POSITION_X: f32 = 9999.0;
pub const DEFAULT_POSITION_Y: f32 = 9999.0;

// Game shell
pub const DEFAULT_LEVEL_TIME_LIMIT: Duration = Duration::from_secs(10);
