//! Motorway - a dodge-the-traffic arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (traffic, collisions, player, progression)
//! - `tuning`: Data-driven game balance
//! - `clock`: Fixed-step scheduling for hosts
//! - `audio`: Routing of simulation cues to a sound backend
//! - `settings`: Audio preferences

pub mod audio;
pub mod clock;
pub mod error;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::SimError;
pub use settings::AudioSettings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Nominal tick interval (20 Hz)
    pub const TICK_MS: u64 = 50;
    /// Maximum ticks a host should run per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default window size in pixels
    pub const DEFAULT_WIDTH: f32 = 800.0;
    pub const DEFAULT_HEIGHT: f32 = 600.0;

    /// World size in grid cells (fixed, the pixel size is derived)
    pub const COLS: u32 = 20;
    pub const ROWS: u32 = 15;
    /// Rows at the top that count as the goal zone
    pub const GOAL_ROWS: u32 = 3;
    /// Row the player (re)spawns on, inside the start zone
    pub const START_ROW: u32 = ROWS - 2;

    /// Grid cell size the pixel-valued tuning numbers are written against
    pub const REFERENCE_GRID: f32 = 40.0;

    pub const MAX_LIVES: u8 = 4;

    /// Proximity window for honks, in cells ahead of the player
    pub const HONK_RANGE_CELLS: f32 = 4.0;

    /// Spawn jitter range (pixels at the reference grid)
    pub const SPAWN_JITTER_MIN: u32 = 50;
    pub const SPAWN_JITTER_MAX: u32 = 200;
}
