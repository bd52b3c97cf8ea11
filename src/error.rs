//! Construction-time errors
//!
//! Ticking never fails. Everything that could leave the simulation in a
//! divide-by-zero or never-ending state is rejected here, before a
//! `GameState` exists.

/// Errors raised while building a world or loading tuning data
#[derive(thiserror::Error, Debug)]
pub enum SimError {
    /// World rectangle too small to hold a single grid cell
    #[error("invalid world size {width}x{height}")]
    InvalidWorld { width: f32, height: f32 },

    #[error("difficulty table has no segments")]
    EmptyDifficultyTable,

    /// Thresholds must be strictly increasing
    #[error("difficulty thresholds not strictly increasing at level {0}")]
    UnsortedDifficultyTable(u32),

    #[error("negative speed increment at level {0}")]
    NegativeIncrement(u32),

    #[error("base speed multiplier must be positive, got {0}")]
    InvalidBaseMultiplier(f32),

    #[error("no lanes configured")]
    NoLanes,

    /// Lane row outside the road area between goal and start zones
    #[error("lane row {0} is outside the road area")]
    LaneOutOfBounds(u32),

    #[error("lane row {0} overlaps the start zone")]
    LaneBlocksStart(u32),

    #[error("lane row {0} has zero speed")]
    ZeroLaneSpeed(u32),

    /// A tick count or size that must be non-zero was zero
    #[error("invalid tuning value: {0}")]
    InvalidTiming(&'static str),

    #[error("tuning parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
