//! Data-driven game balance
//!
//! Every gameplay number that is not a layout constant lives in `Tuning`.
//! Values are loaded from JSON (missing fields fall back to defaults) and
//! validated once, before any simulation state is built.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{GOAL_ROWS, ROWS, START_ROW};
use crate::error::SimError;

/// One lane of traffic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneSpec {
    /// Grid row the lane occupies
    pub row: u32,
    /// Base speed in pixels per tick at the reference grid; sign is direction
    pub speed: f32,
    /// Vehicles in the lane
    pub count: u32,
    /// Vehicle length in cells
    pub length_cells: f32,
}

impl LaneSpec {
    pub fn new(row: u32, speed: f32, count: u32, length_cells: f32) -> Self {
        Self {
            row,
            speed,
            count,
            length_cells,
        }
    }
}

/// A difficulty segment: from `threshold` on, each level adds `increment`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultySegment {
    pub threshold: u32,
    pub increment: f32,
}

/// Piecewise-linear speed multiplier over levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTable {
    pub base: f32,
    /// Sorted by threshold; the last segment is open-ended
    pub segments: Vec<DifficultySegment>,
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self {
            base: 1.0,
            segments: vec![
                DifficultySegment { threshold: 1, increment: 0.05 },
                DifficultySegment { threshold: 10, increment: 0.03 },
                DifficultySegment { threshold: 25, increment: 0.015 },
            ],
        }
    }
}

impl DifficultyTable {
    /// Multiplier for an (already clamped) level.
    ///
    /// Each segment contributes `increment` for every level spent past its
    /// threshold and before the next one, so the curve has no jumps.
    pub fn multiplier_at(&self, level: u32) -> f32 {
        let mut multiplier = self.base;
        for (i, seg) in self.segments.iter().enumerate() {
            if level <= seg.threshold {
                break;
            }
            let end = self
                .segments
                .get(i + 1)
                .map_or(level, |next| next.threshold.min(level));
            multiplier += seg.increment * (end - seg.threshold) as f32;
        }
        multiplier
    }

    fn validate(&self) -> Result<(), SimError> {
        if self.segments.is_empty() {
            return Err(SimError::EmptyDifficultyTable);
        }
        if !(self.base > 0.0) {
            return Err(SimError::InvalidBaseMultiplier(self.base));
        }
        for pair in self.segments.windows(2) {
            if pair[1].threshold <= pair[0].threshold {
                return Err(SimError::UnsortedDifficultyTable(pair[1].threshold));
            }
        }
        if let Some(seg) = self.segments.iter().find(|s| !(s.increment >= 0.0)) {
            return Err(SimError::NegativeIncrement(seg.threshold));
        }
        Ok(())
    }
}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub lanes: Vec<LaneSpec>,
    pub difficulty: DifficultyTable,
    /// Minimum gap between same-direction vehicles, in cells
    pub min_gap_cells: f32,
    /// Score per level completed, multiplied by the level
    pub level_bonus: u64,
    /// Checkpoint is taken when completing a multiple of this level
    pub checkpoint_interval: u32,
    pub max_level: u32,

    // === Timings (ticks) ===
    pub honk_cooldown_ticks: u32,
    pub honk_reaction_ticks: u64,
    /// Inactivity before the idle slideshow starts
    pub idle_ticks: u64,
    /// Walk animation window after a move
    pub walk_ticks: u64,
    /// Animation frame step
    pub frame_ticks: u64,
    pub respawn_ticks: u64,
    pub impact_max_age: u32,
    pub banner_ticks: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            lanes: vec![
                LaneSpec::new(4, -5.0, 3, 2.0),
                LaneSpec::new(6, 6.0, 3, 2.0),
                LaneSpec::new(8, -8.0, 2, 3.0),
                LaneSpec::new(10, 4.0, 4, 2.0),
            ],
            difficulty: DifficultyTable::default(),
            min_gap_cells: 2.0,
            level_bonus: 100,
            checkpoint_interval: 10,
            max_level: 50,

            honk_cooldown_ticks: 40,
            honk_reaction_ticks: 10,
            idle_ticks: 100,
            walk_ticks: 6,
            frame_ticks: 3,
            respawn_ticks: 30,
            impact_max_age: 40,
            banner_ticks: 40,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read, parse and validate a tuning file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject anything that would make ticking ill-defined
    pub fn validate(&self) -> Result<(), SimError> {
        self.difficulty.validate()?;

        if self.lanes.is_empty() {
            return Err(SimError::NoLanes);
        }
        for lane in &self.lanes {
            if lane.row < GOAL_ROWS || lane.row >= ROWS {
                return Err(SimError::LaneOutOfBounds(lane.row));
            }
            if lane.row >= START_ROW {
                return Err(SimError::LaneBlocksStart(lane.row));
            }
            if lane.speed == 0.0 || !lane.speed.is_finite() {
                return Err(SimError::ZeroLaneSpeed(lane.row));
            }
            if !(lane.length_cells > 0.0) {
                return Err(SimError::InvalidTiming("lane length_cells"));
            }
        }

        if !(self.min_gap_cells >= 0.0) {
            return Err(SimError::InvalidTiming("min_gap_cells"));
        }
        if self.max_level == 0 {
            return Err(SimError::InvalidTiming("max_level"));
        }
        if self.checkpoint_interval == 0 {
            return Err(SimError::InvalidTiming("checkpoint_interval"));
        }
        if self.frame_ticks == 0 {
            return Err(SimError::InvalidTiming("frame_ticks"));
        }
        if self.impact_max_age == 0 {
            return Err(SimError::InvalidTiming("impact_max_age"));
        }
        Ok(())
    }

    /// Traffic speed multiplier for a level, clamped to `[1, max_level]`
    pub fn speed_multiplier(&self, level: u32) -> f32 {
        self.difficulty.multiplier_at(level.clamp(1, self.max_level))
    }
}
