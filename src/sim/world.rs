//! World geometry derived from the window size
//!
//! The world is always `COLS x ROWS` cells. Only the cell size changes when
//! the host window is resized, so lanes and the goal line keep their place
//! relative to the grid.

use glam::Vec2;
use serde::Serialize;

use crate::consts::*;
use crate::error::SimError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorldConfig {
    /// Cell size in pixels
    pub grid: f32,
    /// Playfield width (`grid * COLS`)
    pub width: f32,
    /// Playfield height (`grid * ROWS`)
    pub height: f32,
}

impl WorldConfig {
    /// Derive the grid from a window size. Fails if not even one pixel per cell fits.
    pub fn new(width: f32, height: f32) -> Result<Self, SimError> {
        if !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite() {
            return Err(SimError::InvalidWorld { width, height });
        }
        let grid = (width / COLS as f32).min(height / ROWS as f32).floor();
        if grid < 1.0 {
            return Err(SimError::InvalidWorld { width, height });
        }
        Ok(Self {
            grid,
            width: grid * COLS as f32,
            height: grid * ROWS as f32,
        })
    }

    /// Ratio between this grid and the one tuning numbers are written for
    #[inline]
    pub fn scale(&self) -> f32 {
        self.grid / REFERENCE_GRID
    }

    /// Pixel y of a grid row
    #[inline]
    pub fn row_y(&self, row: u32) -> f32 {
        row as f32 * self.grid
    }

    /// Player (re)spawn position
    pub fn start_pos(&self) -> Vec2 {
        Vec2::new((COLS / 2) as f32 * self.grid, self.row_y(START_ROW))
    }

    /// Anything above this y is in the goal zone
    #[inline]
    pub fn goal_line(&self) -> f32 {
        self.row_y(GOAL_ROWS)
    }

    /// Clamp a top-left position so a `size` box stays inside the world
    pub fn clamp(&self, pos: Vec2, size: f32) -> Vec2 {
        Vec2::new(
            pos.x.clamp(0.0, self.width - size),
            pos.y.clamp(0.0, self.height - size),
        )
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        let grid = REFERENCE_GRID;
        Self {
            grid,
            width: grid * COLS as f32,
            height: grid * ROWS as f32,
        }
    }
}
