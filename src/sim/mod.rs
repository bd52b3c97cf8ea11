//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by vehicle ID)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod effect;
pub mod geometry;
pub mod player;
pub mod progression;
pub mod state;
pub mod tick;
pub mod traffic;
pub mod world;

pub use collision::{collides, is_near};
pub use effect::ImpactMark;
pub use geometry::Rect;
pub use player::{ANIM_RULES, AnimState, Direction, Player, Sprite};
pub use progression::{Checkpoint, ProgressSnapshot, Progression};
pub use state::{DEATH_MESSAGES, FrameSnapshot, GameEvent, GameState};
pub use tick::{Command, tick};
pub use traffic::{Traffic, Vehicle, VehicleColor};
pub use world::WorldConfig;
