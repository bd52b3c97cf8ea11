//! Player state machine
//!
//! The pedestrian moves one grid cell per accepted request. Its animation
//! is not a single state but the first matching entry of `ANIM_RULES`,
//! re-evaluated every tick.

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use super::geometry::Rect;
use super::world::WorldConfig;
use crate::tuning::Tuning;

/// Facing / last movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    /// Toward the camera (down)
    Front,
    /// Away from the camera (up, toward the goal)
    Back,
    Left,
    Right,
}

impl Direction {
    #[inline]
    fn index(self) -> usize {
        match self {
            Direction::Front => 0,
            Direction::Back => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    /// Frame sequence used while walking in this direction
    pub fn walk_frames(self) -> &'static [Sprite] {
        match self {
            Direction::Back => &BACK_FRAMES,
            Direction::Front => &FRONT_FRAMES,
            Direction::Left => &LEFT_FRAMES,
            Direction::Right => &RIGHT_FRAMES,
        }
    }
}

/// Sprite key; the renderer owns the mapping to actual images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sprite {
    Idle,
    Back1,
    Back2,
    Front1,
    Front2,
    Front3,
    LookLeft,
    LookRight,
    Startled,
    Dead,
}

impl Sprite {
    pub const ALL: [Sprite; 10] = [
        Sprite::Idle,
        Sprite::Back1,
        Sprite::Back2,
        Sprite::Front1,
        Sprite::Front2,
        Sprite::Front3,
        Sprite::LookLeft,
        Sprite::LookRight,
        Sprite::Startled,
        Sprite::Dead,
    ];

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

const BACK_FRAMES: [Sprite; 2] = [Sprite::Back1, Sprite::Back2];
const FRONT_FRAMES: [Sprite; 3] = [Sprite::Front1, Sprite::Front2, Sprite::Front3];
const LEFT_FRAMES: [Sprite; 6] = [
    Sprite::LookLeft,
    Sprite::Front1,
    Sprite::LookLeft,
    Sprite::Front2,
    Sprite::LookLeft,
    Sprite::Front3,
];
const RIGHT_FRAMES: [Sprite; 6] = [
    Sprite::LookRight,
    Sprite::Front1,
    Sprite::LookRight,
    Sprite::Front2,
    Sprite::LookRight,
    Sprite::Front3,
];

/// Resolved animation state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimState {
    HonkReaction,
    Dead,
    IdleSlideshow,
    Walking(Direction),
    Idle,
}

type Guard = fn(&Player, &Tuning, u64) -> bool;
type Select = fn(&Player) -> AnimState;

/// Animation priority, highest first. The last rule always matches.
pub const ANIM_RULES: [(Guard, Select); 5] = [
    (|p, _, now| now < p.honk_until, |_| AnimState::HonkReaction),
    (|p, _, _| !p.alive, |_| AnimState::Dead),
    (
        |p, t, now| now.saturating_sub(p.last_move_tick) >= t.idle_ticks,
        |_| AnimState::IdleSlideshow,
    ),
    (|p, _, now| now < p.walk_until, |p| AnimState::Walking(p.direction)),
    (|_, _, _| true, |_| AnimState::Idle),
];

/// The player character
#[derive(Debug, Clone)]
pub struct Player {
    /// Top-left corner, grid aligned
    pub pos: Vec2,
    pub alive: bool,
    pub direction: Direction,
    pub last_move_tick: u64,
    /// Walking animation runs until this tick
    pub walk_until: u64,
    /// Honk reaction runs until this tick
    pub honk_until: u64,
    pub died_at: u64,
    /// Frame cursor per direction
    cursors: [usize; 4],
    pub anim: AnimState,
    pub sprite: Sprite,
}

impl Player {
    pub fn new(world: &WorldConfig, now: u64) -> Self {
        Self {
            pos: world.start_pos(),
            alive: true,
            direction: Direction::Back,
            last_move_tick: now,
            walk_until: 0,
            honk_until: 0,
            died_at: 0,
            cursors: [0; 4],
            anim: AnimState::Idle,
            sprite: Sprite::Idle,
        }
    }

    /// Back to the start cell, alive and idle
    pub fn reset(&mut self, world: &WorldConfig, now: u64) {
        *self = Self::new(world, now);
    }

    /// Player box; the player is one cell square
    pub fn rect(&self, grid: f32) -> Rect {
        Rect::new(self.pos.x, self.pos.y, grid, grid)
    }

    /// Try to step one cell. Vertical input wins when both axes are set.
    ///
    /// Returns true if the player actually moved (the caller emits the step cue).
    pub fn request_move(
        &mut self,
        dx: i32,
        dy: i32,
        world: &WorldConfig,
        tuning: &Tuning,
        now: u64,
    ) -> bool {
        if !self.alive {
            return false;
        }
        let (dx, dy) = if dy != 0 {
            (0, dy.signum())
        } else {
            (dx.signum(), 0)
        };
        if dx == 0 && dy == 0 {
            return false;
        }

        let target = world.clamp(
            self.pos + Vec2::new(dx as f32, dy as f32) * world.grid,
            world.grid,
        );
        if target == self.pos {
            return false;
        }

        self.pos = target;
        self.direction = match (dx, dy) {
            (_, -1) => Direction::Back,
            (_, 1) => Direction::Front,
            (-1, _) => Direction::Left,
            _ => Direction::Right,
        };
        self.last_move_tick = now;
        self.walk_until = now.saturating_add(tuning.walk_ticks);
        true
    }

    /// Mark the player dead. Returns false if they already were.
    pub fn die(&mut self, now: u64) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        self.died_at = now;
        self.honk_until = 0;
        true
    }

    pub fn trigger_honk_reaction(&mut self, now: u64, ticks: u64) {
        if self.alive {
            self.honk_until = now.saturating_add(ticks);
        }
    }

    /// First state in `ANIM_RULES` whose guard holds
    pub fn resolve_anim(&self, tuning: &Tuning, now: u64) -> AnimState {
        ANIM_RULES
            .iter()
            .find(|(guard, _)| guard(self, tuning, now))
            .map_or(AnimState::Idle, |(_, select)| select(self))
    }

    /// Re-evaluate the animation state and pick this tick's sprite
    pub fn refresh_animation<R: Rng>(&mut self, tuning: &Tuning, now: u64, rng: &mut R) {
        let state = self.resolve_anim(tuning, now);
        let entering = state != self.anim;
        let frame_step = now % tuning.frame_ticks == 0;

        self.sprite = match state {
            AnimState::HonkReaction => Sprite::Startled,
            AnimState::Dead => Sprite::Dead,
            AnimState::IdleSlideshow => {
                if entering || frame_step {
                    Sprite::random(rng)
                } else {
                    self.sprite
                }
            }
            AnimState::Walking(dir) => {
                let frames = dir.walk_frames();
                let cursor = &mut self.cursors[dir.index()];
                if frame_step && !entering {
                    *cursor = (*cursor + 1) % frames.len();
                }
                frames[*cursor % frames.len()]
            }
            AnimState::Idle => Sprite::Idle,
        };
        self.anim = state;
    }

    /// Move to the same cell on a grid of a different size
    pub fn rescale(&mut self, old_grid: f32, new_grid: f32, world: &WorldConfig) {
        let cell = (self.pos / old_grid).round();
        self.pos = world.clamp(cell * new_grid, new_grid);
    }
}
