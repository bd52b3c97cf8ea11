//! Game state and the operations hosts may call between ticks
//!
//! `GameState` is the single owner of all mutable simulation data. Every
//! mutation takes `&mut self`, so nothing here can interleave with a tick.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::effect::ImpactMark;
use super::player::{Direction, Player, Sprite};
use super::progression::{CollisionOutcome, ProgressSnapshot, Progression};
use super::tick::Command;
use super::traffic::{Traffic, Vehicle, VehicleColor};
use super::world::WorldConfig;
use crate::error::SimError;
use crate::tuning::Tuning;

/// Cue events for the audio/visual layer (fire-and-forget)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    /// Player took a step
    Step,
    /// Player was run over
    Hit { message: &'static str },
    Honk { vehicle_id: u32 },
    LevelUp { level: u32 },
    /// Progress saved; a later restart resumes here
    CheckpointSaved { level: u32 },
    GameOver,
    Respawned,
    CheckpointRestored { level: u32 },
    Reset,
    /// Pass-through for the audio layer; the core keeps no mute state
    MuteToggled,
}

/// Shown while the player is down
pub const DEATH_MESSAGES: [&str; 6] = [
    "Splat!",
    "Look both ways next time.",
    "That one had a horn, you know.",
    "Road 1, pedestrian 0.",
    "Should have taken the bridge.",
    "Hit and run!",
];

/// Vehicle as seen by a renderer
#[derive(Debug, Clone, Serialize)]
pub struct VehicleView {
    pub x: f32,
    pub y: f32,
    pub length: f32,
    pub moving_right: bool,
    pub color: VehicleColor,
}

impl From<&Vehicle> for VehicleView {
    fn from(v: &Vehicle) -> Self {
        Self {
            x: v.x,
            y: v.lane_y,
            length: v.length,
            moving_right: v.moving_right(),
            color: v.color,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub alive: bool,
    pub direction: Direction,
    pub sprite: Sprite,
}

#[derive(Debug, Clone, Serialize)]
pub struct EffectView {
    pub pos: Vec2,
    pub age: f32,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub world: WorldConfig,
    pub vehicles: Vec<VehicleView>,
    pub player: PlayerView,
    pub effects: Vec<EffectView>,
    pub progress: ProgressSnapshot,
    pub banner_ticks: u32,
    pub death_message: Option<&'static str>,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub world: WorldConfig,
    pub tuning: Tuning,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub traffic: Traffic,
    pub player: Player,
    pub progression: Progression,
    /// Impact marks (visual only)
    pub effects: Vec<ImpactMark>,
    /// Ticks left on the "Level N" banner
    pub banner_ticks: u32,
    pub death_message: Option<&'static str>,
    pub(crate) commands: VecDeque<Command>,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Build a fresh run. Fails fast on a bad window size or bad tuning.
    pub fn new(seed: u64, width: f32, height: f32, tuning: Tuning) -> Result<Self, SimError> {
        tuning.validate()?;
        let world = WorldConfig::new(width, height)?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let progression = Progression::new();
        let mut traffic = Traffic::new(&world, &tuning);
        traffic.respawn_all(&world, &tuning, progression.level, &mut rng);

        log::info!(
            "New run: seed={} grid={} world={}x{}",
            seed,
            world.grid,
            world.width,
            world.height
        );

        Ok(Self {
            seed,
            rng,
            player: Player::new(&world, 0),
            world,
            banner_ticks: tuning.banner_ticks,
            tuning,
            time_ticks: 0,
            traffic,
            progression,
            effects: Vec::new(),
            death_message: None,
            commands: VecDeque::new(),
            events: Vec::new(),
        })
    }

    /// Queue a command for the start of the next tick
    pub fn submit(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    /// Apply a command right away (between ticks)
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Move { dx, dy } => self.request_move(dx, dy),
            Command::ToggleMute => self.toggle_mute(),
            Command::RestartCheckpoint => self.request_restart_checkpoint(),
            Command::FullReset => self.request_full_reset(),
        }
    }

    pub fn request_move(&mut self, dx: i32, dy: i32) {
        if self
            .player
            .request_move(dx, dy, &self.world, &self.tuning, self.time_ticks)
        {
            self.events.push(GameEvent::Step);
        }
    }

    pub fn toggle_mute(&mut self) {
        self.events.push(GameEvent::MuteToggled);
    }

    /// Resume from the checkpoint: full lives, fresh traffic, no marks
    pub fn request_restart_checkpoint(&mut self) {
        self.progression.restart_from_checkpoint();
        self.restart_level();
        log::info!("Restarted from checkpoint at level {}", self.progression.level);
        self.events.push(GameEvent::CheckpointRestored {
            level: self.progression.level,
        });
    }

    /// Start over from level 1
    pub fn request_full_reset(&mut self) {
        self.progression.full_reset();
        self.restart_level();
        log::info!("Full reset");
        self.events.push(GameEvent::Reset);
    }

    fn restart_level(&mut self) {
        self.effects.clear();
        self.death_message = None;
        self.player.reset(&self.world, self.time_ticks);
        self.traffic
            .respawn_all(&self.world, &self.tuning, self.progression.level, &mut self.rng);
        self.banner_ticks = self.tuning.banner_ticks;
    }

    /// Adopt a new window size, keeping every entity in the same cell/lane
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), SimError> {
        let world = WorldConfig::new(width, height)?;
        if world == self.world {
            return Ok(());
        }
        let old_grid = self.world.grid;
        let factor = world.grid / old_grid;
        self.traffic.rescale(factor);
        self.player.rescale(old_grid, world.grid, &world);
        for mark in &mut self.effects {
            mark.pos *= factor;
        }
        log::info!("Resized: grid {} -> {}", old_grid, world.grid);
        self.world = world;
        Ok(())
    }

    /// Resolve a vehicle hit against the player
    pub(crate) fn apply_collision(&mut self, vehicle_id: u32) {
        let now = self.time_ticks;
        let outcome = self.progression.on_collision(&mut self.player, now);
        if outcome == CollisionOutcome::Ignored {
            return;
        }

        self.effects
            .push(ImpactMark::new(self.player.pos, self.tuning.impact_max_age));
        let message = DEATH_MESSAGES[self.rng.random_range(0..DEATH_MESSAGES.len())];
        self.death_message = Some(message);
        log::debug!(
            "Player hit by vehicle {} at {:?}, {} lives left",
            vehicle_id,
            self.player.pos,
            self.progression.lives
        );
        self.events.push(GameEvent::Hit { message });
        if outcome == CollisionOutcome::GameOver {
            self.events.push(GameEvent::GameOver);
        }
    }

    /// Level complete: score, next level, fresh traffic
    pub(crate) fn apply_goal(&mut self) {
        let outcome = self.progression.on_goal_reached(&self.tuning);
        log::info!(
            "Level up: {} (+{} points, score {})",
            outcome.new_level,
            outcome.awarded,
            self.progression.score
        );
        self.player.reset(&self.world, self.time_ticks);
        self.traffic
            .respawn_all(&self.world, &self.tuning, outcome.new_level, &mut self.rng);
        self.banner_ticks = self.tuning.banner_ticks;
        self.events.push(GameEvent::LevelUp {
            level: outcome.new_level,
        });
        if outcome.checkpoint_taken {
            self.events.push(GameEvent::CheckpointSaved {
                level: outcome.new_level,
            });
        }
    }

    /// Bring a dead player back once the respawn delay has passed
    pub(crate) fn maybe_respawn(&mut self) {
        let now = self.time_ticks;
        if self.player.alive
            || self.progression.lives == 0
            || now.saturating_sub(self.player.died_at) < self.tuning.respawn_ticks
        {
            return;
        }
        self.player.reset(&self.world, now);
        self.death_message = None;
        log::debug!("Player respawned at tick {}", now);
        self.events.push(GameEvent::Respawned);
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all cue events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        self.traffic.vehicles()
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn effects(&self) -> &[ImpactMark] {
        &self.effects
    }

    pub fn banner_ticks(&self) -> u32 {
        self.banner_ticks
    }

    pub fn death_message(&self) -> Option<&'static str> {
        self.death_message
    }

    pub fn progress(&self) -> ProgressSnapshot {
        self.progression.snapshot()
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            tick: self.time_ticks,
            world: self.world,
            vehicles: self.traffic.vehicles().iter().map(VehicleView::from).collect(),
            player: PlayerView {
                pos: self.player.pos,
                alive: self.player.alive,
                direction: self.player.direction,
                sprite: self.player.sprite,
            },
            effects: self
                .effects
                .iter()
                .map(|m| EffectView {
                    pos: m.pos,
                    age: m.normalized_age(),
                })
                .collect(),
            progress: self.progress(),
            banner_ticks: self.banner_ticks,
            death_message: self.death_message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

    fn new_state() -> GameState {
        GameState::new(1234, DEFAULT_WIDTH, DEFAULT_HEIGHT, Tuning::default()).unwrap()
    }

    #[test]
    fn test_new_state() {
        let state = new_state();
        assert_eq!(state.vehicles().len(), 12);
        assert_eq!(state.player().pos, state.world.start_pos());
        assert_eq!(
            state.progress(),
            ProgressSnapshot { level: 1, score: 0, lives: 4, game_over: false }
        );
        assert_eq!(state.banner_ticks, state.tuning.banner_ticks);
    }

    #[test]
    fn test_construction_fails_fast() {
        assert!(matches!(
            GameState::new(1, 0.0, 600.0, Tuning::default()),
            Err(SimError::InvalidWorld { .. })
        ));
        let mut tuning = Tuning::default();
        tuning.difficulty.segments.clear();
        assert!(matches!(
            GameState::new(1, 800.0, 600.0, tuning),
            Err(SimError::EmptyDifficultyTable)
        ));
    }

    #[test]
    fn test_move_emits_step_only_when_moving() {
        let mut state = new_state();
        state.request_move(0, -1);
        assert_eq!(state.drain_events(), vec![GameEvent::Step]);

        state.player.pos.x = 0.0;
        state.request_move(-1, 0);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_toggle_mute_is_pass_through() {
        let mut state = new_state();
        let before = state.snapshot();
        state.toggle_mute();
        assert_eq!(state.drain_events(), vec![GameEvent::MuteToggled]);
        assert_eq!(state.snapshot().player.pos, before.player.pos);
    }

    #[test]
    fn test_collision_leaves_mark_and_message() {
        let mut state = new_state();
        state.apply_collision(1);
        assert_eq!(state.progress().lives, 3);
        assert_eq!(state.effects().len(), 1);
        assert_eq!(state.effects()[0].pos, state.player.pos);
        let msg = state.death_message().unwrap();
        assert!(DEATH_MESSAGES.contains(&msg));
        assert_eq!(state.drain_events(), vec![GameEvent::Hit { message: msg }]);

        // Dead already: no second mark, no second life lost
        state.apply_collision(2);
        assert_eq!(state.progress().lives, 3);
        assert_eq!(state.effects().len(), 1);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_resize_keeps_cells() {
        let mut state = new_state();
        state.request_move(1, 0);
        let cell = state.player.pos / state.world.grid;
        let first = state.vehicles()[0].clone();

        state.resize(400.0, 300.0).unwrap();
        assert_eq!(state.world.grid, 20.0);
        assert_eq!(state.player.pos / state.world.grid, cell);
        let v = &state.vehicles()[0];
        assert_eq!(v.x, first.x * 0.5);
        assert_eq!(v.lane_y, first.lane_y * 0.5);
        assert_eq!(v.speed, first.speed * 0.5);

        assert!(state.resize(-5.0, 300.0).is_err());
        assert_eq!(state.world.grid, 20.0);
    }

    #[test]
    fn test_oversized_windows_do_not_overflow() {
        let tuning = Tuning::from_json(r#"{ "walk_ticks": 18446744073709551615 }"#).unwrap();
        let mut state = GameState::new(1, DEFAULT_WIDTH, DEFAULT_HEIGHT, tuning).unwrap();
        state.request_move(0, -1);
        assert_eq!(state.drain_events(), vec![GameEvent::Step]);
        assert_eq!(state.player.walk_until, u64::MAX);
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = new_state();
        let json = serde_json::to_string(&state.snapshot()).unwrap();
        assert!(json.contains("\"vehicles\""));
        assert!(json.contains("\"level\":1"));
    }
}
