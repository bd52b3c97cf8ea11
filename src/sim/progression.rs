//! Level, score, lives and checkpoints
//!
//! Purely reactive: the tick decides *when* a collision or goal happened,
//! this module decides what it does to the run.

use serde::Serialize;

use super::player::Player;
use crate::consts::MAX_LIVES;
use crate::tuning::Tuning;

/// Saved progress to resume from after game over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pub level: u32,
    pub score: u64,
}

impl Default for Checkpoint {
    fn default() -> Self {
        Self { level: 1, score: 0 }
    }
}

/// Read-only view for HUDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressSnapshot {
    pub level: u32,
    pub score: u64,
    pub lives: u8,
    pub game_over: bool,
}

/// What a collision did to the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionOutcome {
    /// Player was already dead
    Ignored,
    LifeLost,
    GameOver,
}

/// Result of reaching the goal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalOutcome {
    pub awarded: u64,
    pub new_level: u32,
    pub checkpoint_taken: bool,
}

#[derive(Debug, Clone)]
pub struct Progression {
    pub level: u32,
    pub score: u64,
    pub lives: u8,
    pub game_over: bool,
    pub checkpoint: Checkpoint,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            level: 1,
            score: 0,
            lives: MAX_LIVES,
            game_over: false,
            checkpoint: Checkpoint::default(),
        }
    }
}

impl Progression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill the player and take a life. Dead players can't die twice.
    pub fn on_collision(&mut self, player: &mut Player, now: u64) -> CollisionOutcome {
        if !player.die(now) {
            return CollisionOutcome::Ignored;
        }
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.game_over = true;
            log::info!("Game over at level {} with {} points", self.level, self.score);
            CollisionOutcome::GameOver
        } else {
            CollisionOutcome::LifeLost
        }
    }

    /// Award the level bonus and advance.
    ///
    /// The bonus uses the level just completed. Completing a multiple of the
    /// checkpoint interval saves the new (level, score).
    pub fn on_goal_reached(&mut self, tuning: &Tuning) -> GoalOutcome {
        let completed = self.level;
        let awarded = u64::from(completed).saturating_mul(tuning.level_bonus);
        self.score = self.score.saturating_add(awarded);
        self.level = completed.saturating_add(1).min(tuning.max_level);

        let checkpoint_taken = completed % tuning.checkpoint_interval == 0;
        if checkpoint_taken {
            self.checkpoint = Checkpoint {
                level: self.level,
                score: self.score,
            };
            log::info!(
                "Checkpoint saved: level {} score {}",
                self.level,
                self.score
            );
        }

        GoalOutcome {
            awarded,
            new_level: self.level,
            checkpoint_taken,
        }
    }

    /// Resume from the last checkpoint with full lives
    pub fn restart_from_checkpoint(&mut self) {
        self.level = self.checkpoint.level;
        self.score = self.checkpoint.score;
        self.lives = MAX_LIVES;
        self.game_over = false;
    }

    /// Back to level 1, no checkpoint
    pub fn full_reset(&mut self) {
        *self = Self::default();
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            level: self.level,
            score: self.score,
            lives: self.lives,
            game_over: self.game_over,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::world::WorldConfig;

    #[test]
    fn test_first_goal() {
        let tuning = Tuning::default();
        let mut prog = Progression::new();
        let out = prog.on_goal_reached(&tuning);
        assert_eq!(prog.level, 2);
        assert_eq!(prog.score, 100);
        assert_eq!(out.awarded, 100);
        assert!(!out.checkpoint_taken);
        assert_eq!(prog.checkpoint, Checkpoint::default());
    }

    #[test]
    fn test_bonus_uses_completed_level() {
        let tuning = Tuning::default();
        let mut prog = Progression::new();
        prog.level = 7;
        prog.on_goal_reached(&tuning);
        assert_eq!(prog.score, 700);
        assert_eq!(prog.level, 8);
    }

    #[test]
    fn test_checkpoint_only_on_interval() {
        let tuning = Tuning::default();
        let mut prog = Progression::new();
        for _ in 1..10 {
            assert!(!prog.on_goal_reached(&tuning).checkpoint_taken);
        }
        assert_eq!(prog.level, 10);
        let out = prog.on_goal_reached(&tuning);
        assert!(out.checkpoint_taken);
        assert_eq!(prog.checkpoint.level, 11);
        assert_eq!(prog.checkpoint.score, prog.score);
        // 100 * (1 + 2 + ... + 10)
        assert_eq!(prog.score, 5500);
    }

    #[test]
    fn test_level_saturates() {
        let tuning = Tuning::default();
        let mut prog = Progression::new();
        prog.level = tuning.max_level;
        let out = prog.on_goal_reached(&tuning);
        assert_eq!(out.new_level, tuning.max_level);
        assert_eq!(prog.score, u64::from(tuning.max_level) * 100);
    }

    #[test]
    fn test_score_saturates() {
        let tuning = Tuning {
            level_bonus: u64::MAX,
            ..Tuning::default()
        };
        let mut prog = Progression::new();
        prog.level = 3;
        prog.on_goal_reached(&tuning);
        assert_eq!(prog.score, u64::MAX);
        prog.on_goal_reached(&tuning);
        assert_eq!(prog.score, u64::MAX);
    }

    #[test]
    fn test_collisions_until_game_over() {
        let world = WorldConfig::default();
        let mut player = Player::new(&world, 0);
        let mut prog = Progression::new();
        for i in 0..3u64 {
            assert_eq!(prog.on_collision(&mut player, i), CollisionOutcome::LifeLost);
            // Second hit while dead is ignored
            assert_eq!(prog.on_collision(&mut player, i), CollisionOutcome::Ignored);
            player.reset(&world, i);
        }
        assert_eq!(prog.lives, 1);
        assert_eq!(prog.on_collision(&mut player, 9), CollisionOutcome::GameOver);
        assert_eq!(prog.lives, 0);
        assert!(prog.game_over);
        assert_eq!((prog.level, prog.score), (1, 0));
    }

    #[test]
    fn test_restart_from_checkpoint() {
        let mut prog = Progression::new();
        prog.checkpoint = Checkpoint { level: 11, score: 5500 };
        prog.level = 14;
        prog.score = 9000;
        prog.lives = 0;
        prog.game_over = true;
        prog.restart_from_checkpoint();
        assert_eq!(
            prog.snapshot(),
            ProgressSnapshot { level: 11, score: 5500, lives: 4, game_over: false }
        );
    }

    #[test]
    fn test_full_reset_forgets_checkpoint() {
        let mut prog = Progression::new();
        prog.checkpoint = Checkpoint { level: 21, score: 1 };
        prog.level = 25;
        prog.full_reset();
        assert_eq!(prog.level, 1);
        assert_eq!(prog.checkpoint, Checkpoint::default());
    }
}
