//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::collision::{collides, update_honk};
use super::effect;
use super::state::{GameEvent, GameState};

/// Host input, queued with `GameState::submit` and drained at the start of
/// the next tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// One grid step; only the sign of each axis matters
    Move { dx: i32, dy: i32 },
    ToggleMute,
    RestartCheckpoint,
    FullReset,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState) {
    while let Some(command) = state.commands.pop_front() {
        state.apply(command);
    }

    state.time_ticks += 1;

    // Cosmetics keep running even after game over
    effect::age_and_prune(&mut state.effects);
    state.banner_ticks = state.banner_ticks.saturating_sub(1);

    if !state.progression.game_over {
        step_road(state);
    }

    let now = state.time_ticks;
    state
        .player
        .refresh_animation(&state.tuning, now, &mut state.rng);
}

/// Traffic, honks, collisions, spacing, respawn and goal, in that order
fn step_road(state: &mut GameState) {
    let now = state.time_ticks;
    state.traffic.advance(&state.world, &mut state.rng);

    let mut honks = Vec::new();
    for vehicle in state.traffic.vehicles_mut() {
        if update_honk(
            vehicle,
            &state.player,
            &state.world,
            state.tuning.honk_cooldown_ticks,
        ) {
            honks.push(vehicle.id);
        }
    }
    for vehicle_id in honks {
        log::debug!("Vehicle {} honked", vehicle_id);
        state
            .player
            .trigger_honk_reaction(now, state.tuning.honk_reaction_ticks);
        state.push_event(GameEvent::Honk { vehicle_id });
    }

    let hits: Vec<u32> = state
        .traffic
        .vehicles()
        .iter()
        .filter(|v| collides(&state.player, v, &state.world))
        .map(|v| v.id)
        .collect();
    for vehicle_id in hits {
        state.apply_collision(vehicle_id);
    }

    state.traffic.enforce_spacing();
    state.maybe_respawn();

    if state.player.alive && state.player.pos.y < state.world.goal_line() {
        state.apply_goal();
    }
}
