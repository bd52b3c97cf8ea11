//! Collision and proximity checks between the player and traffic

use super::player::Player;
use super::traffic::Vehicle;
use super::world::WorldConfig;
use crate::consts::HONK_RANGE_CELLS;

/// Exact box overlap between player and vehicle (touching edges don't count)
#[inline]
pub fn collides(player: &Player, vehicle: &Vehicle, world: &WorldConfig) -> bool {
    player.rect(world.grid).intersects(&vehicle.rect(world.grid))
}

/// Whether `vehicle` shares the player's row and is bearing down on them
/// within `HONK_RANGE_CELLS` cells.
pub fn is_near(vehicle: &Vehicle, player: &Player, world: &WorldConfig) -> bool {
    if (vehicle.lane_y - player.pos.y).abs() > 0.5 {
        return false;
    }
    // Distance from the vehicle's front bumper to the player's near edge
    let gap = if vehicle.moving_right() {
        player.pos.x - (vehicle.x + vehicle.length)
    } else {
        vehicle.x - (player.pos.x + world.grid)
    };
    (0.0..=HONK_RANGE_CELLS * world.grid).contains(&gap)
}

/// Count down this vehicle's honk cooldown, or honk if it is ready and near.
///
/// Returns true when a honk fires; the cooldown is then re-armed.
pub fn update_honk(
    vehicle: &mut Vehicle,
    player: &Player,
    world: &WorldConfig,
    cooldown_ticks: u32,
) -> bool {
    if vehicle.honk_cooldown > 0 {
        vehicle.honk_cooldown -= 1;
        return false;
    }
    if player.alive && is_near(vehicle, player, world) {
        vehicle.honk_cooldown = cooldown_ticks;
        return true;
    }
    false
}
