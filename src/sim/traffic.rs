//! Traffic manager
//!
//! Owns every vehicle on the road. Lanes carry an endless stream: vehicles
//! that leave the playfield are recycled to the entry edge, and a per-lane
//! minimum gap is enforced every tick.

use rand::Rng;
use serde::Serialize;

use super::geometry::Rect;
use super::world::WorldConfig;
use crate::consts::{SPAWN_JITTER_MAX, SPAWN_JITTER_MIN};
use crate::tuning::Tuning;

/// Vehicle paint (cosmetic only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VehicleColor {
    Red,
    Blue,
    Green,
    Yellow,
    Orange,
    White,
}

impl VehicleColor {
    pub const ALL: [VehicleColor; 6] = [
        VehicleColor::Red,
        VehicleColor::Blue,
        VehicleColor::Green,
        VehicleColor::Yellow,
        VehicleColor::Orange,
        VehicleColor::White,
    ];

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// A lane-bound vehicle
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: u32,
    /// Pixel y of the lane row
    pub lane_y: f32,
    /// Pixels per tick; positive travels right
    pub speed: f32,
    pub length: f32,
    pub color: VehicleColor,
    /// Left edge
    pub x: f32,
    /// Ticks before this vehicle may honk again
    pub honk_cooldown: u32,
}

impl Vehicle {
    #[inline]
    pub fn moving_right(&self) -> bool {
        self.speed > 0.0
    }

    /// Bounding box; vehicles are one cell tall
    pub fn rect(&self, grid: f32) -> Rect {
        Rect::new(self.x, self.lane_y, self.length, grid)
    }

    /// Position along the direction of travel (larger is further ahead)
    #[inline]
    fn travel_pos(&self) -> f32 {
        if self.moving_right() { self.x } else { -self.x }
    }
}

/// Random spacing added at spawn and recycle so lanes don't look mechanical
fn spawn_jitter<R: Rng>(world: &WorldConfig, rng: &mut R) -> f32 {
    rng.random_range(SPAWN_JITTER_MIN..=SPAWN_JITTER_MAX) as f32 * world.scale()
}

/// All vehicles plus the spacing rule
#[derive(Debug, Clone)]
pub struct Traffic {
    vehicles: Vec<Vehicle>,
    /// Minimum gap between same-direction vehicles in a lane (pixels)
    min_gap: f32,
    next_id: u32,
}

impl Traffic {
    pub fn new(world: &WorldConfig, tuning: &Tuning) -> Self {
        Self {
            vehicles: Vec::new(),
            min_gap: tuning.min_gap_cells * world.grid,
            next_id: 1,
        }
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub(crate) fn vehicles_mut(&mut self) -> &mut [Vehicle] {
        &mut self.vehicles
    }

    pub fn min_gap(&self) -> f32 {
        self.min_gap
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn clear(&mut self) {
        self.vehicles.clear();
    }

    /// Queue `count` vehicles just outside the lane's entry edge.
    ///
    /// Each vehicle trails its predecessor by `length + min_gap` plus jitter,
    /// so a freshly spawned lane already satisfies the spacing rule.
    #[allow(clippy::too_many_arguments)]
    pub fn spawn_lane<R: Rng>(
        &mut self,
        world: &WorldConfig,
        lane_y: f32,
        base_speed: f32,
        count: u32,
        length: f32,
        speed_scale: f32,
        rng: &mut R,
    ) {
        let speed = base_speed * speed_scale;
        let mut offset = 0.0;
        for _ in 0..count {
            offset += spawn_jitter(world, rng);
            let x = if speed > 0.0 {
                -length - offset
            } else {
                world.width + offset
            };
            let id = self.next_id;
            self.next_id += 1;
            log::trace!("spawn vehicle {} lane_y={} x={:.1} speed={:.2}", id, lane_y, x, speed);
            self.vehicles.push(Vehicle {
                id,
                lane_y,
                speed,
                length,
                color: VehicleColor::random(rng),
                x,
                honk_cooldown: 0,
            });
            offset += length + self.min_gap;
        }
    }

    /// Drop every vehicle and spawn all lanes for `level`
    pub fn respawn_all<R: Rng>(
        &mut self,
        world: &WorldConfig,
        tuning: &Tuning,
        level: u32,
        rng: &mut R,
    ) {
        self.clear();
        self.min_gap = tuning.min_gap_cells * world.grid;
        let speed_scale = tuning.speed_multiplier(level);
        for lane in &tuning.lanes {
            self.spawn_lane(
                world,
                world.row_y(lane.row),
                lane.speed * world.scale(),
                lane.count,
                lane.length_cells * world.grid,
                speed_scale,
                rng,
            );
        }
        log::debug!(
            "spawned {} vehicles for level {} (x{:.2})",
            self.vehicles.len(),
            level,
            speed_scale
        );
    }

    /// Move every vehicle by its speed, recycling those that left the world.
    ///
    /// Returns how many vehicles were recycled.
    pub fn advance<R: Rng>(&mut self, world: &WorldConfig, rng: &mut R) -> usize {
        let mut recycled = 0;
        for v in &mut self.vehicles {
            v.x += v.speed;
            if v.moving_right() && v.x > world.width {
                v.x = -v.length - spawn_jitter(world, rng);
                recycled += 1;
                log::trace!("recycle vehicle {} to left edge", v.id);
            } else if !v.moving_right() && v.x + v.length < 0.0 {
                v.x = world.width + spawn_jitter(world, rng);
                recycled += 1;
                log::trace!("recycle vehicle {} to right edge", v.id);
            }
        }
        recycled
    }

    /// Clamp followers so each trails its leader by at least
    /// `leader.length + min_gap`.
    ///
    /// One sweep per (lane, direction) group in travel order. The leader's
    /// already-corrected position is used for its follower. Returns the
    /// number of vehicles moved.
    pub fn enforce_spacing(&mut self) -> usize {
        let vehicles = &mut self.vehicles;
        let mut order: Vec<usize> = (0..vehicles.len()).collect();
        order.sort_by(|&a, &b| {
            let (va, vb) = (&vehicles[a], &vehicles[b]);
            va.lane_y
                .total_cmp(&vb.lane_y)
                .then(va.moving_right().cmp(&vb.moving_right()))
                .then(vb.travel_pos().total_cmp(&va.travel_pos()))
        });

        let mut corrected = 0;
        for pair in order.windows(2) {
            let (leader, follower) = (&vehicles[pair[0]], &vehicles[pair[1]]);
            if leader.lane_y != follower.lane_y || leader.moving_right() != follower.moving_right() {
                continue;
            }
            let span = leader.length + self.min_gap;
            let (lead_x, right) = (leader.x, leader.moving_right());

            let follower = &mut vehicles[pair[1]];
            if right && follower.x > lead_x - span {
                follower.x = lead_x - span;
                corrected += 1;
            } else if !right && follower.x < lead_x + span {
                follower.x = lead_x + span;
                corrected += 1;
            }
        }
        corrected
    }

    /// Scale every pixel quantity (after a grid change)
    pub fn rescale(&mut self, factor: f32) {
        self.min_gap *= factor;
        for v in &mut self.vehicles {
            v.x *= factor;
            v.lane_y *= factor;
            v.speed *= factor;
            v.length *= factor;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup() -> (WorldConfig, Traffic, Pcg32) {
        let world = WorldConfig::default();
        let traffic = Traffic::new(&world, &Tuning::default());
        (world, traffic, Pcg32::seed_from_u64(7))
    }

    fn vehicle(id: u32, lane_y: f32, x: f32, speed: f32, length: f32) -> Vehicle {
        Vehicle {
            id,
            lane_y,
            speed,
            length,
            color: VehicleColor::Red,
            x,
            honk_cooldown: 0,
        }
    }

    #[test]
    fn test_spawn_lane_outside_entry_edge() {
        let (world, mut traffic, mut rng) = setup();
        traffic.spawn_lane(&world, 160.0, 5.0, 3, 80.0, 1.5, &mut rng);
        traffic.spawn_lane(&world, 240.0, -5.0, 3, 80.0, 1.0, &mut rng);
        assert_eq!(traffic.len(), 6);

        let right: Vec<_> = traffic.vehicles().iter().filter(|v| v.lane_y == 160.0).collect();
        let left: Vec<_> = traffic.vehicles().iter().filter(|v| v.lane_y == 240.0).collect();
        for v in &right {
            assert_eq!(v.speed, 7.5);
            assert!(v.x + v.length <= -(SPAWN_JITTER_MIN as f32));
        }
        for v in &left {
            assert_eq!(v.speed, -5.0);
            assert!(v.x >= world.width + SPAWN_JITTER_MIN as f32);
        }
        // Consecutive spawns are at least length + gap + min jitter apart
        for pair in right.windows(2) {
            let gap = pair[0].x - pair[1].x;
            assert!(gap >= 80.0 + traffic.min_gap() + SPAWN_JITTER_MIN as f32);
            assert!(gap <= 80.0 + traffic.min_gap() + SPAWN_JITTER_MAX as f32);
        }
    }

    #[test]
    fn test_advance_moves_by_speed() {
        let (world, mut traffic, mut rng) = setup();
        traffic.vehicles.push(vehicle(1, 160.0, 100.0, 6.0, 80.0));
        traffic.vehicles.push(vehicle(2, 240.0, 300.0, -4.5, 80.0));
        assert_eq!(traffic.advance(&world, &mut rng), 0);
        assert_eq!(traffic.vehicles()[0].x, 106.0);
        assert_eq!(traffic.vehicles()[1].x, 295.5);
    }

    #[test]
    fn test_recycle_to_opposite_edge() {
        let (world, mut traffic, mut rng) = setup();
        traffic.vehicles.push(vehicle(1, 160.0, world.width - 2.0, 5.0, 80.0));
        traffic.vehicles.push(vehicle(2, 240.0, -78.0, -5.0, 80.0));
        assert_eq!(traffic.advance(&world, &mut rng), 2);

        let right = &traffic.vehicles()[0];
        assert!(right.x <= -80.0 - SPAWN_JITTER_MIN as f32);
        assert!(right.x >= -80.0 - SPAWN_JITTER_MAX as f32);
        let left = &traffic.vehicles()[1];
        assert!(left.x >= world.width + SPAWN_JITTER_MIN as f32);
        assert!(left.x <= world.width + SPAWN_JITTER_MAX as f32);
    }

    #[test]
    fn test_spacing_clamps_rightward_follower() {
        let (_, mut traffic, _) = setup();
        traffic.vehicles.push(vehicle(1, 160.0, 100.0, 5.0, 80.0)); // follower
        traffic.vehicles.push(vehicle(2, 160.0, 200.0, 5.0, 80.0)); // leader
        assert_eq!(traffic.enforce_spacing(), 1);
        assert_eq!(traffic.vehicles()[0].x, 200.0 - 80.0 - 80.0);
        assert_eq!(traffic.vehicles()[1].x, 200.0);
    }

    #[test]
    fn test_spacing_clamps_leftward_follower() {
        let (_, mut traffic, _) = setup();
        traffic.vehicles.push(vehicle(1, 160.0, 300.0, -5.0, 80.0)); // leader
        traffic.vehicles.push(vehicle(2, 160.0, 350.0, -5.0, 80.0)); // follower
        assert_eq!(traffic.enforce_spacing(), 1);
        assert_eq!(traffic.vehicles()[1].x, 300.0 + 80.0 + 80.0);
    }

    #[test]
    fn test_spacing_ignores_other_lanes_and_directions() {
        let (_, mut traffic, _) = setup();
        traffic.vehicles.push(vehicle(1, 160.0, 100.0, 5.0, 80.0));
        traffic.vehicles.push(vehicle(2, 240.0, 110.0, 5.0, 80.0));
        traffic.vehicles.push(vehicle(3, 160.0, 120.0, -5.0, 80.0));
        assert_eq!(traffic.enforce_spacing(), 0);
    }

    #[test]
    fn test_spacing_keeps_valid_lane_untouched() {
        let (world, mut traffic, mut rng) = setup();
        traffic.respawn_all(&world, &Tuning::default(), 1, &mut rng);
        assert_eq!(traffic.enforce_spacing(), 0);
    }

    #[test]
    fn test_rescale() {
        let (_, mut traffic, _) = setup();
        traffic.vehicles.push(vehicle(1, 160.0, 100.0, 4.0, 80.0));
        traffic.rescale(0.5);
        let v = &traffic.vehicles()[0];
        assert_eq!((v.x, v.lane_y, v.speed, v.length), (50.0, 80.0, 2.0, 40.0));
        assert_eq!(traffic.min_gap(), 40.0);
    }

    proptest! {
        #[test]
        fn spacing_holds_after_sweep(
            xs in proptest::collection::vec(-400.0f32..1200.0, 2..8),
            right in any::<bool>(),
        ) {
            let (_, mut traffic, _) = setup();
            let speed = if right { 5.0 } else { -5.0 };
            for (i, x) in xs.iter().enumerate() {
                traffic.vehicles.push(vehicle(i as u32, 160.0, *x, speed, 80.0));
            }
            traffic.enforce_spacing();

            let mut pos: Vec<f32> = traffic.vehicles().iter().map(|v| v.x).collect();
            pos.sort_by(|a, b| a.total_cmp(b));
            for pair in pos.windows(2) {
                prop_assert!(pair[1] - pair[0] >= 80.0 + traffic.min_gap() - 1e-3);
            }
        }

        #[test]
        fn advance_is_exact_unless_recycled(x in 0.0f32..700.0, speed in 1.0f32..12.0) {
            let (world, mut traffic, mut rng) = setup();
            traffic.vehicles.push(vehicle(1, 160.0, x, speed, 80.0));
            traffic.vehicles.push(vehicle(2, 240.0, x + 20.0, -speed, 80.0));
            traffic.advance(&world, &mut rng);
            prop_assert_eq!(traffic.vehicles()[0].x, x + speed);
            prop_assert_eq!(traffic.vehicles()[1].x, x + 20.0 - speed);
        }
    }
}
