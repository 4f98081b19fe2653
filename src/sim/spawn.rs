//! Obstacle spawning cadence
//!
//! Timer mode draws a random interval after each spawn. Wave mode lays out a
//! whole level's worth of obstacles at once, spaced by the level gap.

use glam::Vec2;
use rand::Rng;

use super::entity::Obstacle;
use super::level::Level;
use crate::tuning::Tuning;

/// Random value in [min, max), or `min` if the range is empty
pub fn random_in<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}

/// Spawn timer for timer mode
#[derive(Debug, Clone)]
pub struct Spawner {
    /// Seconds since the last spawn
    elapsed: f32,
    /// Seconds until the next spawn is due
    next_interval: f32,
}

impl Spawner {
    pub fn new<R: Rng>(rng: &mut R, tuning: &Tuning, level: u32) -> Self {
        let mut spawner = Self {
            elapsed: 0.0,
            next_interval: 0.0,
        };
        spawner.reset(rng, tuning, level);
        spawner
    }

    pub fn reset<R: Rng>(&mut self, rng: &mut R, tuning: &Tuning, level: u32) {
        self.restart(rng, tuning, level);
    }

    fn draw_interval<R: Rng>(rng: &mut R, tuning: &Tuning, level: u32) -> f32 {
        let (min, max) = tuning.spawn_interval_range(level);
        if max > min {
            rng.random_range(min..=max)
        } else {
            min
        }
    }

    /// Advance the timer by one step. Returns true while a spawn is due; the
    /// timer keeps running until `restart` is called.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        self.elapsed >= self.next_interval
    }

    /// A spawn went through: start timing the next one
    pub fn restart<R: Rng>(&mut self, rng: &mut R, tuning: &Tuning, level: u32) {
        self.elapsed = 0.0;
        self.next_interval = Self::draw_interval(rng, tuning, level);
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn next_interval(&self) -> f32 {
        self.next_interval
    }
}

/// Single obstacle at `x`, resting on the floor, with a random timer-mode height
pub fn timer_obstacle<R: Rng>(
    id: u32,
    x: f32,
    floor_y: f32,
    speed: f32,
    tuning: &Tuning,
    rng: &mut R,
) -> Obstacle {
    let height = random_in(rng, tuning.obstacle_min_height, tuning.obstacle_max_height);
    Obstacle::new(
        id,
        Vec2::new(x, floor_y - height),
        Vec2::new(tuning.obstacle_width, height),
        speed,
    )
}

/// A level's row of obstacles starting at `start_x`, `gap` pixels apart.
/// Heights are drawn from [min, playfield_height / 2 + min).
pub fn wave_obstacles<R: Rng>(
    first_id: u32,
    level: &Level,
    start_x: f32,
    playfield_height: f32,
    floor_y: f32,
    tuning: &Tuning,
    rng: &mut R,
) -> Vec<Obstacle> {
    let min_height = tuning.wave_min_height;
    let max_height = playfield_height / 2.0 + min_height;

    (0..level.obstacle_count)
        .map(|i| {
            let height = random_in(rng, min_height, max_height);
            let x = start_x + i as f32 * level.gap;
            Obstacle::new(
                first_id + i,
                Vec2::new(x, floor_y - height),
                Vec2::new(tuning.obstacle_width, height),
                level.speed,
            )
        })
        .collect()
}
