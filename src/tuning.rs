//! Data-driven game balance
//!
//! Everything the simulation needs to know about physics and pacing. The
//! defaults reproduce the classic feel; hosts may override any field.

use serde::{Deserialize, Serialize};

/// How new obstacles enter the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpawnMode {
    /// One obstacle at a time after a random interval
    #[default]
    Timer,
    /// A full row of `obstacle_count` obstacles laid out at level start,
    /// and again whenever the playfield has been cleared
    Wave,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    /// Vertical velocity applied on jump (negative is up)
    pub jump_impulse: f32,
    /// Character bounding box
    pub character_width: f32,
    pub character_height: f32,
    /// Horizontal position of the character (left edge)
    pub character_x: f32,
    /// Distance from the bottom of the playfield to the floor line
    pub ground_margin: f32,

    /// Obstacle width (pixels)
    pub obstacle_width: f32,
    /// Random obstacle height range for timer spawning, [min, max).
    /// The max should stay below `clearable_height` at the slowest level.
    pub obstacle_min_height: f32,
    pub obstacle_max_height: f32,

    /// Random spawn interval range for timer spawning (seconds)
    pub min_spawn_interval: f32,
    pub max_spawn_interval: f32,
    /// Interval reduction per level above the first (seconds)
    pub spawn_interval_step: f32,
    /// Lower bound on the minimum interval after level reduction
    pub spawn_interval_floor: f32,

    /// Minimum obstacle height in wave mode. Heights are drawn from
    /// [min, playfield_height / 2 + min).
    pub wave_min_height: f32,

    /// Score (in ticks) needed per level. Level N advances once score >= N * step.
    pub level_score_step: u64,

    pub spawn_mode: SpawnMode,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 980.0,
            jump_impulse: -400.0,
            character_width: 50.0,
            character_height: 50.0,
            character_x: 100.0,
            ground_margin: 150.0,

            obstacle_width: 50.0,
            obstacle_min_height: 30.0,
            obstacle_max_height: 45.0,

            min_spawn_interval: 2.0,
            max_spawn_interval: 3.0,
            spawn_interval_step: 0.2,
            spawn_interval_floor: 1.0,

            wave_min_height: 100.0,

            level_score_step: 900,

            spawn_mode: SpawnMode::Timer,
        }
    }
}

impl Tuning {
    /// Spawn interval range for a level, shrinking as levels increase
    pub fn spawn_interval_range(&self, level: u32) -> (f32, f32) {
        let reduction = self.spawn_interval_step * level.saturating_sub(1) as f32;
        let min = (self.min_spawn_interval - reduction).max(self.spawn_interval_floor);
        let spread = (self.max_spawn_interval - self.min_spawn_interval).max(0.0);
        (min, min + spread)
    }

    /// Tallest obstacle a perfectly timed jump clears at the given scroll speed.
    ///
    /// The character and obstacle overlap horizontally for
    /// `(character_width + obstacle_width) / speed` seconds; the jump is best
    /// centered on that window, so its low point is half the window from the apex.
    pub fn clearable_height(&self, speed: f32) -> f32 {
        if self.gravity <= 0.0 || speed <= 0.0 {
            return 0.0;
        }
        let apex = self.jump_impulse * self.jump_impulse / (2.0 * self.gravity);
        let half_window = (self.character_width + self.obstacle_width) / speed / 2.0;
        (apex - 0.5 * self.gravity * half_window * half_window).max(0.0)
    }

    /// Score at which the given level hands over to the next one
    pub fn score_threshold(&self, level: u32) -> u64 {
        self.level_score_step * level as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::LEVELS;

    #[test]
    fn test_spawn_interval_shrinks_with_level() {
        let tuning = Tuning::default();
        assert_eq!(tuning.spawn_interval_range(1), (2.0, 3.0));

        let (min, max) = tuning.spawn_interval_range(3);
        assert!((min - 1.6).abs() < 1e-5);
        assert!((max - 2.6).abs() < 1e-5);
    }

    #[test]
    fn test_spawn_interval_respects_floor() {
        let tuning = Tuning::default();
        let (min, max) = tuning.spawn_interval_range(50);
        assert_eq!(min, 1.0);
        assert_eq!(max, 2.0);
    }

    #[test]
    fn test_default_obstacles_are_clearable() {
        let tuning = Tuning::default();
        // ~51px at level 1 for a 400px/s jump under 980px/s² gravity
        let slowest = LEVELS.iter().map(|l| l.speed).fold(f32::MAX, f32::min);
        let clearable = tuning.clearable_height(slowest);
        assert!(clearable > 50.0 && clearable < 52.0);
        for level in LEVELS {
            assert!(tuning.obstacle_max_height < tuning.clearable_height(level.speed));
        }
    }

    #[test]
    fn test_clearable_height_grows_with_speed() {
        let tuning = Tuning::default();
        assert!(tuning.clearable_height(280.0) > tuning.clearable_height(200.0));
        assert_eq!(tuning.clearable_height(0.0), 0.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning: Tuning = serde_json::from_str(r#"{"gravity": 500.0}"#).unwrap();
        assert_eq!(tuning.gravity, 500.0);
        assert_eq!(tuning.jump_impulse, -400.0);
        assert_eq!(tuning.spawn_mode, SpawnMode::Timer);
    }
}
