//! Level progression
//!
//! A fixed, ordered table of difficulty settings. The current level only ever
//! moves forward one entry at a time.

use serde::{Deserialize, Serialize};

/// Parameters for one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// 1-based level number
    pub level: u32,
    /// Obstacles per wave
    pub obstacle_count: u32,
    /// Obstacle scroll speed (pixels/s)
    pub speed: f32,
    /// Horizontal spacing between obstacles (pixels)
    pub gap: f32,
}

pub const LEVELS: [Level; 3] = [
    Level {
        level: 1,
        obstacle_count: 3,
        speed: 200.0,
        gap: 300.0,
    },
    Level {
        level: 2,
        obstacle_count: 4,
        speed: 240.0,
        gap: 250.0,
    },
    Level {
        level: 3,
        obstacle_count: 5,
        speed: 280.0,
        gap: 200.0,
    },
];

#[derive(Debug, Clone)]
pub struct LevelManager {
    table: &'static [Level],
    index: usize,
}

impl Default for LevelManager {
    fn default() -> Self {
        Self::new()
    }
}

impl LevelManager {
    pub fn new() -> Self {
        Self::with_table(&LEVELS)
    }

    pub fn with_table(table: &'static [Level]) -> Self {
        assert!(!table.is_empty(), "level table must have at least one entry");
        Self { table, index: 0 }
    }

    /// Parameters of the active level
    pub fn current_level(&self) -> Level {
        self.table[self.index]
    }

    pub fn level_number(&self) -> u32 {
        self.current_level().level
    }

    /// Advance one level. Returns false (and stays put) at the last level.
    pub fn progress_to_next_level(&mut self) -> bool {
        if self.index + 1 < self.table.len() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Back to the first level
    pub fn load_initial_level(&mut self) {
        self.index = 0;
    }

    pub fn is_max_level(&self) -> bool {
        self.index + 1 == self.table.len()
    }

    pub fn max_level(&self) -> u32 {
        self.table[self.table.len() - 1].level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progression_stops_at_last_level() {
        let mut levels = LevelManager::new();
        assert_eq!(levels.level_number(), 1);

        assert!(levels.progress_to_next_level());
        assert_eq!(levels.level_number(), 2);
        assert!(levels.progress_to_next_level());
        assert_eq!(levels.level_number(), 3);
        assert!(!levels.progress_to_next_level());
        assert_eq!(levels.level_number(), 3);
        assert!(levels.is_max_level());
    }

    #[test]
    fn test_current_level_returns_full_entry() {
        let mut levels = LevelManager::new();
        levels.progress_to_next_level();
        assert_eq!(levels.current_level(), LEVELS[1]);
        assert_eq!(levels.current_level().obstacle_count, 4);
    }

    #[test]
    fn test_load_initial_level() {
        let mut levels = LevelManager::new();
        levels.progress_to_next_level();
        levels.progress_to_next_level();
        levels.load_initial_level();
        assert_eq!(levels.level_number(), 1);
        assert_eq!(levels.max_level(), 3);
    }

    #[test]
    fn test_single_entry_table() {
        static ONLY: [Level; 1] = [Level {
            level: 1,
            obstacle_count: 1,
            speed: 100.0,
            gap: 100.0,
        }];
        let mut levels = LevelManager::with_table(&ONLY);
        assert!(levels.is_max_level());
        assert!(!levels.progress_to_next_level());
        assert_eq!(levels.level_number(), 1);
    }
}
