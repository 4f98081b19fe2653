//! Game state and session orchestration
//!
//! `GameState` owns every entity for one play session. It is created once,
//! reset on restart (the character instance is reused), and dropped on teardown.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{CollisionManager, Contact};
use super::entity::{Character, Collidable, Drawable, Obstacle};
use super::level::{Level, LevelManager};
use super::spawn::{self, Spawner};
use crate::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use crate::tuning::{SpawnMode, Tuning};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Character died; waiting for restart
    GameOver,
}

/// Read-only view of the session for HUD and rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub level: u32,
    pub alive: bool,
    pub dodged: u32,
    pub playfield: Vec2,
    pub floor_y: f32,
    /// Character first, then active obstacles in spawn order
    pub entities: Vec<Drawable>,
}

impl Snapshot {
    pub fn obstacles(&self) -> impl Iterator<Item = &Drawable> {
        self.entities.iter().skip(1)
    }
}

#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub tuning: Tuning,
    playfield: Vec2,
    pub character: Character,
    /// Active obstacles (spawn order, which is also id order)
    pub obstacles: Vec<Obstacle>,
    pub levels: LevelManager,
    pub collisions: CollisionManager,
    spawner: Spawner,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Obstacles that fully passed the character
    pub dodged: u32,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new session on the default playfield
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self::with_playfield(seed, tuning, Vec2::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT))
    }

    pub fn with_playfield(seed: u64, tuning: Tuning, playfield: Vec2) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let levels = LevelManager::new();
        let spawner = Spawner::new(&mut rng, &tuning, levels.level_number());
        let floor_y = floor_line(&tuning, playfield);
        let character = Character::from_tuning(&tuning, floor_y);

        Self {
            seed,
            rng,
            tuning,
            playfield,
            character,
            obstacles: Vec::new(),
            levels,
            collisions: CollisionManager::new(),
            spawner,
            phase: GamePhase::Playing,
            time_ticks: 0,
            dodged: 0,
            next_id: 1,
        }
    }

    /// Start over with a new seed, reusing the same character
    pub fn reset(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.character.reset();
        self.obstacles.clear();
        self.levels.load_initial_level();
        self.spawner
            .reset(&mut self.rng, &self.tuning, self.levels.level_number());
        self.phase = GamePhase::Playing;
        self.time_ticks = 0;
        self.dodged = 0;
        self.next_id = 1;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn playfield(&self) -> Vec2 {
        self.playfield
    }

    /// y of the floor surface everything stands on
    pub fn floor_y(&self) -> f32 {
        floor_line(&self.tuning, self.playfield)
    }

    /// Playfield changed size; move the floor and everything standing on it
    pub fn resize(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.playfield = Vec2::new(width, height);
        let floor_y = self.floor_y();
        self.character
            .set_ground(floor_y - self.character.body().size().y);
        for obstacle in &mut self.obstacles {
            obstacle.rest_on(floor_y);
        }
    }

    pub fn current_level(&self) -> Level {
        self.levels.current_level()
    }

    pub fn score(&self) -> u64 {
        self.character.score()
    }

    pub fn is_alive(&self) -> bool {
        !self.character.is_dead()
    }

    /// Spawn one obstacle at the right edge using the current level's speed.
    ///
    /// Skipped if the newest obstacle has not yet moved `gap` pixels in from
    /// the edge. Returns whether an obstacle was added.
    pub fn spawn_obstacle(&mut self) -> bool {
        let level = self.levels.current_level();
        if let Some(last) = self.obstacles.last() {
            if last.body().pos.x >= self.playfield.x - level.gap {
                log::debug!("Spawn skipped, obstacle {} too close to edge", last.id);
                return false;
            }
        }

        let id = self.next_entity_id();
        let floor_y = self.floor_y();
        let obstacle = spawn::timer_obstacle(
            id,
            self.playfield.x,
            floor_y,
            level.speed,
            &self.tuning,
            &mut self.rng,
        );
        log::debug!(
            "Spawned obstacle {} (h={:.0}, speed={:.0})",
            id,
            obstacle.body().size().y,
            level.speed
        );
        self.obstacles.push(obstacle);
        true
    }

    /// Lay out the current level's full row of obstacles. The row starts at
    /// the right edge, or one gap behind the last obstacle still in play.
    /// Returns the number of obstacles added.
    pub fn spawn_wave(&mut self) -> u32 {
        let level = self.levels.current_level();
        let floor_y = self.floor_y();
        let start_x = self
            .obstacles
            .last()
            .map_or(self.playfield.x, |last| {
                (last.body().pos.x + level.gap).max(self.playfield.x)
            });
        let wave = spawn::wave_obstacles(
            self.next_id,
            &level,
            start_x,
            self.playfield.y,
            floor_y,
            &self.tuning,
            &mut self.rng,
        );
        let count = wave.len() as u32;
        self.next_id += count;
        log::debug!("Level {} wave: {} obstacles", level.level, count);
        self.obstacles.extend(wave);
        count
    }

    /// Run the spawn phase of a tick according to the spawn mode.
    ///
    /// In timer mode a due spawn that is blocked by the gap check stays due
    /// and is retried every step until it goes through.
    pub fn advance_spawner(&mut self, dt: f32) {
        match self.tuning.spawn_mode {
            SpawnMode::Timer => {
                let level = self.levels.level_number();
                if self.spawner.advance(dt) && self.spawn_obstacle() {
                    self.spawner.restart(&mut self.rng, &self.tuning, level);
                }
            }
            SpawnMode::Wave => {
                if self.obstacles.is_empty() {
                    self.spawn_wave();
                }
            }
        }
    }

    /// Check the character and all obstacles against each other
    pub fn check_collisions(&mut self) -> Vec<Contact> {
        let mut entities: Vec<&mut dyn Collidable> = Vec::with_capacity(self.obstacles.len() + 1);
        entities.push(&mut self.character);
        for obstacle in &mut self.obstacles {
            entities.push(obstacle);
        }
        self.collisions.check_collisions(&mut entities)
    }

    /// Count newly dodged obstacles, then drop inactive ones
    pub fn retire_obstacles(&mut self) {
        let character_left = self.character.body().pos.x;
        let alive = !self.character.is_dead();
        for obstacle in &mut self.obstacles {
            if alive && !obstacle.cleared && obstacle.body().right() < character_left {
                obstacle.cleared = true;
                self.dodged += 1;
            }
        }
        self.obstacles.retain(Obstacle::is_active);
    }

    /// Drawable state of every live entity, character first
    pub fn drawables(&self) -> Vec<Drawable> {
        std::iter::once(Drawable::from(&self.character))
            .chain(self.obstacles.iter().map(Drawable::from))
            .collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            score: self.score(),
            level: self.levels.level_number(),
            alive: self.is_alive(),
            dodged: self.dodged,
            playfield: self.playfield,
            floor_y: self.floor_y(),
            entities: self.drawables(),
        }
    }
}

fn floor_line(tuning: &Tuning, playfield: Vec2) -> f32 {
    (playfield.y - tuning.ground_margin).max(tuning.character_height)
}
