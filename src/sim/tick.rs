//! Fixed timestep simulation tick
//!
//! Advances one session by exactly one step. Order matters: input, spawning,
//! movement, collisions, cleanup, then phase and level transitions. In wave
//! mode a level-up lays out the new level's row straight away.

use serde::{Deserialize, Serialize};

use super::state::{GamePhase, GameState};
use crate::tuning::SpawnMode;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump was requested since the last tick
    pub jump: bool,
}

impl TickInput {
    /// Demo player: jump so the apex lands mid-way over the next obstacle
    pub fn autopilot(state: &GameState) -> Self {
        let character = state.character.body();
        let apex_time = -state.tuning.jump_impulse / state.tuning.gravity;

        let next = state
            .obstacles
            .iter()
            .filter(|o| o.body().right() > character.pos.x)
            .min_by(|a, b| a.body().pos.x.total_cmp(&b.body().pos.x));

        let jump = next.is_some_and(|obstacle| {
            let speed = obstacle.speed();
            if speed <= 0.0 {
                return false;
            }
            let overlap_time = (character.size().x + obstacle.body().size().x) / speed;
            let lead = (apex_time - overlap_time / 2.0).max(0.0) * speed;
            let gap = obstacle.body().pos.x - character.right();
            gap > 0.0 && gap <= lead
        });

        Self { jump }
    }
}

/// Things that happened during a tick, for the host to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    ObstacleSpawned { count: u32 },
    ObstacleDodged { total: u32 },
    LevelUp { level: u32 },
    GameOver { score: u64, level: u32 },
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if state.phase == GamePhase::GameOver {
        return events;
    }
    state.time_ticks += 1;

    if input.jump && state.character.jump() {
        events.push(GameEvent::Jumped);
    }

    let before = state.obstacles.len();
    state.advance_spawner(dt);
    let spawned = state.obstacles.len() - before;
    if spawned > 0 {
        events.push(GameEvent::ObstacleSpawned {
            count: spawned as u32,
        });
    }

    state.character.update(dt);
    for obstacle in &mut state.obstacles {
        obstacle.update(dt);
    }

    state.check_collisions();

    let dodged = state.dodged;
    state.retire_obstacles();
    if state.dodged > dodged {
        events.push(GameEvent::ObstacleDodged {
            total: state.dodged,
        });
    }

    if !state.is_alive() {
        state.phase = GamePhase::GameOver;
        let score = state.score();
        let level = state.levels.level_number();
        log::info!(
            "Game over at tick {}: score {}, level {}, dodged {}",
            state.time_ticks,
            score,
            level,
            state.dodged
        );
        events.push(GameEvent::GameOver { score, level });
        return events;
    }

    let level = state.levels.level_number();
    if state.score() >= state.tuning.score_threshold(level)
        && state.levels.progress_to_next_level()
    {
        let level = state.levels.level_number();
        log::info!("Level up: {} (score {})", level, state.score());
        events.push(GameEvent::LevelUp { level });

        if state.tuning.spawn_mode == SpawnMode::Wave {
            let count = state.spawn_wave();
            events.push(GameEvent::ObstacleSpawned { count });
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::entity::{Motion, Obstacle};
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn quiet_tuning() -> Tuning {
        // Intervals far beyond any test length so nothing spawns on its own
        Tuning {
            min_spawn_interval: 1000.0,
            max_spawn_interval: 1000.0,
            spawn_interval_floor: 1000.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_tick_counts_score() {
        let mut state = GameState::new(1, quiet_tuning());
        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.score(), 30);
        assert_eq!(state.time_ticks, 30);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_tick_jump() {
        let mut state = GameState::new(1, quiet_tuning());
        let input = TickInput { jump: true };

        let events = tick(&mut state, &input, SIM_DT);
        assert!(events.contains(&GameEvent::Jumped));
        assert_eq!(state.character.motion(), Motion::Airborne);

        // Holding jump in the air does nothing
        let events = tick(&mut state, &input, SIM_DT);
        assert!(!events.contains(&GameEvent::Jumped));
    }

    #[test]
    fn test_collision_ends_game() {
        let mut state = GameState::new(1, quiet_tuning());
        let id = state.next_entity_id();
        // Just right of the character, on the floor, closing at 200px/s
        state.obstacles.push(Obstacle::new(
            id,
            Vec2::new(152.0, 400.0),
            Vec2::new(50.0, 50.0),
            200.0,
        ));

        let mut over = None;
        for _ in 0..10 {
            let events = tick(&mut state, &TickInput::default(), SIM_DT);
            if let Some(event) = events
                .iter()
                .find(|e| matches!(e, GameEvent::GameOver { .. }))
            {
                over = Some(*event);
                break;
            }
        }

        assert!(matches!(over, Some(GameEvent::GameOver { level: 1, .. })));
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.is_alive());

        // Further ticks are inert
        let score = state.score();
        let ticks = state.time_ticks;
        assert!(tick(&mut state, &TickInput { jump: true }, SIM_DT).is_empty());
        assert_eq!(state.score(), score);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_dodged_obstacle_is_counted_and_dropped() {
        let mut state = GameState::new(1, quiet_tuning());
        let id = state.next_entity_id();
        // Already past the character, about to leave the screen
        state.obstacles.push(Obstacle::new(
            id,
            Vec2::new(10.0, 400.0),
            Vec2::new(20.0, 50.0),
            200.0,
        ));

        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(events.contains(&GameEvent::ObstacleDodged { total: 1 }));
        assert_eq!(state.dodged, 1);

        for _ in 0..20 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(state.obstacles.is_empty());
        assert_eq!(state.dodged, 1);
    }

    #[test]
    fn test_level_up_at_threshold() {
        let tuning = Tuning {
            level_score_step: 10,
            ..quiet_tuning()
        };
        let mut state = GameState::new(1, tuning);

        let mut levels = Vec::new();
        for _ in 0..40 {
            for event in tick(&mut state, &TickInput::default(), SIM_DT) {
                if let GameEvent::LevelUp { level } = event {
                    levels.push((level, state.score()));
                }
            }
        }
        assert_eq!(levels, vec![(2, 10), (3, 20)]);
        assert_eq!(state.levels.level_number(), 3);
    }

    #[test]
    fn test_timer_mode_spawns_obstacles() {
        let mut state = GameState::new(99, Tuning::default());
        let mut spawned = 0;
        // Four seconds covers at least one 2-3s interval
        for _ in 0..240 {
            for event in tick(&mut state, &TickInput::default(), SIM_DT) {
                if let GameEvent::ObstacleSpawned { count } = event {
                    spawned += count;
                }
            }
        }
        assert!(spawned >= 1);
        for obstacle in &state.obstacles {
            assert!((obstacle.body().bottom() - state.floor_y()).abs() < 1e-3);
            assert_eq!(obstacle.speed(), 200.0);
        }
    }

    #[test]
    fn test_wave_mode_refills_when_clear() {
        let tuning = Tuning {
            spawn_mode: SpawnMode::Wave,
            ..Default::default()
        };
        let mut state = GameState::new(3, tuning);

        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(events.contains(&GameEvent::ObstacleSpawned { count: 3 }));
        assert_eq!(state.obstacles.len(), 3);

        // No refill while obstacles remain
        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::ObstacleSpawned { .. })));
    }

    #[test]
    fn test_autopilot_clears_low_obstacle() {
        let mut state = GameState::new(1, quiet_tuning());
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle::new(
            id,
            Vec2::new(400.0, 420.0),
            Vec2::new(50.0, 30.0),
            200.0,
        ));

        let mut jumped = false;
        for _ in 0..180 {
            let input = TickInput::autopilot(&state);
            jumped |= input.jump;
            tick(&mut state, &input, SIM_DT);
        }
        assert!(jumped);
        assert!(state.is_alive());
        assert_eq!(state.dodged, 1);
    }

    #[test]
    fn test_autopilot_clears_tallest_default_obstacle() {
        let tuning = quiet_tuning();
        let height = tuning.obstacle_max_height - 0.1;
        for start_x in [400.0, 401.3, 402.7, 650.0] {
            let mut state = GameState::new(1, tuning.clone());
            let id = state.next_entity_id();
            let floor = state.floor_y();
            state.obstacles.push(Obstacle::new(
                id,
                Vec2::new(start_x, floor - height),
                Vec2::new(tuning.obstacle_width, height),
                200.0,
            ));

            for _ in 0..240 {
                let input = TickInput::autopilot(&state);
                tick(&mut state, &input, SIM_DT);
            }
            assert!(state.is_alive(), "died on obstacle starting at {}", start_x);
            assert_eq!(state.dodged, 1);
        }
    }

    #[test]
    fn test_wave_mode_lays_out_row_on_level_up() {
        let tuning = Tuning {
            spawn_mode: SpawnMode::Wave,
            level_score_step: 10,
            ..Default::default()
        };
        let mut state = GameState::new(3, tuning);

        let mut level_up_events = Vec::new();
        for _ in 0..10 {
            let events = tick(&mut state, &TickInput::default(), SIM_DT);
            if events.contains(&GameEvent::LevelUp { level: 2 }) {
                level_up_events = events;
            }
        }

        assert!(level_up_events.contains(&GameEvent::ObstacleSpawned { count: 4 }));
        assert_eq!(state.obstacles.len(), 3 + 4);
        // The new row queues up behind the old one, spaced by the new gap
        let last_old = state.obstacles[2].body().pos.x;
        let first_new = state.obstacles[3].body().pos.x;
        assert!((first_new - (last_old + 250.0)).abs() < 1e-3);
        assert_eq!(state.obstacles[3].speed(), 240.0);
    }

    #[test]
    fn test_autopilot_idle_without_obstacles() {
        let state = GameState::new(1, quiet_tuning());
        assert!(!TickInput::autopilot(&state).jump);
    }

    #[test]
    fn test_same_seed_same_run() {
        let run = |seed| {
            let mut state = GameState::new(seed, Tuning::default());
            for i in 0..600 {
                let input = TickInput { jump: i % 45 == 0 };
                tick(&mut state, &input, SIM_DT);
            }
            state.snapshot()
        };
        let a = run(2024);
        let b = run(2024);
        assert_eq!(a.score, b.score);
        assert_eq!(a.entities, b.entities);
    }
}
