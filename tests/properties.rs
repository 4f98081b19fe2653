//! Property tests for the simulation core and the fixed-step loop

use glam::Vec2;
use proptest::prelude::*;

use jumping_potato::consts::{MAX_ACCUMULATED, SIM_DT};
use jumping_potato::sim::{Aabb, Character, GameState, LevelManager, TickInput, tick};
use jumping_potato::{GameLoop, Tuning};

fn arb_aabb() -> impl Strategy<Value = Aabb> {
    (-500.0f32..500.0, -500.0f32..500.0, 1.0f32..200.0, 1.0f32..200.0)
        .prop_map(|(x, y, w, h)| Aabb::new(Vec2::new(x, y), Vec2::new(w, h)))
}

proptest! {
    #[test]
    fn overlap_is_symmetric(a in arb_aabb(), b in arb_aabb()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    #[test]
    fn edge_touching_never_overlaps(a in arb_aabb(), w in 1.0f32..200.0, h in 1.0f32..200.0, dy in -100.0f32..100.0) {
        let right = Aabb { min: Vec2::new(a.max.x, a.min.y + dy), max: Vec2::new(a.max.x + w, a.min.y + dy + h) };
        prop_assert!(!a.overlaps(&right));
        prop_assert!(!right.overlaps(&a));

        let below = Aabb { min: Vec2::new(a.min.x, a.max.y), max: Vec2::new(a.min.x + w, a.max.y + h) };
        prop_assert!(!a.overlaps(&below));
    }

    #[test]
    fn accumulator_stays_below_one_step(frames in prop::collection::vec(0.0f64..400.0, 1..60)) {
        let mut game_loop = GameLoop::new();
        game_loop.start(0.0);
        let mut now = 0.0;

        for frame_ms in frames {
            let before = game_loop.accumulator();
            now += frame_ms;
            let report = game_loop.frame(now, |_| {});
            let after = game_loop.accumulator();

            prop_assert!(after >= 0.0);
            prop_assert!(after < SIM_DT);
            // Whatever went in came out as whole steps, up to the catch-up cap
            let added = ((before + (frame_ms / 1000.0) as f32).min(MAX_ACCUMULATED)) - after;
            prop_assert!((added - report.steps as f32 * SIM_DT).abs() < 1e-4);
        }
    }

    #[test]
    fn falling_is_monotone_and_clamped(start_y in 0.0f32..400.0, steps in 1usize..400) {
        let ground = 400.0;
        let mut character = Character::new(Vec2::new(100.0, start_y), Vec2::new(50.0, 50.0), ground, 980.0, -400.0);
        let mut last = character.body().pos.y;
        for _ in 0..steps {
            character.update(SIM_DT);
            let y = character.body().pos.y;
            prop_assert!(y >= last);
            prop_assert!(y <= ground);
            last = y;
        }
    }

    #[test]
    fn repeated_jumps_do_not_stack(extra in 1usize..10, airborne_steps in 1usize..40) {
        let make = || Character::new(Vec2::new(100.0, 400.0), Vec2::new(50.0, 50.0), 400.0, 980.0, -400.0);
        let mut once = make();
        let mut spam = make();
        once.jump();
        spam.jump();

        for _ in 0..airborne_steps {
            once.update(SIM_DT);
            spam.update(SIM_DT);
            if spam.is_jumping() {
                for _ in 0..extra {
                    prop_assert!(!spam.jump());
                }
            }
        }
        prop_assert_eq!(once.body().pos, spam.body().pos);
        prop_assert_eq!(once.body().vel, spam.body().vel);
    }

    #[test]
    fn level_progress_is_bounded(calls in 0usize..20) {
        let mut levels = LevelManager::new();
        let mut last = levels.level_number();
        for _ in 0..calls {
            levels.progress_to_next_level();
            let level = levels.level_number();
            prop_assert!(level == last || level == last + 1);
            prop_assert!(level <= levels.max_level());
            last = level;
        }
    }

    #[test]
    fn session_invariants_hold(seed in any::<u64>(), jumps in prop::collection::vec(any::<bool>(), 600)) {
        let mut state = GameState::new(seed, Tuning::default());
        let floor = state.floor_y();
        let mut last_level = state.levels.level_number();

        for jump in jumps {
            tick(&mut state, &TickInput { jump }, SIM_DT);

            prop_assert!(state.character.body().bottom() <= floor + 1e-3);
            prop_assert!(state.levels.level_number() >= last_level);
            last_level = state.levels.level_number();
            for obstacle in &state.obstacles {
                prop_assert!(obstacle.is_active());
                prop_assert!(obstacle.speed() > 0.0);
            }
            // Spawn order is id order
            prop_assert!(state.obstacles.windows(2).all(|w| w[0].id < w[1].id));
        }
    }
}
