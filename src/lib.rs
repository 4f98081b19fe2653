//! Jumping Potato - A side-scrolling obstacle dodging game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, levels, spawning)
//! - `game_loop`: Fixed timestep scheduler with catch-up cap
//! - `input`: Key state tracking with edge detection
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser/native platform abstraction
//! - `persistence`: Key/value storage for settings and high scores
//! - `tuning`: Data-driven game balance

pub mod error;
pub mod game_loop;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::GameError;
pub use game_loop::{FrameReport, GameLoop, LoopState};
pub use highscores::HighScores;
pub use settings::Settings;
pub use tuning::{SpawnMode, Tuning};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum real time the loop will try to catch up on in one frame.
    /// Anything beyond this is dropped to avoid a spiral of death.
    pub const MAX_ACCUMULATED: f32 = 0.25;

    /// Default playfield size in pixels
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;
}
