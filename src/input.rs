//! Keyboard and touch state with per-frame edge detection
//!
//! Keys are identified by their DOM `KeyboardEvent.code` (e.g. `"Space"`).
//! Touches are fed in as the virtual key [`TOUCH`].

use std::collections::HashSet;

use crate::sim::TickInput;

/// Virtual key for a touch on the canvas
pub const TOUCH: &str = "Touch";

/// Keys that make the potato jump
pub const JUMP_KEYS: [&str; 4] = ["Space", "ArrowUp", "KeyW", TOUCH];

/// Tracks which keys are held, and which changed since the last frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys_down: HashSet<String>,
    keys_pressed: HashSet<String>,
    keys_released: HashSet<String>,
    /// A jump press not yet handed to a simulation step
    jump_latched: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key went down. Auto-repeat while held is not a new press.
    pub fn key_down(&mut self, code: &str) {
        if self.keys_down.insert(code.to_string()) {
            self.keys_pressed.insert(code.to_string());
            if JUMP_KEYS.contains(&code) {
                self.jump_latched = true;
            }
        }
    }

    pub fn key_up(&mut self, code: &str) {
        if self.keys_down.remove(code) {
            self.keys_released.insert(code.to_string());
        }
    }

    pub fn is_down(&self, code: &str) -> bool {
        self.keys_down.contains(code)
    }

    /// Pressed since the last `end_frame`
    pub fn just_pressed(&self, code: &str) -> bool {
        self.keys_pressed.contains(code)
    }

    /// Released since the last `end_frame`
    pub fn just_released(&self, code: &str) -> bool {
        self.keys_released.contains(code)
    }

    pub fn jump_pressed(&self) -> bool {
        JUMP_KEYS.iter().any(|key| self.just_pressed(key))
    }

    /// Simulation input for the current frame
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            jump: self.jump_pressed(),
        }
    }

    /// Whether a jump press is still waiting for a step
    pub fn jump_pending(&self) -> bool {
        self.jump_latched
    }

    /// Input for one fixed step. A jump press is handed out exactly once,
    /// however many frames pass before a step runs.
    pub fn take_tick_input(&mut self) -> TickInput {
        TickInput {
            jump: std::mem::take(&mut self.jump_latched),
        }
    }

    /// Clear the per-frame pressed/released sets. A pending jump is kept.
    pub fn end_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
    }

    /// Forget everything, e.g. when the window loses focus mid-press
    pub fn clear(&mut self) {
        self.keys_down.clear();
        self.jump_latched = false;
        self.end_frame();
    }
}
