//! Fixed timestep scheduler
//!
//! Real frame time goes into an accumulator which is drained in `SIM_DT`
//! steps. The host drives it once per animation frame with a timestamp in
//! milliseconds; the loop never owns a timer itself.

use crate::consts::{MAX_ACCUMULATED, SIM_DT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    #[default]
    Stopped,
    Running,
    Paused,
}

/// What a single `frame` call did
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameReport {
    /// Fixed steps executed this frame
    pub steps: u32,
    /// Leftover fraction of a step, in [0, 1), for render interpolation
    pub alpha: f32,
}

/// Frames per accumulated second of frame time
#[derive(Debug, Clone, Default)]
struct FpsCounter {
    frames: u32,
    elapsed: f32,
    fps: u32,
}

impl FpsCounter {
    fn record(&mut self, frame_time: f32) {
        self.frames += 1;
        self.elapsed += frame_time;
        if self.elapsed >= 1.0 {
            self.fps = self.frames;
            self.frames = 0;
            self.elapsed -= 1.0;
            // A single very long frame should not carry over several seconds
            if self.elapsed >= 1.0 {
                self.elapsed = 0.0;
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GameLoop {
    state: LoopState,
    /// Timestamp of the previous frame (ms)
    last_time: f64,
    /// Unsimulated time (seconds)
    accumulator: f32,
    fps: FpsCounter,
}

impl GameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin scheduling. Does nothing if already running.
    pub fn start(&mut self, now_ms: f64) {
        if self.state == LoopState::Running {
            return;
        }
        self.state = LoopState::Running;
        self.last_time = now_ms;
        self.accumulator = 0.0;
        self.fps = FpsCounter::default();
        log::debug!("Game loop started");
    }

    /// Halt scheduling and drop all timing state
    pub fn stop(&mut self) {
        if self.state != LoopState::Stopped {
            log::debug!("Game loop stopped");
        }
        self.state = LoopState::Stopped;
        self.accumulator = 0.0;
        self.fps = FpsCounter::default();
    }

    /// Stop stepping but keep the accumulator
    pub fn pause(&mut self) {
        if self.state == LoopState::Running {
            self.state = LoopState::Paused;
            log::debug!("Game loop paused");
        }
    }

    /// Continue after `pause`. Time spent paused is never simulated.
    pub fn resume(&mut self, now_ms: f64) {
        if self.state == LoopState::Paused {
            self.state = LoopState::Running;
            self.last_time = now_ms;
            log::debug!("Game loop resumed");
        }
    }

    /// Run one animation frame, calling `update(SIM_DT)` once per whole step
    pub fn frame(&mut self, now_ms: f64, mut update: impl FnMut(f32)) -> FrameReport {
        if self.state != LoopState::Running {
            return FrameReport::default();
        }

        // Clocks can go backwards (or be NaN) across suspend; treat that as no time
        let elapsed = ((now_ms - self.last_time) / 1000.0).max(0.0) as f32;
        self.last_time = now_ms;
        self.fps.record(elapsed);

        self.accumulator += elapsed;
        if self.accumulator > MAX_ACCUMULATED {
            log::debug!(
                "Dropping {:.3}s of frame time",
                self.accumulator - MAX_ACCUMULATED
            );
            self.accumulator = MAX_ACCUMULATED;
        }

        let mut steps = 0;
        while self.accumulator >= SIM_DT {
            update(SIM_DT);
            self.accumulator -= SIM_DT;
            steps += 1;
        }

        FrameReport {
            steps,
            alpha: self.accumulator / SIM_DT,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state == LoopState::Paused
    }

    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Frames rendered during the last full second of frame time
    pub fn fps(&self) -> u32 {
        self.fps.fps
    }
}
