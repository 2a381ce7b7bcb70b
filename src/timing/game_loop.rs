//! Fixed-timestep loop driven by host frame timestamps.
//!
//! The host calls [`GameLoop::frame`] once per display refresh with the
//! current wall time. Logic runs in whole fixed steps; leftover time is handed
//! to rendering as an interpolation fraction.

use std::ops::ControlFlow;

/// Default simulation step: 60 updates per second.
pub const DEFAULT_STEP_MS: f64 = 1000.0 / 60.0;

/// Most updates run for a single frame.
pub const DEFAULT_MAX_STEPS: u32 = 5;

/// Callbacks driven by the loop.
pub trait Simulation {
    /// Advance logic by exactly one fixed step. Returning `Break` stops the
    /// loop; no further update runs, including the rest of this frame.
    fn update(&mut self, dt_ms: f64) -> ControlFlow<()>;

    /// Draw with `alpha` in `[0, 1)`: progress toward the next step.
    fn render(&mut self, alpha: f64);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    Stopped,
    Running,
    Suspended,
}

/// What one `frame` call did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub updates: u32,
    pub alpha: f64,
    /// The simulation asked to stop during this frame.
    pub stopped: bool,
}

#[derive(Debug, Clone)]
pub struct GameLoop {
    step_ms: f64,
    max_steps: u32,
    state: LoopState,
    last_frame_ms: Option<f64>,
    accumulator: f64,
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_MS, DEFAULT_MAX_STEPS)
    }
}

impl GameLoop {
    pub fn new(step_ms: f64, max_steps: u32) -> Self {
        Self {
            step_ms,
            max_steps: max_steps.max(1),
            state: LoopState::Stopped,
            last_frame_ms: None,
            accumulator: 0.0,
        }
    }

    pub fn step_ms(&self) -> f64 {
        self.step_ms
    }

    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Begin a fresh run. No-op while running.
    pub fn start(&mut self) {
        if self.state == LoopState::Running {
            return;
        }
        self.state = LoopState::Running;
        self.last_frame_ms = None;
        self.accumulator = 0.0;
    }

    /// Stop the loop. Frames the host already scheduled become no-ops.
    pub fn stop(&mut self) {
        self.state = LoopState::Stopped;
        self.last_frame_ms = None;
    }

    /// Pause without losing partial step progress.
    pub fn suspend(&mut self) {
        if self.state == LoopState::Running {
            self.state = LoopState::Suspended;
        }
    }

    /// Continue after `suspend`. The wall time spent suspended is not
    /// simulated.
    pub fn resume(&mut self) {
        if self.state == LoopState::Suspended {
            self.state = LoopState::Running;
            self.last_frame_ms = None;
        }
    }

    /// Run one host frame at wall time `now_ms`. Returns `None` when the loop
    /// is not running.
    pub fn frame<S: Simulation + ?Sized>(
        &mut self,
        now_ms: f64,
        sim: &mut S,
    ) -> Option<FrameReport> {
        if self.state != LoopState::Running {
            return None;
        }

        let max_catch_up = self.step_ms * self.max_steps as f64;
        let elapsed = match self.last_frame_ms {
            Some(last) => (now_ms - last).clamp(0.0, max_catch_up),
            None => 0.0,
        };
        self.last_frame_ms = Some(now_ms);
        self.accumulator = (self.accumulator + elapsed).min(max_catch_up);

        let mut updates = 0;
        while self.accumulator >= self.step_ms && updates < self.max_steps {
            self.accumulator -= self.step_ms;
            updates += 1;
            if sim.update(self.step_ms).is_break() {
                self.stop();
                return Some(FrameReport {
                    updates,
                    alpha: 0.0,
                    stopped: true,
                });
            }
        }
        // float residue from repeated subtraction
        if !(0.0..self.step_ms).contains(&self.accumulator) {
            self.accumulator = 0.0;
        }

        let alpha = self.accumulator / self.step_ms;
        sim.render(alpha);
        Some(FrameReport {
            updates,
            alpha,
            stopped: false,
        })
    }
}
