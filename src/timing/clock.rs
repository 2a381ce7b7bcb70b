use log::{debug, warn};
use thiserror::Error;

use crate::traits::audio::{AudioBackend, AudioError};
use crate::traits::time::{SystemTimeProvider, TimeProvider};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClockError {
    /// The audio device could not be opened. The clock still runs as a
    /// plain monotonic timer.
    #[error("clock init failed, running clock-only: {0}")]
    Init(#[from] AudioError),
}

/// Raw clock fields, exposed for inspection and debugging.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClockState {
    /// Epoch in time-provider microseconds. `None` until first start.
    pub start_time_us: Option<i64>,
    /// Provider time at which the clock was paused.
    pub pause_time_us: Option<i64>,
    pub offset_ms: f64,
    pub running: bool,
}

/// Song clock in milliseconds.
///
/// `current_time_ms = (now - epoch) + offset`. Resuming after a pause moves
/// the epoch forward by the paused duration, so the elapsed part continues
/// exactly from the frozen value. The offset passed to `start` replaces the
/// previous one: resuming with the same offset is seamless, a different
/// offset shifts the reading by the difference.
#[derive(Debug)]
pub struct Clock<T: TimeProvider = SystemTimeProvider> {
    time: T,
    state: ClockState,
    initialized: bool,
    audio_available: bool,
}

impl Clock<SystemTimeProvider> {
    pub fn system() -> Self {
        Self::new(SystemTimeProvider::new())
    }
}

impl<T: TimeProvider> Clock<T> {
    pub fn new(time: T) -> Self {
        Self {
            time,
            state: ClockState::default(),
            initialized: false,
            audio_available: false,
        }
    }

    /// Prepare the timing resource. Calling it again is a no-op, also after
    /// a failed attempt.
    pub fn init(&mut self, audio: &mut dyn AudioBackend) -> Result<(), ClockError> {
        if self.initialized {
            return Ok(());
        }
        self.initialized = true;
        match audio.init() {
            Ok(()) => {
                self.audio_available = true;
                debug!("clock initialised with audio");
                Ok(())
            }
            Err(e) => {
                warn!("audio unavailable, clock-only mode: {}", e);
                Err(ClockError::Init(e))
            }
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// True when `init` acquired an audio device.
    pub fn has_audio(&self) -> bool {
        self.audio_available
    }

    pub fn start(&mut self, offset_ms: f64) {
        if self.state.running {
            return;
        }
        let now = self.time.now_us();
        let start = match (self.state.start_time_us, self.state.pause_time_us) {
            (Some(start), Some(paused_at)) => now - (paused_at - start),
            _ => now,
        };
        self.state = ClockState {
            start_time_us: Some(start),
            pause_time_us: None,
            offset_ms,
            running: true,
        };
    }

    pub fn pause(&mut self) {
        if !self.state.running {
            return;
        }
        self.state.pause_time_us = Some(self.time.now_us());
        self.state.running = false;
    }

    pub fn reset(&mut self) {
        self.state = ClockState::default();
    }

    pub fn current_time_ms(&self) -> f64 {
        let elapsed_us = match self.state.start_time_us {
            None => 0,
            Some(start) if self.state.running => self.time.now_us() - start,
            Some(start) => self.state.pause_time_us.unwrap_or(start) - start,
        };
        elapsed_us as f64 / 1000.0 + self.state.offset_ms
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn is_paused(&self) -> bool {
        !self.state.running && self.state.pause_time_us.is_some()
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn time_provider(&self) -> &T {
        &self.time
    }
}
