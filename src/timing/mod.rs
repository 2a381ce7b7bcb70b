pub mod clock;
pub mod game_loop;

pub use clock::{Clock, ClockError, ClockState};
pub use game_loop::{DEFAULT_MAX_STEPS, DEFAULT_STEP_MS, FrameReport, GameLoop, Simulation};
