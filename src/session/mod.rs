//! Play session: wires clock, loop, notes, judgment and score together.

pub mod autoplay;
pub mod command;
pub mod error;
pub mod headless;
pub mod play_session;

pub use autoplay::{AutoplayMode, build_autoplay};
pub use command::SessionCommand;
pub use error::SessionError;
pub use headless::{HeadlessOutcome, run_headless};
pub use play_session::{PlaySession, SessionPhase};
