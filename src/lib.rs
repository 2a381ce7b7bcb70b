//! Timing engine for a four-lane rhythm game.
//!
//! A [`timing::Clock`] turns a monotonic time source into song time, a
//! fixed-step [`timing::GameLoop`] advances the per-note state machines in
//! [`model::note`], and [`judge`] and [`score`] turn presses into grades and
//! combo-weighted points. [`session::PlaySession`] wires them together behind
//! the audio, render and input seams in [`traits`].

pub mod config;
pub mod input;
pub mod judge;
pub mod model;
pub mod score;
pub mod session;
pub mod timing;
pub mod traits;
pub mod util;

pub use config::EngineConfig;
pub use judge::{Grade, JudgmentResult, JudgmentSystem};
pub use model::{Chart, Note, NoteKind};
pub use score::{ResultSummary, ScoreSystem};
pub use session::{PlaySession, SessionPhase};
pub use timing::{Clock, GameLoop};
