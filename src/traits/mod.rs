//! Seams to the outside world: time, audio, presentation and scripted input.

pub mod audio;
pub mod input;
pub mod render;
pub mod time;

pub use audio::{AudioBackend, AudioError, NullAudio};
pub use input::{InputSource, LaneEvent, ScriptedInput};
pub use render::{NullRender, RenderSink};
pub use time::{MockTimeProvider, SystemTimeProvider, TimeProvider};
