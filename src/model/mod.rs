// Chart definitions and runtime note state.

pub mod chart;
pub mod error;
pub mod note;

pub use chart::{Chart, ChartMeta, LANE_COUNT, NoteData, NoteType};
pub use error::ChartError;
pub use note::{
    MISS_WINDOW_MS, Note, NoteEvent, NoteInput, NoteKind, NoteSnapshot, NoteState,
    RELEASE_TOLERANCE_MS, ReleaseOutcome,
};
