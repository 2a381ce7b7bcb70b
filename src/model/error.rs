use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Failed to read chart file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse chart: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Note {index}: lane {lane} is outside 0..{lane_count}")]
    InvalidLane {
        index: usize,
        lane: usize,
        lane_count: usize,
    },

    #[error("Note {index}: hold note needs a positive duration")]
    MissingHoldDuration { index: usize },

    #[error("Note {index}: hold ends past the representable song time")]
    HoldEndOverflow { index: usize },

    #[error("Invalid BPM: {0}")]
    InvalidBpm(f64),
}
