use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use super::error::ChartError;
use super::note::{Note, NoteKind};

/// Number of playable lanes in the standard layout.
pub const LANE_COUNT: usize = 4;

const CURRENT_VERSION: u32 = 1;

fn default_version() -> u32 {
    CURRENT_VERSION
}

/// Note type as written in the chart document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteType {
    Tap,
    Hold,
}

/// One entry of the chart's note list. Times are integer milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteData {
    pub time: u32,
    pub lane: usize,
    #[serde(rename = "type")]
    pub note_type: NoteType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

impl NoteData {
    pub fn tap(time: u32, lane: usize) -> Self {
        Self {
            time,
            lane,
            note_type: NoteType::Tap,
            duration: None,
        }
    }

    pub fn hold(time: u32, lane: usize, duration: u32) -> Self {
        Self {
            time,
            lane,
            note_type: NoteType::Hold,
            duration: Some(duration),
        }
    }

    /// Time at which the note stops needing input. Widened so an unvalidated
    /// hold tail cannot overflow.
    pub fn end_time(&self) -> u64 {
        match self.note_type {
            NoteType::Tap => u64::from(self.time),
            NoteType::Hold => u64::from(self.time) + u64::from(self.duration.unwrap_or(0)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartMeta {
    pub title: String,
    #[serde(default)]
    pub artist: String,
    pub bpm: f64,
    /// Audio sync offset in milliseconds, added to the clock at start.
    #[serde(default)]
    pub offset: i32,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub level: u32,
    #[serde(rename = "audioFile", default, skip_serializing_if = "Option::is_none")]
    pub audio_file: Option<String>,
}

/// Immutable chart definition. Runtime notes are derived from it with
/// [`Chart::build_notes`] and never written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    #[serde(default = "default_version")]
    pub version: u32,
    pub meta: ChartMeta,
    pub notes: Vec<NoteData>,
}

impl Chart {
    /// Parse and validate a chart document.
    pub fn from_json_str(content: &str, lane_count: usize) -> Result<Self, ChartError> {
        let mut chart: Chart = serde_json::from_str(content)?;
        chart.validate(lane_count)?;
        chart.notes.sort_by_key(|n| n.time);
        debug!(
            "parsed chart '{}' with {} notes",
            chart.meta.title,
            chart.notes.len()
        );
        Ok(chart)
    }

    /// Read, parse and validate a chart file.
    pub fn from_path<P: AsRef<Path>>(path: P, lane_count: usize) -> Result<Self, ChartError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ChartError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content, lane_count)
    }

    /// Check every note against the lane layout. Fails on the first problem.
    pub fn validate(&self, lane_count: usize) -> Result<(), ChartError> {
        if !self.meta.bpm.is_finite() || self.meta.bpm <= 0.0 {
            return Err(ChartError::InvalidBpm(self.meta.bpm));
        }

        for (index, note) in self.notes.iter().enumerate() {
            if note.lane >= lane_count {
                return Err(ChartError::InvalidLane {
                    index,
                    lane: note.lane,
                    lane_count,
                });
            }
            if note.note_type == NoteType::Hold && note.duration.unwrap_or(0) == 0 {
                return Err(ChartError::MissingHoldDuration { index });
            }
            if note.time.checked_add(note.duration.unwrap_or(0)).is_none() {
                return Err(ChartError::HoldEndOverflow { index });
            }
        }
        Ok(())
    }

    /// Fresh runtime notes, one per chart entry, in chart order.
    pub fn build_notes(&self) -> Vec<Note> {
        self.notes
            .iter()
            .map(|data| {
                let kind = match data.note_type {
                    NoteType::Tap => NoteKind::Tap,
                    NoteType::Hold => NoteKind::Hold {
                        duration_ms: data.duration.unwrap_or(0) as f64,
                    },
                };
                Note::new(data.time as f64, data.lane, kind)
            })
            .collect()
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    pub fn hold_count(&self) -> usize {
        self.notes
            .iter()
            .filter(|n| n.note_type == NoteType::Hold)
            .count()
    }

    /// End time of the last note (including hold tails), in milliseconds.
    pub fn last_note_end_ms(&self) -> u64 {
        self.notes.iter().map(NoteData::end_time).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "version": 1,
        "meta": {
            "title": "Test Song",
            "artist": "Someone",
            "bpm": 120,
            "offset": 0,
            "difficulty": "NORMAL",
            "level": 5,
            "audioFile": "test.ogg"
        },
        "notes": [
            {"time": 1500, "lane": 1, "type": "tap"},
            {"time": 1000, "lane": 0, "type": "tap"},
            {"time": 2000, "lane": 3, "type": "hold", "duration": 1000}
        ]
    }"#;

    #[test]
    fn parse_sample_chart() {
        let chart = Chart::from_json_str(SAMPLE, LANE_COUNT).unwrap();
        assert_eq!(chart.meta.title, "Test Song");
        assert_eq!(chart.meta.audio_file.as_deref(), Some("test.ogg"));
        assert_eq!(chart.note_count(), 3);
        assert_eq!(chart.hold_count(), 1);
        // Sorted by time on load
        assert_eq!(chart.notes[0].time, 1000);
        assert_eq!(chart.notes[1].time, 1500);
        assert_eq!(chart.last_note_end_ms(), 3000);
    }

    #[test]
    fn lane_out_of_range_rejected() {
        let json = r#"{"meta": {"title": "x", "bpm": 100},
            "notes": [{"time": 0, "lane": 4, "type": "tap"}]}"#;
        let err = Chart::from_json_str(json, LANE_COUNT).unwrap_err();
        assert!(matches!(err, ChartError::InvalidLane { lane: 4, .. }));
    }

    #[test]
    fn hold_without_duration_rejected() {
        let json = r#"{"meta": {"title": "x", "bpm": 100},
            "notes": [{"time": 0, "lane": 0, "type": "hold"}]}"#;
        let err = Chart::from_json_str(json, LANE_COUNT).unwrap_err();
        assert!(matches!(err, ChartError::MissingHoldDuration { index: 0 }));
    }

    #[test]
    fn negative_time_is_a_parse_error() {
        let json = r#"{"meta": {"title": "x", "bpm": 100},
            "notes": [{"time": -5, "lane": 0, "type": "tap"}]}"#;
        assert!(matches!(
            Chart::from_json_str(json, LANE_COUNT),
            Err(ChartError::Parse(_))
        ));
    }

    #[test]
    fn hold_ending_past_time_range_rejected() {
        let json = r#"{"meta": {"title": "x", "bpm": 100},
            "notes": [
                {"time": 1000, "lane": 1, "type": "tap"},
                {"time": 4294967000, "lane": 0, "type": "hold", "duration": 1000}
            ]}"#;
        let err = Chart::from_json_str(json, LANE_COUNT).unwrap_err();
        assert!(matches!(err, ChartError::HoldEndOverflow { index: 1 }));
    }

    #[test]
    fn unvalidated_hold_end_does_not_wrap() {
        let note = NoteData::hold(u32::MAX, 0, u32::MAX);
        assert_eq!(note.end_time(), 2 * u64::from(u32::MAX));
    }

    #[test]
    fn zero_bpm_rejected() {
        let json = r#"{"meta": {"title": "x", "bpm": 0}, "notes": []}"#;
        assert!(matches!(
            Chart::from_json_str(json, LANE_COUNT),
            Err(ChartError::InvalidBpm(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Chart::from_path("/nonexistent/chart.json", LANE_COUNT).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/chart.json"));
    }

    #[test]
    fn build_notes_is_fresh_each_time() {
        let chart = Chart::from_json_str(SAMPLE, LANE_COUNT).unwrap();
        let mut first = chart.build_notes();
        first[0].miss();
        let second = chart.build_notes();
        assert!(!second[0].is_missed());
        assert_eq!(second[2].end_time(), 3000.0);
    }
}
