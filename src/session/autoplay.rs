//! Autoplay: scripted input that plays a chart perfectly.

use serde::{Deserialize, Serialize};

use crate::model::{Chart, NoteType};
use crate::traits::input::{LaneEvent, ScriptedInput};

/// Autoplay mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoplayMode {
    /// Autoplay disabled.
    #[default]
    Off,
    /// Every lane is automated.
    Full,
}

impl AutoplayMode {
    pub fn is_enabled(self) -> bool {
        self != Self::Off
    }
}

/// How long autoplay keeps a tap note's key down (ms).
const TAP_PRESS_DURATION_MS: f64 = 50.0;

/// Build the autoplay script for a chart: a press at every note time, a
/// release shortly after taps and at the end of holds.
pub fn build_autoplay(chart: &Chart) -> ScriptedInput {
    let mut events = Vec::with_capacity(chart.notes.len() * 2);

    for (index, note) in chart.notes.iter().enumerate() {
        let time = note.time as f64;
        let release = match note.note_type {
            NoteType::Hold => note.end_time() as f64,
            NoteType::Tap => {
                // Let go before the next note in the same lane is due.
                let next_in_lane = chart.notes[index + 1..]
                    .iter()
                    .find(|n| n.lane == note.lane)
                    .map(|n| n.time as f64);
                match next_in_lane {
                    Some(next) => (time + TAP_PRESS_DURATION_MS).min(next),
                    None => time + TAP_PRESS_DURATION_MS,
                }
            }
        };
        events.push(LaneEvent::down(note.lane, time));
        events.push(LaneEvent::up(note.lane, release));
    }

    ScriptedInput::new(events)
}
