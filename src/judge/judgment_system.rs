use log::debug;

use super::judge_window::{Grade, JudgeWindow};
use crate::model::Note;

/// Result of a single judgment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JudgmentResult {
    pub grade: Grade,
    /// `actual - expected` in milliseconds. Negative means early.
    pub diff_ms: f64,
    pub points: u32,
}

impl JudgmentResult {
    pub fn new(grade: Grade, diff_ms: f64) -> Self {
        Self {
            grade,
            diff_ms,
            points: grade.points(),
        }
    }
}

/// Stateless timing classifier over the session's notes.
#[derive(Debug, Clone, Default)]
pub struct JudgmentSystem {
    window: JudgeWindow,
}

impl JudgmentSystem {
    pub fn new(window: JudgeWindow) -> Self {
        Self { window }
    }

    pub fn window(&self) -> &JudgeWindow {
        &self.window
    }

    /// Judge a press at `current_time_ms` against `note`.
    /// Returns `None` when the press is outside the miss window.
    pub fn judge(&self, note: &Note, current_time_ms: f64) -> Option<JudgmentResult> {
        let diff = current_time_ms - note.time();
        self.window
            .grade(diff.abs())
            .map(|grade| JudgmentResult::new(grade, diff))
    }

    /// Index of the unprocessed note in `lane` closest to `current_time_ms`,
    /// within the miss window. The earliest note wins ties. A hold that was
    /// already grabbed cannot be pressed again.
    pub fn find_hittable_note(
        &self,
        notes: &[Note],
        lane: usize,
        current_time_ms: f64,
    ) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (index, note) in notes.iter().enumerate() {
            if note.lane() != lane || note.is_processed() || note.is_hit() {
                continue;
            }
            let diff = (current_time_ms - note.time()).abs();
            if diff > self.window.miss {
                continue;
            }
            match best {
                Some((_, best_diff)) if best_diff <= diff => {}
                _ => best = Some((index, diff)),
            }
        }
        best.map(|(index, _)| index)
    }

    /// Miss every unprocessed, unheld note more than the miss window late.
    /// Returns the indices of the notes that were missed by this call.
    pub fn check_missed_notes(&self, notes: &mut [Note], current_time_ms: f64) -> Vec<usize> {
        let mut missed = Vec::new();
        for (index, note) in notes.iter_mut().enumerate() {
            if note.is_processed() || note.is_holding() {
                continue;
            }
            if current_time_ms - note.time() > self.window.miss && note.miss() {
                debug!(
                    "note {} (lane {}) missed at {:.1}ms",
                    index,
                    note.lane(),
                    current_time_ms
                );
                missed.push(index);
            }
        }
        missed
    }

    pub fn is_hit(grade: Grade) -> bool {
        grade.is_hit()
    }
}
