use serde::Serialize;

use crate::judge::{Grade, JudgmentResult};

use super::play_result::LetterGrade;

/// Per-grade judgment counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JudgeCounts {
    pub perfect: u32,
    pub great: u32,
    pub good: u32,
    pub bad: u32,
    pub miss: u32,
}

impl JudgeCounts {
    pub fn get(&self, grade: Grade) -> u32 {
        match grade {
            Grade::Perfect => self.perfect,
            Grade::Great => self.great,
            Grade::Good => self.good,
            Grade::Bad => self.bad,
            Grade::Miss => self.miss,
        }
    }

    fn record(&mut self, grade: Grade) {
        match grade {
            Grade::Perfect => self.perfect += 1,
            Grade::Great => self.great += 1,
            Grade::Good => self.good += 1,
            Grade::Bad => self.bad += 1,
            Grade::Miss => self.miss += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.perfect + self.great + self.good + self.bad + self.miss
    }
}

/// Snapshot of the running score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreState {
    pub score: u64,
    pub combo: u32,
    pub max_combo: u32,
    pub counts: JudgeCounts,
}

/// Combo multiplier in percent. Integer so the floor is exact.
fn combo_multiplier_percent(combo: u32) -> u64 {
    match combo {
        0..=9 => 100,
        10..=24 => 110,
        25..=49 => 125,
        50..=99 => 150,
        _ => 200,
    }
}

/// Score multiplier for a combo count.
pub fn combo_multiplier(combo: u32) -> f64 {
    combo_multiplier_percent(combo) as f64 / 100.0
}

/// Combo-weighted score tracker.
#[derive(Debug, Clone, Default)]
pub struct ScoreSystem {
    state: ScoreState,
}

impl ScoreSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a judgment. Hit grades extend the combo and are multiplied by
    /// the multiplier for the new combo; BAD breaks the combo and scores flat.
    pub fn add_judgment(&mut self, result: &JudgmentResult) {
        let state = &mut self.state;
        state.counts.record(result.grade);

        if result.grade.is_hit() {
            state.combo += 1;
            state.max_combo = state.max_combo.max(state.combo);
            let pct = combo_multiplier_percent(state.combo);
            state.score += result.points as u64 * pct / 100;
        } else {
            state.combo = 0;
            state.score += result.points as u64;
        }
    }

    /// Record a note that was never pressed.
    pub fn miss(&mut self) {
        self.state.counts.record(Grade::Miss);
        self.state.combo = 0;
    }

    /// Weighted accuracy in percent. 100 before anything is judged.
    pub fn accuracy(&self) -> f64 {
        let counts = &self.state.counts;
        let total = counts.total();
        if total == 0 {
            return 100.0;
        }
        let weighted: u32 = [
            Grade::Perfect,
            Grade::Great,
            Grade::Good,
            Grade::Bad,
            Grade::Miss,
        ]
        .iter()
        .map(|g| counts.get(*g) * g.accuracy_weight())
        .sum();
        weighted as f64 / total as f64
    }

    pub fn grade(&self) -> LetterGrade {
        LetterGrade::from_accuracy(self.accuracy())
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn combo(&self) -> u32 {
        self.state.combo
    }

    pub fn max_combo(&self) -> u32 {
        self.state.max_combo
    }

    pub fn counts(&self) -> &JudgeCounts {
        &self.state.counts
    }

    pub fn state(&self) -> ScoreState {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = ScoreState::default();
    }
}
