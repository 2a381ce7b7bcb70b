use serde::Serialize;

use super::score_system::{JudgeCounts, ScoreSystem};

/// Letter grade based on accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LetterGrade {
    S,
    A,
    B,
    C,
    D,
    F,
}

impl LetterGrade {
    /// Calculate the letter grade from accuracy (0.0 - 100.0).
    pub fn from_accuracy(accuracy: f64) -> Self {
        if accuracy >= 95.0 {
            Self::S
        } else if accuracy >= 90.0 {
            Self::A
        } else if accuracy >= 80.0 {
            Self::B
        } else if accuracy >= 70.0 {
            Self::C
        } else if accuracy >= 60.0 {
            Self::D
        } else {
            Self::F
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S => "S",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

/// Final numbers shown on the results screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSummary {
    pub score: u64,
    pub max_combo: u32,
    pub accuracy: f64,
    pub grade: LetterGrade,
    pub stats: JudgeCounts,
}

impl ResultSummary {
    pub fn from_score(score: &ScoreSystem) -> Self {
        Self {
            score: score.score(),
            max_combo: score.max_combo(),
            accuracy: score.accuracy(),
            grade: score.grade(),
            stats: *score.counts(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judge::{Grade, JudgmentResult};

    #[test]
    fn grade_thresholds() {
        assert_eq!(LetterGrade::from_accuracy(100.0), LetterGrade::S);
        assert_eq!(LetterGrade::from_accuracy(95.0), LetterGrade::S);
        assert_eq!(LetterGrade::from_accuracy(94.99), LetterGrade::A);
        assert_eq!(LetterGrade::from_accuracy(90.0), LetterGrade::A);
        assert_eq!(LetterGrade::from_accuracy(80.0), LetterGrade::B);
        assert_eq!(LetterGrade::from_accuracy(70.0), LetterGrade::C);
        assert_eq!(LetterGrade::from_accuracy(60.0), LetterGrade::D);
        assert_eq!(LetterGrade::from_accuracy(59.9), LetterGrade::F);
    }

    #[test]
    fn summary_from_score() {
        let mut score = ScoreSystem::new();
        score.add_judgment(&JudgmentResult::new(Grade::Perfect, 3.0));
        score.add_judgment(&JudgmentResult::new(Grade::Great, -30.0));
        let summary = ResultSummary::from_score(&score);
        assert_eq!(summary.score, 1800);
        assert_eq!(summary.max_combo, 2);
        assert_eq!(summary.stats.perfect, 1);
        assert_eq!(summary.stats.great, 1);
        assert_eq!(summary.grade, LetterGrade::A);
    }

    #[test]
    fn summary_serializes_to_json() {
        let summary = ResultSummary::from_score(&ScoreSystem::new());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["grade"], "S");
        assert_eq!(json["stats"]["miss"], 0);
    }
}
