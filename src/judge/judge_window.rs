use serde::{Deserialize, Serialize};

use crate::model::MISS_WINDOW_MS;

/// Judgment grade for a single note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Grade {
    Perfect,
    Great,
    Good,
    Bad,
    Miss,
}

impl Grade {
    /// Raw points awarded before the combo multiplier.
    pub fn points(self) -> u32 {
        match self {
            Self::Perfect => 1000,
            Self::Great => 800,
            Self::Good => 500,
            Self::Bad => 200,
            Self::Miss => 0,
        }
    }

    /// Returns true if this grade continues combo.
    pub fn is_hit(self) -> bool {
        matches!(self, Self::Perfect | Self::Great | Self::Good)
    }

    /// Weight used for accuracy, in percent.
    pub fn accuracy_weight(self) -> u32 {
        match self {
            Self::Perfect => 100,
            Self::Great => 80,
            Self::Good => 50,
            Self::Bad => 20,
            Self::Miss => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Perfect => "PERFECT",
            Self::Great => "GREAT",
            Self::Good => "GOOD",
            Self::Bad => "BAD",
            Self::Miss => "MISS",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Judge timing windows in milliseconds (half-widths, inclusive).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JudgeWindow {
    pub perfect: f64,
    pub great: f64,
    pub good: f64,
    pub bad: f64,
    /// Outer tolerance. Anything later is passively missed.
    pub miss: f64,
}

impl JudgeWindow {
    pub fn standard() -> Self {
        Self {
            perfect: 25.0,
            great: 50.0,
            good: 100.0,
            bad: 150.0,
            miss: MISS_WINDOW_MS,
        }
    }

    /// Classify an absolute timing difference. Values past the BAD window
    /// but inside the miss window still grade BAD.
    pub fn grade(&self, diff_abs: f64) -> Option<Grade> {
        if diff_abs <= self.perfect {
            Some(Grade::Perfect)
        } else if diff_abs <= self.great {
            Some(Grade::Great)
        } else if diff_abs <= self.good {
            Some(Grade::Good)
        } else if diff_abs <= self.bad.max(self.miss) {
            Some(Grade::Bad)
        } else {
            None
        }
    }
}

impl Default for JudgeWindow {
    fn default() -> Self {
        Self::standard()
    }
}
