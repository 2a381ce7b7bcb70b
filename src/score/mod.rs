pub mod play_result;
pub mod score_system;

pub use play_result::{LetterGrade, ResultSummary};
pub use score_system::{JudgeCounts, ScoreState, ScoreSystem, combo_multiplier};
