pub mod judge_window;
pub mod judgment_system;

pub use judge_window::{Grade, JudgeWindow};
pub use judgment_system::{JudgmentResult, JudgmentSystem};
