use crate::judge::Grade;
use crate::model::NoteSnapshot;
use crate::score::ResultSummary;

/// Abstraction over presentation.
/// Implementations: NullRender (headless), RecordingRender (testing).
///
/// The engine only pushes values; it never holds references to anything
/// the renderer owns.
pub trait RenderSink {
    /// Notes still on the highway, once per frame. `alpha` is the fixed-step
    /// interpolation fraction in `[0, 1)`.
    fn draw_notes(&mut self, notes: &[NoteSnapshot], alpha: f64);

    fn show_judgment(&mut self, lane: usize, grade: Grade);

    fn set_lane_highlight(&mut self, lane: usize, on: bool);

    fn update_score(&mut self, score: u64);

    fn update_combo(&mut self, combo: u32);

    fn show_results(&mut self, summary: &ResultSummary);

    fn hide_results(&mut self);
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRender;

impl RenderSink for NullRender {
    fn draw_notes(&mut self, _notes: &[NoteSnapshot], _alpha: f64) {}
    fn show_judgment(&mut self, _lane: usize, _grade: Grade) {}
    fn set_lane_highlight(&mut self, _lane: usize, _on: bool) {}
    fn update_score(&mut self, _score: u64) {}
    fn update_combo(&mut self, _combo: u32) {}
    fn show_results(&mut self, _summary: &ResultSummary) {}
    fn hide_results(&mut self) {}
}

/// A non-draw call observed by [`RecordingRender`].
#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    Judgment { lane: usize, grade: Grade },
    LaneHighlight { lane: usize, on: bool },
    Score(u64),
    Combo(u32),
    Results(ResultSummary),
    HideResults,
}

/// Records render calls for assertions in tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingRender {
    pub events: Vec<RenderEvent>,
    pub draw_calls: usize,
    pub last_notes: Vec<NoteSnapshot>,
    pub last_alpha: f64,
}

impl RecordingRender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grades shown so far, in order.
    pub fn judgments(&self) -> Vec<Grade> {
        self.events
            .iter()
            .filter_map(|e| match e {
                RenderEvent::Judgment { grade, .. } => Some(*grade),
                _ => None,
            })
            .collect()
    }

    pub fn results(&self) -> Option<&ResultSummary> {
        self.events.iter().rev().find_map(|e| match e {
            RenderEvent::Results(summary) => Some(summary),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl RenderSink for RecordingRender {
    fn draw_notes(&mut self, notes: &[NoteSnapshot], alpha: f64) {
        self.draw_calls += 1;
        self.last_notes = notes.to_vec();
        self.last_alpha = alpha;
    }

    fn show_judgment(&mut self, lane: usize, grade: Grade) {
        self.events.push(RenderEvent::Judgment { lane, grade });
    }

    fn set_lane_highlight(&mut self, lane: usize, on: bool) {
        self.events.push(RenderEvent::LaneHighlight { lane, on });
    }

    fn update_score(&mut self, score: u64) {
        self.events.push(RenderEvent::Score(score));
    }

    fn update_combo(&mut self, combo: u32) {
        self.events.push(RenderEvent::Combo(combo));
    }

    fn show_results(&mut self, summary: &ResultSummary) {
        self.events.push(RenderEvent::Results(summary.clone()));
    }

    fn hide_results(&mut self) {
        self.events.push(RenderEvent::HideResults);
    }
}
