//! Deterministic headless run of a chart on a simulated clock.

use std::rc::Rc;

use log::debug;
use serde::Serialize;

use crate::config::EngineConfig;
use crate::model::Chart;
use crate::score::ResultSummary;
use crate::traits::audio::NullAudio;
use crate::traits::render::NullRender;
use crate::traits::time::MockTimeProvider;

use super::error::SessionError;
use super::play_session::{PlaySession, SessionPhase};

/// Frames allowed past the expected end before giving up.
const EXTRA_FRAMES: u64 = 600;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadlessOutcome {
    pub summary: ResultSummary,
    pub frames: u64,
    pub updates: u64,
    pub song_time_ms: f64,
    pub finished: bool,
}

/// Play `chart` to the end with a host refreshing at `fps`. Input comes only
/// from autoplay, so with autoplay off every note is missed.
pub fn run_headless(
    chart: Chart,
    config: EngineConfig,
    fps: f64,
) -> Result<HeadlessOutcome, SessionError> {
    let frame_ms = 1000.0 / fps.max(1.0);
    let finish_margin = config.finish_margin_ms;
    let time = Rc::new(MockTimeProvider::new());
    let mut session = PlaySession::new(config, Rc::clone(&time), NullAudio, NullRender);
    session.init();
    session.load_chart(chart)?;

    let end_ms = session
        .chart()
        .map_or(0.0, |c| c.last_note_end_ms() as f64)
        + finish_margin;
    let max_frames = (end_ms / frame_ms).ceil() as u64 + EXTRA_FRAMES;

    session.start()?;
    let mut frames = 0;
    let mut updates = 0;
    while session.phase() == SessionPhase::Playing && frames < max_frames {
        time.advance_ms(frame_ms);
        if let Some(report) = session.frame() {
            updates += report.updates as u64;
        }
        frames += 1;
    }
    debug!("headless run: {} frames, {} updates", frames, updates);

    let finished = session.phase() == SessionPhase::Finished;
    let summary = session
        .results()
        .cloned()
        .unwrap_or_else(|| ResultSummary::from_score(session.score()));
    Ok(HeadlessOutcome {
        summary,
        frames,
        updates,
        song_time_ms: session.current_time_ms(),
        finished,
    })
}
