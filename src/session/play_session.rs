use std::collections::VecDeque;
use std::ops::ControlFlow;
use std::path::Path;

use log::{debug, info, warn};

use crate::config::EngineConfig;
use crate::input::LaneInputs;
use crate::judge::{Grade, JudgmentResult, JudgmentSystem};
use crate::model::{Chart, Note, NoteEvent, NoteSnapshot, ReleaseOutcome};
use crate::score::{ResultSummary, ScoreSystem};
use crate::timing::{Clock, FrameReport, GameLoop, Simulation};
use crate::traits::audio::AudioBackend;
use crate::traits::input::InputSource;
use crate::traits::render::RenderSink;
use crate::traits::time::TimeProvider;

use super::autoplay::build_autoplay;
use super::command::SessionCommand;
use super::error::SessionError;

/// Session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No chart loaded.
    Idle,
    /// Chart loaded, clock at zero.
    Ready,
    /// Active play.
    Playing,
    Paused,
    /// Every note resolved; results are available.
    Finished,
}

/// Simulation state stepped by the game loop. Kept apart from the clock and
/// loop so the loop can borrow it mutably while the session owns both.
struct SessionCore<R: RenderSink> {
    notes: Vec<Note>,
    judge: JudgmentSystem,
    score: ScoreSystem,
    inputs: LaneInputs,
    render: R,
    /// Scripted input (autoplay or test script) polled each step.
    script: Option<Box<dyn InputSource>>,
    /// Song time sampled once at the start of the current frame.
    song_time_ms: f64,
    lookahead_ms: f64,
    /// Earliest song time at which a fully resolved chart finishes.
    finish_at_ms: f64,
}

impl<R: RenderSink> SessionCore<R> {
    fn apply(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::LaneDown { lane, time_ms } => self.press(lane, time_ms),
            SessionCommand::LaneUp { lane, time_ms } => self.release(lane, time_ms),
        }
    }

    fn press(&mut self, lane: usize, time_ms: f64) {
        if !self.inputs.press(lane, time_ms) {
            return;
        }
        self.render.set_lane_highlight(lane, true);

        let Some(index) = self.judge.find_hittable_note(&self.notes, lane, time_ms) else {
            debug!("lane {} pressed at {:.1}ms with nothing to hit", lane, time_ms);
            return;
        };
        let Some(result) = self.judge.judge(&self.notes[index], time_ms) else {
            return;
        };
        if self.notes[index].hit().is_some() {
            debug!(
                "note {} lane {}: {} ({:+.1}ms)",
                index, lane, result.grade, result.diff_ms
            );
            self.record_judgment(lane, &result);
        }
    }

    fn release(&mut self, lane: usize, time_ms: f64) {
        if !self.inputs.release(lane, time_ms) {
            return;
        }
        self.render.set_lane_highlight(lane, false);

        let Some(index) = self
            .notes
            .iter()
            .position(|n| n.lane() == lane && n.is_holding())
        else {
            return;
        };
        let note = &mut self.notes[index];
        match note.release(time_ms) {
            ReleaseOutcome::Completed => {
                let end = note.end_time();
                self.reward_hold(lane, time_ms - end);
            }
            ReleaseOutcome::Early => {
                debug!(
                    "hold {} lane {} released {:.1}ms early",
                    index,
                    lane,
                    note.end_time() - time_ms
                );
                // Resolve now so the passive sweep cannot count it again.
                note.miss();
                self.record_miss(lane);
            }
            ReleaseOutcome::NotHolding => {}
        }
    }

    /// Hold completion is a flat PERFECT regardless of release precision.
    fn reward_hold(&mut self, lane: usize, diff_ms: f64) {
        self.record_judgment(lane, &JudgmentResult::new(Grade::Perfect, diff_ms));
    }

    fn record_judgment(&mut self, lane: usize, result: &JudgmentResult) {
        self.score.add_judgment(result);
        self.render.show_judgment(lane, result.grade);
        self.publish_score();
    }

    fn record_miss(&mut self, lane: usize) {
        self.score.miss();
        self.render.show_judgment(lane, Grade::Miss);
        self.publish_score();
    }

    fn publish_score(&mut self) {
        self.render.update_score(self.score.score());
        self.render.update_combo(self.score.combo());
    }

    fn is_complete(&self) -> bool {
        self.notes.iter().all(Note::is_processed)
    }

    fn snapshots(&self) -> Vec<NoteSnapshot> {
        self.notes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_active())
            .map(|(i, n)| n.snapshot(i))
            .collect()
    }
}

impl<R: RenderSink> Simulation for SessionCore<R> {
    fn update(&mut self, _dt_ms: f64) -> ControlFlow<()> {
        let now = self.song_time_ms;

        let scripted = match self.script.as_mut() {
            Some(script) => script.poll_until(now),
            None => Vec::new(),
        };
        for event in scripted {
            if event.pressed {
                self.press(event.lane, event.time_ms);
            } else {
                self.release(event.lane, event.time_ms);
            }
        }

        for index in 0..self.notes.len() {
            let note = &mut self.notes[index];
            let lane = note.lane();
            match note.update_position(now, self.lookahead_ms) {
                Some(NoteEvent::Missed) => self.record_miss(lane),
                Some(NoteEvent::HoldCompleted) => {
                    let end = note.end_time();
                    self.reward_hold(lane, now - end);
                }
                _ => {}
            }
        }

        for index in self.judge.check_missed_notes(&mut self.notes, now) {
            let lane = self.notes[index].lane();
            self.record_miss(lane);
        }

        if self.is_complete() && now > self.finish_at_ms {
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }

    fn render(&mut self, alpha: f64) {
        let snapshots = self.snapshots();
        self.render.draw_notes(&snapshots, alpha);
    }
}

/// One play of one chart.
///
/// The host calls [`PlaySession::frame`] once per display refresh and
/// forwards key events through [`PlaySession::lane_down`] and
/// [`PlaySession::lane_up`]. Key events are queued and applied at the start
/// of the next frame, before any fixed update runs.
pub struct PlaySession<T: TimeProvider, A: AudioBackend, R: RenderSink> {
    config: EngineConfig,
    phase: SessionPhase,
    chart: Option<Chart>,
    clock: Clock<T>,
    game_loop: GameLoop,
    audio: A,
    commands: VecDeque<SessionCommand>,
    core: SessionCore<R>,
    results: Option<ResultSummary>,
}

impl<T: TimeProvider, A: AudioBackend, R: RenderSink> PlaySession<T, A, R> {
    pub fn new(config: EngineConfig, time: T, audio: A, render: R) -> Self {
        let core = SessionCore {
            notes: Vec::new(),
            judge: JudgmentSystem::default(),
            score: ScoreSystem::new(),
            inputs: LaneInputs::new(config.lane_count),
            render,
            script: None,
            song_time_ms: 0.0,
            lookahead_ms: config.spawn_offset_ms,
            finish_at_ms: 0.0,
        };
        Self {
            game_loop: GameLoop::new(config.fixed_step_ms, config.max_updates_per_frame),
            config,
            phase: SessionPhase::Idle,
            chart: None,
            clock: Clock::new(time),
            audio,
            commands: VecDeque::new(),
            core,
            results: None,
        }
    }

    /// Acquire the audio device. Returns false when running clock-only.
    pub fn init(&mut self) -> bool {
        if self.clock.init(&mut self.audio).is_err() {
            debug!("session continues clock-only");
        }
        self.clock.has_audio()
    }

    /// Replace the current chart. An invalid chart leaves the session as it
    /// was.
    pub fn load_chart(&mut self, mut chart: Chart) -> Result<(), SessionError> {
        chart.validate(self.config.lane_count)?;
        chart.notes.sort_by_key(|n| n.time);

        let finish_at_ms = chart.last_note_end_ms() as f64 + self.config.finish_margin_ms;
        let script = if self.config.autoplay.is_enabled() {
            let autoplay: Box<dyn InputSource> = Box::new(build_autoplay(&chart));
            Some(autoplay)
        } else {
            None
        };

        // Nothing below can fail.
        if self.clock.has_audio() && self.phase != SessionPhase::Idle {
            self.audio.stop();
        }
        if self.phase == SessionPhase::Finished {
            self.core.render.hide_results();
        }
        self.core.finish_at_ms = finish_at_ms;
        self.core.script = script;
        info!(
            "loaded chart '{}' ({} notes, {} holds)",
            chart.meta.title,
            chart.note_count(),
            chart.hold_count()
        );
        self.chart = Some(chart);
        self.reset_play_state();
        Ok(())
    }

    /// Read and load a chart file.
    pub fn load_chart_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), SessionError> {
        let chart = Chart::from_path(path, self.config.lane_count)?;
        self.load_chart(chart)
    }

    /// Drive input from a script instead of (or alongside) live keys.
    /// Cleared by the next `load_chart`.
    pub fn set_input_source(&mut self, source: Box<dyn InputSource>) {
        self.core.script = Some(source);
    }

    /// Begin playing a loaded chart. Starting twice is a no-op.
    pub fn start(&mut self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Idle => return Err(SessionError::NoChart),
            SessionPhase::Ready => {}
            _ => return Ok(()),
        }

        let offset = self.start_offset_ms();
        if self.clock.has_audio()
            && let Err(e) = self.audio.play(offset)
        {
            warn!("audio playback failed, continuing clock-only: {}", e);
        }
        self.clock.start(offset);
        self.game_loop.start();
        self.phase = SessionPhase::Playing;
        info!("play started (offset {:+.1}ms)", offset);
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.phase != SessionPhase::Playing {
            return;
        }
        self.clock.pause();
        if self.clock.has_audio() {
            self.audio.pause();
        }
        self.game_loop.suspend();
        self.phase = SessionPhase::Paused;
        debug!("paused at {:.1}ms", self.clock.current_time_ms());
    }

    pub fn resume(&mut self) {
        if self.phase != SessionPhase::Paused {
            return;
        }
        self.clock.start(self.start_offset_ms());
        if self.clock.has_audio()
            && let Err(e) = self.audio.play(self.clock.current_time_ms())
        {
            warn!("audio resume failed: {}", e);
        }
        self.game_loop.resume();
        self.phase = SessionPhase::Playing;
        debug!("resumed at {:.1}ms", self.clock.current_time_ms());
    }

    /// Replay the loaded chart from the beginning.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        if self.chart.is_none() {
            return Err(SessionError::NoChart);
        }
        if self.clock.has_audio() {
            self.audio.stop();
        }
        self.reset_play_state();
        self.core.render.hide_results();
        self.start()
    }

    /// Queue a key down for `lane`. Returns false when the session is not
    /// playing or the lane is outside the layout.
    pub fn lane_down(&mut self, lane: usize) -> bool {
        self.enqueue(lane, true)
    }

    /// Queue a key up for `lane`.
    pub fn lane_up(&mut self, lane: usize) -> bool {
        self.enqueue(lane, false)
    }

    fn enqueue(&mut self, lane: usize, pressed: bool) -> bool {
        if self.phase != SessionPhase::Playing || lane >= self.config.lane_count {
            return false;
        }
        let time_ms = self.clock.current_time_ms();
        self.commands.push_back(if pressed {
            SessionCommand::LaneDown { lane, time_ms }
        } else {
            SessionCommand::LaneUp { lane, time_ms }
        });
        true
    }

    /// Per-frame entry point. Returns `None` when not playing.
    pub fn frame(&mut self) -> Option<FrameReport> {
        if self.phase != SessionPhase::Playing {
            return None;
        }

        self.core.song_time_ms = self.clock.current_time_ms();
        while let Some(command) = self.commands.pop_front() {
            self.core.apply(command);
        }

        let wall_ms = self.clock.time_provider().now_ms();
        let report = self.game_loop.frame(wall_ms, &mut self.core)?;
        if report.stopped {
            self.finish();
        }
        Some(report)
    }

    fn finish(&mut self) {
        if self.clock.has_audio() {
            self.audio.stop();
        }
        self.clock.pause();
        self.game_loop.stop();
        self.phase = SessionPhase::Finished;

        let summary = ResultSummary::from_score(&self.core.score);
        info!(
            "play finished: score {} max combo {} accuracy {:.2}% grade {}",
            summary.score,
            summary.max_combo,
            summary.accuracy,
            summary.grade.as_str()
        );
        self.core.render.show_results(&summary);
        self.results = Some(summary);
    }

    fn reset_play_state(&mut self) {
        if let Some(chart) = &self.chart {
            self.core.notes = chart.build_notes();
        }
        self.core.score.reset();
        self.core.inputs.reset();
        self.core.song_time_ms = 0.0;
        if let Some(script) = self.core.script.as_mut() {
            script.rewind();
        }
        self.commands.clear();
        self.clock.reset();
        self.game_loop.stop();
        self.results = None;
        self.phase = SessionPhase::Ready;
    }

    fn start_offset_ms(&self) -> f64 {
        let chart_offset = self.chart.as_ref().map_or(0, |c| c.meta.offset);
        chart_offset as f64 + self.config.audio_offset_ms
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn chart(&self) -> Option<&Chart> {
        self.chart.as_ref()
    }

    pub fn notes(&self) -> &[Note] {
        &self.core.notes
    }

    pub fn score(&self) -> &ScoreSystem {
        &self.core.score
    }

    pub fn clock(&self) -> &Clock<T> {
        &self.clock
    }

    pub fn game_loop(&self) -> &GameLoop {
        &self.game_loop
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn render(&self) -> &R {
        &self.core.render
    }

    pub fn render_mut(&mut self) -> &mut R {
        &mut self.core.render
    }

    /// Final summary, once the session has finished.
    pub fn results(&self) -> Option<&ResultSummary> {
        self.results.as_ref()
    }

    pub fn current_time_ms(&self) -> f64 {
        self.clock.current_time_ms()
    }

    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    /// Render projection of the notes currently on the highway.
    pub fn snapshots(&self) -> Vec<NoteSnapshot> {
        self.core.snapshots()
    }
}
