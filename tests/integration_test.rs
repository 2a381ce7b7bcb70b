use std::path::PathBuf;
use std::rc::Rc;

use judgeline::config::EngineConfig;
use judgeline::judge::Grade;
use judgeline::model::{Chart, ChartMeta, NoteData};
use judgeline::session::{AutoplayMode, PlaySession, SessionError, SessionPhase};
use judgeline::traits::audio::{AudioCall, MockAudio};
use judgeline::traits::input::{LaneEvent, ScriptedInput};
use judgeline::traits::render::{RecordingRender, RenderEvent};
use judgeline::traits::time::MockTimeProvider;

type TestSession = PlaySession<Rc<MockTimeProvider>, MockAudio, RecordingRender>;

const FRAME_MS: f64 = 1000.0 / 60.0;

fn chart(notes: Vec<NoteData>) -> Chart {
    Chart {
        version: 1,
        meta: ChartMeta {
            title: "integration".to_string(),
            artist: "tests".to_string(),
            bpm: 140.0,
            offset: 0,
            difficulty: "NORMAL".to_string(),
            level: 4,
            audio_file: None,
        },
        notes,
    }
}

fn new_session(config: EngineConfig, audio: MockAudio) -> (Rc<MockTimeProvider>, TestSession) {
    let time = Rc::new(MockTimeProvider::new());
    let session = PlaySession::new(config, Rc::clone(&time), audio, RecordingRender::new());
    (time, session)
}

fn started(notes: Vec<NoteData>) -> (Rc<MockTimeProvider>, TestSession) {
    let (time, mut session) = new_session(EngineConfig::default(), MockAudio::new());
    session.init();
    session.load_chart(chart(notes)).unwrap();
    session.start().unwrap();
    session.frame();
    (time, session)
}

/// Run host frames until song time reaches `target_ms` or play ends.
fn advance_to(time: &MockTimeProvider, session: &mut TestSession, target_ms: f64) {
    while session.phase() == SessionPhase::Playing && session.current_time_ms() < target_ms {
        time.advance_ms(FRAME_MS);
        session.frame();
    }
}

fn run_to_end(time: &MockTimeProvider, session: &mut TestSession) {
    advance_to(time, session, 60_000.0);
}

#[test]
fn test_manual_tap_is_perfect() {
    let (time, mut session) = started(vec![NoteData::tap(1000, 0)]);
    advance_to(&time, &mut session, 1000.0);
    assert!(session.lane_down(0));
    session.frame();

    assert!(session.notes()[0].is_hit());
    assert_eq!(session.score().counts().perfect, 1);
    assert_eq!(session.score().score(), 1000);
    assert!(
        session
            .render()
            .events
            .contains(&RenderEvent::LaneHighlight { lane: 0, on: true })
    );
}

#[test]
fn test_repeated_key_down_is_one_press() {
    let (time, mut session) = started(vec![NoteData::tap(1000, 0), NoteData::tap(1100, 0)]);
    advance_to(&time, &mut session, 1000.0);
    session.lane_down(0);
    session.lane_down(0);
    session.frame();

    assert_eq!(session.score().counts().total(), 1);
    assert!(!session.notes()[1].is_hit());
}

#[test]
fn test_untouched_note_missed_exactly_once() {
    let (time, mut session) = started(vec![NoteData::tap(1000, 2)]);
    run_to_end(&time, &mut session);

    assert_eq!(session.phase(), SessionPhase::Finished);
    assert_eq!(session.score().counts().miss, 1);
    assert_eq!(session.render().judgments(), vec![Grade::Miss]);
}

#[test]
fn test_hold_premature_release_counts_one_miss() {
    let (time, mut session) = started(vec![NoteData::hold(1000, 0, 2000)]);
    advance_to(&time, &mut session, 1000.0);
    session.lane_down(0);
    session.frame();
    assert!(session.notes()[0].is_holding());

    advance_to(&time, &mut session, 2500.0);
    session.lane_up(0);
    session.frame();
    assert!(session.notes()[0].is_missed());

    run_to_end(&time, &mut session);
    let counts = session.score().counts();
    assert_eq!(counts.perfect, 1);
    assert_eq!(counts.miss, 1);
    assert_eq!(session.render().judgments(), vec![Grade::Perfect, Grade::Miss]);
}

#[test]
fn test_hold_release_near_end_rewards_perfect() {
    let (time, mut session) = started(vec![NoteData::hold(1000, 1, 2000)]);
    advance_to(&time, &mut session, 1000.0);
    session.lane_down(1);
    session.frame();

    advance_to(&time, &mut session, 2850.0);
    session.lane_up(1);
    session.frame();
    assert!(session.notes()[0].is_hold_completed());

    run_to_end(&time, &mut session);
    assert_eq!(session.score().counts().perfect, 2);
    assert_eq!(session.score().counts().miss, 0);
    // grab 1000, completion at combo 2 still x1.0
    assert_eq!(session.score().score(), 2000);
}

#[test]
fn test_hold_completes_naturally_once() {
    let (time, mut session) = started(vec![NoteData::hold(1000, 3, 500)]);
    advance_to(&time, &mut session, 1000.0);
    session.lane_down(3);
    session.frame();

    run_to_end(&time, &mut session);
    assert!(session.notes()[0].is_hold_completed());
    assert_eq!(session.score().counts().perfect, 2);
    assert_eq!(session.score().counts().total(), 2);
    assert!(!session.lane_up(3));
}

#[test]
fn test_pause_freezes_play() {
    let (time, mut session) = started(vec![NoteData::tap(1000, 0)]);
    advance_to(&time, &mut session, 500.0);
    session.pause();
    let frozen = session.current_time_ms();

    time.advance_ms(10_000.0);
    assert!(session.frame().is_none());
    assert!(!session.lane_down(0));
    assert_eq!(session.current_time_ms(), frozen);
    assert_eq!(session.score().counts().miss, 0);

    session.resume();
    assert_eq!(session.current_time_ms(), frozen);
    advance_to(&time, &mut session, 1000.0);
    session.lane_down(0);
    session.frame();
    assert_eq!(session.score().counts().perfect, 1);
    assert_eq!(session.score().counts().miss, 0);
}

#[test]
fn test_finish_shows_results_and_stops_audio() {
    let (time, mut session) = started(vec![NoteData::tap(1000, 0)]);
    run_to_end(&time, &mut session);

    assert_eq!(session.phase(), SessionPhase::Finished);
    assert!(!session.game_loop().is_running());
    assert!(!session.clock().is_running());
    assert_eq!(
        session.audio().calls,
        vec![AudioCall::Init, AudioCall::Play(0.0), AudioCall::Stop]
    );
    let results = session.results().unwrap();
    assert_eq!(session.render().results(), Some(results));
    // finishes only after the margin past the last note
    assert!(session.current_time_ms() > 3000.0);
}

#[test]
fn test_restart_resets_everything() {
    let (time, mut session) = started(vec![NoteData::tap(1000, 0)]);
    run_to_end(&time, &mut session);
    assert_eq!(session.score().counts().miss, 1);

    session.restart().unwrap();
    assert_eq!(session.phase(), SessionPhase::Playing);
    assert_eq!(session.score().counts().total(), 0);
    assert!(!session.notes()[0].is_missed());
    assert!(session.results().is_none());
    assert_eq!(session.current_time_ms(), 0.0);
    assert_eq!(
        session.render().events.last(),
        Some(&RenderEvent::HideResults)
    );
}

#[test]
fn test_empty_chart_finishes_after_margin() {
    let (time, mut session) = started(Vec::new());
    advance_to(&time, &mut session, 1900.0);
    assert_eq!(session.phase(), SessionPhase::Playing);
    run_to_end(&time, &mut session);
    assert_eq!(session.phase(), SessionPhase::Finished);
    assert_eq!(session.results().unwrap().accuracy, 100.0);
}

#[test]
fn test_clock_only_when_audio_fails() {
    let (time, mut session) = new_session(EngineConfig::default(), MockAudio::failing());
    assert!(!session.init());
    session.load_chart(chart(vec![NoteData::tap(500, 1)])).unwrap();
    session.start().unwrap();
    session.frame();
    advance_to(&time, &mut session, 500.0);
    session.lane_down(1);
    session.frame();

    assert_eq!(session.score().counts().perfect, 1);
    assert_eq!(session.audio().calls, vec![AudioCall::Init]);
}

#[test]
fn test_start_requires_chart_and_is_idempotent() {
    let (_, mut session) = new_session(EngineConfig::default(), MockAudio::new());
    assert!(matches!(session.start(), Err(SessionError::NoChart)));
    assert!(matches!(session.restart(), Err(SessionError::NoChart)));

    session.load_chart(chart(vec![NoteData::tap(1000, 0)])).unwrap();
    session.start().unwrap();
    session.start().unwrap();
    assert_eq!(session.phase(), SessionPhase::Playing);
}

#[test]
fn test_scripted_input_source() {
    let (time, mut session) = new_session(EngineConfig::default(), MockAudio::new());
    session
        .load_chart(chart(vec![NoteData::tap(1000, 0), NoteData::tap(1500, 1)]))
        .unwrap();
    session.set_input_source(Box::new(ScriptedInput::new(vec![
        LaneEvent::down(0, 1040.0),
        LaneEvent::up(0, 1100.0),
        LaneEvent::down(1, 1400.0),
    ])));
    session.start().unwrap();
    run_to_end(&time, &mut session);

    let counts = session.score().counts();
    assert_eq!(counts.great, 1);
    assert_eq!(counts.good, 1);
    assert_eq!(counts.miss, 0);
}

#[test]
fn test_autoplay_sample_chart() {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "charts", "sample.json"]
        .iter()
        .collect();
    let config = EngineConfig {
        autoplay: AutoplayMode::Full,
        ..EngineConfig::default()
    };
    let (time, mut session) = new_session(config, MockAudio::new());
    session.load_chart_file(&path).unwrap();
    let note_count = session.notes().len() as u32;
    let hold_count = session.chart().unwrap().hold_count() as u32;

    session.start().unwrap();
    run_to_end(&time, &mut session);

    let results = session.results().unwrap();
    assert_eq!(results.stats.perfect, note_count + hold_count);
    assert_eq!(results.stats.miss, 0);
    assert_eq!(results.max_combo, note_count + hold_count);
    assert_eq!(results.accuracy, 100.0);
}
