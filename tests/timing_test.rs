use std::ops::ControlFlow;
use std::rc::Rc;

use judgeline::timing::{Clock, GameLoop, Simulation};
use judgeline::traits::time::MockTimeProvider;

fn mock_clock() -> (Rc<MockTimeProvider>, Clock<Rc<MockTimeProvider>>) {
    let time = Rc::new(MockTimeProvider::new());
    (Rc::clone(&time), Clock::new(time))
}

#[test]
fn test_clock_continuity_across_pause_resume() {
    let (time, mut clock) = mock_clock();
    clock.start(0.0);
    time.advance_ms(1000.0);
    clock.pause();
    let frozen = clock.current_time_ms();

    time.advance_ms(5000.0);
    clock.start(0.0);
    let resumed = clock.current_time_ms();
    assert!((resumed - frozen).abs() < 1e-3);

    time.advance_ms(100.0);
    assert!((clock.current_time_ms() - (frozen + 100.0)).abs() < 1e-3);
}

#[test]
fn test_clock_many_pauses_do_not_drift() {
    let (time, mut clock) = mock_clock();
    clock.start(0.0);
    for _ in 0..100 {
        time.advance_ms(10.0);
        clock.pause();
        time.advance_ms(333.0);
        clock.start(0.0);
    }
    assert_eq!(clock.current_time_ms(), 1000.0);
}

#[test]
fn test_clock_monotonic_while_running() {
    let (time, mut clock) = mock_clock();
    clock.start(-50.0);
    let mut last = clock.current_time_ms();
    for step in [0.0, 1.5, 16.7, 0.001, 250.0] {
        time.advance_ms(step);
        let now = clock.current_time_ms();
        assert!(now >= last);
        last = now;
    }
}

struct Recorder {
    updates: u32,
    alphas: Vec<f64>,
}

impl Simulation for Recorder {
    fn update(&mut self, dt_ms: f64) -> ControlFlow<()> {
        assert_eq!(dt_ms, 1000.0 / 60.0);
        self.updates += 1;
        ControlFlow::Continue(())
    }

    fn render(&mut self, alpha: f64) {
        self.alphas.push(alpha);
    }
}

#[test]
fn test_loop_spiral_of_death_clamp() {
    let mut game_loop = GameLoop::default();
    let mut sim = Recorder {
        updates: 0,
        alphas: Vec::new(),
    };
    game_loop.start();
    game_loop.frame(0.0, &mut sim);

    let step = game_loop.step_ms();
    let report = game_loop.frame(step * 10.0, &mut sim).unwrap();
    assert!(report.updates <= 5);
    assert!(report.alpha >= 0.0 && report.alpha < 1.0);
}

#[test]
fn test_loop_jittery_frames_stay_bounded() {
    let mut game_loop = GameLoop::default();
    let mut sim = Recorder {
        updates: 0,
        alphas: Vec::new(),
    };
    game_loop.start();
    let mut now = 0.0;
    for gap in [16.0, 17.5, 3.0, 33.4, 0.0, 120.0, 8.3, 16.7] {
        now += gap;
        let report = game_loop.frame(now, &mut sim).unwrap();
        assert!(report.updates <= game_loop.max_steps());
    }
    assert!(sim.alphas.iter().all(|a| (0.0..1.0).contains(a)));
    assert!(sim.updates > 0);
}

#[test]
fn test_loop_stop_ignores_queued_frame() {
    let mut game_loop = GameLoop::default();
    let mut sim = Recorder {
        updates: 0,
        alphas: Vec::new(),
    };
    game_loop.start();
    game_loop.frame(0.0, &mut sim);
    game_loop.frame(7.0, &mut sim);
    assert_eq!(sim.updates, 0);
    assert_eq!(game_loop.accumulator(), 7.0);

    // starting a running loop keeps partial progress
    game_loop.start();
    assert_eq!(game_loop.accumulator(), 7.0);
    let report = game_loop.frame(17.0, &mut sim).unwrap();
    assert_eq!(report.updates, 1);
    assert_eq!(sim.updates, 1);

    game_loop.stop();
    assert!(game_loop.frame(100.0, &mut sim).is_none());
    assert_eq!(sim.updates, 1);
}
