/// Lane key state at a specific point on the song clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneEvent {
    /// Lane index (0-indexed).
    pub lane: usize,
    /// true = pressed, false = released.
    pub pressed: bool,
    /// Song time in milliseconds.
    pub time_ms: f64,
}

impl LaneEvent {
    pub fn down(lane: usize, time_ms: f64) -> Self {
        Self {
            lane,
            pressed: true,
            time_ms,
        }
    }

    pub fn up(lane: usize, time_ms: f64) -> Self {
        Self {
            lane,
            pressed: false,
            time_ms,
        }
    }
}

/// Abstraction over timestamped input sources polled from the simulation.
/// Implementations: ScriptedInput (autoplay and testing).
///
/// Live keyboard input does not go through this trait; it reaches the
/// session through `lane_down`/`lane_up` and is stamped with the clock there.
pub trait InputSource {
    /// Events with `time_ms <= current_time_ms` not returned before.
    fn poll_until(&mut self, current_time_ms: f64) -> Vec<LaneEvent>;

    /// Rewind to the beginning for a restart.
    fn rewind(&mut self);
}

/// Pre-computed event list replayed in time order.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    events: Vec<LaneEvent>,
    cursor: usize,
}

impl ScriptedInput {
    /// Events are ordered by time. At equal times releases come first so a
    /// lane can be let go and pressed again on the same millisecond.
    pub fn new(mut events: Vec<LaneEvent>) -> Self {
        events.sort_by(|a, b| {
            a.time_ms
                .total_cmp(&b.time_ms)
                .then(a.pressed.cmp(&b.pressed))
        });
        Self { events, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.events.len() - self.cursor
    }
}

impl InputSource for ScriptedInput {
    fn poll_until(&mut self, current_time_ms: f64) -> Vec<LaneEvent> {
        let start = self.cursor;
        while self
            .events
            .get(self.cursor)
            .is_some_and(|e| e.time_ms <= current_time_ms)
        {
            self.cursor += 1;
        }
        self.events[start..self.cursor].to_vec()
    }

    fn rewind(&mut self) {
        self.cursor = 0;
    }
}
