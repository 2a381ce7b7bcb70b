/// State of a single lane key with millisecond timestamps on the song clock.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KeyState {
    /// Whether the key is currently held down.
    pub pressed: bool,
    /// Song time of the last accepted press.
    pub press_time_ms: f64,
    /// Song time of the last accepted release.
    pub release_time_ms: f64,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if this was a new press. Auto-repeat downs while the
    /// key is held are ignored.
    pub fn on_press(&mut self, time_ms: f64) -> bool {
        if self.pressed {
            return false;
        }
        self.pressed = true;
        self.press_time_ms = time_ms;
        true
    }

    /// Returns true if the key was held.
    pub fn on_release(&mut self, time_ms: f64) -> bool {
        if !self.pressed {
            return false;
        }
        self.pressed = false;
        self.release_time_ms = time_ms;
        true
    }
}

/// Per-lane key states. Lanes outside the layout are rejected.
#[derive(Debug, Clone)]
pub struct LaneInputs {
    keys: Vec<KeyState>,
}

impl LaneInputs {
    pub fn new(lane_count: usize) -> Self {
        Self {
            keys: vec![KeyState::new(); lane_count],
        }
    }

    pub fn lane_count(&self) -> usize {
        self.keys.len()
    }

    /// Record a key down. Returns true for a new logical press.
    pub fn press(&mut self, lane: usize, time_ms: f64) -> bool {
        self.keys
            .get_mut(lane)
            .is_some_and(|key| key.on_press(time_ms))
    }

    /// Record a key up. Returns true when the lane was held.
    pub fn release(&mut self, lane: usize, time_ms: f64) -> bool {
        self.keys
            .get_mut(lane)
            .is_some_and(|key| key.on_release(time_ms))
    }

    pub fn is_pressed(&self, lane: usize) -> bool {
        self.keys.get(lane).is_some_and(|key| key.pressed)
    }

    pub fn get(&self, lane: usize) -> Option<&KeyState> {
        self.keys.get(lane)
    }

    pub fn reset(&mut self) {
        self.keys.fill(KeyState::new());
    }
}
