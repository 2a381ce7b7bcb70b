//! Runtime note state machine.
//!
//! Tap notes move `Pending -> Active -> Hit | Missed`; hold notes move
//! `Pending -> Active -> Holding -> Completed | ReleasedEarly | Missed`.
//! Every transition is driven by the clock value handed in by the caller,
//! so a note is a pure function of time plus the press/release events it saw.

/// A note not pressed within this many milliseconds after its time is missed.
pub const MISS_WINDOW_MS: f64 = 200.0;

/// A hold released more than this many milliseconds before its end fails.
pub const RELEASE_TOLERANCE_MS: f64 = 200.0;

/// Note variant. Hold-only data lives on the `Hold` tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoteKind {
    Tap,
    Hold { duration_ms: f64 },
}

impl NoteKind {
    pub fn is_hold(&self) -> bool {
        matches!(self, Self::Hold { .. })
    }

    pub fn duration_ms(&self) -> f64 {
        match self {
            Self::Tap => 0.0,
            Self::Hold { duration_ms } => *duration_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteState {
    /// Not yet inside the look-ahead window.
    Pending,
    /// Visible and judgeable.
    Active,
    /// Tap note pressed.
    Hit,
    /// Hold note grabbed and still held.
    Holding,
    /// Hold note held to (or released near) its end.
    Completed,
    /// Hold note let go too early. Not a success; the caller follows up
    /// with [`Note::miss`].
    ReleasedEarly,
    Missed,
}

/// Something a transition changed, reported so the caller can score it or
/// update presentation without inspecting the note before and after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteEvent {
    Activated,
    Hit,
    HoldStarted,
    HoldCompleted,
    ReleasedEarly,
    Missed,
}

/// Result of [`Note::release`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Released within tolerance of the hold's end.
    Completed,
    /// Released more than [`RELEASE_TOLERANCE_MS`] before the end.
    Early,
    /// Not a hold note, or not currently held. Nothing changed.
    NotHolding,
}

impl ReleaseOutcome {
    pub fn is_success(self) -> bool {
        self == Self::Completed
    }
}

/// Input to the pure transition form, [`Note::transition`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoteInput {
    Advance { time_ms: f64, lookahead_ms: f64 },
    Hit,
    Release { time_ms: f64 },
    Miss,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    time_ms: f64,
    lane: usize,
    kind: NoteKind,
    state: NoteState,
    was_hit: bool,
    /// `time - current_time` as of the last `update_position`.
    delta_ms: f64,
}

impl Note {
    pub fn new(time_ms: f64, lane: usize, kind: NoteKind) -> Self {
        Self {
            time_ms,
            lane,
            kind,
            state: NoteState::Pending,
            was_hit: false,
            delta_ms: f64::INFINITY,
        }
    }

    pub fn tap(time_ms: f64, lane: usize) -> Self {
        Self::new(time_ms, lane, NoteKind::Tap)
    }

    pub fn hold(time_ms: f64, lane: usize, duration_ms: f64) -> Self {
        Self::new(time_ms, lane, NoteKind::Hold { duration_ms })
    }

    pub fn time(&self) -> f64 {
        self.time_ms
    }

    pub fn lane(&self) -> usize {
        self.lane
    }

    pub fn kind(&self) -> NoteKind {
        self.kind
    }

    pub fn end_time(&self) -> f64 {
        self.time_ms + self.kind.duration_ms()
    }

    pub fn state(&self) -> NoteState {
        self.state
    }

    /// Milliseconds until the note reaches the judgment line (negative once past).
    pub fn delta_ms(&self) -> f64 {
        self.delta_ms
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, NoteState::Active | NoteState::Holding)
    }

    pub fn is_hit(&self) -> bool {
        self.was_hit
    }

    pub fn is_missed(&self) -> bool {
        self.state == NoteState::Missed
    }

    pub fn is_holding(&self) -> bool {
        self.state == NoteState::Holding
    }

    pub fn is_hold_completed(&self) -> bool {
        self.state == NoteState::Completed
    }

    /// True once the note can no longer be judged or rendered.
    /// A grabbed hold is not processed: it can still fail on release.
    pub fn is_processed(&self) -> bool {
        match self.kind {
            NoteKind::Tap => matches!(self.state, NoteState::Hit | NoteState::Missed),
            NoteKind::Hold { .. } => {
                matches!(self.state, NoteState::Completed | NoteState::Missed)
            }
        }
    }

    fn is_unclaimed(&self) -> bool {
        matches!(self.state, NoteState::Pending | NoteState::Active)
    }

    /// Advance the note to `current_time_ms`.
    ///
    /// Activates the note inside the look-ahead window, misses it once it is
    /// more than [`MISS_WINDOW_MS`] late without a press, and completes a held
    /// hold note when its end time is reached.
    pub fn update_position(&mut self, current_time_ms: f64, lookahead_ms: f64) -> Option<NoteEvent> {
        self.delta_ms = self.time_ms - current_time_ms;
        let mut event = None;

        if self.state == NoteState::Pending && self.delta_ms <= lookahead_ms {
            self.state = NoteState::Active;
            event = Some(NoteEvent::Activated);
        }

        if self.is_unclaimed() && !self.was_hit && self.delta_ms < -MISS_WINDOW_MS {
            self.state = NoteState::Missed;
            return Some(NoteEvent::Missed);
        }

        if self.state == NoteState::Holding && current_time_ms >= self.end_time() {
            self.state = NoteState::Completed;
            return Some(NoteEvent::HoldCompleted);
        }

        event
    }

    /// Register a press on this note. Pressing a note that was already
    /// claimed is absorbed as a no-op.
    pub fn hit(&mut self) -> Option<NoteEvent> {
        if !self.is_unclaimed() {
            return None;
        }
        self.was_hit = true;
        match self.kind {
            NoteKind::Tap => {
                self.state = NoteState::Hit;
                Some(NoteEvent::Hit)
            }
            NoteKind::Hold { .. } => {
                self.state = NoteState::Holding;
                Some(NoteEvent::HoldStarted)
            }
        }
    }

    /// Let go of a held hold note at `current_time_ms`.
    pub fn release(&mut self, current_time_ms: f64) -> ReleaseOutcome {
        if !self.kind.is_hold() || self.state != NoteState::Holding {
            return ReleaseOutcome::NotHolding;
        }

        let remaining = self.end_time() - current_time_ms;
        if remaining > RELEASE_TOLERANCE_MS {
            self.state = NoteState::ReleasedEarly;
            ReleaseOutcome::Early
        } else {
            self.state = NoteState::Completed;
            ReleaseOutcome::Completed
        }
    }

    /// Force the note into the missed state. Returns false (and changes
    /// nothing) when the note was already processed.
    pub fn miss(&mut self) -> bool {
        if self.is_processed() {
            return false;
        }
        self.state = NoteState::Missed;
        true
    }

    /// Pure transition: `(note, input) -> (note, event)`.
    pub fn transition(mut self, input: NoteInput) -> (Self, Option<NoteEvent>) {
        let event = match input {
            NoteInput::Advance {
                time_ms,
                lookahead_ms,
            } => self.update_position(time_ms, lookahead_ms),
            NoteInput::Hit => self.hit(),
            NoteInput::Release { time_ms } => match self.release(time_ms) {
                ReleaseOutcome::Completed => Some(NoteEvent::HoldCompleted),
                ReleaseOutcome::Early => Some(NoteEvent::ReleasedEarly),
                ReleaseOutcome::NotHolding => None,
            },
            NoteInput::Miss => self.miss().then_some(NoteEvent::Missed),
        };
        (self, event)
    }

    /// Read-only projection for rendering.
    pub fn snapshot(&self, index: usize) -> NoteSnapshot {
        NoteSnapshot {
            index,
            lane: self.lane,
            is_hold: self.kind.is_hold(),
            delta_ms: self.delta_ms,
            end_delta_ms: self.delta_ms + self.kind.duration_ms(),
            active: self.is_active(),
            holding: self.is_holding(),
        }
    }
}

/// What the renderer needs to place one note. `index` is the note's position
/// in the session's note list and is stable for the whole play.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteSnapshot {
    pub index: usize,
    pub lane: usize,
    pub is_hold: bool,
    pub delta_ms: f64,
    pub end_delta_ms: f64,
    pub active: bool,
    pub holding: bool,
}
