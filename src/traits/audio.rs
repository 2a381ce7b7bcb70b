use thiserror::Error;

/// Failures reported by an audio backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AudioError {
    #[error("audio device unavailable: {0}")]
    Unavailable(String),

    #[error("audio playback failed: {0}")]
    Playback(String),
}

/// Abstraction over audio backends.
/// Implementations: NullAudio (clock-only play), MockAudio (testing).
///
/// The engine never depends on audio for correctness: every method failing
/// only degrades the session to clock-only timing.
pub trait AudioBackend {
    /// Acquire the output device. Called at most once per successful init.
    fn init(&mut self) -> Result<(), AudioError>;

    /// Start (or resume) playback at the given song position in milliseconds.
    fn play(&mut self, offset_ms: f64) -> Result<(), AudioError>;

    fn pause(&mut self);

    fn stop(&mut self);
}

/// Backend used when no audio device exists. `init` always fails so callers
/// fall back to clock-only mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioBackend for NullAudio {
    fn init(&mut self) -> Result<(), AudioError> {
        Err(AudioError::Unavailable("no audio backend configured".to_string()))
    }

    fn play(&mut self, _offset_ms: f64) -> Result<(), AudioError> {
        Ok(())
    }

    fn pause(&mut self) {}

    fn stop(&mut self) {}
}

/// A call observed by [`MockAudio`].
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCall {
    Init,
    Play(f64),
    Pause,
    Stop,
}

/// Recording backend for tests.
#[derive(Debug, Default)]
pub struct MockAudio {
    pub calls: Vec<AudioCall>,
    pub fail_init: bool,
}

impl MockAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose device can never be opened.
    pub fn failing() -> Self {
        Self {
            calls: Vec::new(),
            fail_init: true,
        }
    }

    pub fn init_count(&self) -> usize {
        self.calls.iter().filter(|c| **c == AudioCall::Init).count()
    }
}

impl AudioBackend for MockAudio {
    fn init(&mut self) -> Result<(), AudioError> {
        self.calls.push(AudioCall::Init);
        if self.fail_init {
            Err(AudioError::Unavailable("mock device refused".to_string()))
        } else {
            Ok(())
        }
    }

    fn play(&mut self, offset_ms: f64) -> Result<(), AudioError> {
        self.calls.push(AudioCall::Play(offset_ms));
        Ok(())
    }

    fn pause(&mut self) {
        self.calls.push(AudioCall::Pause);
    }

    fn stop(&mut self) {
        self.calls.push(AudioCall::Stop);
    }
}
