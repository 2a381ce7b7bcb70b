use std::rc::Rc;

/// Abstraction over time sources.
/// Implementations: SystemTimeProvider (production), MockTimeProvider (testing).
pub trait TimeProvider {
    /// Current time in microseconds from an arbitrary epoch.
    /// Must never go backwards.
    fn now_us(&self) -> i64;

    /// Current time in milliseconds, with sub-millisecond precision.
    fn now_ms(&self) -> f64 {
        self.now_us() as f64 / 1000.0
    }
}

impl<T: TimeProvider + ?Sized> TimeProvider for &T {
    fn now_us(&self) -> i64 {
        (**self).now_us()
    }
}

impl<T: TimeProvider + ?Sized> TimeProvider for Rc<T> {
    fn now_us(&self) -> i64 {
        (**self).now_us()
    }
}

/// System time provider using std::time::Instant.
#[derive(Debug)]
pub struct SystemTimeProvider {
    start: std::time::Instant,
}

impl SystemTimeProvider {
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

impl Default for SystemTimeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeProvider for SystemTimeProvider {
    fn now_us(&self) -> i64 {
        self.start.elapsed().as_micros() as i64
    }
}

/// Mock time provider for deterministic testing and headless simulation.
///
/// Share it with `Rc` so the driver can advance time while a clock reads it.
#[derive(Debug)]
pub struct MockTimeProvider {
    current_us: std::cell::Cell<i64>,
}

impl MockTimeProvider {
    pub fn new() -> Self {
        Self {
            current_us: std::cell::Cell::new(0),
        }
    }

    /// Jump to an absolute time. Moving backwards is ignored to keep the
    /// source monotonic.
    pub fn set_time(&self, us: i64) {
        if us > self.current_us.get() {
            self.current_us.set(us);
        }
    }

    pub fn advance(&self, delta_us: i64) {
        self.current_us.set(self.current_us.get() + delta_us.max(0));
    }

    /// Advance by a (possibly fractional) number of milliseconds.
    pub fn advance_ms(&self, delta_ms: f64) {
        self.advance((delta_ms * 1000.0).round() as i64);
    }
}

impl Default for MockTimeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeProvider for MockTimeProvider {
    fn now_us(&self) -> i64 {
        self.current_us.get()
    }
}
