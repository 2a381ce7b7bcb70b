/// Input queued by the host and applied at the next frame boundary.
/// Times are song-clock milliseconds sampled when the input arrived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionCommand {
    LaneDown { lane: usize, time_ms: f64 },
    LaneUp { lane: usize, time_ms: f64 },
}
