//! Leading-edge rate limiting for outward notifications

/// Lets an event through at most once per `interval_ms`.
///
/// The first call always passes. A window reopens once `interval_ms` has
/// elapsed since the last accepted call.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval_ms: u64,
    last_fired: Option<u64>,
}

impl Throttle {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_fired: None,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Whether an event at `now_ms` may fire; records it if so
    pub fn try_fire(&mut self, now_ms: u64) -> bool {
        let open = match self.last_fired {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.interval_ms,
        };
        if open {
            self.last_fired = Some(now_ms);
        }
        open
    }

    /// Forget the last accepted call so the next one passes
    pub fn reset(&mut self) {
        self.last_fired = None;
    }
}
