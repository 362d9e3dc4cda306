use std::time::Duration;

/// Turns a stream of per-frame time deltas into discrete movement ticks, so
/// that the snake's speed doesn't depend on the frame rate.
///
/// When a tick fires, the accumulator is reset to zero rather than reduced by
/// the interval, so a single long frame produces one tick, never a burst of
/// catch-up ticks.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct TickScheduler {
    elapsed: Duration,
}

impl TickScheduler {
    pub(crate) fn new() -> TickScheduler {
        TickScheduler::default()
    }

    /// Add `dt` to the accumulated time and return `true` if at least
    /// `interval_ms` milliseconds have now accumulated.
    pub(crate) fn tick(&mut self, dt: Duration, interval_ms: u64) -> bool {
        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed.as_millis() >= u128::from(interval_ms) {
            self.elapsed = Duration::ZERO;
            true
        } else {
            false
        }
    }

    pub(crate) fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    #[cfg(test)]
    pub(crate) fn elapsed(&self) -> Duration {
        self.elapsed
    }
}
