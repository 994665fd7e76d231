//! Elapsed-time sources for the animation loop.

use std::time::Instant;

/// Longest delta a [`FrameClock`] will report, in seconds.
///
/// A window that was hidden or stalled in a debugger resumes with one
/// bounded step instead of a jump.
pub const MAX_DELTA: f64 = 0.25;

/// Something that reports seconds elapsed between successive queries.
pub trait Clock {
    /// Seconds since the previous call to `delta` (or since `reset`).
    ///
    /// Implementations may bound the value: [`FrameClock`] reports at most
    /// [`MAX_DELTA`] so a stalled window resumes with one bounded step.
    fn delta(&mut self) -> f64;

    /// Restart timing so the next `delta` measures from now.
    fn reset(&mut self);

    /// Total seconds reported so far.
    fn elapsed(&self) -> f64;
}

/// Wall-clock backed [`Clock`].
pub struct FrameClock {
    previous: Instant,
    elapsed: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            previous: Instant::now(),
            elapsed: 0.0,
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FrameClock {
    fn delta(&mut self) -> f64 {
        let now = Instant::now();
        let mut delta = now.duration_since(self.previous).as_secs_f64();
        self.previous = now;

        if delta > MAX_DELTA {
            log::warn!(
                "Frame delta {:.1}ms exceeds maximum, clamping to {:.1}ms",
                delta * 1000.0,
                MAX_DELTA * 1000.0
            );
            delta = MAX_DELTA;
        }
        self.elapsed += delta;
        delta
    }

    fn reset(&mut self) {
        self.previous = Instant::now();
        self.elapsed = 0.0;
    }

    fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

/// A clock advanced by hand. Used by the headless host and tests.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    pending: f64,
    elapsed: f64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let `seconds` pass. Negative values are ignored.
    pub fn advance(&mut self, seconds: f64) {
        if seconds > 0.0 {
            self.pending += seconds;
        }
    }
}

impl Clock for ManualClock {
    fn delta(&mut self) -> f64 {
        let delta = std::mem::take(&mut self.pending);
        self.elapsed += delta;
        delta
    }

    fn reset(&mut self) {
        self.pending = 0.0;
        self.elapsed = 0.0;
    }

    fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_reports_advanced_time_once() {
        let mut clock = ManualClock::new();
        clock.advance(0.5);
        clock.advance(0.25);
        assert!((clock.delta() - 0.75).abs() < 1e-12);
        assert_eq!(clock.delta(), 0.0);
        assert!((clock.elapsed() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_manual_clock_ignores_negative_time() {
        let mut clock = ManualClock::new();
        clock.advance(-1.0);
        assert_eq!(clock.delta(), 0.0);
    }

    #[test]
    fn test_reset_discards_pending_time() {
        let mut clock = ManualClock::new();
        clock.advance(3.0);
        clock.reset();
        assert_eq!(clock.delta(), 0.0);
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn test_frame_clock_delta_is_bounded() {
        let mut clock = FrameClock::new();
        let d = clock.delta();
        assert!((0.0..=MAX_DELTA).contains(&d));
        assert!(clock.elapsed() >= 0.0);
    }
}
