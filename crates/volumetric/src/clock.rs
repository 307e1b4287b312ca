//! # Animation Clock
//!
//! Seconds since the engine started, as handed to every generator.
//! Two sources: the wall clock for a live display, and a manual clock
//! advanced in fixed steps for reproducible runs and tests. Either way
//! the reading never goes backwards.

use std::time::Instant;

#[derive(Clone, Copy, Debug)]
enum Source {
    Wall { origin: Instant },
    Manual,
}

/// Monotonic animation time in seconds.
#[derive(Clone, Debug)]
pub struct AnimationClock {
    source: Source,
    /// Seconds accumulated before `origin` (wall) or in total (manual).
    base: f64,
    paused: bool,
}

impl AnimationClock {
    /// A clock that follows wall time, starting at zero now.
    #[must_use]
    pub fn start() -> Self {
        Self {
            source: Source::Wall { origin: Instant::now() },
            base: 0.0,
            paused: false,
        }
    }

    /// A clock that only moves through [`AnimationClock::advance`].
    #[must_use]
    pub fn manual() -> Self {
        Self {
            source: Source::Manual,
            base: 0.0,
            paused: false,
        }
    }

    /// Whether this clock follows wall time.
    #[inline]
    #[must_use]
    pub fn is_wall(&self) -> bool {
        matches!(self.source, Source::Wall { .. })
    }

    /// Whether the clock is paused.
    #[inline]
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Current time in seconds.
    #[must_use]
    pub fn now(&self) -> f64 {
        match self.source {
            _ if self.paused => self.base,
            Source::Wall { origin } => self.base + origin.elapsed().as_secs_f64(),
            Source::Manual => self.base,
        }
    }

    /// Moves the clock forward by `dt` seconds.
    ///
    /// Negative and non-finite steps are ignored. On a wall clock this is
    /// a skip ahead on top of elapsed time.
    pub fn advance(&mut self, dt: f64) {
        if dt.is_finite() && dt > 0.0 {
            self.base += dt;
        }
    }

    /// Freezes the reading at its current value.
    pub fn pause(&mut self) {
        if !self.paused {
            self.base = self.now();
            self.paused = true;
        }
    }

    /// Continues from the frozen reading.
    pub fn resume(&mut self) {
        if self.paused {
            if let Source::Wall { origin } = &mut self.source {
                *origin = Instant::now();
            }
            self.paused = false;
        }
    }

    /// Back to zero. A paused clock stays paused.
    pub fn reset(&mut self) {
        self.base = 0.0;
        if let Source::Wall { origin } = &mut self.source {
            *origin = Instant::now();
        }
    }
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::start()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_manual_clock_steps() {
        let mut clock = AnimationClock::manual();
        assert!(!clock.is_wall());
        assert_eq!(clock.now(), 0.0);

        for _ in 0..60 {
            clock.advance(1.0 / 60.0);
        }
        assert!((clock.now() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_manual_clock_ignores_bad_steps() {
        let mut clock = AnimationClock::manual();
        clock.advance(0.5);
        clock.advance(-10.0);
        clock.advance(f64::NAN);
        clock.advance(f64::INFINITY);
        assert_eq!(clock.now(), 0.5);
    }

    #[test]
    fn test_wall_clock_monotonic() {
        let clock = AnimationClock::start();
        let mut last = clock.now();
        for _ in 0..1000 {
            let now = clock.now();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn test_pause_freezes_reading() {
        let mut clock = AnimationClock::start();
        clock.advance(2.0);
        clock.pause();
        let frozen = clock.now();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(clock.now(), frozen);

        clock.resume();
        assert!(clock.now() >= frozen);
        assert!(clock.now() < frozen + 1.0);
    }

    #[test]
    fn test_reset() {
        let mut clock = AnimationClock::manual();
        clock.advance(42.0);
        clock.reset();
        assert_eq!(clock.now(), 0.0);
    }
}
