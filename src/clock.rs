//! Elapsed-time source for time-driven field motion.
//!
//! The mesh field's idle wave is keyed to seconds since the field mounted.
//! [`FrameClock`] provides that from wall time, or from a fixed step per
//! frame for deterministic playback and tests.
//!
//! ```ignore
//! let mut clock = FrameClock::new();
//! // per frame
//! let t = clock.tick();
//! field.update(t);
//! ```

use std::time::Instant;

#[derive(Debug, Clone, Copy)]
enum Source {
    Wall(Instant),
    Fixed(f32),
}

/// Elapsed seconds and frame count.
#[derive(Debug, Clone)]
pub struct FrameClock {
    source: Source,
    elapsed: f32,
    frame: u64,
    paused: bool,
}

impl FrameClock {
    /// A clock that follows wall time, starting now.
    pub fn new() -> Self {
        Self {
            source: Source::Wall(Instant::now()),
            elapsed: 0.0,
            frame: 0,
            paused: false,
        }
    }

    /// A clock that advances by exactly `delta` seconds per tick.
    pub fn fixed(delta: f32) -> Self {
        Self {
            source: Source::Fixed(delta.max(0.0)),
            ..Self::new()
        }
    }

    /// Advance one frame and return the elapsed seconds.
    ///
    /// A paused clock still counts frames but holds its elapsed time.
    pub fn tick(&mut self) -> f32 {
        self.frame += 1;
        if self.paused {
            return self.elapsed;
        }
        match &mut self.source {
            Source::Wall(last) => {
                let now = Instant::now();
                self.elapsed += now.duration_since(*last).as_secs_f32();
                *last = now;
            }
            Source::Fixed(delta) => self.elapsed += *delta,
        }
        self.elapsed
    }

    /// Seconds elapsed as of the last tick.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Frames ticked so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume without counting the paused interval.
    pub fn resume(&mut self) {
        if self.paused {
            if let Source::Wall(last) = &mut self.source {
                *last = Instant::now();
            }
            self.paused = false;
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_fixed_steps() {
        let mut clock = FrameClock::fixed(0.5);
        assert_eq!(clock.tick(), 0.5);
        assert_eq!(clock.tick(), 1.0);
        assert_eq!(clock.frame(), 2);
    }

    #[test]
    fn test_wall_clock_advances() {
        let mut clock = FrameClock::new();
        thread::sleep(Duration::from_millis(10));
        assert!(clock.tick() > 0.0);
        assert_eq!(clock.frame(), 1);
    }

    #[test]
    fn test_pause_holds_elapsed() {
        let mut clock = FrameClock::fixed(1.0);
        clock.tick();
        clock.pause();
        assert_eq!(clock.tick(), 1.0);
        assert_eq!(clock.frame(), 2);
        clock.resume();
        assert_eq!(clock.tick(), 2.0);
    }

    #[test]
    fn test_negative_step_clamped() {
        let mut clock = FrameClock::fixed(-1.0);
        assert_eq!(clock.tick(), 0.0);
    }
}
