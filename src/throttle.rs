//! Frame skipping for large image fields.
//!
//! Dense fields are updated at a reduced rate to bound CPU cost. This is a
//! performance policy only: a skipped frame leaves every particle untouched.

/// Rolling frame counter deciding which host frames run the update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameThrottle {
    interval: u32,
    counter: u32,
}

impl FrameThrottle {
    /// A throttle that runs every `interval`-th frame (`0` is treated as `1`).
    pub fn new(interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            counter: 0,
        }
    }

    /// Pick the interval for a field of `count` particles.
    ///
    /// Fields above `throttle_above` target `throttled_fps`, others run at the
    /// full `host_fps`. The interval is `floor(host_fps / target_fps)`.
    pub fn for_count(count: usize, throttle_above: usize, host_fps: u32, throttled_fps: u32) -> Self {
        let target = if count > throttle_above {
            throttled_fps
        } else {
            host_fps
        };
        Self::new(host_fps / target.max(1))
    }

    /// Run every frame.
    pub fn unthrottled() -> Self {
        Self::new(1)
    }

    /// Frames per processed frame.
    #[inline]
    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Advance one host frame. Returns `true` if this frame should be processed.
    pub fn tick(&mut self) -> bool {
        self.counter = (self.counter + 1) % self.interval;
        self.counter == 0
    }
}

impl Default for FrameThrottle {
    fn default() -> Self {
        Self::unthrottled()
    }
}
