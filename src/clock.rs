//! Monotonic millisecond time source.
//!
//! The tick counter is allowed to wrap. Every comparison in this crate is done
//! on the difference of two readings, never on absolute values.

use embassy_time::Instant;

pub trait Clock {
    /// Current tick count in milliseconds, wrapping at `u32::MAX`.
    fn now_millis(&self) -> u32;

    /// Milliseconds elapsed since `start`, correct across one wraparound.
    fn elapsed_since(&self, start: u32) -> u32 {
        self.now_millis().wrapping_sub(start)
    }
}

/// [`Clock`] backed by the `embassy-time` driver of the target.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u32 {
        // Truncation is the wraparound.
        Instant::now().as_millis() as u32
    }
}

impl<C: Clock> Clock for &C {
    fn now_millis(&self) -> u32 {
        (**self).now_millis()
    }
}
