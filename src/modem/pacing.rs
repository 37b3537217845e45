/// Inter-line delay of the response path.
///
/// Works on a wrapping millisecond counter, only the difference between two
/// readings is ever compared.
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    delay: u32,
    armed_at: u32,
}

impl Pacer {
    pub const fn new(delay_ms: u32) -> Self {
        Self {
            delay: delay_ms,
            armed_at: 0,
        }
    }

    pub fn arm(&mut self, now: u32) {
        self.armed_at = now;
    }

    pub fn is_elapsed(&self, now: u32) -> bool {
        now.wrapping_sub(self.armed_at) >= self.delay
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay
    }
}
