use core::convert::Infallible;
use std::collections::VecDeque;

use embedded_hal::digital::{ErrorType, OutputPin};
use env_logger::Env;

use crate::clock::Clock;
use crate::config::Config;
use crate::modem::Emulator;

/// In-memory panel link. Bytes queued with [`MockSerial::receive`] are read
/// by the emulator, everything it writes is collected.
#[derive(Debug, Default)]
pub struct MockSerial {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
}

impl MockSerial {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes the panel sends to the modem.
    pub fn receive(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes);
    }

    /// Bytes the modem sent since the last call.
    pub fn take_sent(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.tx)
    }
}

impl embedded_io::ErrorType for MockSerial {
    type Error = Infallible;
}

impl embedded_io::Read for MockSerial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let n = buf.len().min(self.rx.len());
        for (slot, byte) in buf.iter_mut().zip(self.rx.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

impl embedded_io::ReadReady for MockSerial {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.rx.is_empty())
    }
}

impl embedded_io::Write for MockSerial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.tx.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Manually advanced millisecond counter.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockClock {
    now: u32,
}

impl MockClock {
    pub fn new(now: u32) -> Self {
        Self { now }
    }

    pub fn advance(&mut self, ms: u32) {
        self.now = self.now.wrapping_add(ms);
    }
}

impl Clock for MockClock {
    fn now_millis(&self) -> u32 {
        self.now
    }
}

/// Output pin recording its level. `None` until first driven.
#[derive(Debug, Default)]
pub struct MockPin {
    pub is_high: Option<bool>,
}

impl ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.is_high = Some(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.is_high = Some(true);
        Ok(())
    }
}

pub fn init_logger() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .is_test(true)
        .try_init();
}

pub fn emulator() -> Emulator<MockSerial, MockClock> {
    init_logger();
    Emulator::new(MockSerial::new(), MockClock::new(0), Config::default())
}

/// Poll until every queued command is answered and every response sent,
/// advancing the clock between polls.
pub fn settle(emulator: &mut Emulator<MockSerial, MockClock>) {
    for _ in 0..10_000 {
        emulator.poll();
        if emulator.is_idle() {
            return;
        }
        emulator.clock_mut().advance(10);
    }
    panic!("emulator did not settle, stuck in {:?}", emulator.state());
}

/// Lines written to the panel since the last call, without terminators.
pub fn sent_lines(emulator: &mut Emulator<MockSerial, MockClock>) -> Vec<String> {
    let sent = emulator.serial_mut().take_sent();
    let text: String = sent.iter().map(|&b| char::from(b)).collect();
    let mut lines: Vec<String> = text.split("\r\n").map(str::to_string).collect();
    if lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}
