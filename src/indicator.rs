//! Status LED.
//!
//! A steady mode ([`IndicatorState`]) with short flash bursts on top. A burst
//! temporarily takes over the LED, the steady mode is restored once it ends.

use embedded_hal::digital::{OutputPin, PinState};

use crate::error::Error;
use crate::timing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndicatorState {
    #[default]
    Off,
    On,
    SlowFlash,
    FastFlash,
}

pub trait Indicator {
    /// Select the steady mode. During a burst the mode is applied when the
    /// burst ends.
    fn set_state(&mut self, state: IndicatorState);

    /// Flash `count` times, then return to the steady mode.
    fn indicate(&mut self, count: u8);

    /// Drive the LED, called from the main loop.
    fn poll(&mut self, now_ms: u32);
}

#[derive(Debug, Clone, Copy)]
struct Burst {
    remaining: u8,
    toggled_at: u32,
}

pub struct StatusLed<P: OutputPin> {
    pin: P,
    lit: bool,
    state: IndicatorState,
    toggled_at: u32,
    burst: Option<Burst>,
    /// Last time seen by `poll`.
    now: u32,
}

impl<P: OutputPin> StatusLed<P> {
    pub fn new(pin: P) -> Self {
        let mut led = Self {
            pin,
            lit: false,
            state: IndicatorState::Off,
            toggled_at: 0,
            burst: None,
            now: 0,
        };
        led.write(false);
        led
    }

    pub fn state(&self) -> IndicatorState {
        self.state
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    pub fn is_flashing(&self) -> bool {
        self.burst.is_some()
    }

    pub fn release(self) -> P {
        self.pin
    }

    fn apply_state(&mut self) {
        self.toggled_at = self.now;
        match self.state {
            IndicatorState::Off => self.write(false),
            IndicatorState::On | IndicatorState::SlowFlash | IndicatorState::FastFlash => {
                self.write(true)
            }
        }
    }

    fn write(&mut self, lit: bool) {
        self.lit = lit;
        if self.pin.set_state(PinState::from(lit)).is_err() {
            error!("Status LED: {}", Error::IoPin);
        }
    }

    fn poll_burst(&mut self, mut burst: Burst) {
        if self.now.wrapping_sub(burst.toggled_at) < timing::as_ticks(timing::flash_interval()) {
            return;
        }
        burst.toggled_at = self.now;

        let lit = !self.lit;
        self.write(lit);
        if !lit {
            burst.remaining = burst.remaining.saturating_sub(1);
        }

        if burst.remaining == 0 {
            self.burst = None;
            self.apply_state();
        } else {
            self.burst = Some(burst);
        }
    }
}

impl<P: OutputPin> Indicator for StatusLed<P> {
    fn set_state(&mut self, state: IndicatorState) {
        self.state = state;
        if self.burst.is_none() {
            self.apply_state();
        }
    }

    fn indicate(&mut self, count: u8) {
        if count == 0 {
            return;
        }
        self.burst = Some(Burst {
            remaining: count,
            toggled_at: self.now,
        });
        self.write(false);
    }

    fn poll(&mut self, now_ms: u32) {
        self.now = now_ms;

        if let Some(burst) = self.burst {
            self.poll_burst(burst);
            return;
        }

        match self.state {
            IndicatorState::Off | IndicatorState::On => {}
            IndicatorState::SlowFlash | IndicatorState::FastFlash => {
                let interval = if self.state == IndicatorState::SlowFlash {
                    timing::blink_slow()
                } else {
                    timing::blink_fast()
                };
                if now_ms.wrapping_sub(self.toggled_at) >= timing::as_ticks(interval) {
                    self.toggled_at = now_ms;
                    let lit = !self.lit;
                    self.write(lit);
                }
            }
        }
    }
}
