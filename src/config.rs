use core::convert::Infallible;
use embassy_time::Duration;
use embedded_hal::digital::{ErrorType, OutputPin, PinState};
use heapless::String;

use crate::timing;

pub struct NoPin;

impl ErrorType for NoPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Output pin wrapper for active-low LEDs.
pub struct ReverseOutputPin<P: OutputPin<Error = Infallible>>(pub P);

impl<P: OutputPin<Error = Infallible>> ErrorType for ReverseOutputPin<P> {
    type Error = Infallible;
}

impl<P: OutputPin<Error = Infallible>> OutputPin for ReverseOutputPin<P> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.set_high()
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.set_low()
    }

    fn set_state(&mut self, state: PinState) -> Result<(), Self::Error> {
        match state {
            PinState::Low => self.0.set_state(PinState::High),
            PinState::High => self.0.set_state(PinState::Low),
        }
    }
}

/// Emulator settings.
///
/// Key and pin must match what is programmed into the alarm panel, otherwise
/// the panel silently ignores every command SMS.
#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) sms_key: String<8>,
    pub(crate) sms_pin: String<8>,
    pub(crate) sms_slot: String<4>,
    pub(crate) phone_number: String<20>,
    pub(crate) response_delay: Duration,
    pub(crate) baud_rate: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sms_key: truncated("PROG"),
            sms_pin: truncated("1207"),
            sms_slot: truncated("1"),
            phone_number: truncated("+4915773807779"),
            response_delay: timing::response_delay(),
            baud_rate: 9_600_u32,
        }
    }
}

impl Config {
    #[must_use]
    pub fn with_sms_key(self, key: &str) -> Self {
        Self {
            sms_key: truncated(key),
            ..self
        }
    }

    #[must_use]
    pub fn with_sms_pin(self, pin: &str) -> Self {
        Self {
            sms_pin: truncated(pin),
            ..self
        }
    }

    #[must_use]
    pub fn with_sms_slot(self, slot: &str) -> Self {
        Self {
            sms_slot: truncated(slot),
            ..self
        }
    }

    /// Sender number reported for messages read by the panel.
    #[must_use]
    pub fn with_phone_number(self, number: &str) -> Self {
        Self {
            phone_number: truncated(number),
            ..self
        }
    }

    #[must_use]
    pub fn with_response_delay(self, delay: Duration) -> Self {
        Self {
            response_delay: delay,
            ..self
        }
    }

    /// Baud rate of the panel link. Informational, the caller configures the UART.
    #[must_use]
    pub fn with_baud_rate(self, baud_rate: u32) -> Self {
        Self { baud_rate, ..self }
    }

    pub fn sms_key(&self) -> &str {
        &self.sms_key
    }

    pub fn sms_pin(&self) -> &str {
        &self.sms_pin
    }

    pub fn sms_slot(&self) -> &str {
        &self.sms_slot
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn response_delay(&self) -> Duration {
        self.response_delay
    }

    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }
}

fn truncated<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
