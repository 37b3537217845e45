#![cfg_attr(not(test), no_std)]
//! SIM900 modem emulator.
//!
//! Stands in for the GSM module of an alarm panel. The panel talks AT
//! commands over a UART and believes it is sending and receiving text
//! messages. Messages it sends are decoded and handed to the home
//! automation side, commands from that side are delivered to the panel as
//! if they had arrived by SMS.
//!
//! ```ignore
//! let mut bridge = Bridge::new(
//!     Emulator::new(uart, SystemClock, Config::default()),
//!     StatusLed::new(led_pin),
//!     mqtt,
//! );
//! bridge.init();
//! loop {
//!     bridge.poll();
//! }
//! ```

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod bridge;
pub mod clock;
pub mod codec;
pub mod command;
pub mod config;
pub mod error;
pub mod indicator;
pub mod modem;
pub mod queue;
pub mod sms;
pub mod text;
mod timing;
pub mod uart;

#[cfg(test)]
mod test_helpers;

pub use bridge::{Bridge, StatusSink};
pub use clock::{Clock, SystemClock};
pub use codec::{AlarmCommand, AlarmMode, Envelope};
pub use config::Config;
pub use error::Error;
pub use indicator::{Indicator, IndicatorState, StatusLed};
pub use modem::{Emulator, ModemState};
