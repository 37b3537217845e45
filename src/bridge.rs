//! Glue between the emulated modem and the home automation side.

use embedded_io::{Read, ReadReady, Write};

use crate::clock::Clock;
use crate::codec::{AlarmCommand, Envelope};
use crate::indicator::{Indicator, IndicatorState};
use crate::modem::Emulator;

/// Receiver of the status reports decoded from panel messages.
pub trait StatusSink {
    fn publish(&mut self, source: &str, status: &str);
}

impl<T: StatusSink + ?Sized> StatusSink for &mut T {
    fn publish(&mut self, source: &str, status: &str) {
        (**self).publish(source, status)
    }
}

pub struct Bridge<S, C, I, P> {
    emulator: Emulator<S, C>,
    indicator: I,
    sink: P,
}

impl<S, C, I, P> Bridge<S, C, I, P>
where
    S: Read + ReadReady + Write,
    C: Clock,
    I: Indicator,
    P: StatusSink,
{
    pub fn new(emulator: Emulator<S, C>, indicator: I, sink: P) -> Self {
        Self {
            emulator,
            indicator,
            sink,
        }
    }

    /// Start the modem and light the LED.
    pub fn init(&mut self) {
        self.emulator.init();
        self.indicator.set_state(IndicatorState::On);
    }

    /// Run one tick of the modem and the LED, then publish every message
    /// the panel completed. Returns the number of messages handled.
    pub fn poll(&mut self) -> usize {
        self.emulator.poll();
        self.indicator.poll(self.emulator.now_millis());

        let mut published = 0;
        while let Some(envelope) = self.emulator.take_message() {
            self.publish(&envelope);
            self.indicator.indicate(1);
            published += 1;
        }
        published
    }

    /// Queue a command for the panel. Flashes twice when accepted.
    pub fn send_command(&mut self, command: AlarmCommand) -> bool {
        let queued = self.emulator.send_command(command);
        if queued {
            self.indicator.indicate(2);
        }
        queued
    }

    pub fn emulator(&self) -> &Emulator<S, C> {
        &self.emulator
    }

    pub fn emulator_mut(&mut self) -> &mut Emulator<S, C> {
        &mut self.emulator
    }

    pub fn indicator(&self) -> &I {
        &self.indicator
    }

    pub fn sink(&self) -> &P {
        &self.sink
    }

    pub fn release(self) -> (Emulator<S, C>, I, P) {
        (self.emulator, self.indicator, self.sink)
    }

    fn publish(&mut self, envelope: &Envelope) {
        if envelope.is_empty() {
            warn!("Message from panel carries no status");
            return;
        }
        for entry in envelope.entries() {
            info!(
                "Publishing {}: {}",
                entry.source.as_str(),
                entry.status.as_str()
            );
            self.sink.publish(&entry.source, &entry.status);
        }
    }
}
