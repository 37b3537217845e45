use core::fmt::Write as _;

use embedded_io::{Read, ReadReady, Write};

use super::{Emulator, Response};
use crate::clock::Clock;
use crate::command::responses::*;
use crate::command::{AtCommand, Fragment};
use crate::sms::BodyProgress;

impl<S, C> Emulator<S, C>
where
    S: Read + ReadReady + Write,
    C: Clock,
{
    /// Interpret one queued fragment and queue the answer.
    pub(super) fn process(&mut self, fragment: Fragment) {
        if self.sms.is_awaiting_body() {
            self.capture_body(&fragment);
            return;
        }

        debug!("Processing command: {}", fragment.text.as_str());
        match AtCommand::parse(fragment.text.as_str()) {
            cmd if cmd.is_acknowledge_only() => self.respond(OK),
            AtCommand::Reset => {
                self.sms.reset();
                self.respond_all(&BANNER);
            }
            AtCommand::PowerDown => {
                // The real module reboots and repeats its startup output.
                self.respond(POWER_DOWN);
                self.respond_all(&BANNER);
            }
            AtCommand::PinStatus => self.respond_all(&[PIN_READY, OK]),
            AtCommand::Clock => self.respond_all(&[CLOCK, OK]),
            AtCommand::SignalQuality => self.respond_all(&[SIGNAL_QUALITY, OK]),
            AtCommand::NetworkRegistration => self.respond_all(&[NETWORK_REGISTRATION, OK]),
            AtCommand::ReadMessage { index } => {
                if index == self.config.sms_slot() && !self.stored.is_empty() {
                    self.read_stored();
                } else {
                    warn!("No message stored at index {}", index);
                    self.respond(ERROR);
                }
            }
            AtCommand::SendMessage { number } => {
                debug!("Panel sends SMS to {}", number);
                self.sms.begin(number);
                self.respond(PROMPT);
            }
            _ => {
                warn!("Unknown command: {}", fragment.text.as_str());
                self.respond(ERROR);
            }
        }
    }

    fn capture_body(&mut self, fragment: &Fragment) {
        match self.sms.append(fragment.text.as_str(), fragment.body_end) {
            BodyProgress::Continue => self.respond(PROMPT),
            BodyProgress::Complete(body) => {
                info!("SMS from panel to {}: {}", self.sms.number(), body.as_str());
                if let Err(dropped) = self.inbound.push(body) {
                    error!("Message buffer full, dropping: {}", dropped.as_str());
                }
                self.respond_all(&[MESSAGE_SENT, OK]);
            }
        }
    }

    /// Hand the staged message to the panel. It can be read once.
    fn read_stored(&mut self) {
        let mut header = Response::new();
        let _ = write!(
            header,
            "+CMGR: \"REC UNREAD\",\"{}\",,\"{}\"",
            self.config.phone_number(),
            MESSAGE_TIMESTAMP
        );
        self.respond_line(header);

        let body = core::mem::take(&mut self.stored);
        debug!("Panel reads stored message: {}", body.as_str());
        self.respond_line(Response::from(body.as_str()));
        self.respond(OK);
    }
}
