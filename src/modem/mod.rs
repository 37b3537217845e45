//! The emulated SIM900.
//!
//! [`Emulator`] is driven by calling [`Emulator::poll`] from the main loop.
//! A poll never blocks: it drains whatever the panel has sent, then advances
//! the state machine by at most one step. Responses leave one line per
//! pacing delay, mimicking the timing of the real modem.

mod interpreter;
pub mod pacing;
pub mod state;

use core::fmt::Write as _;

use embedded_io::{Read, ReadReady, Write};

use crate::clock::Clock;
use crate::codec::{self, AlarmCommand, Envelope};
use crate::command::{self, CommandQueue, Fragment};
use crate::config::Config;
use crate::error::Error;
use crate::queue::BoundedQueue;
use crate::sms::{Message, MessageQueue, SmsSession, MESSAGE_CAPACITY};
use crate::text::FixedString;
use crate::timing;
use crate::uart::FrameReader;

use pacing::Pacer;
pub use state::{Event, ModemState};

/// One line sent to the panel, sized to carry a full SMS body.
pub type Response = FixedString<MESSAGE_CAPACITY>;

pub type ResponseQueue = BoundedQueue<Response>;

pub struct Emulator<S, C> {
    serial: S,
    clock: C,
    config: Config,
    reader: FrameReader,
    commands: CommandQueue,
    responses: ResponseQueue,
    /// Bodies sent by the panel, waiting for the application.
    inbound: MessageQueue,
    /// Bodies from the application, waiting to be announced to the panel.
    outbound: MessageQueue,
    sms: SmsSession,
    /// Announced body the panel has not read yet.
    stored: Message,
    state: ModemState,
    pacer: Pacer,
}

impl<S, C> Emulator<S, C>
where
    S: Read + ReadReady + Write,
    C: Clock,
{
    pub fn new(serial: S, clock: C, config: Config) -> Self {
        let pacer = Pacer::new(timing::as_ticks(config.response_delay()));
        Self {
            serial,
            clock,
            config,
            reader: FrameReader::new(),
            commands: CommandQueue::new(),
            responses: ResponseQueue::new(),
            inbound: MessageQueue::new(),
            outbound: MessageQueue::new(),
            sms: SmsSession::new(),
            stored: Message::new(),
            state: ModemState::Idle,
            pacer,
        }
    }

    /// Queue the power-on sequence, exactly as if the panel had sent `ATZ`.
    pub fn init(&mut self) {
        info!(
            "Modem emulator started, panel link at {} baud",
            self.config.baud_rate()
        );
        if self.commands.push(Fragment::new("ATZ")).is_err() {
            error!("Command buffer full, startup sequence dropped");
        }
    }

    /// Run one tick: read pending input, then advance the state machine.
    pub fn poll(&mut self) {
        self.read_serial();
        self.step();
    }

    /// Drain the bytes the panel has sent so far into the command queue.
    /// Returns the number of bytes consumed.
    pub fn read_serial(&mut self) -> usize {
        let awaiting_body = self.sms.is_awaiting_body();
        let commands = &mut self.commands;
        match self.reader.poll(&mut self.serial, awaiting_body, |frame| {
            command::split(&frame.line, frame.body_end, commands);
        }) {
            Ok(n) => n,
            Err(e) => {
                error!("Reading from panel failed: {:?}", e);
                0
            }
        }
    }

    /// Advance the state machine by one step.
    pub fn step(&mut self) {
        match self.state {
            ModemState::Idle => {
                if !self.commands.is_empty() {
                    self.transition(Event::CommandQueued);
                } else if !self.outbound.is_empty() {
                    self.announce_message();
                }
            }
            ModemState::ProcessCommand => {
                if let Some(fragment) = self.commands.pop() {
                    self.process(fragment);
                }
                self.start_delay(Event::CommandProcessed);
            }
            ModemState::WaitToSend => {
                if self.pacer.is_elapsed(self.clock.now_millis()) {
                    self.transition(Event::DelayElapsed);
                }
            }
            ModemState::SendResponse => self.send_response(),
        }
    }

    pub fn state(&self) -> ModemState {
        self.state
    }

    /// No input, output or announcement is pending.
    pub fn is_idle(&self) -> bool {
        self.state == ModemState::Idle
            && self.commands.is_empty()
            && self.responses.is_empty()
            && self.outbound.is_empty()
    }

    /// The panel is in the middle of sending an SMS body.
    pub fn is_receiving_sms(&self) -> bool {
        self.sms.is_awaiting_body()
    }

    pub fn has_message(&self) -> bool {
        !self.inbound.is_empty()
    }

    /// Oldest message sent by the panel, decoded.
    pub fn take_message(&mut self) -> Option<Envelope> {
        self.take_raw_message().map(|body| codec::decode(&body))
    }

    /// Oldest message sent by the panel, as received.
    pub fn take_raw_message(&mut self) -> Option<Message> {
        if self.inbound.is_empty() {
            return None;
        }
        self.inbound.pop()
    }

    /// Queue `text` for delivery to the panel. Returns `false` if the
    /// outbound queue is full.
    pub fn send_message(&mut self, text: &str) -> bool {
        self.enqueue_outbound(Message::from(text))
    }

    /// Encode and queue a command for the panel. Returns `false` if the
    /// outbound queue is full.
    pub fn send_command(&mut self, command: AlarmCommand) -> bool {
        info!("Sending command to panel: {:?}", command);
        let body = codec::encode(command, &self.config);
        self.enqueue_outbound(body)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn now_millis(&self) -> u32 {
        self.clock.now_millis()
    }

    pub fn serial_mut(&mut self) -> &mut S {
        &mut self.serial
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn release(self) -> (S, C) {
        (self.serial, self.clock)
    }

    fn enqueue_outbound(&mut self, message: Message) -> bool {
        match self.outbound.push(message) {
            Ok(()) => true,
            Err(dropped) => {
                error!(
                    "Outbound message dropped ({}): {}",
                    Error::QueueFull,
                    dropped.as_str()
                );
                false
            }
        }
    }

    fn transition(&mut self, event: Event) {
        let next = self.state.next(event);
        if next != self.state {
            trace!("{:?} -> {:?}", self.state, next);
        }
        self.state = next;
    }

    fn start_delay(&mut self, event: Event) {
        self.pacer.arm(self.clock.now_millis());
        self.transition(event);
    }

    /// Stage the next outbound body and tell the panel a message arrived.
    fn announce_message(&mut self) {
        let Some(message) = self.outbound.pop() else {
            return;
        };
        if !self.stored.is_empty() {
            warn!("Unread message replaced: {}", self.stored.as_str());
        }
        self.stored = message;

        let mut line = Response::new();
        let _ = write!(line, "+CMTI: \"SM\",{}", self.config.sms_slot());
        self.respond_line(line);
        info!("Indicate SMS to host, id: {}", self.config.sms_slot());

        self.start_delay(Event::MessageQueued);
    }

    fn send_response(&mut self) {
        if let Some(line) = self.responses.pop() {
            self.write_line(&line);
        }

        let remaining = !self.responses.is_empty();
        if remaining {
            self.start_delay(Event::ResponseSent { remaining });
        } else {
            self.transition(Event::ResponseSent { remaining });
        }
    }

    fn write_line(&mut self, line: &Response) {
        // Back to Latin-1, the encoding the panel sent it in.
        let mut buf = [0u8; MESSAGE_CAPACITY + 2];
        let mut n = 0;
        for c in line.chars() {
            buf[n] = u8::try_from(u32::from(c)).unwrap_or(b'?');
            n += 1;
        }
        buf[n..n + 2].copy_from_slice(b"\r\n");
        n += 2;

        let result = self
            .serial
            .write_all(&buf[..n])
            .and_then(|_| self.serial.flush());

        match result {
            Ok(()) => debug!("TX: {}", line.as_str()),
            Err(e) => error!(
                "Failed to send {}: {:?}",
                line.as_str(),
                Error::serial(e)
            ),
        }
    }

    fn respond(&mut self, line: &str) {
        self.respond_line(Response::from(line));
    }

    fn respond_all(&mut self, lines: &[&str]) {
        for line in lines {
            self.respond(line);
        }
    }

    fn respond_line(&mut self, line: Response) {
        if let Err(dropped) = self.responses.push(line) {
            error!("Response dropped ({}): {}", Error::QueueFull, dropped.as_str());
        }
    }
}
