/// Position of the emulator in its command/response cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModemState {
    /// Nothing queued, waiting for a command or an outbound message.
    Idle,
    /// A command is queued and will be interpreted on the next tick.
    ProcessCommand,
    /// Responses are queued, waiting for the pacing delay to elapse.
    WaitToSend,
    /// The next queued response goes out on this tick.
    SendResponse,
}

/// Inputs driving [`ModemState::next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    CommandQueued,
    MessageQueued,
    CommandProcessed,
    DelayElapsed,
    ResponseSent { remaining: bool },
}

impl ModemState {
    /// Transition table. Pairs not listed leave the state unchanged.
    pub fn next(self, event: Event) -> Self {
        match (self, event) {
            (Self::Idle, Event::CommandQueued) => Self::ProcessCommand,
            (Self::Idle, Event::MessageQueued) => Self::WaitToSend,
            (Self::ProcessCommand, Event::CommandProcessed) => Self::WaitToSend,
            (Self::WaitToSend, Event::DelayElapsed) => Self::SendResponse,
            (Self::SendResponse, Event::ResponseSent { remaining: true }) => Self::WaitToSend,
            (Self::SendResponse, Event::ResponseSent { remaining: false }) => Self::Idle,
            (state, _) => state,
        }
    }
}

impl Default for ModemState {
    fn default() -> Self {
        Self::Idle
    }
}
