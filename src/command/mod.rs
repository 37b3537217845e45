//! AT command surface of the emulated SIM900.
//!
//! Only the subset the alarm panel is known to send is recognised, everything
//! else is answered with `ERROR`.

pub mod responses;

use crate::queue::BoundedQueue;
use crate::text::{trim_ascii, FixedString};

/// Maximum length of one received line and of one command.
pub const COMMAND_CAPACITY: usize = 128;

pub type Command = FixedString<COMMAND_CAPACITY>;

pub type CommandQueue = BoundedQueue<Fragment>;

/// One queued unit of input.
///
/// Outside of an SMS body this is a single AT command. While a body is being
/// captured it is a piece of the body, and `body_end` marks the piece the
/// Ctrl-Z terminator arrived with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    pub text: Command,
    pub body_end: bool,
}

impl Fragment {
    pub fn new(text: &str) -> Self {
        Self {
            text: Command::from(text),
            body_end: false,
        }
    }
}

/// Split one received line into commands and queue them.
///
/// A leading `AT+` collapses to `+`, so `AT+CSQ` and `+CSQ` match alike.
/// Segments are separated by `;`, trimmed, and empty ones are skipped. If
/// `body_end` is set it is carried by the last queued segment, or by an empty
/// fragment when the line has no content at all. Returns the number of
/// fragments queued, segments that do not fit are logged and dropped.
pub fn split(line: &str, body_end: bool, queue: &mut CommandQueue) -> usize {
    let mut line = trim_ascii(line);
    if line.starts_with("AT+") {
        line = &line[2..];
    }
    if !line.is_empty() {
        debug!("RX: {}", line);
    }

    let mut queued = 0;
    let mut segments = line
        .split(';')
        .map(trim_ascii)
        .filter(|s| !s.is_empty())
        .peekable();

    while let Some(segment) = segments.next() {
        let fragment = Fragment {
            text: Command::from(segment),
            body_end: body_end && segments.peek().is_none(),
        };
        if let Err(dropped) = queue.push(fragment) {
            error!("Command buffer full, dropping: {}", dropped.text.as_str());
        } else {
            queued += 1;
        }
    }

    if body_end && queued == 0 {
        let terminator = Fragment {
            text: Command::new(),
            body_end: true,
        };
        if queue.push(terminator).is_err() {
            error!("Command buffer full, dropping SMS terminator");
        } else {
            queued += 1;
        }
    }

    queued
}

/// The commands understood by the emulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtCommand<'a> {
    /// `AT`
    Attention,
    /// `ATH`
    HangUp,
    /// `+CMGF=1`
    TextMode,
    /// `+CNMI=3,1`
    NewMessageIndication,
    /// `+CMGDA="DEL ALL"`
    DeleteAllMessages,
    /// `+IPR=`
    SetBaudRate,
    /// `+CSCS=`
    SetCharacterSet,
    /// `+CMGD=`
    DeleteMessage,
    /// `+CLTS=`
    SetLocalTimestamp,
    /// `+CSCLK=`
    SetSlowClock,
    /// `+CMEE=`
    SetErrorReporting,
    /// `+CSDT=`
    SetSimDetection,
    /// `+MORING=`
    SetRingIndication,
    /// `+CSMINS=`
    SetSimInsertedReport,
    /// `+CSMP=`
    SetTextModeParameters,
    /// `ATZ`
    Reset,
    /// `+CPOWD=1`
    PowerDown,
    /// `+CPIN?`
    PinStatus,
    /// `+CCLK?`
    Clock,
    /// `+CSQ`
    SignalQuality,
    /// `+CREG?`
    NetworkRegistration,
    /// `+CMGR=<index>`
    ReadMessage { index: &'a str },
    /// `+CMGS="<number>"`
    SendMessage { number: &'a str },
    Unknown,
}

const ACKNOWLEDGE_EXACT: &[(&str, AtCommand<'static>)] = &[
    ("AT", AtCommand::Attention),
    ("ATH", AtCommand::HangUp),
    ("+CMGF=1", AtCommand::TextMode),
    ("+CNMI=3,1", AtCommand::NewMessageIndication),
    ("+CMGDA=\"DEL ALL\"", AtCommand::DeleteAllMessages),
];

const ACKNOWLEDGE_PREFIX: &[(&str, AtCommand<'static>)] = &[
    ("+IPR=", AtCommand::SetBaudRate),
    ("+CSCS=", AtCommand::SetCharacterSet),
    ("+CMGD=", AtCommand::DeleteMessage),
    ("+CLTS=", AtCommand::SetLocalTimestamp),
    ("+CSCLK=", AtCommand::SetSlowClock),
    ("+CMEE=", AtCommand::SetErrorReporting),
    ("+CSDT=", AtCommand::SetSimDetection),
    ("+MORING=", AtCommand::SetRingIndication),
    ("+CSMINS=", AtCommand::SetSimInsertedReport),
    ("+CSMP=", AtCommand::SetTextModeParameters),
];

impl<'a> AtCommand<'a> {
    /// Classify a command as produced by [`split`]. The first match wins.
    pub fn parse(cmd: &'a str) -> Self {
        if let Some((_, c)) = ACKNOWLEDGE_EXACT.iter().find(|(s, _)| *s == cmd) {
            return *c;
        }
        if let Some((_, c)) = ACKNOWLEDGE_PREFIX
            .iter()
            .find(|(s, _)| cmd.starts_with(*s))
        {
            return *c;
        }

        match cmd {
            "ATZ" => Self::Reset,
            "+CPOWD=1" => Self::PowerDown,
            "+CCLK?" => Self::Clock,
            "+CSQ" => Self::SignalQuality,
            "+CREG?" => Self::NetworkRegistration,
            _ if cmd.starts_with("+CPIN?") => Self::PinStatus,
            _ => {
                if let Some(index) = cmd.strip_prefix("+CMGR=") {
                    Self::ReadMessage { index }
                } else if cmd.starts_with("+CMGS=") {
                    Self::SendMessage {
                        number: quoted(cmd),
                    }
                } else {
                    Self::Unknown
                }
            }
        }
    }

    /// Commands answered with a bare `OK` and no other effect.
    pub fn is_acknowledge_only(&self) -> bool {
        matches!(
            self,
            Self::Attention
                | Self::HangUp
                | Self::TextMode
                | Self::NewMessageIndication
                | Self::DeleteAllMessages
                | Self::SetBaudRate
                | Self::SetCharacterSet
                | Self::DeleteMessage
                | Self::SetLocalTimestamp
                | Self::SetSlowClock
                | Self::SetErrorReporting
                | Self::SetSimDetection
                | Self::SetRingIndication
                | Self::SetSimInsertedReport
                | Self::SetTextModeParameters
        )
    }
}

/// Text between the first and the last `"`, or an empty string if there is
/// no such pair.
fn quoted(cmd: &str) -> &str {
    match (cmd.find('"'), cmd.rfind('"')) {
        (Some(start), Some(end)) if end > start => &cmd[start + 1..end],
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::QUEUE_CAPACITY;

    fn texts(queue: &CommandQueue) -> Vec<&str> {
        queue.iter().map(|f| f.text.as_str()).collect()
    }

    #[test]
    fn split_collapses_vendor_prefix() {
        let mut queue = CommandQueue::new();
        assert_eq!(split("  AT+CMGF=1 ; +CNMI=3,1;; ", false, &mut queue), 2);
        assert_eq!(texts(&queue), ["+CMGF=1", "+CNMI=3,1"]);
        assert!(queue.iter().all(|f| !f.body_end));
    }

    #[test]
    fn split_keeps_plain_at_commands() {
        let mut queue = CommandQueue::new();
        split("ATZ", false, &mut queue);
        split("AT", false, &mut queue);
        split("ATH", false, &mut queue);
        assert_eq!(texts(&queue), ["ATZ", "AT", "ATH"]);
    }

    #[test]
    fn split_tags_last_segment_with_body_end() {
        let mut queue = CommandQueue::new();
        split("BW Flur;Einbruch", true, &mut queue);
        let flags: Vec<bool> = queue.iter().map(|f| f.body_end).collect();
        assert_eq!(flags, [false, true]);
    }

    #[test]
    fn split_empty_terminator_still_queued() {
        let mut queue = CommandQueue::new();
        assert_eq!(split("   ", true, &mut queue), 1);
        let fragment = queue.pop().unwrap();
        assert!(fragment.text.is_empty());
        assert!(fragment.body_end);

        assert_eq!(split("", false, &mut queue), 0);
        assert!(queue.is_empty());
    }

    #[test]
    fn split_drops_overflow_in_order() {
        let mut queue = CommandQueue::new();
        let line: std::string::String = (0..20)
            .map(|i| std::format!("+C{}", i))
            .collect::<Vec<_>>()
            .join(";");

        assert_eq!(split(&line, false, &mut queue), QUEUE_CAPACITY);
        assert_eq!(queue.len(), QUEUE_CAPACITY);
        for (i, fragment) in queue.iter().enumerate() {
            assert_eq!(fragment.text.as_str(), std::format!("+C{}", i));
        }
    }

    #[test]
    fn split_trims_ascii_whitespace_only() {
        let mut queue = CommandQueue::new();
        split("\t Tuer\u{a0}; \u{85}offen \r", true, &mut queue);
        assert_eq!(texts(&queue), ["Tuer\u{a0}", "\u{85}offen"]);
    }

    #[test]
    fn split_truncates_long_segment() {
        let mut queue = CommandQueue::new();
        let long = "A".repeat(COMMAND_CAPACITY + 40);
        split(&long, false, &mut queue);
        assert_eq!(queue.pop().unwrap().text.len(), COMMAND_CAPACITY);
    }

    #[test]
    fn parse_acknowledge_only() {
        for cmd in [
            "AT",
            "ATH",
            "+CMGF=1",
            "+CNMI=3,1",
            "+CMGDA=\"DEL ALL\"",
            "+IPR=9600",
            "+CSCS=\"GSM\"",
            "+CMGD=1",
            "+CLTS=1",
            "+CSCLK=0",
            "+CMEE=2",
            "+CSDT=1",
            "+MORING=1",
            "+CSMINS=1",
            "+CSMP=17,167,0,0",
        ] {
            assert!(AtCommand::parse(cmd).is_acknowledge_only(), "{}", cmd);
        }
    }

    #[test]
    fn parse_exact_matches_are_exact() {
        assert_eq!(AtCommand::parse("+CMGF=0"), AtCommand::Unknown);
        assert_eq!(AtCommand::parse("+CSQ?"), AtCommand::Unknown);
        assert_eq!(AtCommand::parse("ATZ0"), AtCommand::Unknown);
        assert_eq!(AtCommand::parse("+CMGDA=\"DEL READ\""), AtCommand::Unknown);
    }

    #[test]
    fn parse_queries() {
        assert_eq!(AtCommand::parse("ATZ"), AtCommand::Reset);
        assert_eq!(AtCommand::parse("+CPOWD=1"), AtCommand::PowerDown);
        assert_eq!(AtCommand::parse("+CPIN?"), AtCommand::PinStatus);
        assert_eq!(AtCommand::parse("+CCLK?"), AtCommand::Clock);
        assert_eq!(AtCommand::parse("+CSQ"), AtCommand::SignalQuality);
        assert_eq!(AtCommand::parse("+CREG?"), AtCommand::NetworkRegistration);
        assert_eq!(
            AtCommand::parse("+CMGR=1"),
            AtCommand::ReadMessage { index: "1" }
        );
    }

    #[test]
    fn parse_send_message_number() {
        assert_eq!(
            AtCommand::parse("+CMGS=\"+4912345\""),
            AtCommand::SendMessage { number: "+4912345" }
        );
        assert_eq!(
            AtCommand::parse("+CMGS=12345"),
            AtCommand::SendMessage { number: "" }
        );
        assert_eq!(
            AtCommand::parse("+CMGS=\"123"),
            AtCommand::SendMessage { number: "" }
        );
    }
}
