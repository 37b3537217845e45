//! Text mode SMS exchange with the panel.

use crate::queue::BoundedQueue;
use crate::text::FixedString;

/// Maximum length of one SMS body.
pub const MESSAGE_CAPACITY: usize = 160;

pub type Message = FixedString<MESSAGE_CAPACITY>;

pub type MessageQueue = BoundedQueue<Message>;

/// Phone number buffer, long enough for any E.164 number plus prefix.
pub type Number = FixedString<24>;

/// Separator inserted between the lines of a multi-line body.
pub const PART_SEPARATOR: char = '|';

/// What to answer after a body fragment was consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyProgress {
    /// More fragments are expected, prompt for them.
    Continue,
    /// The terminator arrived, the assembled body is complete.
    Complete(Message),
}

/// State of an `AT+CMGS` exchange in progress.
#[derive(Debug, Default)]
pub struct SmsSession {
    number: Number,
    body: Message,
    awaiting_body: bool,
}

impl SmsSession {
    pub const fn new() -> Self {
        Self {
            number: Number::new(),
            body: Message::new(),
            awaiting_body: false,
        }
    }

    /// Start capturing a body addressed to `number`.
    pub fn begin(&mut self, number: &str) {
        self.number.set(number);
        self.body.clear();
        self.awaiting_body = true;
    }

    pub fn is_awaiting_body(&self) -> bool {
        self.awaiting_body
    }

    /// Recipient of the message being captured, or of the last one.
    pub fn number(&self) -> &str {
        self.number.as_str()
    }

    /// Append one body fragment.
    ///
    /// Non-empty fragments after the first are joined with `|`. When
    /// `body_end` is set the session closes and the body is handed out.
    pub fn append(&mut self, fragment: &str, body_end: bool) -> BodyProgress {
        if !fragment.is_empty() {
            if !self.body.is_empty() {
                self.body.push(PART_SEPARATOR);
            }
            if !self.body.push_str(fragment) {
                warn!("SMS body exceeds {} bytes, truncating", MESSAGE_CAPACITY);
            }
        }

        if body_end {
            self.awaiting_body = false;
            BodyProgress::Complete(core::mem::take(&mut self.body))
        } else {
            BodyProgress::Continue
        }
    }

    pub fn reset(&mut self) {
        self.number.clear();
        self.body.clear();
        self.awaiting_body = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_body() {
        let mut session = SmsSession::new();
        session.begin("12345");
        assert!(session.is_awaiting_body());
        assert_eq!(session.number(), "12345");

        assert_eq!(
            session.append("hello", true),
            BodyProgress::Complete(Message::from("hello"))
        );
        assert!(!session.is_awaiting_body());
    }

    #[test]
    fn multi_line_body_is_pipe_joined() {
        let mut session = SmsSession::new();
        session.begin("");
        assert_eq!(session.append("BW Flur", false), BodyProgress::Continue);
        assert_eq!(session.append("Einbruch", false), BodyProgress::Continue);
        assert_eq!(
            session.append("", true),
            BodyProgress::Complete(Message::from("BW Flur|Einbruch"))
        );
    }

    #[test]
    fn begin_discards_previous_body() {
        let mut session = SmsSession::new();
        session.begin("1");
        session.append("stale", false);
        session.begin("2");
        assert_eq!(
            session.append("fresh", true),
            BodyProgress::Complete(Message::from("fresh"))
        );
    }

    #[test]
    fn long_body_is_truncated() {
        let mut session = SmsSession::new();
        session.begin("1");
        let part = "x".repeat(100);
        session.append(&part, false);
        match session.append(&part, true) {
            BodyProgress::Complete(body) => assert_eq!(body.len(), MESSAGE_CAPACITY),
            BodyProgress::Continue => panic!("body not completed"),
        }
    }

    #[test]
    fn reset_closes_session() {
        let mut session = SmsSession::new();
        session.begin("1");
        session.append("part", false);
        session.reset();
        assert!(!session.is_awaiting_body());
        assert!(session.number().is_empty());
    }
}
