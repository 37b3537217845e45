//! Line framing of the panel's byte stream.

use embedded_io::{Read, ReadReady};

use crate::command::{Command, COMMAND_CAPACITY};
use crate::error::Error;

/// Ctrl-Z, terminates an SMS body in text mode.
pub const SUB: u8 = 0x1A;

const READ_CHUNK: usize = 32;

/// A completed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub line: Command,
    /// The line was closed by Ctrl-Z rather than `\n`.
    pub body_end: bool,
}

/// Assembles bytes from the panel into lines.
#[derive(Debug, Default)]
pub struct FrameReader {
    line: Command,
    overflowed: bool,
}

impl FrameReader {
    pub const fn new() -> Self {
        Self {
            line: Command::new(),
            overflowed: false,
        }
    }

    /// Bytes accumulated for the line in progress.
    pub fn pending(&self) -> &str {
        self.line.as_str()
    }

    /// Process one byte.
    ///
    /// `awaiting_body` tells whether Ctrl-Z currently terminates an SMS
    /// body. Returns a frame when the byte completes a non-empty line, or any
    /// line at all if it was closed by Ctrl-Z.
    pub fn feed(&mut self, byte: u8, awaiting_body: bool) -> Option<Frame> {
        match byte {
            b'\r' => None,
            b'\n' => self.take(false),
            SUB if awaiting_body => self.take(true),
            SUB => {
                self.append(byte);
                None
            }
            b if b < 0x20 => {
                warn!("Received control character: {}, ignore", b);
                None
            }
            b => {
                self.append(b);
                None
            }
        }
    }

    /// Drain every byte the link has ready without blocking, handing each
    /// completed frame to `on_frame`. Returns the number of bytes consumed.
    pub fn poll<S, F>(
        &mut self,
        serial: &mut S,
        awaiting_body: bool,
        mut on_frame: F,
    ) -> Result<usize, Error>
    where
        S: Read + ReadReady,
        F: FnMut(Frame),
    {
        let mut consumed = 0;
        let mut buf = [0u8; READ_CHUNK];

        while serial.read_ready().map_err(Error::serial)? {
            let n = serial.read(&mut buf).map_err(Error::serial)?;
            if n == 0 {
                break;
            }
            consumed += n;

            for &byte in &buf[..n] {
                if let Some(frame) = self.feed(byte, awaiting_body) {
                    on_frame(frame);
                }
            }
        }

        Ok(consumed)
    }

    fn append(&mut self, byte: u8) {
        // Bytes above ASCII are taken as Latin-1.
        if !self.line.push(char::from(byte)) && !self.overflowed {
            self.overflowed = true;
            warn!("Line exceeds {} bytes, truncating", COMMAND_CAPACITY);
        }
    }

    fn take(&mut self, body_end: bool) -> Option<Frame> {
        if self.line.is_empty() && !body_end {
            return None;
        }

        let line = core::mem::take(&mut self.line);
        self.overflowed = false;

        Some(Frame { line, body_end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::MockSerial;

    fn feed_all(reader: &mut FrameReader, bytes: &[u8], awaiting_body: bool) -> Vec<Frame> {
        bytes
            .iter()
            .filter_map(|&b| reader.feed(b, awaiting_body))
            .collect()
    }

    #[test]
    fn lines_split_on_newline() {
        let mut reader = FrameReader::new();
        let frames = feed_all(&mut reader, b"AT\r\nATZ\r\n\r\n+CSQ", false);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].line, "AT");
        assert_eq!(frames[1].line, "ATZ");
        assert!(!frames[0].body_end);
        assert_eq!(reader.pending(), "+CSQ");
    }

    #[test]
    fn control_characters_are_dropped() {
        let mut reader = FrameReader::new();
        let frames = feed_all(&mut reader, b"A\x00T\x07\x1b\n", false);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].line, "AT");
    }

    #[test]
    fn ctrl_z_ends_body_only_while_awaiting() {
        let mut reader = FrameReader::new();
        let frames = feed_all(&mut reader, b"hello\x1a", true);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].line, "hello");
        assert!(frames[0].body_end);

        let frames = feed_all(&mut reader, b"\x1a", true);
        assert_eq!(frames.len(), 1);
        assert!(frames[0].line.is_empty());
        assert!(frames[0].body_end);

        assert!(feed_all(&mut reader, b"x\x1a", false).is_empty());
        assert_eq!(reader.pending(), "x\u{1a}");
    }

    #[test]
    fn overlong_line_is_truncated() {
        let mut reader = FrameReader::new();
        let mut bytes = vec![b'A'; COMMAND_CAPACITY + 50];
        bytes.push(b'\n');
        let frames = feed_all(&mut reader, &bytes, false);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].line.len(), COMMAND_CAPACITY);
        assert!(reader.pending().is_empty());
    }

    #[test]
    fn latin1_bytes_are_kept() {
        let mut reader = FrameReader::new();
        let frames = feed_all(&mut reader, b"K\xfcche\n", false);
        assert_eq!(frames[0].line, "K\u{fc}che");
    }

    #[test]
    fn poll_drains_ready_bytes() {
        let mut reader = FrameReader::new();
        let mut serial = MockSerial::new();
        serial.receive(b"AT+CMGF=1\r\nAT+CNMI=3,1\r\nAT+CS");

        let mut frames = Vec::new();
        let consumed = reader
            .poll(&mut serial, false, |f| frames.push(f))
            .unwrap();

        assert_eq!(consumed, 29);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].line, "AT+CNMI=3,1");
        assert_eq!(reader.pending(), "AT+CS");

        // Nothing ready, returns immediately.
        assert_eq!(reader.poll(&mut serial, false, |_| panic!()).unwrap(), 0);
    }
}
