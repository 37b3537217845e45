//! Application payload carried inside SMS bodies.
//!
//! The panel reports events as a pipe delimited list of `source|status`
//! pairs, e.g. `BW Flur|Einbruch|BW Kueche|Einbruch`. Commands sent to the
//! panel are `<key> <pin> <suffix>`, which the panel answers with
//! `Confirmed|<echoed command>`.

use core::fmt::Write;

use heapless::Vec;
use serde::Serialize;

use crate::config::Config;
use crate::sms::{Message, PART_SEPARATOR};
use crate::text::{trim_ascii, FixedString};

/// Maximum number of pairs kept from one body.
pub const MAX_ENTRIES: usize = 8;

/// Maximum length of a source or status.
pub const FIELD_CAPACITY: usize = 48;

pub type Field = FixedString<FIELD_CAPACITY>;

/// Source used for the entry synthesised from a command acknowledgement.
pub const ACK_SOURCE: &str = "alarmcontrol_status";

const CONFIRMED: &str = "Confirmed";

const MODE_MARKERS: [&str; 3] = ["MODE?:", "MOD?:", "MODE:"];

/// Arming state reported by the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmMode {
    Armed,
    Disarmed,
    Unknown,
}

impl AlarmMode {
    pub fn from_letter(c: char) -> Self {
        match c {
            'A' | 'H' => Self::Armed,
            'D' => Self::Disarmed,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Armed => "armed",
            Self::Disarmed => "disarmed",
            Self::Unknown => "unknown",
        }
    }
}

/// Commands the home-automation side can send to the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmCommand {
    QueryStatus,
    ArmAway,
    ArmHome,
    Disarm,
}

impl AlarmCommand {
    fn suffix(&self) -> &'static str {
        match self {
            Self::QueryStatus => "MOD?:",
            Self::ArmAway => "MODE:A",
            Self::ArmHome => "MODE:H",
            Self::Disarm => "MODE:D",
        }
    }
}

/// Build the SMS body for `command`.
pub fn encode(command: AlarmCommand, config: &Config) -> Message {
    let mut body = Message::new();
    let _ = write!(
        body,
        "{} {} {}",
        config.sms_key(),
        config.sms_pin(),
        command.suffix()
    );
    body
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub source: Field,
    pub status: Field,
}

impl Entry {
    pub fn new(source: &str, status: &str) -> Self {
        Self {
            source: field(source),
            status: field(status),
        }
    }
}

fn field(text: &str) -> Field {
    let mut field = Field::new();
    if !field.push_str(text) {
        warn!(
            "Envelope field exceeds {} bytes, truncating: {}",
            FIELD_CAPACITY,
            field.as_str()
        );
    }
    field
}

/// A decoded SMS body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Envelope {
    entries: Vec<Entry, MAX_ENTRIES>,
    #[serde(skip_serializing_if = "Option::is_none")]
    acknowledged: Option<AlarmMode>,
    #[serde(skip)]
    conflicts: u8,
}

impl Envelope {
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Status of the first entry, which wins over any later disagreeing one.
    pub fn status(&self) -> Option<&str> {
        self.entries.first().map(|e| e.status.as_str())
    }

    /// Mode echoed by the panel if the body acknowledges a command.
    pub fn acknowledgement(&self) -> Option<AlarmMode> {
        self.acknowledged
    }

    /// Number of entries whose status differs from the first one.
    pub fn conflicts(&self) -> u8 {
        self.conflicts
    }
}

/// Decode an SMS body received from the panel.
///
/// A trailing source without a status is dropped. Disagreeing statuses are
/// kept in the entry list but logged, the first status stays authoritative.
pub fn decode(body: &str) -> Envelope {
    let mut envelope = Envelope::default();
    let mut fields = body.split(PART_SEPARATOR).map(trim_ascii);

    while let (Some(source), Some(status)) = (fields.next(), fields.next()) {
        if envelope.entries.push(Entry::new(source, status)).is_err() {
            error!("Envelope holds more than {} entries, dropping: {}", MAX_ENTRIES, source);
        }
    }

    if let [entry] = envelope.entries.as_slice() {
        if entry.source == CONFIRMED {
            let mode = acknowledged_mode(&entry.status);
            debug!("Panel confirmed command, mode: {}", mode.as_str());
            envelope.entries.clear();
            let _ = envelope.entries.push(Entry::new(ACK_SOURCE, mode.as_str()));
            envelope.acknowledged = Some(mode);
            return envelope;
        }
    }

    if let Some((first, rest)) = envelope.entries.split_first() {
        for entry in rest.iter().filter(|e| e.status != first.status) {
            warn!(
                "Inconsistent status for {}: {} (keeping {})",
                entry.source.as_str(),
                entry.status.as_str(),
                first.status.as_str()
            );
            envelope.conflicts = envelope.conflicts.saturating_add(1);
        }
    }

    envelope
}

fn acknowledged_mode(echo: &str) -> AlarmMode {
    MODE_MARKERS
        .iter()
        .find_map(|marker| echo.find(*marker).map(|i| &echo[i + marker.len()..]))
        .and_then(|rest| rest.chars().next())
        .map_or(AlarmMode::Unknown, AlarmMode::from_letter)
}
