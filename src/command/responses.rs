//! Response texts sent back to the panel. They must match a real SIM900
//! byte for byte, the panel firmware compares them literally.

pub const OK: &str = "OK";
pub const ERROR: &str = "ERROR";
pub const PROMPT: &str = ">";

pub const READY: &str = "RDY";
pub const SIM_INSERTED: &str = "+CSMINS: 1,1";
pub const FULL_FUNCTIONALITY: &str = "+CFUN: 1";
pub const PIN_READY: &str = "+CPIN: READY";
pub const CALL_READY: &str = "Call Ready";
pub const POWER_DOWN: &str = "NORMAL POWER DOWN";

pub const CLOCK: &str = "+CCLK: \"25/01/01,12:00:00+08\"";
pub const SIGNAL_QUALITY: &str = "+CSQ: 23,0";
pub const NETWORK_REGISTRATION: &str = "+CREG: 0,1";

/// Reference returned for every message the panel sends.
pub const MESSAGE_SENT: &str = "+CMGS: 123";

/// Timestamp reported for stored messages.
pub const MESSAGE_TIMESTAMP: &str = "25/01/01,12:00:00+08";

/// Startup sequence of the modem, also the answer to `ATZ`.
pub const BANNER: [&str; 6] = [
    OK,
    READY,
    SIM_INSERTED,
    FULL_FUNCTIONALITY,
    PIN_READY,
    CALL_READY,
];
