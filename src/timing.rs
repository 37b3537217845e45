use embassy_time::Duration;

/// Delay before each response line sent to the panel, a real SIM900 does not
/// answer instantly and the panel firmware relies on that
pub fn response_delay() -> Duration {
    Duration::from_millis(100)
}

/// Toggle interval of the status LED in slow flash mode
pub fn blink_slow() -> Duration {
    Duration::from_millis(500)
}

/// Toggle interval of the status LED in fast flash mode
pub fn blink_fast() -> Duration {
    Duration::from_millis(250)
}

/// On/off time of a single flash in a one-shot indication
pub fn flash_interval() -> Duration {
    Duration::from_millis(100)
}

/// Convert a duration to the millisecond tick domain of [`crate::clock::Clock`].
///
/// Saturates at `u32::MAX`.
pub(crate) fn as_ticks(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}
