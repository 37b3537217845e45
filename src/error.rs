#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    // Peer link errors
    Serial(embedded_io::ErrorKind),

    // Capacity errors
    QueueFull,

    IoPin,
}

impl Error {
    pub(crate) fn serial<E: embedded_io::Error>(e: E) -> Self {
        Self::Serial(e.kind())
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Serial(kind) => write!(f, "serial link error: {:?}", kind),
            Self::QueueFull => f.write_str("queue full"),
            Self::IoPin => f.write_str("indicator pin error"),
        }
    }
}
