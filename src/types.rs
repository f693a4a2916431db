//! Types for RFID operations

use std::fmt;

/// Tag family, identified by the type byte of a response frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagFamily {
    Iso15693,
    TagItHf,
    LfReadWrite,
    Unsupported,
}

impl TagFamily {
    /// Label shown to the operator
    pub fn label(self) -> &'static str {
        match self {
            TagFamily::Iso15693 => "ISO 15693",
            TagFamily::TagItHf => "TAG-IT HF",
            TagFamily::LfReadWrite => "LF R/W",
            TagFamily::Unsupported => "Unsupported Tag",
        }
    }
}

/// A decoded tag read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRecord {
    pub family: TagFamily,
    /// Payload bytes in extraction order
    pub payload: Vec<u8>,
    /// Uppercase hex of `payload`, two digits per byte
    pub hex: String,
    /// False when the frame failed the LRC check but was decoded anyway
    pub valid: bool,
}

impl TagRecord {
    pub(crate) fn new(family: TagFamily, payload: Vec<u8>, valid: bool) -> Self {
        let hex = bytes_to_hex(&payload);
        Self {
            family,
            payload,
            hex,
            valid,
        }
    }

    pub fn label(&self) -> &'static str {
        self.family.label()
    }

    /// Payload as space separated hex pairs, e.g. `E0 04 01 00`
    pub fn hex_spaced(&self) -> String {
        self.payload
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for TagRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<11}{}", self.label(), self.hex_spaced())
    }
}

/// Connection state of a reader session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    /// Connected with no request outstanding
    Connected,
    /// A request has been written and its response frame is not yet drained
    AwaitingResponse,
}

/// Classification of a transport read/wait failure.
///
/// Every failure maps to exactly one variant and is reported once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CommFault {
    /// Operation still in flight; not an error
    #[error("I/O pending")]
    PendingIo,
    #[error("The hardware detected a break condition")]
    Break,
    #[error("The hardware detected a framing error")]
    Framing,
    #[error("A character-buffer overrun has occurred. The next character is lost.")]
    Overrun,
    #[error("An input buffer overflow has occurred")]
    ReceiveOverflow,
    #[error("The hardware detected a parity error")]
    Parity,
    #[error("A communication error occurred")]
    Unknown,
}

impl CommFault {
    /// Pending I/O is retried silently rather than reported
    pub fn is_pending(self) -> bool {
        self == CommFault::PendingIo
    }
}

/// Reason a drained frame failed the LRC check
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IntegrityFault {
    #[error("frame of {len} bytes is too short to carry a checksum")]
    TooShort { len: usize },
    #[error("checksum mismatch: computed 0x{expected:02X}, frame carries 0x{found:02X}")]
    Checksum { expected: u8, found: u8 },
    #[error("trailer mismatch: computed 0x{expected:02X}, frame carries 0x{found:02X}")]
    Trailer { expected: u8, found: u8 },
}

/// Everything the driver publishes to the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderEvent {
    /// A decoded tag read
    Tag(TagRecord),
    /// A drained frame failed the LRC check
    Integrity(IntegrityFault),
    /// A transport fault; the driver keeps running
    Comm(CommFault),
    /// A frame whose declared type needs more bytes than it carries
    Malformed { frame: Vec<u8>, reason: String },
}

/// Errors that can occur during RFID operations
#[derive(Debug, thiserror::Error)]
pub enum RfidError {
    /// Transport layer error (serial port, mock, etc.)
    #[error("transport error: {0}")]
    Transport(String),
    /// Invalid response received from the reader
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("not connected")]
    NotConnected,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convert bytes to uppercase hex string
pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}
