//! Wire constants for the reader protocol.
//!
//! A frame is laid out as
//! `SOF | LEN | .. | TYPE (offset 7) | payload .. | LRC | !LRC`
//! where `LEN` counts every byte including the two trailing check bytes.

/// Start of frame
pub const SOF: u8 = 0x01;

/// Offset of the declared total frame length
pub const LENGTH_OFFSET: usize = 1;

/// 1-based position of the length byte, as used by `FrameAssembler::peek_at`
pub const LENGTH_ORDINAL: usize = LENGTH_OFFSET + 1;

/// Offset of the tag type byte
pub const TYPE_OFFSET: usize = 7;

/// Smallest frame the assembler will ever drain
pub const MIN_FRAME_LEN: usize = 2;

pub const TYPE_ISO15693: u8 = 0x04;
pub const TYPE_TAG_IT_HF: u8 = 0x05;
pub const TYPE_LF_RW: u8 = 0x06;

/// Length byte carried by the reader's acknowledgement of `INIT_COMMAND`
pub const INIT_ACK_LENGTH: u8 = 0x09;

/// Sent once per connection. An ASCII-hex preamble followed by the binary
/// configuration frame `01 0A 00 03 01 43 06 00 4C B3`.
pub const INIT_COMMAND: [u8; 26] = [
    0x30, 0x31, 0x30, 0x41, 0x30, 0x30, 0x30, 0x33, 0x30, 0x31, 0x34, 0x33, 0x30, 0x36, 0x30, 0x30,
    0x01, 0x0A, 0x00, 0x03, 0x01, 0x43, 0x06, 0x00, 0x4C, 0xB3,
];

/// "Find token": asks the reader for the next tag read
pub const REQUEST_COMMAND: [u8; 9] = [0x01, 0x09, 0x00, 0x03, 0x01, 0x41, 0x00, 0x4B, 0xB4];
