//! Turns a drained frame into a tag record

use crate::protocol::{
    INIT_ACK_LENGTH, LENGTH_OFFSET, TYPE_ISO15693, TYPE_LF_RW, TYPE_OFFSET, TYPE_TAG_IT_HF,
};
use crate::types::{RfidError, TagFamily, TagRecord};

/// Decode `frame`, dispatching on the type byte at offset 7.
///
/// Payloads are read backwards from a fixed distance to the frame's end, so
/// the extracted order is the reverse of the wire order. Returns `Ok(None)`
/// for the reader's acknowledgement of the init command.
///
/// `valid` is the integrity verdict, carried into the record unchanged.
pub fn decode(frame: &[u8], valid: bool) -> Result<Option<TagRecord>, RfidError> {
    let len = frame.len();

    let (family, payload) = match frame.get(TYPE_OFFSET).copied() {
        Some(TYPE_ISO15693) => (TagFamily::Iso15693, read_backward(frame, len - 3, 8)?),
        Some(TYPE_TAG_IT_HF) => (TagFamily::TagItHf, read_backward(frame, len - 1, 4)?),
        Some(TYPE_LF_RW) => (TagFamily::LfReadWrite, read_backward(frame, len - 3, 8)?),
        _ => {
            if is_init_ack(frame) {
                return Ok(None);
            }
            (TagFamily::Unsupported, Vec::new())
        }
    };

    Ok(Some(TagRecord::new(family, payload, valid)))
}

/// Whether `frame` is the reader's reply to the init command
pub fn is_init_ack(frame: &[u8]) -> bool {
    frame.get(LENGTH_OFFSET) == Some(&INIT_ACK_LENGTH)
}

/// `count` bytes starting at index `start` and walking towards the frame head
fn read_backward(frame: &[u8], start: usize, count: usize) -> Result<Vec<u8>, RfidError> {
    if start >= frame.len() || start + 1 < count {
        return Err(RfidError::InvalidResponse(format!(
            "frame of {} bytes cannot hold {} payload bytes ending at index {}",
            frame.len(),
            count,
            start
        )));
    }
    Ok(frame[start + 1 - count..=start].iter().rev().copied().collect())
}
