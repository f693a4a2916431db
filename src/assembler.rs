//! Reassembles frames from the fragmented byte stream

use crate::protocol::{LENGTH_ORDINAL, MIN_FRAME_LEN};

/// FIFO byte queue that yields complete length-delimited frames.
///
/// Bytes leave the queue in exactly the order they were appended. Nothing is
/// dropped except by [`FrameAssembler::clear`].
#[derive(Debug, Default)]
pub struct FrameAssembler {
    buffer: Vec<u8>,
}

impl FrameAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append arriving bytes to the tail. Returns the new queue length.
    pub fn append(&mut self, bytes: &[u8]) -> usize {
        self.buffer.extend_from_slice(bytes);
        self.buffer.len()
    }

    /// Byte at 1-based position `ordinal`, without removing it
    pub fn peek_at(&self, ordinal: usize) -> Option<u8> {
        ordinal
            .checked_sub(1)
            .and_then(|index| self.buffer.get(index))
            .copied()
    }

    /// Remove and return the first `n` bytes.
    ///
    /// # Panics
    /// If `n` exceeds the queue length. Callers check the length first.
    pub fn drain(&mut self, n: usize) -> Vec<u8> {
        assert!(
            n <= self.buffer.len(),
            "drain of {} bytes from a queue holding {}",
            n,
            self.buffer.len()
        );
        self.buffer.drain(..n).collect()
    }

    /// Declared length of the frame at the head of the queue, once known
    pub fn declared_len(&self) -> Option<usize> {
        self.peek_at(LENGTH_ORDINAL)
            .map(|len| (len as usize).max(MIN_FRAME_LEN))
    }

    /// Drain the head frame if all of its declared bytes are present
    pub fn next_frame(&mut self) -> Option<Vec<u8>> {
        let frame_len = self.declared_len()?;
        if self.buffer.len() < frame_len {
            return None;
        }
        Some(self.drain(frame_len))
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Discard everything buffered, complete or not
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
