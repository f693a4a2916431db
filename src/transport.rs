use crossbeam::channel::Receiver;

use crate::types::CommFault;

/// Trait for RFID reader communication backends.
/// Implement this trait for different transports (serial port, test doubles, etc.)
///
/// The driver thread owns the transport for the whole session, so it must be `Send`.
pub trait RfidTransport: Send {
    /// Error type for transport operations
    type Error: std::fmt::Debug;

    /// Write a command frame
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Number of bytes that can be read right now without blocking
    fn bytes_available(&mut self) -> Result<usize, Self::Error>;

    /// Read up to `buf.len()` of the bytes currently available
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Notification source signalled whenever new input has arrived.
    ///
    /// The driver blocks on this together with its cancellation channel.
    /// A closed channel means the transport can no longer report arrivals.
    fn data_ready(&self) -> Receiver<()>;

    /// Clear the input buffer
    fn clear_input(&mut self) -> Result<(), Self::Error>;

    /// Classify a failure returned by `bytes_available` or `read`
    fn classify(&mut self, error: &Self::Error) -> CommFault;
}
