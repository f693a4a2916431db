//! Driver for TI Series 6000 style HF/LF RFID readers on a serial link.
//!
//! The reader answers one request at a time. Responses arrive in arbitrary
//! fragments; they are reassembled into length-delimited frames, checked with
//! an LRC and decoded into [`TagRecord`]s, which are published on a channel
//! together with any faults.
//!
//! # Features
//!
//! - `serial` - Serial port transport for desktop using serialport crate
//!
//! # Example
//!
//! ```ignore
//! use ti_rfid::{ReaderConfig, ReaderEvent, RfidReader};
//!
//! let config = ReaderConfig::new("/dev/ttyUSB0");
//! let mut reader = RfidReader::open(&config)?;
//!
//! for event in reader.events().iter().take(10) {
//!     match event {
//!         ReaderEvent::Tag(tag) => println!("{}", tag),
//!         other => eprintln!("{:?}", other),
//!     }
//! }
//! reader.disconnect()?;
//! ```

pub mod assembler;
mod config;
pub mod decoder;
mod driver;
pub mod lrc;
pub mod protocol;
mod reader;
mod transport;
mod types;

#[cfg(feature = "serial")]
mod serial;

// Re-exports
pub use assembler::FrameAssembler;
pub use config::{IntegrityPolicy, ReaderConfig};
pub use reader::RfidReader;
pub use transport::RfidTransport;
pub use types::{
    CommFault, ConnectionState, IntegrityFault, ReaderEvent, RfidError, TagFamily, TagRecord,
};

#[cfg(feature = "serial")]
pub use serial::SerialTransport;
