use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, Sender};
use log::{debug, error, info};

use crate::config::ReaderConfig;
use crate::driver::{StreamDriver, get_state, set_state};
use crate::protocol::INIT_COMMAND;
use crate::transport::RfidTransport;
use crate::types::{ConnectionState, ReaderEvent, RfidError};

#[cfg(feature = "serial")]
use crate::serial::SerialTransport;

/// Operator-side handle to a connected reader.
///
/// Tag reads and faults arrive on [`RfidReader::events`]. Dropping the handle
/// disconnects.
pub struct RfidReader {
    state: Arc<Mutex<ConnectionState>>,
    events: Receiver<ReaderEvent>,
    cancel: Option<Sender<()>>,
    driver: Option<JoinHandle<()>>,
}

impl RfidReader {
    /// Send the init command over `transport` and start the driver thread
    pub fn connect<T>(mut transport: T, config: &ReaderConfig) -> Result<Self, RfidError>
    where
        T: RfidTransport + 'static,
    {
        transport
            .clear_input()
            .map_err(|e| RfidError::Transport(format!("{:?}", e)))?;
        debug!("Sending init command: {:02X?}", INIT_COMMAND);
        let written = transport
            .write(&INIT_COMMAND)
            .map_err(|e| RfidError::Transport(format!("Failed to initialize RFID reader: {:?}", e)))?;
        if written != INIT_COMMAND.len() {
            return Err(RfidError::Transport(format!(
                "Short init write: {} of {} bytes",
                written,
                INIT_COMMAND.len()
            )));
        }

        let state = Arc::new(Mutex::new(ConnectionState::Connected));
        let (event_tx, events) = channel::unbounded();
        let (cancel_tx, cancel_rx) = channel::bounded(1);

        let driver = StreamDriver::new(transport, config, Arc::clone(&state), event_tx, cancel_rx);
        let handle = thread::Builder::new()
            .name("rfid-driver".into())
            .spawn(move || driver.run())
            .map_err(|e| {
                error!("Error creating read thread: {}", e);
                RfidError::Io(e)
            })?;

        info!("Reader connected");
        Ok(Self {
            state,
            events,
            cancel: Some(cancel_tx),
            driver: Some(handle),
        })
    }

    /// Open the configured serial port and connect over it
    #[cfg(feature = "serial")]
    pub fn open(config: &ReaderConfig) -> Result<Self, RfidError> {
        let transport = SerialTransport::open(config)?;
        Self::connect(transport, config)
    }

    pub fn state(&self) -> ConnectionState {
        get_state(&self.state)
    }

    pub fn is_connected(&self) -> bool {
        self.state() != ConnectionState::Disconnected
    }

    /// Stream of tag reads and operator-visible faults
    pub fn events(&self) -> &Receiver<ReaderEvent> {
        &self.events
    }

    /// Signal the driver, wait for it to unwind and release the transport.
    ///
    /// Bytes of an incomplete frame are discarded without producing a record.
    pub fn disconnect(&mut self) -> Result<(), RfidError> {
        let Some(handle) = self.driver.take() else {
            return Err(RfidError::NotConnected);
        };

        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        handle
            .join()
            .map_err(|_| RfidError::Transport("driver thread panicked".into()))?;

        set_state(&self.state, ConnectionState::Disconnected);
        info!("Reader disconnected");
        Ok(())
    }
}

impl Drop for RfidReader {
    fn drop(&mut self) {
        if self.driver.is_some() {
            let _ = self.disconnect();
        }
    }
}
