//! Serial port transport for desktop using serialport crate

use std::io::ErrorKind;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender, TrySendError};
use log::{debug, warn};
use serialport::SerialPort;

use crate::config::ReaderConfig;
use crate::transport::RfidTransport;
use crate::types::{CommFault, RfidError};

pub struct SerialTransport {
    port: Box<dyn SerialPort>,
    ready: Receiver<()>,
    stop: Option<Sender<()>>,
    watcher: Option<JoinHandle<()>>,
}

impl SerialTransport {
    /// Open `config.port_name`, raise the control lines and start watching for input
    pub fn open(config: &ReaderConfig) -> Result<Self, RfidError> {
        let mut port = serialport::new(config.port_name.as_str(), config.baud_rate)
            .timeout(config.write_timeout)
            .open()
            .map_err(|e| match e.kind() {
                serialport::ErrorKind::NoDevice => {
                    RfidError::Transport(format!("Serial port does not exist: {}", config.port_name))
                }
                _ => RfidError::Transport(format!("Error opening port {}: {}", config.port_name, e)),
            })?;

        if config.assert_control_lines {
            if let Err(e) = port.write_request_to_send(true) {
                warn!("Error sending RTS signal: {}", e);
            }
            if let Err(e) = port.write_data_terminal_ready(true) {
                warn!("Error sending DTR signal: {}", e);
            }
        }
        port.clear(serialport::ClearBuffer::Input)
            .map_err(|e| RfidError::Transport(format!("{:?}", e)))?;

        let watch_port = port
            .try_clone()
            .map_err(|e| RfidError::Transport(format!("{:?}", e)))?;
        let (ready_tx, ready) = channel::bounded(1);
        let (stop_tx, stop_rx) = channel::bounded(1);
        let interval = config.poll_interval;
        let watcher = thread::Builder::new()
            .name("rfid-serial-watch".into())
            .spawn(move || watch_input(watch_port, interval, ready_tx, stop_rx))?;

        debug!("Opened {} at {} baud", config.port_name, config.baud_rate);
        Ok(Self {
            port,
            ready,
            stop: Some(stop_tx),
            watcher: Some(watcher),
        })
    }

    /// Names of the serial ports present on this machine
    pub fn available_ports() -> Result<Vec<String>, RfidError> {
        serialport::available_ports()
            .map(|ports| ports.into_iter().map(|p| p.port_name).collect())
            .map_err(|e| RfidError::Transport(format!("{:?}", e)))
    }
}

/// Signal `ready` whenever the input queue is non-empty, until `stop` fires or is dropped
fn watch_input(
    port: Box<dyn SerialPort>,
    interval: Duration,
    ready: Sender<()>,
    stop: Receiver<()>,
) {
    loop {
        match port.bytes_to_read() {
            Ok(0) => {}
            Ok(_) => match ready.try_send(()) {
                Ok(()) | Err(TrySendError::Full(())) => {}
                Err(TrySendError::Disconnected(())) => return,
            },
            Err(e) => warn!("Error polling input queue: {}", e),
        }

        match stop.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {}
            _ => return,
        }
    }
}

impl RfidTransport for SerialTransport {
    type Error = std::io::Error;

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        std::io::Write::write(&mut self.port, data)
    }

    fn bytes_available(&mut self) -> Result<usize, Self::Error> {
        self.port
            .bytes_to_read()
            .map(|n| n as usize)
            .map_err(|e| std::io::Error::other(e))
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        std::io::Read::read(&mut self.port, buf)
    }

    fn data_ready(&self) -> Receiver<()> {
        self.ready.clone()
    }

    fn clear_input(&mut self) -> Result<(), Self::Error> {
        self.port
            .clear(serialport::ClearBuffer::Input)
            .map_err(|e| std::io::Error::other(e))
    }

    /// Line status bits are not exposed portably, so only the I/O error kind is available
    fn classify(&mut self, error: &Self::Error) -> CommFault {
        match error.kind() {
            ErrorKind::WouldBlock | ErrorKind::Interrupted | ErrorKind::TimedOut => {
                CommFault::PendingIo
            }
            ErrorKind::InvalidData => CommFault::Framing,
            ErrorKind::OutOfMemory => CommFault::ReceiveOverflow,
            _ => CommFault::Unknown,
        }
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        drop(self.stop.take());
        if let Some(watcher) = self.watcher.take() {
            let _ = watcher.join();
        }
    }
}
