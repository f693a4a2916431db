//! The driver loop: one request at a time, reassemble, check, decode, publish.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossbeam::channel::{Receiver, Sender, TryRecvError, select};
use log::{debug, error, info, warn};

use crate::assembler::FrameAssembler;
use crate::config::{IntegrityPolicy, ReaderConfig};
use crate::decoder;
use crate::lrc;
use crate::protocol::REQUEST_COMMAND;
use crate::transport::RfidTransport;
use crate::types::{CommFault, ConnectionState, ReaderEvent};

/// What woke the driver from its wait
enum Wake {
    Cancel,
    Data,
    RetryRequest,
    SourceLost,
}

/// Owns the transport, the byte queue and the request slot for one session.
///
/// Only the driver thread touches these. The operator side sees the published
/// `ConnectionState` and the event channel, and can only signal `cancel`.
pub(crate) struct StreamDriver<T: RfidTransport> {
    transport: T,
    assembler: FrameAssembler,
    request_pending: bool,
    policy: IntegrityPolicy,
    request_retry: Duration,
    state: Arc<Mutex<ConnectionState>>,
    events: Sender<ReaderEvent>,
    cancel: Receiver<()>,
}

pub(crate) fn set_state(state: &Mutex<ConnectionState>, next: ConnectionState) {
    let mut guard = state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = next;
}

pub(crate) fn get_state(state: &Mutex<ConnectionState>) -> ConnectionState {
    *state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<T: RfidTransport> StreamDriver<T> {
    pub(crate) fn new(
        transport: T,
        config: &ReaderConfig,
        state: Arc<Mutex<ConnectionState>>,
        events: Sender<ReaderEvent>,
        cancel: Receiver<()>,
    ) -> Self {
        Self {
            transport,
            assembler: FrameAssembler::new(),
            request_pending: false,
            policy: config.integrity_policy,
            request_retry: config.request_retry,
            state,
            events,
            cancel,
        }
    }

    /// Run until cancelled, then release the transport.
    pub(crate) fn run(mut self) {
        let data_ready = self.transport.data_ready();
        debug!("Driver loop started");

        loop {
            if !self.request_pending {
                self.send_request();
            }

            match self.wait(&data_ready) {
                Wake::Cancel => break,
                // Cancellation wins over data that became ready at the same time
                _ if self.cancel_signalled() => break,
                Wake::Data => self.service_input(),
                Wake::RetryRequest => {}
                Wake::SourceLost => {
                    error!("Transport stopped reporting arrivals");
                    self.emit(ReaderEvent::Comm(CommFault::Unknown));
                    let _ = self.cancel.recv();
                    break;
                }
            }
        }

        self.shutdown();
    }

    /// Block on {cancel, data ready}. Only a failed request write adds a timeout.
    fn wait(&self, data_ready: &Receiver<()>) -> Wake {
        if self.request_pending {
            select! {
                recv(self.cancel) -> _ => Wake::Cancel,
                recv(data_ready) -> msg => match msg {
                    Ok(()) => Wake::Data,
                    Err(_) => Wake::SourceLost,
                },
            }
        } else {
            select! {
                recv(self.cancel) -> _ => Wake::Cancel,
                recv(data_ready) -> msg => match msg {
                    Ok(()) => Wake::Data,
                    Err(_) => Wake::SourceLost,
                },
                default(self.request_retry) => Wake::RetryRequest,
            }
        }
    }

    /// A dropped sender counts as a cancellation too
    fn cancel_signalled(&self) -> bool {
        !matches!(self.cancel.try_recv(), Err(TryRecvError::Empty))
    }

    fn send_request(&mut self) {
        debug!("Sending request: {:02X?}", REQUEST_COMMAND);
        match self.transport.write(&REQUEST_COMMAND) {
            Ok(written) if written == REQUEST_COMMAND.len() => {
                self.request_pending = true;
                set_state(&self.state, ConnectionState::AwaitingResponse);
            }
            Ok(written) => {
                warn!(
                    "Short request write: {} of {} bytes",
                    written,
                    REQUEST_COMMAND.len()
                );
                self.emit(ReaderEvent::Comm(CommFault::Unknown));
            }
            Err(e) => {
                warn!("Request write failed: {:?}", e);
                self.report_fault(&e);
            }
        }
    }

    fn service_input(&mut self) {
        let available = match self.transport.bytes_available() {
            Ok(n) => n,
            Err(e) => {
                self.report_fault(&e);
                return;
            }
        };
        if available == 0 {
            return;
        }

        let mut chunk = vec![0u8; available];
        let bytes_read = match self.transport.read(&mut chunk) {
            Ok(n) => n,
            Err(e) => {
                self.report_fault(&e);
                return;
            }
        };
        chunk.truncate(bytes_read);
        debug!("Received {} bytes: {:02X?}", bytes_read, chunk);

        let queued = self.assembler.append(&chunk);
        if let Some(frame_len) = self.assembler.declared_len() {
            debug!("{} of {} frame bytes buffered", queued, frame_len);
        }

        while let Some(frame) = self.assembler.next_frame() {
            self.process_frame(frame);
        }
    }

    fn process_frame(&mut self, frame: Vec<u8>) {
        debug!("Frame complete ({} bytes): {:02X?}", frame.len(), frame);

        let integrity = lrc::verify(&frame);
        if let Err(fault) = integrity {
            warn!("Error in RFID frame: {}", fault);
            self.emit(ReaderEvent::Integrity(fault));
        }

        // Any drained frame ends the exchange, init acknowledgements included
        self.release_request();

        if integrity.is_err() && self.policy == IntegrityPolicy::Discard {
            debug!("Discarding frame that failed the LRC check");
            return;
        }

        match decoder::decode(&frame, integrity.is_ok()) {
            Ok(Some(record)) => {
                info!("Tag read: {}", record);
                self.emit(ReaderEvent::Tag(record));
            }
            Ok(None) => debug!("Init acknowledgement suppressed"),
            Err(e) => {
                warn!("Failed to decode frame: {}", e);
                self.emit(ReaderEvent::Malformed {
                    frame,
                    reason: e.to_string(),
                });
            }
        }
    }

    fn release_request(&mut self) {
        if self.request_pending {
            self.request_pending = false;
            set_state(&self.state, ConnectionState::Connected);
        }
    }

    fn report_fault(&mut self, error: &T::Error) {
        let fault = self.transport.classify(error);
        if fault.is_pending() {
            debug!("I/O pending, retrying");
            return;
        }
        warn!("{} ({:?})", fault, error);
        self.emit(ReaderEvent::Comm(fault));
    }

    fn emit(&self, event: ReaderEvent) {
        if self.events.send(event).is_err() {
            debug!("Event receiver dropped");
        }
    }

    /// Drop the partial frame, purge pending input and release the transport
    fn shutdown(self) {
        let Self {
            mut transport,
            mut assembler,
            state,
            ..
        } = self;

        if !assembler.is_empty() {
            debug!("Discarding {} buffered bytes", assembler.len());
            assembler.clear();
        }
        if let Err(e) = transport.clear_input() {
            warn!("Error purging read buffer: {:?}", e);
        }
        drop(transport);

        set_state(&state, ConnectionState::Disconnected);
        debug!("Driver loop stopped");
    }
}
