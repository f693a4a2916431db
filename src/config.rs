//! Reader session configuration

use std::time::Duration;

/// What the driver does with a frame that fails the LRC check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegrityPolicy {
    /// Report the fault, then decode the frame and emit it flagged invalid
    #[default]
    DecodeAndFlag,
    /// Report the fault and drop the frame
    Discard,
}

/// Settings for opening and driving a reader
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    pub port_name: String,
    pub baud_rate: u32,
    /// Bound on a command write; the only timeout in normal operation
    pub write_timeout: Duration,
    /// How often the serial backend checks its input queue for arrivals
    pub poll_interval: Duration,
    /// Delay before re-sending a request whose write failed
    pub request_retry: Duration,
    pub integrity_policy: IntegrityPolicy,
    /// Raise RTS and DTR after the port is opened
    pub assert_control_lines: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            port_name: "/dev/ttyUSB0".into(),
            baud_rate: 57_600,
            write_timeout: Duration::from_millis(5000),
            poll_interval: Duration::from_millis(10),
            request_retry: Duration::from_secs(1),
            integrity_policy: IntegrityPolicy::default(),
            assert_control_lines: true,
        }
    }
}

impl ReaderConfig {
    pub fn new(port_name: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            ..Self::default()
        }
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_request_retry(mut self, retry: Duration) -> Self {
        self.request_retry = retry;
        self
    }

    pub fn with_integrity_policy(mut self, policy: IntegrityPolicy) -> Self {
        self.integrity_policy = policy;
        self
    }

    pub fn with_control_lines(mut self, assert: bool) -> Self {
        self.assert_control_lines = assert;
        self
    }
}
