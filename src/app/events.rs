//! Outbound application events.
//!
//! The [`FanService`](super::service::FanService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.

use core::fmt;

use crate::error::EcError;

/// Structured events emitted by the control loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The loop is about to run its first iteration.
    Started { poll_interval_ms: u64 },

    /// One completed iteration.
    Telemetry(TelemetrySample),

    /// An iteration was abandoned because the EC stopped answering.
    EcFault(EcError),

    /// The loop has exited after `iterations` completed iterations.
    Stopped { iterations: u64 },
}

/// What one iteration observed and commanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetrySample {
    pub temperature_c: i32,
    pub duty: u8,
    /// Raw tachometer count.
    pub rpm: u16,
}

/// The status line format: `temp=<int>C duty=<int> rpm=<int>`.
impl fmt::Display for TelemetrySample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "temp={}C duty={} rpm={}",
            self.temperature_c, self.duty, self.rpm
        )
    }
}
