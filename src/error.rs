//! Error types for the EC transaction engine.
//!
//! All variants are `Copy` so a failed transaction can be logged,
//! forwarded to the event sink, and returned without allocation.

use core::fmt;
use std::io;
use std::time::Duration;

use crate::ec::protocol::{Phase, WaitCondition};

// ---------------------------------------------------------------------------
// Transaction errors
// ---------------------------------------------------------------------------

/// Every EC register access funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcError {
    /// A flag wait ran past its deadline. The EC is wedged or the
    /// port addresses are wrong for this platform.
    Unresponsive {
        condition: WaitCondition,
        phase: Phase,
        waited: Duration,
    },
    /// Shutdown was requested while a flag wait had not resolved.
    Interrupted {
        condition: WaitCondition,
        phase: Phase,
    },
    /// The port access layer itself failed.
    Port { port: u16, kind: io::ErrorKind },
}

impl EcError {
    /// Whether the loop may carry on with the next iteration.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Unresponsive { .. })
    }
}

impl fmt::Display for EcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unresponsive {
                condition,
                phase,
                waited,
            } => write!(
                f,
                "EC unresponsive: no {condition} before {phase} after {}us",
                waited.as_micros()
            ),
            Self::Interrupted { condition, phase } => {
                write!(f, "interrupted waiting for {condition} before {phase}")
            }
            Self::Port { port, kind } => write!(f, "port 0x{port:02x} access failed: {kind}"),
        }
    }
}

impl std::error::Error for EcError {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

pub type Result<T> = core::result::Result<T, EcError>;
