//! Busy-wait policy for the EC handshake flags.
//!
//! Firmware normally answers within microseconds, but nothing in the
//! protocol guarantees it.  `Spin` waits forever; `Bounded` gives every
//! individual flag wait its own monotonic deadline.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Default per-wait budget for [`WaitStrategy::Bounded`].
pub const DEFAULT_WAIT_TIMEOUT_US: u64 = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum WaitStrategy {
    /// Poll until the flag resolves, however long that takes.
    Spin,
    /// Give up after `timeout_us` microseconds.
    Bounded { timeout_us: u64 },
}

impl Default for WaitStrategy {
    fn default() -> Self {
        Self::Bounded {
            timeout_us: DEFAULT_WAIT_TIMEOUT_US,
        }
    }
}

impl WaitStrategy {
    /// Per-wait budget, `None` when unbounded.
    pub fn timeout(self) -> Option<Duration> {
        match self {
            Self::Spin => None,
            Self::Bounded { timeout_us } => Some(Duration::from_micros(timeout_us)),
        }
    }

    /// Deadline for a wait that started at `start`.
    pub(crate) fn deadline(self, start: Instant) -> Option<Instant> {
        self.timeout().map(|t| start + t)
    }
}
