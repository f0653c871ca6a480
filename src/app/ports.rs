//! Port traits: the boundary between the control logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ FanService / EmbeddedController
//! ```
//!
//! The privileged I/O port backend, the thermal sensor, the telemetry
//! output and the configuration source all sit behind these traits, so
//! the transaction engine and the control loop run unchanged against
//! test doubles.

use std::io;

use crate::config::FanConfig;

// ───────────────────────────────────────────────────────────────
// Port I/O (driven adapter: engine → hardware)
// ───────────────────────────────────────────────────────────────

/// Single-byte access to the x86 I/O port space.
///
/// Implementations are trusted primitives: the engine never validates
/// what comes back.  They are not reentrant and must only be driven
/// from one thread.
pub trait PortIo {
    fn read_port(&mut self, port: u16) -> io::Result<u8>;

    fn write_port(&mut self, port: u16, value: u8) -> io::Result<()>;
}

impl<T: PortIo + ?Sized> PortIo for &mut T {
    fn read_port(&mut self, port: u16) -> io::Result<u8> {
        (**self).read_port(port)
    }

    fn write_port(&mut self, port: u16, value: u8) -> io::Result<()> {
        (**self).write_port(port, value)
    }
}

// ───────────────────────────────────────────────────────────────
// Temperature source (driven adapter: sensor → domain)
// ───────────────────────────────────────────────────────────────

/// Whole-degree CPU temperature.
///
/// Infallible by contract: a source that cannot produce a reading
/// returns 0, which the fan curve maps to its lowest rung.
pub trait TemperatureSource {
    fn read_celsius(&mut self) -> i32;
}

// ───────────────────────────────────────────────────────────────
// Event sink (driven adapter: domain → stdout / log)
// ───────────────────────────────────────────────────────────────

/// The service emits [`AppEvent`](super::events::AppEvent)s through
/// this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: startup config)
// ───────────────────────────────────────────────────────────────

/// Supplies the platform constants at startup.
///
/// Implementations MUST run [`FanConfig::validate`] before returning.
pub trait ConfigPort {
    /// Returns [`FanConfig::default()`] when no config source is set.
    fn load(&self) -> Result<FanConfig, ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The configured file does not exist.
    NotFound,
    /// The file is not valid JSON for [`FanConfig`].
    Corrupted,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error reading the file.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}
