//! ACPI embedded-controller command set and status register layout.
//!
//! The EC sits behind two I/O ports: a status/command port and a data
//! port.  Reading the status port yields the handshake flags below;
//! writing it starts a transaction.  Everything else travels over the
//! data port.

use core::fmt;

/// Read one byte from the EC register space.
pub const EC_CMD_READ: u8 = 0x80;
/// Write one byte into the EC register space.
pub const EC_CMD_WRITE: u8 = 0x81;

/// EC has written a byte the host has not consumed yet.
pub const EC_STATUS_OBF: u8 = 0x01;
/// Host has written a byte the EC has not consumed yet.
pub const EC_STATUS_IBF: u8 = 0x02;

/// Snapshot of the status/command port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcStatus(u8);

impl EcStatus {
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// IBF: the EC is still holding the last byte the host wrote.
    pub const fn input_buffer_full(self) -> bool {
        self.0 & EC_STATUS_IBF != 0
    }

    /// OBF: a response byte is waiting in the data port.
    pub const fn output_buffer_full(self) -> bool {
        self.0 & EC_STATUS_OBF != 0
    }
}

/// The two conditions a transaction ever waits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitCondition {
    /// Input buffer empty: the host may write the next byte.
    InputBufferClear,
    /// Output buffer full: the host may read the data port.
    OutputBufferFull,
}

impl WaitCondition {
    pub const fn is_met(self, status: EcStatus) -> bool {
        match self {
            Self::InputBufferClear => !status.input_buffer_full(),
            Self::OutputBufferFull => status.output_buffer_full(),
        }
    }
}

impl fmt::Display for WaitCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputBufferClear => write!(f, "input buffer clear"),
            Self::OutputBufferFull => write!(f, "output buffer full"),
        }
    }
}

/// Which byte of a transaction a wait was guarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Before the READ/WRITE command byte.
    Command,
    /// Before the register address byte.
    Address,
    /// Before the value byte of a WRITE.
    Value,
    /// Before consuming the response byte of a READ.
    Response,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command => write!(f, "command byte"),
            Self::Address => write!(f, "address byte"),
            Self::Value => write!(f, "value byte"),
            Self::Response => write!(f, "response byte"),
        }
    }
}
