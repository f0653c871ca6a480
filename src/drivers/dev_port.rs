//! x86 I/O port access through `/dev/port`.
//!
//! `/dev/port` maps the 64 KiB port space onto file offsets: a one-byte
//! `pread` at offset N is an `inb` from port N, a `pwrite` an `outb`.
//! Opening it read-write needs `CAP_SYS_RAWIO`, which makes the open
//! itself the privilege check.  It is done once at startup and the
//! handle is kept for the life of the process.
//!
//! The ACPI EC driver in the kernel talks to the same ports.  Nothing
//! here arbitrates against it.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};

use log::info;

use crate::app::ports::PortIo;
use crate::config::PortMap;

pub const DEV_PORT_PATH: &str = "/dev/port";

// ── Error type ────────────────────────────────────────────────

/// Port access could not be acquired.  Always fatal.
#[derive(Debug)]
pub enum PortAccessError {
    /// The device node could not be opened read-write.
    Open { path: PathBuf, source: io::Error },
    /// The device opened but a probe read of `port` failed.
    Probe { port: u16, source: io::Error },
}

impl core::fmt::Display for PortAccessError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "cannot open {} read-write: {}", path.display(), source)
            }
            Self::Probe { port, source } => {
                write!(f, "probe of port 0x{:02x} failed: {}", port, source)
            }
        }
    }
}

impl std::error::Error for PortAccessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Probe { source, .. } => Some(source),
        }
    }
}

// ── Driver ────────────────────────────────────────────────────

pub struct DevPort {
    file: File,
}

impl DevPort {
    /// Acquire `/dev/port` for the EC ports in `ports`.
    pub fn acquire(ports: &PortMap) -> Result<Self, PortAccessError> {
        Self::acquire_at(Path::new(DEV_PORT_PATH), ports)
    }

    /// Acquire a port-space device at `path`.
    ///
    /// Both ports must be reachable or nothing is returned.  Only the
    /// status port is actually read: reading the data port would swallow
    /// a pending EC response.
    pub fn acquire_at(path: &Path, ports: &PortMap) -> Result<Self, PortAccessError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| PortAccessError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        let len = file
            .metadata()
            .map(|m| m.len())
            .map_err(|source| PortAccessError::Probe {
                port: ports.command,
                source,
            })?;
        // Character devices report zero length; only bound-check regular files.
        let highest = ports.command.max(ports.data);
        if len != 0 && u64::from(highest) >= len {
            return Err(PortAccessError::Probe {
                port: highest,
                source: io::ErrorKind::UnexpectedEof.into(),
            });
        }

        let mut dev = Self { file };
        dev.read_port(ports.command)
            .map_err(|source| PortAccessError::Probe {
                port: ports.command,
                source,
            })?;

        info!(
            "Port access acquired via {} (cmd=0x{:02x}, data=0x{:02x})",
            path.display(),
            ports.command,
            ports.data
        );
        Ok(dev)
    }
}

impl PortIo for DevPort {
    fn read_port(&mut self, port: u16) -> io::Result<u8> {
        let mut byte = [0u8; 1];
        self.file.read_exact_at(&mut byte, u64::from(port))?;
        Ok(byte[0])
    }

    fn write_port(&mut self, port: u16, value: u8) -> io::Result<()> {
        self.file.write_all_at(&[value], u64::from(port))
    }
}
