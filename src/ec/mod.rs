//! EC transaction engine.
//!
//! Implements the ACPI EC register protocol on top of a [`PortIo`]
//! backend.  Each transaction is a fixed sequence of flag waits and
//! port accesses:
//!
//! ```text
//!  READ   wait IBF=0 ─▶ cmd 0x80 ─▶ wait IBF=0 ─▶ addr ─▶ wait OBF=1 ─▶ data
//!  WRITE  wait IBF=0 ─▶ cmd 0x81 ─▶ wait IBF=0 ─▶ addr ─▶ wait IBF=0 ─▶ value
//! ```
//!
//! A wait always precedes the access it guards.  The hardware reports
//! nothing when that order is broken; it just returns stale bytes or
//! loses track of the transaction.
//!
//! ## Shutdown
//!
//! Every wait polls the flag before looking at the shutdown token, so an
//! EC that answers is never abandoned mid-transaction.  Only a wait that
//! has not resolved yet gives up on cancellation.
//!
//! ## Recovery
//!
//! A transaction abandoned on a failed wait can leave a late response
//! byte in the output buffer, which the next READ would take as its own.
//! The next transaction therefore starts by discarding whatever OBF
//! holds.  Writing a fresh command byte restarts the EC's own sequence,
//! so a WRITE cut off after its command needs nothing more.

pub mod protocol;
pub mod wait;

use std::time::Instant;

use log::{debug, trace, warn};
use tokio_util::sync::CancellationToken;

use crate::app::ports::PortIo;
use crate::config::{PortMap, RegisterMap};
use crate::error::{EcError, Result};
use protocol::{EC_CMD_READ, EC_CMD_WRITE, EcStatus, Phase, WaitCondition};
use wait::WaitStrategy;

/// Upper bound on stale bytes discarded before a transaction.
const STALE_OUTPUT_MAX: usize = 16;

/// One embedded controller reached through a status/command and a data port.
pub struct EmbeddedController<P> {
    io: P,
    ports: PortMap,
    strategy: WaitStrategy,
    shutdown: Option<CancellationToken>,
    /// A transaction was abandoned mid-way; its response may still arrive.
    stale: bool,
}

impl<P: PortIo> EmbeddedController<P> {
    pub fn new(io: P, ports: PortMap, strategy: WaitStrategy) -> Self {
        Self {
            io,
            ports,
            strategy,
            shutdown: None,
            stale: false,
        }
    }

    /// Let unresolved flag waits end early once `shutdown` is cancelled.
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Read one byte from EC register `register`.
    pub fn read(&mut self, register: u8) -> Result<u8> {
        self.discard_stale_output()?;
        self.wait(WaitCondition::InputBufferClear, Phase::Command)?;
        self.write_port(self.ports.command, EC_CMD_READ)?;

        self.wait(WaitCondition::InputBufferClear, Phase::Address)?;
        self.write_port(self.ports.data, register)?;

        self.wait(WaitCondition::OutputBufferFull, Phase::Response)?;
        let value = self.read_port(self.ports.data)?;

        trace!("EC read 0x{:02x} -> 0x{:02x}", register, value);
        Ok(value)
    }

    /// Write `value` into EC register `register`.
    pub fn write(&mut self, register: u8, value: u8) -> Result<()> {
        self.discard_stale_output()?;
        self.wait(WaitCondition::InputBufferClear, Phase::Command)?;
        self.write_port(self.ports.command, EC_CMD_WRITE)?;

        self.wait(WaitCondition::InputBufferClear, Phase::Address)?;
        self.write_port(self.ports.data, register)?;

        self.wait(WaitCondition::InputBufferClear, Phase::Value)?;
        self.write_port(self.ports.data, value)?;

        trace!("EC write 0x{:02x} <- 0x{:02x}", register, value);
        Ok(())
    }

    /// Tachometer count, high byte first.
    ///
    /// The two reads are separate transactions, so a counter that rolls
    /// over in between yields one torn sample.  The next poll corrects it.
    pub fn read_rpm(&mut self, registers: &RegisterMap) -> Result<u16> {
        let high = self.read(registers.tach_high)?;
        let low = self.read(registers.tach_low)?;
        Ok((u16::from(high) << 8) | u16::from(low))
    }

    /// Current handshake flags.
    pub fn status(&mut self) -> Result<EcStatus> {
        self.read_port(self.ports.command).map(EcStatus::from_bits)
    }

    pub fn io(&self) -> &P {
        &self.io
    }

    pub fn io_mut(&mut self) -> &mut P {
        &mut self.io
    }

    // ── Internal ──────────────────────────────────────────────

    fn discard_stale_output(&mut self) -> Result<()> {
        if !self.stale {
            return Ok(());
        }
        for _ in 0..STALE_OUTPUT_MAX {
            if !self.status()?.output_buffer_full() {
                self.stale = false;
                return Ok(());
            }
            let byte = self.read_port(self.ports.data)?;
            debug!("Discarded stale EC output 0x{:02x}", byte);
        }
        warn!("EC output buffer still full after {} discards", STALE_OUTPUT_MAX);
        Ok(())
    }

    fn wait(&mut self, condition: WaitCondition, phase: Phase) -> Result<()> {
        let start = Instant::now();
        let deadline = self.strategy.deadline(start);

        loop {
            if condition.is_met(self.status()?) {
                return Ok(());
            }

            if self
                .shutdown
                .as_ref()
                .is_some_and(CancellationToken::is_cancelled)
            {
                debug!("EC wait for {} before {} cancelled", condition, phase);
                self.stale = true;
                return Err(EcError::Interrupted { condition, phase });
            }

            if let Some(deadline) = deadline {
                let now = Instant::now();
                if now >= deadline {
                    self.stale = true;
                    return Err(EcError::Unresponsive {
                        condition,
                        phase,
                        waited: now - start,
                    });
                }
            }

            std::hint::spin_loop();
        }
    }

    fn read_port(&mut self, port: u16) -> Result<u8> {
        self.io.read_port(port).map_err(|e| EcError::Port {
            port,
            kind: e.kind(),
        })
    }

    fn write_port(&mut self, port: u16, value: u8) -> Result<()> {
        self.io.write_port(port, value).map_err(|e| EcError::Port {
            port,
            kind: e.kind(),
        })
    }
}
