//! Test doubles for integration tests.
//!
//! [`FakeEc`] simulates the EC side of the two-port handshake: it keeps
//! IBF set after every host write, raises OBF once a READ has its
//! address, and records every port access together with any protocol
//! violation it sees.

use std::io;

use ec_fand::app::events::AppEvent;
use ec_fand::app::ports::{EventSink, PortIo, TemperatureSource};
use ec_fand::config::PortMap;
use ec_fand::ec::protocol::{EC_CMD_READ, EC_CMD_WRITE, EC_STATUS_IBF, EC_STATUS_OBF};
use tokio_util::sync::CancellationToken;

// ── Port access record ────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Status(u8),
    Command(u8),
    DataWrite(u8),
    DataRead(u8),
}

/// A run of consecutive status reads, classified by what it guarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wait {
    /// Followed by a host write: an input-buffer-clear wait.
    InputBufferClear,
    /// Followed by a data read: an output-buffer-full wait.
    OutputBufferFull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    ReadAddress,
    WriteAddress,
    WriteValue(u8),
}

// ── FakeEc ────────────────────────────────────────────────────

pub struct FakeEc {
    pub ports: PortMap,
    pub registers: [u8; 256],
    pub trace: Vec<Access>,
    pub violations: Vec<&'static str>,
    /// `(register, value)` for every completed WRITE.
    pub register_writes: Vec<(u8, u8)>,
    /// Register of every READ that received its address.
    pub register_reads: Vec<u8>,
    /// Status polls IBF stays set after each host write.
    pub ibf_latency: u32,
    /// Status polls before OBF rises after a READ address.
    pub obf_latency: u32,
    /// IBF never clears once set.
    pub stuck_ibf: bool,
    ibf: bool,
    ibf_countdown: u32,
    obf: bool,
    obf_countdown: u32,
    pending_output: Option<u8>,
    phase: Phase,
}

#[allow(dead_code)]
impl FakeEc {
    pub fn new() -> Self {
        Self {
            ports: PortMap::default(),
            registers: [0; 256],
            trace: Vec::new(),
            violations: Vec::new(),
            register_writes: Vec::new(),
            register_reads: Vec::new(),
            ibf_latency: 0,
            obf_latency: 0,
            stuck_ibf: false,
            ibf: false,
            ibf_countdown: 0,
            obf: false,
            obf_countdown: 0,
            pending_output: None,
            phase: Phase::Idle,
        }
    }

    /// An EC whose firmware takes `polls` status reads to react to anything.
    pub fn slow(polls: u32) -> Self {
        Self {
            ibf_latency: polls,
            obf_latency: polls,
            ..Self::new()
        }
    }

    /// An EC that never drains its input buffer.
    pub fn wedged() -> Self {
        Self {
            stuck_ibf: true,
            ibf: true,
            ..Self::new()
        }
    }

    pub fn with_tach(mut self, high: u8, low: u8) -> Self {
        self.registers[0x5C] = high;
        self.registers[0x5D] = low;
        self
    }

    /// Raise OBF now for a READ whose answer is still pending.
    pub fn deliver_late_response(&mut self) {
        if self.pending_output.is_some() {
            self.obf = true;
        }
    }

    /// Group the trace into flag waits.
    pub fn waits(&self) -> Vec<Wait> {
        let mut waits = Vec::new();
        let mut in_wait = false;
        for access in &self.trace {
            match access {
                Access::Status(_) => in_wait = true,
                Access::Command(_) | Access::DataWrite(_) if in_wait => {
                    waits.push(Wait::InputBufferClear);
                    in_wait = false;
                }
                Access::DataRead(_) if in_wait => {
                    waits.push(Wait::OutputBufferFull);
                    in_wait = false;
                }
                _ => {}
            }
        }
        waits
    }

    /// Every non-status access, in order.
    pub fn transfers(&self) -> Vec<Access> {
        self.trace
            .iter()
            .copied()
            .filter(|a| !matches!(a, Access::Status(_)))
            .collect()
    }

    /// Commands issued so far (one per transaction).
    pub fn transactions(&self) -> usize {
        self.trace
            .iter()
            .filter(|a| matches!(a, Access::Command(_)))
            .count()
    }

    fn poll_status(&mut self) -> u8 {
        if self.ibf && !self.stuck_ibf {
            if self.ibf_countdown == 0 {
                self.ibf = false;
            } else {
                self.ibf_countdown -= 1;
            }
        }
        if self.pending_output.is_some() && !self.obf {
            if self.obf_countdown == 0 {
                self.obf = true;
            } else {
                self.obf_countdown -= 1;
            }
        }
        let mut bits = 0;
        if self.obf {
            bits |= EC_STATUS_OBF;
        }
        if self.ibf {
            bits |= EC_STATUS_IBF;
        }
        bits
    }

    fn host_wrote(&mut self) {
        if self.ibf {
            self.violations.push("host wrote while input buffer full");
        }
        self.ibf = true;
        self.ibf_countdown = self.ibf_latency;
    }
}

impl Default for FakeEc {
    fn default() -> Self {
        Self::new()
    }
}

impl PortIo for FakeEc {
    fn read_port(&mut self, port: u16) -> io::Result<u8> {
        if port == self.ports.command {
            let bits = self.poll_status();
            self.trace.push(Access::Status(bits));
            Ok(bits)
        } else if port == self.ports.data {
            if !self.obf {
                self.violations.push("data read before output buffer full");
            }
            let value = self.pending_output.take().unwrap_or(0xFF);
            self.obf = false;
            self.trace.push(Access::DataRead(value));
            Ok(value)
        } else {
            Err(io::Error::new(io::ErrorKind::InvalidInput, "unknown port"))
        }
    }

    fn write_port(&mut self, port: u16, value: u8) -> io::Result<()> {
        if port == self.ports.command {
            self.trace.push(Access::Command(value));
            self.host_wrote();
            if self.phase != Phase::Idle {
                self.violations.push("command issued mid-transaction");
            }
            self.phase = match value {
                EC_CMD_READ => Phase::ReadAddress,
                EC_CMD_WRITE => Phase::WriteAddress,
                _ => {
                    self.violations.push("unknown command");
                    Phase::Idle
                }
            };
            Ok(())
        } else if port == self.ports.data {
            self.trace.push(Access::DataWrite(value));
            self.host_wrote();
            self.phase = match self.phase {
                Phase::ReadAddress => {
                    self.register_reads.push(value);
                    self.pending_output = Some(self.registers[value as usize]);
                    self.obf_countdown = self.obf_latency;
                    Phase::Idle
                }
                Phase::WriteAddress => Phase::WriteValue(value),
                Phase::WriteValue(register) => {
                    self.registers[register as usize] = value;
                    self.register_writes.push((register, value));
                    Phase::Idle
                }
                Phase::Idle => {
                    self.violations.push("data byte outside a transaction");
                    Phase::Idle
                }
            };
            Ok(())
        } else {
            Err(io::Error::new(io::ErrorKind::InvalidInput, "unknown port"))
        }
    }
}

// ── Temperature sources ───────────────────────────────────────

/// Replays a list of readings, repeating the last one.
pub struct ScriptedTemperature {
    readings: Vec<i32>,
    next: usize,
    /// Cancel this token after this many reads.
    cancel_after: Option<(usize, CancellationToken)>,
}

#[allow(dead_code)]
impl ScriptedTemperature {
    pub fn new(readings: &[i32]) -> Self {
        Self {
            readings: readings.to_vec(),
            next: 0,
            cancel_after: None,
        }
    }

    pub fn cancelling_after(mut self, reads: usize, token: CancellationToken) -> Self {
        self.cancel_after = Some((reads, token));
        self
    }

    pub fn reads(&self) -> usize {
        self.next
    }
}

impl TemperatureSource for ScriptedTemperature {
    fn read_celsius(&mut self) -> i32 {
        let idx = self.next.min(self.readings.len().saturating_sub(1));
        let value = self.readings.get(idx).copied().unwrap_or(0);
        self.next += 1;
        if let Some((after, token)) = &self.cancel_after {
            if self.next >= *after {
                token.cancel();
            }
        }
        value
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
    cancel_on_fault: Option<CancellationToken>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            cancel_on_fault: None,
        }
    }

    /// Cancel `token` as soon as an `EcFault` is emitted.
    pub fn cancelling_on_fault(token: CancellationToken) -> Self {
        Self {
            events: Vec::new(),
            cancel_on_fault: Some(token),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Telemetry(sample) => Some(sample.to_string()),
                _ => None,
            })
            .collect()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        if let (AppEvent::EcFault(_), Some(token)) = (event, &self.cancel_on_fault) {
            token.cancel();
        }
        self.events.push(event.clone());
    }
}
