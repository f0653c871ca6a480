//! Line-oriented event sink.
//!
//! Implements [`EventSink`] by printing one status line per iteration
//! (`temp=<int>C duty=<int> rpm=<int>`) to a writer, stdout in the
//! daemon.  Lifecycle and fault events go to the log instead so the
//! writer carries nothing but status lines.

use std::io::{self, Write};

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

pub struct TelemetryPrinter<W> {
    out: W,
    /// Set after a failed write so a closed pipe warns once.
    broken: bool,
}

impl TelemetryPrinter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TelemetryPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out, broken: false }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    fn print_line(&mut self, line: &dyn core::fmt::Display) {
        let result = writeln!(self.out, "{}", line).and_then(|()| self.out.flush());
        match result {
            Ok(()) => self.broken = false,
            Err(e) if !self.broken => {
                warn!("Telemetry output failed: {}", e);
                self.broken = true;
            }
            Err(_) => {}
        }
    }
}

impl<W: Write> EventSink for TelemetryPrinter<W> {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(sample) => self.print_line(sample),
            AppEvent::Started { poll_interval_ms } => {
                info!("Fan control started, polling every {} ms", poll_interval_ms);
            }
            AppEvent::EcFault(e) => {
                warn!("EC fault: {}", e);
            }
            AppEvent::Stopped { iterations } => {
                info!("Fan control stopped after {} iterations", iterations);
            }
        }
    }
}
