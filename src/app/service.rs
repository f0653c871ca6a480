//! Fan control service — the control loop.
//!
//! ```text
//!  TemperatureSource ──▶ ┌──────────────────────┐ ──▶ EventSink
//!                        │      FanService       │
//!  EmbeddedController ◀──│  manual mode · curve  │
//!                        └──────────────────────┘
//! ```
//!
//! Each iteration, in order: force manual mode, sample the temperature,
//! look up the duty, write it, read the tachometer back, emit a
//! telemetry event.  Manual mode is re-asserted every iteration because
//! the firmware may fall back to its own curve at any time.
//!
//! ## Shutdown
//!
//! The token is checked once at the top of each iteration, and the
//! inter-iteration sleep wakes as soon as it is cancelled.  An iteration
//! that has started always runs its transactions to completion.

use std::time::Duration;

use log::{debug, error, info, warn};
use tokio_util::sync::CancellationToken;

use crate::app::events::{AppEvent, TelemetrySample};
use crate::app::ports::{EventSink, PortIo, TemperatureSource};
use crate::config::{FanConfig, RegisterMap};
use crate::control::curve::FanCurve;
use crate::ec::EmbeddedController;
use crate::error::EcError;

pub struct FanService {
    registers: RegisterMap,
    manual_mode_value: u8,
    curve: FanCurve,
    poll_interval: Duration,
    iterations: u64,
    last_duty: Option<u8>,
}

impl FanService {
    pub fn new(config: &FanConfig) -> Self {
        Self {
            registers: config.registers,
            manual_mode_value: config.manual_mode_value,
            curve: config.curve.clone(),
            poll_interval: config.poll_interval(),
            iterations: 0,
            last_duty: None,
        }
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// Run one control iteration against the EC.
    pub fn tick<P: PortIo>(
        &mut self,
        ec: &mut EmbeddedController<P>,
        sensor: &mut impl TemperatureSource,
    ) -> Result<TelemetrySample, EcError> {
        ec.write(self.registers.fan_mode, self.manual_mode_value)?;

        let temperature_c = sensor.read_celsius();
        let duty = self.curve.duty_for(temperature_c);
        ec.write(self.registers.fan_duty, duty)?;

        let rpm = ec.read_rpm(&self.registers)?;

        if self.last_duty != Some(duty) {
            match self.last_duty {
                Some(prev) => info!("Duty {}% -> {}% at {} C", prev, duty, temperature_c),
                None => info!("Duty {}% at {} C", duty, temperature_c),
            }
            self.last_duty = Some(duty);
        }
        self.iterations += 1;

        Ok(TelemetrySample {
            temperature_c,
            duty,
            rpm,
        })
    }

    /// Iterate until `shutdown` is cancelled.
    ///
    /// An unresponsive EC costs one iteration and is reported through the
    /// sink; a failing port backend ends the loop with an error.
    pub async fn run<P: PortIo>(
        &mut self,
        ec: &mut EmbeddedController<P>,
        sensor: &mut impl TemperatureSource,
        sink: &mut impl EventSink,
        shutdown: &CancellationToken,
    ) -> Result<(), EcError> {
        sink.emit(&AppEvent::Started {
            poll_interval_ms: self.poll_interval.as_millis() as u64,
        });

        while !shutdown.is_cancelled() {
            match self.tick(ec, sensor) {
                Ok(sample) => sink.emit(&AppEvent::Telemetry(sample)),
                Err(e @ EcError::Interrupted { .. }) => {
                    debug!("Iteration abandoned: {}", e);
                    break;
                }
                Err(e) if e.is_transient() => {
                    warn!("Iteration abandoned: {}", e);
                    sink.emit(&AppEvent::EcFault(e));
                }
                Err(e) => {
                    error!("EC access failed: {}", e);
                    sink.emit(&AppEvent::Stopped {
                        iterations: self.iterations,
                    });
                    return Err(e);
                }
            }

            tokio::select! {
                () = tokio::time::sleep(self.poll_interval) => {}
                () = shutdown.cancelled() => break,
            }
        }

        sink.emit(&AppEvent::Stopped {
            iterations: self.iterations,
        });
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────

    /// Completed iterations since construction.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }
}
